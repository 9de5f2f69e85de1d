// Expense Tracker - Core Library
// Exposes the expense model, spreadsheet persistence and summary for the CLI and tests

pub mod config;
pub mod entities;
pub mod error;
pub mod import;
pub mod prompt;
pub mod summary;
pub mod workbook;

// Re-export commonly used types
pub use config::{Settings, DEFAULT_BUDGET, DEFAULT_FILE};
pub use entities::{Category, Expense};
pub use error::ExpenseError;
pub use import::load_csv;
pub use prompt::collect_expense;
pub use summary::{
    count_foreign_labels, daily_budget, days_in_month, days_remaining_in_month,
    group_by_category, summarize, CategoryTotal, Summary,
};
pub use workbook::{
    append_expense, append_expenses, init_workbook, render_chart, ChartSpec, ExpenseSheet,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
