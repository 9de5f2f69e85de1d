// ⚠️ Expense Errors - typed failures for entry, persistence and import

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExpenseError {
    #[error("Expense workbook not found: {0} (run `expense-tracker init` first)")]
    WorkbookNotFound(PathBuf),

    #[error("Expense workbook has no worksheets: {0}")]
    EmptyWorkbook(PathBuf),

    #[error("Refusing to overwrite existing workbook: {0} (use --force)")]
    AlreadyExists(PathBuf),

    /// The workbook holds content a rewrite would lose
    #[error("Workbook {path} cannot be rewritten without losing data: {reason}")]
    UnsupportedWorkbook { path: PathBuf, reason: String },

    /// `row` is the 1-based spreadsheet row number
    #[error("Malformed expense at row {row}: {reason}")]
    MalformedRow { row: u32, reason: String },

    #[error("Invalid expense amount: {0:?}")]
    InvalidAmount(String),

    #[error("Invalid category number: {0:?}")]
    InvalidCategoryInput(String),

    #[error("Unknown category: {0:?}")]
    UnknownCategory(String),

    #[error("Input ended before the expense was complete")]
    UnexpectedEof,
}
