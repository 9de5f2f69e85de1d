// 📈 Expense Summary - grouped totals, remaining budget, daily allowance

use crate::entities::Expense;
use crate::workbook::render_chart;
use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use crossterm::style::Stylize;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Total for one category label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Per-category sums in the order categories first appear
    pub by_category: Vec<CategoryTotal>,
    pub total_spent: f64,
    pub budget: f64,
    /// May be negative once the budget is blown
    pub remaining_budget: f64,
    pub days_remaining: u32,
    /// `None` on the last day of the month, when no days remain to divide by
    pub daily_budget: Option<f64>,
}

impl Summary {
    pub fn compute(expenses: &[Expense], budget: f64, today: NaiveDate) -> Self {
        let by_category = group_by_category(expenses);
        let total_spent: f64 = expenses.iter().map(|e| e.amount).sum();
        let remaining_budget = budget - total_spent;
        let days_remaining = days_remaining_in_month(today);

        Summary {
            by_category,
            total_spent,
            budget,
            remaining_budget,
            days_remaining,
            daily_budget: daily_budget(remaining_budget, days_remaining),
        }
    }

    /// Print the console report
    pub fn render<W: Write>(&self, mut out: W) -> Result<()> {
        writeln!(out, "Expenses By Category 📈:")?;
        for total in &self.by_category {
            writeln!(out, "  {}: ${:.2}", total.category, total.amount)?;
        }

        writeln!(out, "💵 Total Spent: ${:.2}", self.total_spent)?;
        writeln!(out, "✅ Budget Remaining: ${:.2}", self.remaining_budget)?;

        let per_day = match self.daily_budget {
            Some(amount) => format!("👉 Budget Per Day: ${:.2}", amount),
            None => "👉 Budget Per Day: n/a (last day of the month)".to_string(),
        };
        writeln!(out, "{}", per_day.green())?;
        Ok(())
    }
}

/// Sum amounts per category label, keeping first-seen order
pub fn group_by_category(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for expense in expenses {
        match totals.iter_mut().find(|t| t.category == expense.category) {
            Some(total) => total.amount += expense.amount,
            None => totals.push(CategoryTotal {
                category: expense.category.clone(),
                amount: expense.amount,
            }),
        }
    }

    totals
}

/// Number of calendar days in `date`'s month
pub fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = match date.month() {
        12 => (date.year() + 1, 1),
        m => (date.year(), m + 1),
    };

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

/// Days left after today; zero on the last day
pub fn days_remaining_in_month(today: NaiveDate) -> u32 {
    days_in_month(today) - today.day()
}

pub fn daily_budget(remaining_budget: f64, days_remaining: u32) -> Option<f64> {
    if days_remaining == 0 {
        None
    } else {
        Some(remaining_budget / days_remaining as f64)
    }
}

/// Rows filed under a label outside the fixed category set
pub fn count_foreign_labels(expenses: &[Expense]) -> usize {
    expenses
        .iter()
        .filter(|e| e.known_category().is_none())
        .count()
}

/// Re-read the workbook, compute the summary and redraw the chart
pub fn summarize(path: &Path, budget: f64, today: NaiveDate) -> Result<Summary> {
    let sheet = render_chart(path)?;
    let summary = Summary::compute(&sheet.expenses, budget, today);
    let foreign_labels = count_foreign_labels(&sheet.expenses);

    info!(
        rows = sheet.row_count(),
        foreign_labels,
        total_spent = summary.total_spent,
        remaining = summary.remaining_budget,
        "summary computed"
    );
    Ok(summary)
}

// ============================================================================
// TESTS
// ============================================================================
