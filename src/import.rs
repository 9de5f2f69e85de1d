// 📥 CSV Import - bulk-load expenses from a CSV file
//
// Expected header: name,amount,category (any case). The category column may
// hold the full label, the plain name or the menu number.

use crate::entities::{Category, Expense};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize)]
struct CsvExpense {
    #[serde(alias = "Name", alias = "NAME")]
    name: String,

    #[serde(alias = "Amount", alias = "AMOUNT")]
    amount: f64,

    #[serde(alias = "Category", alias = "CATEGORY")]
    category: String,
}

pub fn load_csv(csv_path: &Path) -> Result<Vec<Expense>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(csv_path)
        .with_context(|| format!("Failed to open CSV file: {}", csv_path.display()))?;

    let mut expenses = Vec::new();

    for (i, result) in rdr.deserialize().enumerate() {
        // header is line 1
        let line = i + 2;
        let record: CsvExpense =
            result.with_context(|| format!("Failed to deserialize expense on line {}", line))?;

        let category: Category = record
            .category
            .parse()
            .with_context(|| format!("Invalid category on line {}", line))?;

        expenses.push(Expense::new(record.name, record.amount, category));
    }

    info!(path = %csv_path.display(), count = expenses.len(), "CSV loaded");
    Ok(expenses)
}
