// ⌨️ Console Prompt - collect one expense from the user
//
// Input and output are injected so the dialogue can be driven from tests.
// Only an out-of-range category number is re-prompted; anything unparseable
// is returned as an error.

use crate::entities::{Category, Expense};
use crate::error::ExpenseError;
use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::debug;

/// Ask for name, amount and category, re-prompting until the category
/// number is within the menu
pub fn collect_expense<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<Expense> {
    writeln!(output, "🎯 Getting User Expense")?;

    let name = ask(&mut input, &mut output, "Enter expense name: ")?;

    let amount_text = ask(&mut input, &mut output, "Enter expense amount: ")?;
    let amount: f64 = amount_text
        .trim()
        .parse()
        .map_err(|_| ExpenseError::InvalidAmount(amount_text.clone()))?;

    loop {
        writeln!(output, "Select a category: ")?;
        for category in Category::ALL {
            writeln!(output, "  {}. {}", category.index(), category.label())?;
        }

        let prompt = format!("Enter a category number {}: ", Category::menu_range());
        let answer = ask(&mut input, &mut output, &prompt)?;
        let index: usize = answer
            .trim()
            .parse()
            .map_err(|_| ExpenseError::InvalidCategoryInput(answer.clone()))?;

        match Category::from_index(index) {
            Some(category) => {
                debug!(name = %name, amount, category = category.name(), "expense collected");
                return Ok(Expense::new(name, amount, category));
            }
            None => writeln!(output, "Invalid category. Please try again!")?,
        }
    }
}

/// Print a prompt and read one line without its line ending
fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> Result<String> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(ExpenseError::UnexpectedEof.into());
    }

    let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed_len);
    Ok(line)
}

// ============================================================================
// TESTS
// ============================================================================
