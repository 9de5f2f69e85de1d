// 💸 Expense Entity - one recorded spending entry

use super::category::Category;
use serde::{Deserialize, Serialize};

/// One row of the expense spreadsheet: name, amount, category
///
/// The category is kept as its label string so rows read back from the file
/// survive even if someone typed a label by hand. New entries go through
/// [`Expense::new`], which only accepts a [`Category`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub name: String,
    pub amount: f64,
    pub category: String,
}

impl Expense {
    pub fn new(name: impl Into<String>, amount: f64, category: Category) -> Self {
        Expense {
            name: name.into(),
            amount,
            category: category.label().to_string(),
        }
    }

    /// Build from a persisted row without validating the category
    pub fn from_row(name: impl Into<String>, amount: f64, category: impl Into<String>) -> Self {
        Expense {
            name: name.into(),
            amount,
            category: category.into(),
        }
    }

    /// The matching fixed category, if the label is one of ours
    pub fn known_category(&self) -> Option<Category> {
        Category::ALL
            .iter()
            .find(|c| c.label() == self.category)
            .copied()
    }
}
