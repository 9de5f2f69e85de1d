// 🏷️ Category Entity - the fixed set of spending buckets
//
// Categories are chosen by 1-based menu index at entry time and persisted
// as their emoji label in the spreadsheet's category column.

use crate::error::ExpenseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Home,
    Work,
    Fun,
    Misc,
}

impl Category {
    /// All categories in menu order (index 1 first)
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Home,
        Category::Work,
        Category::Fun,
        Category::Misc,
    ];

    /// Label written to the spreadsheet (e.g., "🍔 Food")
    pub fn label(&self) -> &'static str {
        match self {
            Category::Food => "🍔 Food",
            Category::Home => "🏠 Home",
            Category::Work => "💼 Work",
            Category::Fun => "🎉 Fun",
            Category::Misc => "✨ Misc",
        }
    }

    /// Plain name without the emoji
    pub fn name(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Home => "Home",
            Category::Work => "Work",
            Category::Fun => "Fun",
            Category::Misc => "Misc",
        }
    }

    /// 1-based menu index
    pub fn index(&self) -> usize {
        match self {
            Category::Food => 1,
            Category::Home => 2,
            Category::Work => 3,
            Category::Fun => 4,
            Category::Misc => 5,
        }
    }

    /// Look up a category by its 1-based menu index
    pub fn from_index(index: usize) -> Option<Category> {
        index
            .checked_sub(1)
            .and_then(|i| Category::ALL.get(i))
            .copied()
    }

    /// Menu range shown in the prompt, e.g. "[1 - 5]"
    pub fn menu_range() -> String {
        format!("[1 - {}]", Category::ALL.len())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts the exact label, the plain name (any case) or a menu index
impl FromStr for Category {
    type Err = ExpenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if let Ok(index) = trimmed.parse::<usize>() {
            return Category::from_index(index)
                .ok_or_else(|| ExpenseError::UnknownCategory(s.to_string()));
        }

        Category::ALL
            .iter()
            .find(|c| c.label() == trimmed || c.name().eq_ignore_ascii_case(trimmed))
            .copied()
            .ok_or_else(|| ExpenseError::UnknownCategory(s.to_string()))
    }
}

// ============================================================================
// TESTS
// ============================================================================
