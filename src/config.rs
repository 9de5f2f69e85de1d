// ⚙️ Settings - where the spreadsheet lives and how much can be spent
//
// Layering: built-in defaults < JSON config file < environment / CLI flags.
// The last layer is applied by the binary through `Settings::with_overrides`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_FILE: &str = "expenses.xlsx";
pub const DEFAULT_BUDGET: f64 = 2000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Spreadsheet holding one expense per row
    #[serde(default = "default_file")]
    pub file: PathBuf,

    /// Monthly budget
    #[serde(default = "default_budget")]
    pub budget: f64,
}

fn default_file() -> PathBuf {
    PathBuf::from(DEFAULT_FILE)
}

fn default_budget() -> f64 {
    DEFAULT_BUDGET
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            file: default_file(),
            budget: default_budget(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file; missing keys fall back to defaults
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Defaults, or the config file when one is given
    pub fn load(config: Option<&Path>) -> Result<Self> {
        match config {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Apply flag/env values on top of whatever was loaded
    pub fn with_overrides(mut self, file: Option<PathBuf>, budget: Option<f64>) -> Self {
        if let Some(file) = file {
            self.file = file;
        }
        if let Some(budget) = budget {
            self.budget = budget;
        }
        self
    }
}
