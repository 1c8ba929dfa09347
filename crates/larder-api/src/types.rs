//! Typed inputs for API operations.

use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;

/// Meal slot of a diary entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meal {
    Breakfast,
    Lunch,
    Dinner,
    Other,
}

impl Meal {
    /// Provider spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Meal {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "breakfast" => Ok(Self::Breakfast),
            "lunch" => Ok(Self::Lunch),
            "dinner" => Ok(Self::Dinner),
            "other" => Ok(Self::Other),
            _ => Err(ApiError::Validation(format!(
                "meal must be breakfast, lunch, dinner or other, got {s:?}"
            ))),
        }
    }
}

/// Paged search over foods or recipes.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub expression: String,
    /// Zero-based page.
    pub page_number: Option<u32>,
    /// Provider caps this at 50.
    pub max_results: Option<u32>,
}

impl SearchQuery {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            ..Self::default()
        }
    }
}

/// A new diary entry for `food_entry.create`.
#[derive(Debug, Clone)]
pub struct NewFoodEntry {
    pub food_id: String,
    pub food_entry_name: String,
    pub serving_id: String,
    pub number_of_units: f64,
    pub meal: Meal,
    /// `YYYY-MM-DD`; today when absent.
    pub date: Option<String>,
}
