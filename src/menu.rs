//! Menu

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub mod seed;

/// Menu category.
///
/// Variants are declared in the same order the catalogue is sorted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Hot and cold drinks
    Beverages,

    /// Morning items
    Breakfast,

    /// Sweets
    Desserts,

    /// Full meals
    Meals,

    /// Light bites
    Snacks,
}

impl Category {
    /// Every category in catalogue order.
    pub const ALL: [Category; 5] = [
        Category::Beverages,
        Category::Breakfast,
        Category::Desserts,
        Category::Meals,
        Category::Snacks,
    ];

    /// Storage representation of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beverages => "beverages",
            Self::Breakfast => "breakfast",
            Self::Desserts => "desserts",
            Self::Meals => "meals",
            Self::Snacks => "snacks",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a string does not name a known category.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown menu category: {0}")]
pub struct CategoryParseError(pub String);

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| CategoryParseError(value.to_string()))
    }
}

/// A dish or drink on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Item identifier
    pub uuid: Uuid,

    /// Display name
    pub name: String,

    /// Menu category
    pub category: Category,

    /// Unit price in minor currency units
    pub price: u64,

    /// Estimated preparation time in minutes
    pub estimated_time: u32,

    /// Whether the kitchen is currently serving it
    pub available: bool,

    /// Today's special
    pub is_special: bool,
}

/// Keep only the items in the given category.
pub fn filter_by_category(items: &[MenuItem], category: Category) -> Vec<&MenuItem> {
    items
        .iter()
        .filter(|item| item.category == category)
        .collect()
}

/// Keep only today's specials.
pub fn filter_specials(items: &[MenuItem]) -> Vec<&MenuItem> {
    items.iter().filter(|item| item.is_special).collect()
}
