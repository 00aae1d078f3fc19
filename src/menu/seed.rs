//! Menu seed files
//!
//! A seed file lists the menu in YAML, keyed by a stable item UUID so it can
//! be re-applied without duplicating rows:
//!
//! ```yaml
//! items:
//!   0190c6d2-0000-7000-8000-000000000001:
//!     name: Masala Dosa
//!     category: breakfast
//!     price: "45.00 INR"
//!     estimated_time: 10
//!     is_special: true
//! ```

use std::{fs, path::Path};

use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    menu::{Category, MenuItem},
    money::parse_price,
};

/// Seed parsing errors.
#[derive(Debug, Error)]
pub enum SeedError {
    /// IO error reading the seed file
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("invalid price for {item}: {price}")]
    InvalidPrice {
        /// Item name
        item: String,

        /// Rejected price string
        price: String,
    },

    /// Items priced in different currencies
    #[error("currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch {
        /// Currency of the first item
        expected: String,

        /// Currency of the offending item
        found: String,
    },

    /// Item with a blank name
    #[error("item {0} has an empty name")]
    EmptyName(Uuid),
}

/// Wrapper for a menu seed in YAML.
#[derive(Debug, Deserialize)]
pub struct MenuSeed {
    /// Map of item UUID -> item fixture
    pub items: FxHashMap<Uuid, SeedItem>,
}

/// A menu item as written in a seed file.
#[derive(Debug, Deserialize)]
pub struct SeedItem {
    /// Display name
    pub name: String,

    /// Menu category
    pub category: Category,

    /// Price (e.g. `"45.00 INR"`)
    pub price: String,

    /// Estimated preparation time in minutes
    #[serde(default)]
    pub estimated_time: u32,

    /// Whether the item is being served
    #[serde(default = "available_by_default")]
    pub available: bool,

    /// Today's special
    #[serde(default)]
    pub is_special: bool,
}

fn available_by_default() -> bool {
    true
}

impl MenuSeed {
    /// Parse a seed from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML does not describe a menu seed.
    pub fn from_yaml(yaml: &str) -> Result<Self, SeedError> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Read and parse a seed file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        Self::from_yaml(&fs::read_to_string(path)?)
    }

    /// Convert the seed into menu items, sorted by category then name.
    ///
    /// # Errors
    ///
    /// Returns an error if any item has a blank name, an unparseable price, or
    /// a currency different from the other items.
    pub fn into_items(self) -> Result<Vec<MenuItem>, SeedError> {
        let mut currency: Option<&'static str> = None;

        let mut items = self
            .items
            .into_iter()
            .map(|(uuid, seed)| {
                if seed.name.trim().is_empty() {
                    return Err(SeedError::EmptyName(uuid));
                }

                let (price, item_currency) =
                    parse_price(&seed.price).ok_or_else(|| SeedError::InvalidPrice {
                        item: seed.name.clone(),
                        price: seed.price.clone(),
                    })?;

                match currency {
                    Some(expected) if expected != item_currency.iso_alpha_code => {
                        return Err(SeedError::CurrencyMismatch {
                            expected: expected.to_string(),
                            found: item_currency.iso_alpha_code.to_string(),
                        });
                    }
                    Some(_) => {}
                    None => currency = Some(item_currency.iso_alpha_code),
                }

                Ok(MenuItem {
                    uuid,
                    name: seed.name.trim().to_string(),
                    category: seed.category,
                    price,
                    estimated_time: seed.estimated_time,
                    available: seed.available,
                    is_special: seed.is_special,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        items.sort_by(|a, b| (a.category, &a.name).cmp(&(b.category, &b.name)));

        Ok(items)
    }
}
