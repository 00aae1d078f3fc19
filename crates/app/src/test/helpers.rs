//! Test Helpers

use canteen::menu::{Category, MenuItem};
use uuid::Uuid;

/// An available, non-special item with a fresh UUID.
pub(crate) fn menu_item(name: &str, category: Category, price: u64) -> MenuItem {
    MenuItem {
        uuid: Uuid::now_v7(),
        name: name.to_string(),
        category,
        price,
        estimated_time: 10,
        available: true,
        is_special: false,
    }
}
