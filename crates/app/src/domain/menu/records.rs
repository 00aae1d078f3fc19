//! Menu Records

use canteen::menu::{Category, MenuItem};
use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Menu Item UUID
pub type MenuItemUuid = TypedUuid<MenuItemRecord>;

/// Menu Item Record
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItemRecord {
    pub uuid: MenuItemUuid,
    pub name: String,
    pub category: Category,
    pub price: u64,
    pub estimated_time: u32,
    pub available: bool,
    pub is_special: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<MenuItemRecord> for MenuItem {
    fn from(record: MenuItemRecord) -> Self {
        Self {
            uuid: record.uuid.into_uuid(),
            name: record.name,
            category: record.category,
            price: record.price,
            estimated_time: record.estimated_time,
            available: record.available,
            is_special: record.is_special,
        }
    }
}
