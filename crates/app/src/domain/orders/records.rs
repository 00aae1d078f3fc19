//! Order Records

use canteen::orders::{FulfillmentStatus, PaymentStatus};
use jiff::Timestamp;

use crate::{
    domain::{menu::records::MenuItemUuid, users::records::UserUuid},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Line UUID
pub type OrderLineUuid = TypedUuid<OrderLineRecord>;

/// Order Record
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,

    /// Owner's profile name, when the viewer may see it.
    pub customer_name: Option<String>,

    pub total_price: u64,
    pub payment_status: PaymentStatus,
    pub status: FulfillmentStatus,

    /// Counter number called out when the order is ready.
    pub token_number: u64,

    pub created_at: Timestamp,
    pub lines: Vec<OrderLineRecord>,
}

/// Order Line Record
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLineRecord {
    pub uuid: OrderLineUuid,
    pub order_uuid: OrderUuid,
    pub menu_item_uuid: MenuItemUuid,

    /// Current menu name; absent once the item is withdrawn.
    pub name: Option<String>,

    pub quantity: u32,

    /// Unit price captured at checkout.
    pub price: u64,
}
