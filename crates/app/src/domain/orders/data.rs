//! Order Data

use crate::domain::{
    menu::records::MenuItemUuid,
    orders::records::{OrderLineUuid, OrderUuid},
    users::records::UserUuid,
};

/// New Order Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub user: UserUuid,
    pub total_price: u64,
}

/// New Order Line Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderLine {
    pub uuid: OrderLineUuid,
    pub menu_item: MenuItemUuid,
    pub quantity: u32,
    pub price: u64,
}
