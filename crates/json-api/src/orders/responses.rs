//! Order responses shared by the customer and kitchen views.

use canteen::money::format_minor;
use canteen_app::domain::orders::records::{OrderLineRecord, OrderRecord};
use rusty_money::iso::Currency;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,

    /// Counter number called out when the order is ready
    pub token_number: u64,

    /// Only present in the kitchen view
    pub customer_name: Option<String>,

    /// One of `queued`, `preparing`, `ready`, `delivered`
    pub status: String,

    /// One of `pending`, `paid`
    pub payment_status: String,

    /// Total in minor currency units
    pub total_price: u64,

    pub total_display: String,

    /// The single forward step available from `status`; kitchen view only
    pub next_action: Option<String>,

    pub created_at: String,
    pub lines: Vec<OrderLineResponse>,
}

impl OrderResponse {
    /// Customer tracking view.
    pub(crate) fn new(order: OrderRecord, currency: &'static Currency) -> Self {
        Self::build(order, currency, None)
    }

    /// Kitchen view, advertising the next status step.
    pub(crate) fn for_kitchen(order: OrderRecord, currency: &'static Currency) -> Self {
        let next_action = order.status.next_action().map(|action| action.to_string());

        Self::build(order, currency, next_action)
    }

    fn build(
        order: OrderRecord,
        currency: &'static Currency,
        next_action: Option<String>,
    ) -> Self {
        Self {
            uuid: order.uuid.into_uuid(),
            token_number: order.token_number,
            customer_name: order.customer_name,
            status: order.status.to_string(),
            payment_status: order.payment_status.to_string(),
            total_price: order.total_price,
            total_display: format_minor(order.total_price, currency),
            next_action,
            created_at: order.created_at.to_string(),
            lines: order
                .lines
                .into_iter()
                .map(|line| OrderLineResponse::new(line, currency))
                .collect(),
        }
    }
}

/// Order Line Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderLineResponse {
    pub uuid: Uuid,
    pub menu_item_uuid: Uuid,

    /// Current menu name; absent once the item is withdrawn
    pub name: Option<String>,

    pub quantity: u32,

    /// Unit price captured at checkout, in minor currency units
    pub price: u64,

    pub price_display: String,
}

impl OrderLineResponse {
    fn new(line: OrderLineRecord, currency: &'static Currency) -> Self {
        Self {
            uuid: line.uuid.into_uuid(),
            menu_item_uuid: line.menu_item_uuid.into_uuid(),
            name: line.name,
            quantity: line.quantity,
            price: line.price,
            price_display: format_minor(line.price, currency),
        }
    }
}
