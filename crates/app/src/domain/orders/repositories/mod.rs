//! Order Repositories

use rustc_hash::FxHashMap;
use sqlx::{Postgres, Transaction};

use crate::domain::orders::records::{OrderRecord, OrderUuid};

mod lines;
mod orders;

pub(crate) use lines::PgOrderLinesRepository;
pub(crate) use orders::PgOrdersRepository;

/// Load the lines for `orders` in one query and attach them in place.
pub(crate) async fn attach_lines(
    tx: &mut Transaction<'_, Postgres>,
    lines: &PgOrderLinesRepository,
    orders: &mut [OrderRecord],
) -> Result<(), sqlx::Error> {
    if orders.is_empty() {
        return Ok(());
    }

    let uuids: Vec<OrderUuid> = orders.iter().map(|order| order.uuid).collect();

    let mut by_order: FxHashMap<OrderUuid, Vec<_>> = FxHashMap::default();

    for line in lines.list_lines(tx, &uuids).await? {
        by_order.entry(line.order_uuid).or_default().push(line);
    }

    for order in orders {
        order.lines = by_order.remove(&order.uuid).unwrap_or_default();
    }

    Ok(())
}
