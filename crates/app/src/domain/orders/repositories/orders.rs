//! Orders Repository

use canteen::orders::{FulfillmentStatus, PaymentStatus};
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::{
    database::{amount_to_i64, try_get_amount},
    domain::{
        orders::{
            data::NewOrder,
            records::{OrderRecord, OrderUuid},
        },
        users::records::UserUuid,
    },
};

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const MARK_PAID_SQL: &str = include_str!("../sql/mark_paid.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const LIST_USER_ORDERS_SQL: &str = include_str!("../sql/list_user_orders.sql");
const LIST_ALL_ORDERS_SQL: &str = include_str!("../sql/list_all_orders.sql");
const TRANSITION_ORDER_SQL: &str = include_str!("../sql/transition_order.sql");
const VIEWER_IS_ADMIN_SQL: &str = include_str!("../sql/viewer_is_admin.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrder,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.user.into_uuid())
            .bind(amount_to_i64(order.total_price, "total_price")?)
            .fetch_one(&mut **tx)
            .await
    }

    /// Settle a pending order. Returns the number of rows settled.
    pub(crate) async fn mark_paid(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(MARK_PAID_SQL)
            .bind(order.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_user_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        statuses: &[FulfillmentStatus],
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        let statuses: Vec<&str> = statuses.iter().map(|status| status.as_str()).collect();

        query_as::<Postgres, OrderRecord>(LIST_USER_ORDERS_SQL)
            .bind(user.into_uuid())
            .bind(statuses)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_all_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_ALL_ORDERS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    /// Move an order from `from` to `to`. Matches nothing when the order has
    /// already moved on, so a stale action cannot skip a status.
    pub(crate) async fn transition_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        from: FulfillmentStatus,
        to: FulfillmentStatus,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(TRANSITION_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(from.as_str())
            .bind(to.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn viewer_is_admin(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<bool, sqlx::Error> {
        query_scalar(VIEWER_IS_ADMIN_SQL).fetch_one(&mut **tx).await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let payment_status: String = row.try_get("payment_status")?;
        let payment_status =
            payment_status
                .parse::<PaymentStatus>()
                .map_err(|e| sqlx::Error::ColumnDecode {
                    index: "payment_status".to_string(),
                    source: Box::new(e),
                })?;

        let status: String = row.try_get("status")?;
        let status = status
            .parse::<FulfillmentStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            customer_name: row.try_get("customer_name")?,
            total_price: try_get_amount(row, "total_price")?,
            payment_status,
            status,
            token_number: try_get_amount(row, "token_number")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            lines: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    async fn pending_order(
        tx: &mut Transaction<'_, Postgres>,
        customer: UserUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        PgOrdersRepository::new()
            .create_order(
                tx,
                &NewOrder {
                    uuid: OrderUuid::new(),
                    user: customer,
                    total_price: 130,
                },
            )
            .await
    }

    #[tokio::test]
    async fn order_is_pending_until_marked_paid_exactly_once() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer("Ravi").await;
        let repository = PgOrdersRepository::new();

        let mut tx = ctx.app_db.begin_viewer_transaction(Some(customer)).await?;

        let created = pending_order(&mut tx, customer).await?;

        assert_eq!(created.payment_status, PaymentStatus::Pending);
        assert_eq!(created.status, FulfillmentStatus::Queued);
        assert_eq!(created.total_price, 130);

        assert_eq!(repository.mark_paid(&mut tx, created.uuid).await?, 1);
        assert_eq!(
            repository.get_order(&mut tx, created.uuid).await?.payment_status,
            PaymentStatus::Paid
        );

        assert_eq!(
            repository.mark_paid(&mut tx, created.uuid).await?,
            0,
            "a paid order cannot be settled again"
        );

        tx.commit().await?;

        Ok(())
    }

    #[tokio::test]
    async fn customer_settlement_cannot_touch_other_columns() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer("Ravi").await;

        for (description, sql) in [
            (
                "skip ahead while settling",
                "UPDATE orders SET payment_status = 'paid', status = 'delivered' WHERE uuid = $1",
            ),
            (
                "rewrite the total",
                "UPDATE orders SET total_price = 1 WHERE uuid = $1",
            ),
        ] {
            let mut tx = ctx.app_db.begin_viewer_transaction(Some(customer)).await?;
            let created = pending_order(&mut tx, customer).await?;

            let result = query(sql)
                .bind(created.uuid.into_uuid())
                .execute(&mut *tx)
                .await;

            assert!(result.is_err(), "customer must not {description}");
        }

        Ok(())
    }
}
