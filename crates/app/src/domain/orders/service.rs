//! Orders service.

use async_trait::async_trait;
use canteen::orders::{FulfillmentStatus, OrderAction};
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        orders::{
            errors::OrdersServiceError,
            records::{OrderRecord, OrderUuid},
            repositories::{PgOrderLinesRepository, PgOrdersRepository, attach_lines},
        },
        users::records::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders_repository: PgOrdersRepository,
    lines_repository: PgOrderLinesRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders_repository: PgOrdersRepository::new(),
            lines_repository: PgOrderLinesRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn get_order(
        &self,
        viewer: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_viewer_transaction(Some(viewer)).await?;

        let mut orders = vec![self.orders_repository.get_order(&mut tx, order).await?];

        attach_lines(&mut tx, &self.lines_repository, &mut orders).await?;

        tx.commit().await?;

        orders.pop().ok_or(OrdersServiceError::NotFound)
    }

    async fn list_active_orders(
        &self,
        viewer: UserUuid,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin_viewer_transaction(Some(viewer)).await?;

        let mut orders = self
            .orders_repository
            .list_user_orders(&mut tx, viewer, &FulfillmentStatus::ACTIVE)
            .await?;

        attach_lines(&mut tx, &self.lines_repository, &mut orders).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn list_all_orders(&self, admin: UserUuid) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin_viewer_transaction(Some(admin)).await?;

        if !self.orders_repository.viewer_is_admin(&mut tx).await? {
            return Err(OrdersServiceError::Forbidden);
        }

        let mut orders = self.orders_repository.list_all_orders(&mut tx).await?;

        attach_lines(&mut tx, &self.lines_repository, &mut orders).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn transition_order(
        &self,
        admin: UserUuid,
        order: OrderUuid,
        action: OrderAction,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_viewer_transaction(Some(admin)).await?;

        if !self.orders_repository.viewer_is_admin(&mut tx).await? {
            return Err(OrdersServiceError::Forbidden);
        }

        let rows_affected = self
            .orders_repository
            .transition_order(&mut tx, order, action.from_status(), action.to_status())
            .await?;

        if rows_affected == 0 {
            let current = self.orders_repository.get_order(&mut tx, order).await?;

            // The guard only misses when the order is elsewhere in the lifecycle.
            action.apply(current.status)?;

            return Err(OrdersServiceError::NotFound);
        }

        let mut orders = vec![self.orders_repository.get_order(&mut tx, order).await?];

        attach_lines(&mut tx, &self.lines_repository, &mut orders).await?;

        tx.commit().await?;

        info!(%order, %action, %admin, "order status advanced");

        orders.pop().ok_or(OrdersServiceError::NotFound)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Retrieve one order with its lines. Customers only see their own.
    async fn get_order(
        &self,
        viewer: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// The viewer's orders that are still queued, preparing, or ready.
    async fn list_active_orders(
        &self,
        viewer: UserUuid,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Every order, newest first. Admin only.
    async fn list_all_orders(&self, admin: UserUuid) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Apply one forward step to an order's status. Admin only.
    async fn transition_order(
        &self,
        admin: UserUuid,
        order: OrderUuid,
        action: OrderAction,
    ) -> Result<OrderRecord, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use canteen::orders::{PaymentStatus, TransitionError};
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn get_order_returns_own_order_with_lines() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer("Ravi").await;
        let placed = ctx.place_order(customer, &[(50, 2), (30, 1)]).await?;

        let order = ctx.orders.get_order(customer, placed.uuid).await?;

        assert_eq!(order.uuid, placed.uuid);
        assert_eq!(order.total_price, 130);
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.status, FulfillmentStatus::Queued);
        assert_eq!(order.customer_name.as_deref(), Some("Ravi"));
        assert_eq!(order.lines.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn get_order_of_another_customer_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = ctx.create_customer("Ravi").await;
        let other = ctx.create_customer("Meera").await;
        let placed = ctx.place_order(owner, &[(50, 1)]).await?;

        let result = ctx.orders.get_order(other, placed.uuid).await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound for another customer's order, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn list_active_orders_excludes_delivered() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = ctx.create_admin("Kitchen Lead").await;
        let customer = ctx.create_customer("Ravi").await;

        let delivered = ctx.place_order(customer, &[(50, 1)]).await?;
        let waiting = ctx.place_order(customer, &[(30, 1)]).await?;

        for action in [
            OrderAction::StartPreparing,
            OrderAction::MarkReady,
            OrderAction::MarkDelivered,
        ] {
            ctx.orders
                .transition_order(admin, delivered.uuid, action)
                .await?;
        }

        let active = ctx.orders.list_active_orders(customer).await?;
        let uuids: Vec<OrderUuid> = active.iter().map(|order| order.uuid).collect();

        assert_eq!(uuids, [waiting.uuid]);

        Ok(())
    }

    #[tokio::test]
    async fn list_active_orders_only_shows_own_orders() -> TestResult {
        let ctx = TestContext::new().await;
        let ravi = ctx.create_customer("Ravi").await;
        let meera = ctx.create_customer("Meera").await;

        ctx.place_order(ravi, &[(50, 1)]).await?;

        assert!(ctx.orders.list_active_orders(meera).await?.is_empty());
        assert_eq!(ctx.orders.list_active_orders(ravi).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn list_all_orders_shows_every_customer_to_admin() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = ctx.create_admin("Kitchen Lead").await;
        let ravi = ctx.create_customer("Ravi").await;
        let meera = ctx.create_customer("Meera").await;

        ctx.place_order(ravi, &[(50, 1)]).await?;
        ctx.place_order(meera, &[(30, 2)]).await?;

        let orders = ctx.orders.list_all_orders(admin).await?;

        assert_eq!(orders.len(), 2);

        let mut names: Vec<&str> = orders
            .iter()
            .filter_map(|order| order.customer_name.as_deref())
            .collect();
        names.sort_unstable();

        assert_eq!(names, ["Meera", "Ravi"]);

        Ok(())
    }

    #[tokio::test]
    async fn list_all_orders_rejects_customers() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer("Ravi").await;

        ctx.place_order(customer, &[(50, 1)]).await?;

        let result = ctx.orders.list_all_orders(customer).await;

        assert!(
            matches!(result, Err(OrdersServiceError::Forbidden)),
            "expected Forbidden, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn transition_order_walks_the_lifecycle() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = ctx.create_admin("Kitchen Lead").await;
        let customer = ctx.create_customer("Ravi").await;
        let placed = ctx.place_order(customer, &[(50, 1)]).await?;

        let mut status = placed.status;

        while let Some(action) = status.next_action() {
            let order = ctx
                .orders
                .transition_order(admin, placed.uuid, action)
                .await?;

            assert_eq!(order.status, action.to_status());

            status = order.status;
        }

        assert_eq!(status, FulfillmentStatus::Delivered);

        Ok(())
    }

    #[tokio::test]
    async fn stale_transition_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = ctx.create_admin("Kitchen Lead").await;
        let customer = ctx.create_customer("Ravi").await;
        let placed = ctx.place_order(customer, &[(50, 1)]).await?;

        ctx.orders
            .transition_order(admin, placed.uuid, OrderAction::StartPreparing)
            .await?;

        // A second board still showing "queued" sends the same action again.
        let result = ctx
            .orders
            .transition_order(admin, placed.uuid, OrderAction::StartPreparing)
            .await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::Transition(TransitionError {
                    action: OrderAction::StartPreparing,
                    status: FulfillmentStatus::Preparing,
                }))
            ),
            "expected Transition error, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn skipping_a_status_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = ctx.create_admin("Kitchen Lead").await;
        let customer = ctx.create_customer("Ravi").await;
        let placed = ctx.place_order(customer, &[(50, 1)]).await?;

        let result = ctx
            .orders
            .transition_order(admin, placed.uuid, OrderAction::MarkDelivered)
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::Transition(_))),
            "expected Transition error, got {result:?}"
        );

        let order = ctx.orders.get_order(customer, placed.uuid).await?;

        assert_eq!(order.status, FulfillmentStatus::Queued);

        Ok(())
    }

    #[tokio::test]
    async fn transition_unknown_order_returns_not_found() {
        let ctx = TestContext::new().await;
        let admin = ctx.create_admin("Kitchen Lead").await;

        let result = ctx
            .orders
            .transition_order(admin, OrderUuid::new(), OrderAction::StartPreparing)
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn customer_cannot_advance_own_order() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer("Ravi").await;
        let placed = ctx.place_order(customer, &[(50, 1)]).await?;

        let result = ctx
            .orders
            .transition_order(customer, placed.uuid, OrderAction::StartPreparing)
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::Forbidden)),
            "expected Forbidden, got {result:?}"
        );

        Ok(())
    }
}
