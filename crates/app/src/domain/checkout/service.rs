//! Checkout service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::{info, warn};

use crate::{
    database::Db,
    domain::{
        carts::{
            CartsService,
            records::{CartRecord, CartUuid},
        },
        checkout::errors::CheckoutServiceError,
        menu::records::MenuItemUuid,
        orders::{
            PgOrderLinesRepository, PgOrdersRepository, attach_lines,
            data::{NewOrder, NewOrderLine},
            records::{OrderLineUuid, OrderRecord, OrderUuid},
        },
        users::records::UserUuid,
    },
};

pub struct PgCheckoutService {
    db: Db,
    carts: Arc<dyn CartsService>,
    orders_repository: PgOrdersRepository,
    lines_repository: PgOrderLinesRepository,
}

impl PgCheckoutService {
    #[must_use]
    pub fn new(db: Db, carts: Arc<dyn CartsService>) -> Self {
        Self {
            db,
            carts,
            orders_repository: PgOrdersRepository::new(),
            lines_repository: PgOrderLinesRepository::new(),
        }
    }

    async fn place_order(
        &self,
        user: UserUuid,
        snapshot: &CartRecord,
    ) -> Result<OrderRecord, CheckoutServiceError> {
        let order = NewOrder {
            uuid: OrderUuid::new(),
            user,
            total_price: snapshot.total()?,
        };

        // Dropping `tx` on any early return rolls the whole order back.
        let mut tx = self.db.begin_viewer_transaction(Some(user)).await?;

        let created = self.orders_repository.create_order(&mut tx, &order).await?;

        for line in snapshot.lines() {
            self.lines_repository
                .create_line(
                    &mut tx,
                    created.uuid,
                    &NewOrderLine {
                        uuid: OrderLineUuid::new(),
                        menu_item: MenuItemUuid::from_uuid(line.item),
                        quantity: line.quantity(),
                        price: line.price,
                    },
                )
                .await?;
        }

        // Settlement is simulated: there is no payment gateway to call.
        if self.orders_repository.mark_paid(&mut tx, created.uuid).await? != 1 {
            return Err(CheckoutServiceError::SettlementFailed);
        }

        let mut placed = vec![self.orders_repository.get_order(&mut tx, created.uuid).await?];

        attach_lines(&mut tx, &self.lines_repository, &mut placed).await?;

        tx.commit().await?;

        placed.pop().ok_or(CheckoutServiceError::SettlementFailed)
    }
}

#[async_trait]
impl CheckoutService for PgCheckoutService {
    async fn checkout(
        &self,
        user: UserUuid,
        cart: CartUuid,
    ) -> Result<Option<OrderRecord>, CheckoutServiceError> {
        let snapshot = self.carts.begin_checkout(cart).await?;

        if snapshot.is_empty() {
            return Ok(None);
        }

        let placed = match self.place_order(user, &snapshot).await {
            Ok(placed) => placed,
            Err(error) => {
                if let Err(release) = self.carts.abandon_checkout(cart).await {
                    warn!(%cart, %release, "checkout failed and cart could not be released");
                }

                return Err(error);
            }
        };

        if let Err(error) = self.carts.complete_checkout(cart).await {
            warn!(%cart, %error, "order placed but cart could not be cleared");
        }

        info!(
            order = %placed.uuid,
            token_number = placed.token_number,
            total_price = placed.total_price,
            lines = placed.lines.len(),
            "order placed"
        );

        Ok(Some(placed))
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Turn a cart into a paid, queued order.
    ///
    /// Returns `None` without writing anything when the cart is empty. The
    /// cart is held for the duration, so concurrent checkouts or edits of it
    /// fail with a conflict, and it is cleared only after the order commits.
    async fn checkout(
        &self,
        user: UserUuid,
        cart: CartUuid,
    ) -> Result<Option<OrderRecord>, CheckoutServiceError>;
}
