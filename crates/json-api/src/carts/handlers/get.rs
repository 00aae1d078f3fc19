//! Get Cart Handler

use std::sync::Arc;

use canteen::{cart::CartLine, money::format_minor};
use canteen_app::domain::carts::records::CartRecord;
use rusty_money::iso::Currency;
use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    pub uuid: Uuid,

    /// Lines in the order they were first added
    pub lines: Vec<CartLineResponse>,

    /// Total number of units across all lines
    pub item_count: u64,

    /// Sum of line totals in minor currency units
    pub total: u64,

    /// Always zero
    pub tax: u64,

    pub total_display: String,
    pub currency: String,
    pub updated_at: String,
}

impl CartResponse {
    pub(crate) fn new(record: &CartRecord, currency: &'static Currency) -> Result<Self, StatusError> {
        let lines = record
            .lines()
            .iter()
            .map(|line| CartLineResponse::new(line, currency))
            .collect::<Result<Vec<_>, _>>()?;

        let total = record.total().or_500("failed to total cart")?;

        Ok(Self {
            uuid: record.uuid.into_uuid(),
            lines,
            item_count: record.cart.item_count(),
            total,
            tax: record.tax(),
            total_display: format_minor(total, currency),
            currency: currency.iso_alpha_code.to_string(),
            updated_at: record.updated_at.to_string(),
        })
    }
}

/// Cart Line Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartLineResponse {
    pub menu_item_uuid: Uuid,

    /// Item name when it was added
    pub name: String,

    pub category: String,

    /// Unit price when it was added, in minor currency units
    pub price: u64,

    pub quantity: u32,
    pub line_total: u64,
    pub line_total_display: String,
}

impl CartLineResponse {
    fn new(line: &CartLine, currency: &'static Currency) -> Result<Self, StatusError> {
        let line_total = line.line_total().or_500("failed to total cart line")?;

        Ok(Self {
            menu_item_uuid: line.item,
            name: line.name.clone(),
            category: line.category.to_string(),
            price: line.price,
            quantity: line.quantity(),
            line_total,
            line_total_display: format_minor(line_total, currency),
        })
    }
}

/// Get Cart Handler
///
/// Returns a cart with its lines and totals.
#[endpoint(
    tags("carts"),
    summary = "Get Cart",
    responses(
        (status_code = StatusCode::OK, description = "Cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cart = state
        .app
        .carts
        .get_cart(cart.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(CartResponse::new(&cart, state.currency)?))
}

#[cfg(test)]
mod tests {
    use canteen_app::domain::carts::{CartsServiceError, records::CartUuid};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::{
        carts::handlers::tests::{make_filled_cart, make_item},
        test_helpers::{Mocks, anonymous_service},
    };

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        anonymous_service(mocks, Router::with_path("carts/{cart}").get(handler))
    }

    #[tokio::test]
    async fn test_get_returns_lines_and_totals() -> TestResult {
        let uuid = CartUuid::new();
        let samosa = make_item("Samosa", 50);
        let lassi = make_item("Lassi", 30);

        let cart = make_filled_cart(uuid, &[(&samosa, 2), (&lassi, 1)])?;

        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_get_cart()
            .once()
            .withf(move |u| *u == uuid)
            .return_once(move |_| Ok(cart));

        let response: CartResponse =
            TestClient::get(format!("http://example.com/carts/{uuid}"))
                .send(&make_service(mocks))
                .await
                .take_json()
                .await?;

        assert_eq!(response.uuid, uuid.into_uuid());
        assert_eq!(response.total, 130);
        assert_eq!(response.tax, 0);
        assert_eq!(response.item_count, 3);
        assert_eq!(response.currency, "INR");
        assert_eq!(response.lines.len(), 2, "expected two lines");
        assert_eq!(response.lines[0].name, "Samosa");
        assert_eq!(response.lines[0].quantity, 2);
        assert_eq!(response.lines[0].line_total, 100);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_unknown_cart_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_get_cart()
            .once()
            .return_once(|_| Err(CartsServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/carts/{}", Uuid::now_v7()))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_malformed_uuid_returns_400() -> TestResult {
        let res = TestClient::get("http://example.com/carts/not-a-uuid")
            .send(&make_service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
