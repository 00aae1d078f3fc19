//! Delete Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    carts::{errors::into_status_error, get::CartResponse},
    extensions::*,
    state::State,
};

/// Delete Cart Item Handler
///
/// Removes the whole line whatever its quantity.
#[endpoint(
    tags("carts"),
    summary = "Remove Item from Cart",
    responses(
        (status_code = StatusCode::OK, description = "Item removed"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found or item not in cart"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    item: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let record = state
        .app
        .carts
        .remove_item(cart.into_inner().into(), item.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(CartResponse::new(&record, state.currency)?))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use canteen_app::domain::{
        carts::{CartsServiceError, records::CartUuid},
        menu::records::MenuItemUuid,
    };

    use crate::{
        carts::handlers::tests::{make_filled_cart, make_item},
        test_helpers::{Mocks, anonymous_service},
    };

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        anonymous_service(
            mocks,
            Router::with_path("carts/{cart}/items/{item}").delete(handler),
        )
    }

    #[tokio::test]
    async fn test_remove_item_returns_remaining_lines() -> TestResult {
        let cart = CartUuid::new();
        let lassi = make_item("Lassi", 30);
        let removed = MenuItemUuid::new();

        let record = make_filled_cart(cart, &[(&lassi, 1)])?;

        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_remove_item()
            .once()
            .withf(move |c, i| *c == cart && *i == removed)
            .return_once(move |_, _| Ok(record));

        let response: CartResponse =
            TestClient::delete(format!("http://example.com/carts/{cart}/items/{removed}"))
                .send(&make_service(mocks))
                .await
                .take_json()
                .await?;

        assert_eq!(response.lines.len(), 1, "expected one remaining line");
        assert_eq!(response.total, 30);

        Ok(())
    }

    #[tokio::test]
    async fn test_remove_missing_line_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_remove_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::LineNotFound));

        let res = TestClient::delete(format!(
            "http://example.com/carts/{}/items/{}",
            Uuid::now_v7(),
            Uuid::now_v7()
        ))
        .send(&make_service(mocks))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
