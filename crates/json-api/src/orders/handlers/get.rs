//! Get Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{OrderResponse, errors::into_status_error},
    state::State,
};

/// Get Order Handler
///
/// Tracking view for one order. Orders placed by someone else are reported
/// as not found.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order with its lines"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Sign in required"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let viewer = depot.viewer_or_401()?;

    let order = state
        .app
        .orders
        .get_order(viewer.user, order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(OrderResponse::new(order, state.currency)))
}

#[cfg(test)]
mod tests {
    use canteen::orders::FulfillmentStatus;
    use canteen_app::domain::orders::{OrdersServiceError, records::OrderUuid};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{
        Mocks, TEST_CUSTOMER_UUID, anonymous_service, customer_service, make_order,
    };

    use super::*;

    fn route() -> Router {
        Router::with_path("orders/{order}").get(handler)
    }

    #[tokio::test]
    async fn test_get_returns_order_with_lines() -> TestResult {
        let uuid = OrderUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_get_order()
            .once()
            .withf(move |viewer, order| *viewer == TEST_CUSTOMER_UUID && *order == uuid)
            .return_once(move |user, order| {
                Ok(make_order(order, user, FulfillmentStatus::Preparing))
            });

        let response: OrderResponse = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&customer_service(mocks, route()))
            .await
            .take_json()
            .await?;

        assert_eq!(response.uuid, uuid.into_uuid());
        assert_eq!(response.total_price, 130);
        assert_eq!(response.payment_status, "paid");
        assert_eq!(response.status, "preparing");
        assert_eq!(response.next_action, None, "tracking view is read-only");

        let quantities: Vec<u32> = response.lines.iter().map(|line| line.quantity).collect();

        assert_eq!(quantities, [2, 1]);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_someone_elses_order_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_get_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/orders/{}", Uuid::now_v7()))
            .send(&customer_service(mocks, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_anonymous_returns_401() -> TestResult {
        let res = TestClient::get(format!("http://example.com/orders/{}", Uuid::now_v7()))
            .send(&anonymous_service(Mocks::default(), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
