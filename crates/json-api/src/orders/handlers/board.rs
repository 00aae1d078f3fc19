//! Kitchen Board Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    orders::{OrderResponse, errors::into_status_error, index::OrdersResponse},
    state::State,
};

/// Kitchen Board Handler
///
/// Every order from every customer, newest first.
#[endpoint(
    tags("admin"),
    summary = "List All Orders",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "All orders"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Sign in required"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin access required"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let admin = depot.admin_or_403()?;

    let orders = state
        .app
        .orders
        .list_all_orders(admin.user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(OrdersResponse {
        orders: orders
            .into_iter()
            .map(|order| OrderResponse::for_kitchen(order, state.currency))
            .collect(),
    }))
}

#[cfg(test)]
mod tests {
    use canteen::orders::FulfillmentStatus;
    use canteen_app::domain::{
        orders::{OrdersServiceError, records::OrderUuid},
        users::records::UserUuid,
    };
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{
        Mocks, TEST_ADMIN_UUID, admin_service, anonymous_service, customer_service, make_order,
    };

    use super::*;

    fn route() -> Router {
        Router::with_path("admin/orders").get(handler)
    }

    #[tokio::test]
    async fn test_board_lists_every_customers_orders() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_list_all_orders()
            .once()
            .withf(|admin| *admin == TEST_ADMIN_UUID)
            .return_once(|_| {
                let mut first = make_order(
                    OrderUuid::new(),
                    UserUuid::new(),
                    FulfillmentStatus::Delivered,
                );
                first.customer_name = Some("Meera".to_string());

                Ok(vec![
                    first,
                    make_order(OrderUuid::new(), UserUuid::new(), FulfillmentStatus::Queued),
                ])
            });

        let response: OrdersResponse = TestClient::get("http://example.com/admin/orders")
            .send(&admin_service(mocks, route()))
            .await
            .take_json()
            .await?;

        assert_eq!(response.orders.len(), 2, "expected both orders");
        assert_eq!(response.orders[0].customer_name.as_deref(), Some("Meera"));
        assert_eq!(response.orders[0].next_action, None);
        assert_eq!(
            response.orders[1].next_action.as_deref(),
            Some("start_preparing")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_board_customer_returns_403_without_loading_orders() -> TestResult {
        let res = TestClient::get("http://example.com/admin/orders")
            .send(&customer_service(Mocks::default(), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_board_anonymous_returns_401() -> TestResult {
        let res = TestClient::get("http://example.com/admin/orders")
            .send(&anonymous_service(Mocks::default(), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_board_database_refusal_returns_403() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_list_all_orders()
            .once()
            .return_once(|_| Err(OrdersServiceError::Forbidden));

        let res = TestClient::get("http://example.com/admin/orders")
            .send(&admin_service(mocks, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
