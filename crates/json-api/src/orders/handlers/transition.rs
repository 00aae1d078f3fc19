//! Order Transition Handler

use std::sync::Arc;

use canteen::orders::OrderAction;
use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    extensions::*,
    observability::record_order_transition,
    orders::{OrderResponse, errors::into_status_error},
    state::State,
};

/// Order Transition Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TransitionRequest {
    /// One of `start_preparing`, `mark_ready`, `mark_delivered`
    pub action: String,
}

/// Order Transition Handler
///
/// Moves an order one step along `queued → preparing → ready → delivered`.
/// The action must match the order's current status; a stale or skipped step
/// is a conflict and leaves the order untouched.
#[endpoint(
    tags("admin"),
    summary = "Advance Order Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order advanced"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown action"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Sign in required"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin access required"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Action does not apply to the current status"),
    ),
)]
#[tracing::instrument(
    name = "orders.transition",
    skip(order, json, depot),
    fields(order_uuid = tracing::field::Empty, action = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<TransitionRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let admin = depot.admin_or_403()?;

    let order = order.into_inner();

    let action = json
        .into_inner()
        .action
        .parse::<OrderAction>()
        .or_400("could not parse \"action\"")?;

    let span = tracing::Span::current();

    span.record("order_uuid", tracing::field::display(order));
    span.record("action", action.as_str());

    let updated = state
        .app
        .orders
        .transition_order(admin.user, order.into(), action)
        .await
        .map_err(into_status_error)?;

    record_order_transition(action);

    Ok(Json(OrderResponse::for_kitchen(updated, state.currency)))
}

#[cfg(test)]
mod tests {
    use canteen::orders::{FulfillmentStatus, TransitionError};
    use canteen_app::domain::{
        orders::{OrdersServiceError, records::OrderUuid},
        users::records::UserUuid,
    };
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_ADMIN_UUID, admin_service, customer_service, make_order};

    use super::*;

    fn route() -> Router {
        Router::with_path("admin/orders/{order}/transitions").post(handler)
    }

    fn url(order: OrderUuid) -> String {
        format!("http://example.com/admin/orders/{order}/transitions")
    }

    #[tokio::test]
    async fn test_transition_advances_order() -> TestResult {
        let uuid = OrderUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_transition_order()
            .once()
            .withf(move |admin, order, action| {
                *admin == TEST_ADMIN_UUID
                    && *order == uuid
                    && *action == OrderAction::StartPreparing
            })
            .return_once(move |_, order, _| {
                Ok(make_order(order, UserUuid::new(), FulfillmentStatus::Preparing))
            });

        let response: OrderResponse = TestClient::post(url(uuid))
            .json(&json!({ "action": "start_preparing" }))
            .send(&admin_service(mocks, route()))
            .await
            .take_json()
            .await?;

        assert_eq!(response.status, "preparing");
        assert_eq!(response.next_action.as_deref(), Some("mark_ready"));

        Ok(())
    }

    #[tokio::test]
    async fn test_transition_out_of_order_returns_409() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_transition_order()
            .once()
            .return_once(|_, _, action| {
                Err(OrdersServiceError::Transition(TransitionError {
                    action,
                    status: FulfillmentStatus::Queued,
                }))
            });

        let res = TestClient::post(url(OrderUuid::new()))
            .json(&json!({ "action": "mark_delivered" }))
            .send(&admin_service(mocks, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_transition_unknown_action_returns_400() -> TestResult {
        let res = TestClient::post(url(OrderUuid::new()))
            .json(&json!({ "action": "cancel" }))
            .send(&admin_service(Mocks::default(), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_transition_unknown_order_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_transition_order()
            .once()
            .return_once(|_, _, _| Err(OrdersServiceError::NotFound));

        let res = TestClient::post(url(OrderUuid::new()))
            .json(&json!({ "action": "mark_ready" }))
            .send(&admin_service(mocks, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_transition_by_customer_returns_403() -> TestResult {
        let res = TestClient::post(url(OrderUuid::new()))
            .json(&json!({ "action": "start_preparing" }))
            .send(&customer_service(Mocks::default(), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
