//! Checkout Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    checkout::errors::into_status_error, extensions::*, observability::record_order_placed,
    orders::OrderResponse, state::State,
};

/// Where anonymous visitors are sent to sign in.
const SIGN_IN_LOCATION: &str = "/sessions";

/// Checkout Handler
///
/// Places a paid order for everything in the cart and empties it. The order,
/// its lines, and the payment update commit together or not at all; on
/// failure the cart is left as it was.
#[endpoint(
    tags("checkout"),
    summary = "Check Out Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::NO_CONTENT, description = "Cart is empty, nothing placed"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Sign in required"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::CONFLICT, description = "Cart busy or item withdrawn"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "checkout.create",
    skip(cart, depot, res),
    fields(cart_uuid = tracing::field::Empty, user_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let cart = cart.into_inner();

    let Some(viewer) = depot.viewer() else {
        res.add_header(LOCATION, SIGN_IN_LOCATION, true)
            .or_500("failed to set location header")?;

        return Err(StatusError::unauthorized().brief("Sign in to place an order"));
    };

    let span = tracing::Span::current();

    span.record("cart_uuid", tracing::field::display(cart));
    span.record("user_uuid", tracing::field::display(viewer.user));

    let placed = state
        .app
        .checkout
        .checkout(viewer.user, cart.into())
        .await
        .map_err(into_status_error)?;

    let Some(order) = placed else {
        res.status_code(StatusCode::NO_CONTENT);

        return Ok(());
    };

    record_order_placed();

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    res.render(Json(OrderResponse::new(order, state.currency)));

    Ok(())
}
