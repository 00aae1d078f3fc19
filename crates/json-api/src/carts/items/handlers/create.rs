//! Create Cart Item Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    carts::{errors::into_status_error, get::CartResponse},
    extensions::*,
    state::State,
};

/// Create Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateCartItemRequest {
    pub menu_item_uuid: Uuid,
}

/// Create Cart Item Handler
///
/// Adds one unit of a menu item. Adding an item already in the cart bumps
/// its quantity instead of creating a second line.
#[endpoint(
    tags("carts"),
    summary = "Add Item to Cart",
    responses(
        (status_code = StatusCode::CREATED, description = "Item added"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart or menu item not found"),
        (status_code = StatusCode::CONFLICT, description = "Menu item is not available"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    json: JsonBody<CreateCartItemRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cart = cart.into_inner();
    let item = json.into_inner().menu_item_uuid;

    let record = state
        .app
        .carts
        .add_item(cart.into(), item.into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/carts/{cart}/items/{item}"), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(CartResponse::new(&record, state.currency)?))
}
