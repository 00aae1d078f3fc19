//! Errors

use salvo::http::StatusError;
use tracing::error;

use canteen_app::domain::carts::CartsServiceError;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::AlreadyExists => StatusError::conflict().brief("Cart already exists"),
        CartsServiceError::NotFound => StatusError::not_found().brief("Cart not found"),
        CartsServiceError::ItemNotFound => StatusError::not_found().brief("Menu item not found"),
        CartsServiceError::ItemUnavailable => {
            StatusError::conflict().brief("Menu item is not available")
        }
        CartsServiceError::LineNotFound => {
            StatusError::not_found().brief("Menu item is not in the cart")
        }
        CartsServiceError::OutOfRange => {
            StatusError::bad_request().brief("Quantity is out of range")
        }
        CartsServiceError::CheckoutInProgress => {
            StatusError::conflict().brief("Cart is being checked out")
        }
        CartsServiceError::Menu(source) => {
            error!("failed to look up menu item: {source}");

            StatusError::internal_server_error()
        }
    }
}
