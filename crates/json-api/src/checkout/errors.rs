//! Errors

use salvo::http::StatusError;
use tracing::error;

use canteen_app::domain::checkout::CheckoutServiceError;

pub(crate) fn into_status_error(error: CheckoutServiceError) -> StatusError {
    match error {
        CheckoutServiceError::Cart(source) => crate::carts::errors::into_status_error(source),
        CheckoutServiceError::OutOfRange => {
            StatusError::bad_request().brief("Cart total is out of range")
        }
        CheckoutServiceError::AlreadyExists => {
            StatusError::conflict().brief("Order already exists")
        }
        CheckoutServiceError::InvalidReference => StatusError::conflict()
            .brief("Cart refers to an item that is no longer on the menu"),
        CheckoutServiceError::MissingRequiredData | CheckoutServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order data")
        }
        CheckoutServiceError::SettlementFailed => {
            error!("payment settlement did not update the order");

            StatusError::internal_server_error()
        }
        CheckoutServiceError::Sql(source) => {
            error!("failed to place order: {source}");

            StatusError::internal_server_error()
        }
    }
}
