//! Errors

use salvo::http::StatusError;
use tracing::error;

use canteen_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::Forbidden => {
            StatusError::forbidden().brief("Admin access required")
        }
        OrdersServiceError::Transition(source) => {
            StatusError::conflict().brief(source.to_string())
        }
        OrdersServiceError::InvalidReference | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order data")
        }
        OrdersServiceError::Sql(source) => {
            error!("failed to load orders: {source}");

            StatusError::internal_server_error()
        }
    }
}
