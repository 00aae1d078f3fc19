//! Checkout service errors.

use canteen::cart::CartError;
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::carts::CartsServiceError;

#[derive(Debug, Error)]
pub enum CheckoutServiceError {
    #[error(transparent)]
    Cart(#[from] CartsServiceError),

    #[error("cart total is out of range")]
    OutOfRange,

    #[error("order already exists")]
    AlreadyExists,

    #[error("cart refers to an item that is no longer on the menu")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("payment could not be settled")]
    SettlementFailed,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<CartError> for CheckoutServiceError {
    fn from(_error: CartError) -> Self {
        Self::OutOfRange
    }
}

impl From<Error> for CheckoutServiceError {
    fn from(error: Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
