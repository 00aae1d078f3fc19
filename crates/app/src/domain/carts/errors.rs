//! Carts service errors.

use canteen::cart::CartError;
use thiserror::Error;

use crate::domain::menu::MenuServiceError;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("cart already exists")]
    AlreadyExists,

    #[error("cart not found")]
    NotFound,

    #[error("menu item not found")]
    ItemNotFound,

    #[error("menu item is not available")]
    ItemUnavailable,

    #[error("item is not in the cart")]
    LineNotFound,

    #[error("cart quantity or total is out of range")]
    OutOfRange,

    #[error("cart is being checked out")]
    CheckoutInProgress,

    #[error("menu lookup failed")]
    Menu(#[source] MenuServiceError),
}

impl From<CartError> for CartsServiceError {
    fn from(error: CartError) -> Self {
        match error {
            CartError::ItemUnavailable(_) => Self::ItemUnavailable,
            CartError::LineNotFound(_) => Self::LineNotFound,
            CartError::QuantityOverflow | CartError::TotalOverflow => Self::OutOfRange,
        }
    }
}

impl From<MenuServiceError> for CartsServiceError {
    fn from(error: MenuServiceError) -> Self {
        match error {
            MenuServiceError::NotFound => Self::ItemNotFound,
            other => Self::Menu(other),
        }
    }
}
