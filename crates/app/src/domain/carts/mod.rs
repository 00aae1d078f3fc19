//! Carts
//!
//! Carts live in process memory only. A visitor picks the cart UUID, builds the
//! cart anonymously, and loses it when the server restarts.

pub mod data;
pub mod errors;
pub mod records;
pub mod service;

pub use errors::CartsServiceError;
pub use service::*;
