//! Carts

pub(crate) mod errors;
pub(crate) mod eviction;
mod handlers;
pub(crate) mod items;

pub(crate) use handlers::*;
