//! Order Handlers

pub(crate) mod board;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod transition;
