//! Menu

mod handlers;

pub(crate) use handlers::*;
