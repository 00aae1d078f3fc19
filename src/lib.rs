//! Canteen
//!
//! Domain core of a campus cafeteria ordering service: the menu catalogue,
//! the session cart, and the kitchen order lifecycle.

pub mod cart;
pub mod menu;
pub mod money;
pub mod orders;
pub mod prelude;
