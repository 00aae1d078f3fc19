//! Canteen prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartLine},
    menu::{
        Category, CategoryParseError, MenuItem, filter_by_category, filter_specials,
        seed::{MenuSeed, SeedError},
    },
    money::{DEFAULT_CURRENCY, format_minor, parse_price, resolve_currency},
    orders::{
        ActionParseError, FulfillmentStatus, OrderAction, PaymentStatus, StatusParseError,
        TransitionError,
    },
};
