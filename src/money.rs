//! Money

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{self, Currency},
};

/// Currency used when none is configured.
pub const DEFAULT_CURRENCY: &Currency = iso::INR;

/// Look up an ISO 4217 currency by its alphabetic code.
pub fn resolve_currency(code: &str) -> Option<&'static Currency> {
    iso::find(code.trim())
}

/// Render an amount of minor units for display, e.g. `₹130.00`.
///
/// Amounts that do not fit in an `i64` are rendered as raw minor units.
pub fn format_minor(amount: u64, currency: &'static Currency) -> String {
    match i64::try_from(amount) {
        Ok(minor) => Money::from_minor(minor, currency).to_string(),
        Err(_overflow) => format!("{amount} {}", currency.iso_alpha_code),
    }
}

/// Parse a price string such as `"50.00 INR"` into minor units and currency.
///
/// Returns `None` when the string is not `AMOUNT CURRENCY`, the amount is
/// negative, not a number, or finer than the currency's minor unit, or the
/// currency code is unknown.
pub fn parse_price(value: &str) -> Option<(u64, &'static Currency)> {
    let mut parts = value.split_whitespace();

    let amount = parts.next()?.parse::<Decimal>().ok()?;
    let currency = resolve_currency(parts.next()?)?;

    if parts.next().is_some()
        || amount.is_sign_negative()
        || amount.normalize().scale() > currency.exponent
    {
        return None;
    }

    let scale = Decimal::from(10_u64.checked_pow(currency.exponent)?);

    let minor_units = amount.checked_mul(scale)?.to_u64()?;

    Some((minor_units, currency))
}
