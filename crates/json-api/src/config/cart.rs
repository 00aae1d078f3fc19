//! Cart Config

use canteen::money::resolve_currency;
use clap::Args;
use jiff::SignedDuration;
use rusty_money::iso::Currency;

/// Cart pricing and retention settings.
#[derive(Debug, Args)]
pub struct CartConfig {
    /// ISO 4217 code prices are stored and displayed in
    #[arg(long, env = "CANTEEN_CURRENCY", default_value = "INR", value_parser = parse_currency)]
    pub currency: &'static Currency,

    /// How long an untouched cart is kept, e.g. `2h` or `90m`
    #[arg(
        long = "cart-max-idle",
        env = "CANTEEN_CART_MAX_IDLE",
        default_value = "2h",
        value_parser = parse_positive_duration
    )]
    pub max_idle: SignedDuration,

    /// How often idle carts are swept
    #[arg(
        long = "cart-sweep-interval",
        env = "CANTEEN_CART_SWEEP_INTERVAL",
        default_value = "5m",
        value_parser = parse_positive_duration
    )]
    pub sweep_interval: SignedDuration,
}

fn parse_currency(value: &str) -> Result<&'static Currency, String> {
    resolve_currency(value).ok_or_else(|| format!("unknown currency code: {value}"))
}

fn parse_positive_duration(value: &str) -> Result<SignedDuration, String> {
    let duration: SignedDuration = value
        .trim()
        .parse()
        .map_err(|error| format!("invalid duration {value:?}: {error}"))?;

    if duration.is_positive() {
        Ok(duration)
    } else {
        Err(format!("duration must be positive: {value}"))
    }
}
