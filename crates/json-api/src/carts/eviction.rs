//! Idle cart eviction.
//!
//! Carts live in process memory, so abandoned ones are swept on a timer.

use std::sync::Arc;

use canteen_app::domain::carts::CartsService;
use jiff::{SignedDuration, Timestamp};
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info};

use crate::config::cart::CartConfig;

/// Sweep idle carts every `config.sweep_interval` for the life of the server.
pub(crate) fn spawn(carts: Arc<dyn CartsService>, config: &CartConfig) {
    let max_idle = config.max_idle;
    let mut interval = time::interval(config.sweep_interval.unsigned_abs());

    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tokio::spawn(async move {
        loop {
            interval.tick().await;
            sweep(carts.as_ref(), max_idle).await;
        }
    });
}

/// Evict carts untouched for longer than `max_idle`.
pub(crate) async fn sweep(carts: &dyn CartsService, max_idle: SignedDuration) -> usize {
    let idle_since = match Timestamp::now().checked_sub(max_idle) {
        Ok(idle_since) => idle_since,
        Err(source) => {
            error!("failed to compute cart idle cutoff: {source}");

            return 0;
        }
    };

    let evicted = carts.evict_idle(idle_since).await;

    if evicted > 0 {
        info!(evicted, %idle_since, "evicted idle carts");
    }

    evicted
}
