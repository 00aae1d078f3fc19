//! State

use std::sync::Arc;

use canteen_app::context::AppContext;
use rusty_money::iso::Currency;

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,

    /// Currency menu prices are stored in.
    pub(crate) currency: &'static Currency,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext, currency: &'static Currency) -> Self {
        Self { app, currency }
    }

    #[must_use]
    pub(crate) fn shared(app: AppContext, currency: &'static Currency) -> Arc<Self> {
        Arc::new(Self::new(app, currency))
    }
}
