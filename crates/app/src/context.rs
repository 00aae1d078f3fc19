//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, DatabaseError, Db},
    domain::{
        carts::{CartsService, InMemoryCartsService},
        checkout::{CheckoutService, PgCheckoutService},
        menu::{MenuService, PgMenuService},
        orders::{OrdersService, PgOrdersService},
        users::{PgUsersService, UsersService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("database role is not safe for serving requests")]
    Rls(#[source] DatabaseError),
}

#[derive(Clone)]
pub struct AppContext {
    pub menu: Arc<dyn MenuService>,
    pub carts: Arc<dyn CartsService>,
    pub checkout: Arc<dyn CheckoutService>,
    pub orders: Arc<dyn OrdersService>,
    pub users: Arc<dyn UsersService>,
    pub auth: Arc<dyn AuthService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when connecting fails or the role bypasses row-level
    /// security.
    pub async fn from_database_url(url: &str) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        database::ensure_rls_enforced_role(&pool)
            .await
            .map_err(AppInitError::Rls)?;

        Ok(Self::from_db(&Db::new(pool)))
    }

    /// Wire every service onto one database handle.
    #[must_use]
    pub fn from_db(db: &Db) -> Self {
        let menu: Arc<dyn MenuService> = Arc::new(PgMenuService::new(db.clone()));
        let carts: Arc<dyn CartsService> = Arc::new(InMemoryCartsService::new(menu.clone()));

        Self {
            checkout: Arc::new(PgCheckoutService::new(db.clone(), carts.clone())),
            orders: Arc::new(PgOrdersService::new(db.clone())),
            users: Arc::new(PgUsersService::new(db.clone())),
            auth: Arc::new(PgAuthService::new(db.clone())),
            menu,
            carts,
        }
    }
}
