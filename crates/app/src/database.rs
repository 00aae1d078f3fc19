//! Database connection management

use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow, query, query_scalar};
use thiserror::Error;

use crate::domain::users::records::UserUuid;

/// SQL used to set the acting user for row-level security.
pub const SET_VIEWER_CONTEXT_SQL: &str = "SELECT set_config('app.current_user_uuid', $1, true)";

/// Table privileges for the runtime role. Row-level security narrows these
/// further; `user_roles` stays read-only so roles can only be granted by the
/// provisioning connection.
pub const APP_ROLE_TABLE_GRANTS: &[(&str, &str)] = &[
    ("profiles", "SELECT"),
    ("user_roles", "SELECT"),
    ("sessions", "SELECT, INSERT, UPDATE"),
    ("menu_items", "SELECT, INSERT, UPDATE"),
    ("orders", "SELECT, INSERT, UPDATE (payment_status, status)"),
    ("order_items", "SELECT, INSERT"),
];

const ROLE_BYPASSES_RLS_SQL: &str =
    "SELECT rolsuper OR rolbypassrls FROM pg_roles WHERE rolname = current_user";

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("storage error")]
    Sql(#[from] sqlx::Error),

    #[error("database role bypasses row-level security; connect as the app role instead")]
    BypassesRowLevelSecurity,
}

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Begin a transaction acting as `viewer`, or as nobody when `None`.
    ///
    /// Policies read the setting through `app_current_user_uuid()`, so an
    /// anonymous transaction only sees rows that are public.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction or setting the viewer fails.
    pub async fn begin_viewer_transaction(
        &self,
        viewer: Option<UserUuid>,
    ) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let setting = viewer.map(|user| user.to_string()).unwrap_or_default();

        query(SET_VIEWER_CONTEXT_SQL)
            .bind(setting)
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

/// Refuse to serve through a role that ignores row-level security.
///
/// # Errors
///
/// Returns [`DatabaseError::BypassesRowLevelSecurity`] for superusers and
/// `BYPASSRLS` roles.
pub async fn ensure_rls_enforced_role(pool: &PgPool) -> Result<(), DatabaseError> {
    let bypasses: Option<bool> = query_scalar(ROLE_BYPASSES_RLS_SQL)
        .fetch_optional(pool)
        .await?;

    if bypasses.unwrap_or(false) {
        return Err(DatabaseError::BypassesRowLevelSecurity);
    }

    Ok(())
}

/// Read a non-negative `BIGINT` money column as minor units.
pub(crate) fn try_get_amount(row: &PgRow, col: &str) -> Result<u64, sqlx::Error> {
    let amount_i64: i64 = row.try_get(col)?;

    u64::try_from(amount_i64).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

/// Convert minor units for binding into a `BIGINT` column.
pub(crate) fn amount_to_i64(amount: u64, col: &str) -> Result<i64, sqlx::Error> {
    i64::try_from(amount).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}
