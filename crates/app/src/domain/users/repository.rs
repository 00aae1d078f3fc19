//! Users Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use tracing::warn;

use crate::domain::users::records::{ProfileRecord, Role, UserUuid};

const CREATE_PROFILE_SQL: &str = include_str!("sql/create_profile.sql");
const GRANT_ROLE_SQL: &str = include_str!("sql/grant_role.sql");
const GET_PROFILE_SQL: &str = include_str!("sql/get_profile.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgUsersRepository;

impl PgUsersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_profile(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        name: &str,
    ) -> Result<ProfileRecord, sqlx::Error> {
        query_as::<Postgres, ProfileRecord>(CREATE_PROFILE_SQL)
            .bind(user.into_uuid())
            .bind(name)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn grant_role(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        role: Role,
    ) -> Result<(), sqlx::Error> {
        query(GRANT_ROLE_SQL)
            .bind(user.into_uuid())
            .bind(role.as_str())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn get_profile(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<ProfileRecord, sqlx::Error> {
        query_as::<Postgres, ProfileRecord>(GET_PROFILE_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ProfileRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let uuid = UserUuid::from_uuid(row.try_get("uuid")?);
        let stored_roles: Vec<String> = row.try_get("roles")?;

        // Roles this build does not know about grant nothing.
        let roles = stored_roles
            .into_iter()
            .filter_map(|role| match role.parse::<Role>() {
                Ok(role) => Some(role),
                Err(error) => {
                    warn!(user = %uuid, %error, "ignoring unrecognised role");
                    None
                }
            })
            .collect();

        Ok(Self {
            uuid,
            name: row.try_get("name")?,
            roles,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
