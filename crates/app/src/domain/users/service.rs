//! Users service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::users::{
        data::NewUser,
        errors::UsersServiceError,
        records::{ProfileRecord, UserUuid},
        repository::PgUsersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    db: Db,
    repository: PgUsersRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgUsersRepository::new(),
        }
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    async fn create_user(&self, user: NewUser) -> Result<ProfileRecord, UsersServiceError> {
        let name = user.name.trim();

        if name.is_empty() {
            return Err(UsersServiceError::MissingRequiredData);
        }

        // Profiles have no insert policy: only a provisioning role that
        // bypasses row-level security can get past this statement.
        let mut tx = self.db.begin_viewer_transaction(None).await?;

        let mut profile = self
            .repository
            .create_profile(&mut tx, user.uuid, name)
            .await?;

        for role in user.roles {
            self.repository.grant_role(&mut tx, user.uuid, role).await?;

            if !profile.roles.contains(&role) {
                profile.roles.push(role);
            }
        }

        tx.commit().await?;

        Ok(profile)
    }

    async fn get_user(&self, user: UserUuid) -> Result<ProfileRecord, UsersServiceError> {
        let mut tx = self.db.begin_viewer_transaction(Some(user)).await?;

        let profile = self.repository.get_profile(&mut tx, user).await?;

        tx.commit().await?;

        Ok(profile)
    }
}

#[automock]
#[async_trait]
/// Profile and role provisioning.
pub trait UsersService: Send + Sync {
    /// Creates a profile and grants its roles in one transaction.
    async fn create_user(&self, user: NewUser) -> Result<ProfileRecord, UsersServiceError>;

    /// Load a user's own profile with roles.
    async fn get_user(&self, user: UserUuid) -> Result<ProfileRecord, UsersServiceError>;
}
