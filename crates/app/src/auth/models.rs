//! Auth data models.

use jiff::Timestamp;
use uuid::Uuid;

use crate::domain::users::records::{Role, UserUuid};

/// Session row used during bearer authentication.
#[derive(Debug, Clone)]
pub(crate) struct ActiveSession {
    pub uuid: Uuid,
    pub user_uuid: UserUuid,

    /// SHA-256 verifier for the token secret material.
    pub token_hash: String,
}

/// Session metadata persisted in storage.
#[derive(Debug, Clone)]
pub struct SessionMetadata {
    pub uuid: Uuid,
    pub user_uuid: UserUuid,
    pub created_at: Timestamp,
    pub last_used_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub revoked_at: Option<Timestamp>,
}

/// New session persistence payload.
#[derive(Debug, Clone)]
pub(crate) struct NewSession {
    pub uuid: Uuid,
    pub user_uuid: UserUuid,
    pub token_hash: String,
    pub expires_at: Option<Timestamp>,
}

/// Session issuance result with the one-time raw token.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub metadata: SessionMetadata,
}

/// The signed-in user behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub user: UserUuid,
    pub name: String,
    pub roles: Vec<Role>,
}

impl Viewer {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }
}
