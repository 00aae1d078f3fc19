//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::debug;
use uuid::Uuid;

use crate::{
    auth::{
        AuthServiceError, IssuedSession, NewSession, SessionMetadata, SessionTokenVersion,
        Viewer, format_session_token, generate_session_secret, parse_session_token,
        repository::PgSessionsRepository, session_verifier, verifiers_match,
    },
    database::Db,
    domain::users::{PgUsersRepository, records::UserUuid},
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    db: Db,
    sessions: PgSessionsRepository,
    users: PgUsersRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            sessions: PgSessionsRepository::new(db.pool().clone()),
            users: PgUsersRepository::new(),
            db,
        }
    }

    /// Issue a new session for `user`. The raw token is only ever returned here.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the insert fails.
    pub async fn issue_session(
        &self,
        user: UserUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedSession, AuthServiceError> {
        let session_uuid = Uuid::now_v7();
        let version = SessionTokenVersion::V1;
        let secret = generate_session_secret();
        let token = format_session_token(session_uuid, version, &secret);

        let metadata = self
            .sessions
            .create_session(&NewSession {
                uuid: session_uuid,
                user_uuid: user,
                token_hash: session_verifier(&session_uuid, version, &user, &secret),
                expires_at,
            })
            .await?;

        Ok(IssuedSession { token, metadata })
    }

    /// List every session issued to `user`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_sessions(
        &self,
        user: UserUuid,
    ) -> Result<Vec<SessionMetadata>, AuthServiceError> {
        Ok(self.sessions.list_user_sessions(user).await?)
    }

    /// Revoke a session by UUID. Returns `true` if the session was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_session(&self, session: Uuid) -> Result<bool, AuthServiceError> {
        Ok(self.sessions.revoke_session(session).await?.is_some())
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Viewer, AuthServiceError> {
        let parsed = parse_session_token(bearer_token).map_err(|error| {
            debug!(%error, "rejecting malformed session token");

            AuthServiceError::NotFound
        })?;

        let session = self
            .sessions
            .find_active_session(parsed.session_uuid)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        let expected = session_verifier(
            &parsed.session_uuid,
            parsed.version,
            &session.user_uuid,
            &parsed.secret,
        );

        if !verifiers_match(&session.token_hash, &expected) {
            return Err(AuthServiceError::NotFound);
        }

        // Best-effort metadata update; auth success should not depend on this write.
        let _touch_result = self.sessions.touch_session(session.uuid).await;

        let mut tx = self
            .db
            .begin_viewer_transaction(Some(session.user_uuid))
            .await?;

        let profile = self.users.get_profile(&mut tx, session.user_uuid).await?;

        tx.commit().await?;

        Ok(Viewer {
            user: profile.uuid,
            name: profile.name,
            roles: profile.roles,
        })
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token to the signed-in user.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Viewer, AuthServiceError>;
}
