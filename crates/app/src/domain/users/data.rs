//! User Data

use crate::domain::users::records::{Role, UserUuid};

/// New User Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    /// UUID to assign to the profile row.
    pub uuid: UserUuid,

    /// Display name to persist.
    pub name: String,

    /// Roles to grant alongside the profile.
    pub roles: Vec<Role>,
}
