//! Authenticated caller identity

use es_core::traits::Id;
use es_models::role::Role;

/// The resolved caller of a request: `(user id, role)` plus the login name
/// for logging. Built by the token service; handlers never see credentials.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: Id,
    pub username: String,
    pub role: Role,
}

impl Principal {
    pub fn new(id: Id, username: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            username: username.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.at_least(Role::Admin)
    }
}
