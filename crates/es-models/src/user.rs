//! User model
//!
//! Table: users

use chrono::{DateTime, Utc};
use es_core::traits::{Activatable, Entity, Id, Identifiable, Timestamped};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::role::Role;

/// User account.
///
/// The credential hash is opaque to this crate; hashing and verification live
/// in `es-auth`. The role is immutable after assignment: no update path in
/// this workspace writes it.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct User {
    pub id: Option<Id>,

    /// Login name (unique)
    #[validate(length(min = 1, max = 255))]
    pub username: String,

    /// Hashed password (never serialized outward)
    #[serde(skip_serializing)]
    pub password_hash: String,

    #[validate(length(min = 1, max = 255))]
    pub full_name: String,

    pub role: Role,

    /// Team membership; a user belongs to at most one team
    pub team_id: Option<Id>,

    pub active: bool,

    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(username: impl Into<String>, full_name: impl Into<String>, role: Role) -> Self {
        Self {
            id: None,
            username: username.into(),
            password_hash: String::new(),
            full_name: full_name.into(),
            role,
            team_id: None,
            active: true,
            created_at: None,
        }
    }

    /// Whether this user may manage a project (LIDER_PROJETOS or above).
    pub fn eligible_as_manager(&self) -> bool {
        self.role.at_least(Role::LiderProjetos)
    }
}

impl Identifiable for User {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Timestamped for User {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

impl Activatable for User {
    fn is_active(&self) -> bool {
        self.active
    }
}

impl Entity for User {
    const TABLE_NAME: &'static str = "users";
    const TYPE_NAME: &'static str = "User";
}

/// Registration input shape. The raw password never reaches the models; it is
/// hashed by `es-auth` before a `User` is built.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, max = 255))]
    pub username: String,

    #[validate(length(min = 1, max = 255))]
    pub full_name: String,

    pub role: Role,

    pub team_id: Option<Id>,
}
