//! User services
//!
//! Registration hashes the raw password before a `User` is built; the role
//! is written once at registration and no service updates it afterwards.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use es_auth::password::{hash_password, verify_password};
use es_core::error::EsError;
use es_core::result::EsResult;
use es_core::traits::Id;
use es_models::role::Role;
use es_models::user::{NewUser, User};

use crate::stores::UserStore;

const MIN_PASSWORD_LENGTH: usize = 8;

/// Lowest role registration refuses. Everything from RH up is provisioned
/// by an administrator, never self-assigned on the public endpoint.
const FIRST_PROVISIONED_ROLE: Role = Role::Rh;

pub struct UserService<U: UserStore> {
    users: Arc<U>,
}

impl<U: UserStore> UserService<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    #[instrument(skip(self, new_user, raw_password), fields(username = %new_user.username))]
    pub async fn register(&self, new_user: NewUser, raw_password: &str) -> EsResult<User> {
        let mut errors = es_core::error::ValidationErrors::new();
        if new_user.username.trim().is_empty() {
            errors.add("username", "can't be blank");
        }
        if new_user.full_name.trim().is_empty() {
            errors.add("fullName", "can't be blank");
        }
        if raw_password.len() < MIN_PASSWORD_LENGTH {
            errors.add(
                "password",
                format!("must be at least {} characters", MIN_PASSWORD_LENGTH),
            );
        }
        if !errors.is_empty() {
            return Err(errors.into());
        }

        if new_user.role.at_least(FIRST_PROVISIONED_ROLE) {
            warn!(role = %new_user.role, "Registration with elevated role rejected");
            return Err(EsError::forbidden(format!(
                "role {} cannot be self-assigned",
                new_user.role
            )));
        }

        if self
            .users
            .find_user_by_username(&new_user.username)
            .await?
            .is_some()
        {
            let mut errors = es_core::error::ValidationErrors::new();
            errors.add("username", "is already taken");
            return Err(errors.into());
        }

        let mut user = User::new(new_user.username, new_user.full_name, new_user.role);
        user.team_id = new_user.team_id;
        user.password_hash =
            hash_password(raw_password).map_err(|e| EsError::Internal(e.to_string()))?;

        let created = self.users.insert_user(&user).await?;
        info!(id = ?created.id, role = %created.role, "User registered");
        Ok(created)
    }

    /// Credential check. Unknown username and wrong password fail the same
    /// way, so the response does not leak which usernames exist.
    #[instrument(skip(self, raw_password))]
    pub async fn authenticate(&self, username: &str, raw_password: &str) -> EsResult<User> {
        let user = match self.users.find_user_by_username(username).await? {
            Some(user) if user.active => user,
            _ => {
                warn!(username = username, "Login rejected");
                return Err(EsError::unauthenticated("invalid credentials"));
            }
        };

        let valid = verify_password(raw_password, &user.password_hash)
            .map_err(|e| EsError::Internal(e.to_string()))?;
        if !valid {
            warn!(username = username, "Login rejected");
            return Err(EsError::unauthenticated("invalid credentials"));
        }

        Ok(user)
    }

    pub async fn get(&self, id: Id) -> EsResult<User> {
        self.users
            .find_user(id)
            .await?
            .ok_or_else(|| EsError::not_found("User", "id", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryUserStore;
    use es_models::role::Role;

    fn new_user(username: &str, role: Role) -> NewUser {
        NewUser {
            username: username.into(),
            full_name: "Pessoa de Campo".into(),
            role,
            team_id: None,
        }
    }

    fn service() -> UserService<MemoryUserStore> {
        UserService::new(Arc::new(MemoryUserStore::new()))
    }

    #[tokio::test]
    async fn test_register_and_authenticate() {
        let service = service();
        let user = service
            .register(new_user("campo1", Role::AuxiliarTecnico), "senha-segura")
            .await
            .unwrap();
        assert!(user.id.is_some());
        assert_ne!(user.password_hash, "senha-segura");

        let authenticated = service.authenticate("campo1", "senha-segura").await.unwrap();
        assert_eq!(authenticated.id, user.id);
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let service = service();
        service
            .register(new_user("campo2", Role::AuxiliarTecnico), "senha-segura")
            .await
            .unwrap();

        let err = service.authenticate("campo2", "errada").await.unwrap_err();
        assert!(matches!(err, EsError::Unauthenticated { .. }));
    }

    #[tokio::test]
    async fn test_unknown_user_fails_like_wrong_password() {
        let service = service();
        let err = service.authenticate("fantasma", "qualquer").await.unwrap_err();
        assert!(matches!(err, EsError::Unauthenticated { .. }));
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let service = service();
        let err = service
            .register(new_user("campo3", Role::AuxiliarTecnico), "curta")
            .await
            .unwrap_err();
        assert!(matches!(err, EsError::Validation(_)));
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let service = service();
        service
            .register(new_user("campo4", Role::AuxiliarTecnico), "senha-segura")
            .await
            .unwrap();

        let err = service
            .register(new_user("campo4", Role::AssistenteTecnico), "outra-senha-1")
            .await
            .unwrap_err();
        assert!(matches!(err, EsError::Validation(_)));
    }

    #[tokio::test]
    async fn test_elevated_roles_cannot_self_register() {
        let service = service();
        for role in [Role::Rh, Role::Diretor, Role::Admin, Role::Dev] {
            let err = service
                .register(new_user("intruso", role), "senha-segura")
                .await
                .unwrap_err();
            assert!(matches!(err, EsError::Forbidden { .. }), "role {role}");
        }
    }

    #[tokio::test]
    async fn test_operational_ladder_can_register() {
        let service = service();
        for (i, role) in [
            Role::AuxiliarTecnico,
            Role::AssistenteTecnico,
            Role::AnalistaTecnico,
            Role::LiderProjetos,
        ]
        .into_iter()
        .enumerate()
        {
            let user = service
                .register(new_user(&format!("campo{}", 10 + i), role), "senha-segura")
                .await
                .unwrap();
            assert_eq!(user.role, role);
        }
    }
}
