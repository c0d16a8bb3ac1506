//! User repository

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use es_core::traits::Id;
use es_models::role::Role;
use es_models::user::User;

use crate::repository::{Pagination, RepositoryError, RepositoryResult};

/// User database row
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: String,
    pub team_id: Option<i64>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_model(self) -> RepositoryResult<User> {
        let role = Role::parse(&self.role).ok_or_else(|| {
            RepositoryError::Conflict(format!("stored role {} is not recognized", self.role))
        })?;

        Ok(User {
            id: Some(self.id),
            username: self.username,
            password_hash: self.password_hash,
            full_name: self.full_name,
            role,
            team_id: self.team_id,
            active: self.active,
            created_at: Some(self.created_at),
        })
    }
}

const SELECT_COLUMNS: &str =
    "id, username, password_hash, full_name, role, team_id, active, created_at";

/// User repository implementation
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_model).transpose()
    }

    pub async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            SELECT_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_model).transpose()
    }

    /// Insert a new user. The role is written once here and never updated.
    pub async fn create(&self, user: &User) -> RepositoryResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (username, password_hash, full_name, role, team_id, active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(user.role.as_str())
        .bind(user.team_id)
        .bind(user.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                RepositoryError::Conflict(format!("username {} is taken", user.username))
            }
            other => RepositoryError::Database(other),
        })?;

        row.into_model()
    }

    pub async fn find_all(&self, pagination: Pagination) -> RepositoryResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users ORDER BY username LIMIT $1 OFFSET $2",
            SELECT_COLUMNS
        ))
        .bind(pagination.limit)
        .bind(pagination.offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(UserRow::into_model).collect()
    }
}
