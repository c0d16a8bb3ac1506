//! Bulletin repository
//!
//! Bulletins are stored as tagged rows: a type tag plus a JSONB payload. The
//! document path starts out null and is filled in once, by the first
//! successful render.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use es_core::traits::Id;
use es_models::bulletin::Bulletin;

use crate::repository::{Pagination, RepositoryError, RepositoryResult};

#[derive(Debug, Clone, FromRow)]
struct BulletinRow {
    id: i64,
    project_id: i64,
    author_id: i64,
    bulletin_type: String,
    payload: serde_json::Value,
    executed_at: DateTime<Utc>,
    document_path: Option<String>,
    active: bool,
    created_at: DateTime<Utc>,
}

impl BulletinRow {
    fn into_model(self) -> Bulletin {
        Bulletin {
            id: Some(self.id),
            project_id: self.project_id,
            author_id: self.author_id,
            bulletin_type: self.bulletin_type,
            payload: self.payload,
            executed_at: self.executed_at,
            document_path: self.document_path,
            active: self.active,
            created_at: Some(self.created_at),
        }
    }
}

const SELECT_COLUMNS: &str = "id, project_id, author_id, bulletin_type, payload, executed_at, \
                              document_path, active, created_at";

/// Bulletin repository implementation
pub struct BulletinRepository {
    pool: PgPool,
}

impl BulletinRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Bulletin>> {
        let row = sqlx::query_as::<_, BulletinRow>(&format!(
            "SELECT {} FROM bulletins WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(BulletinRow::into_model))
    }

    pub async fn find_by_project(
        &self,
        project_id: Id,
        pagination: Pagination,
    ) -> RepositoryResult<Vec<Bulletin>> {
        let rows = sqlx::query_as::<_, BulletinRow>(&format!(
            "SELECT {} FROM bulletins WHERE project_id = $1 AND active \
             ORDER BY executed_at DESC LIMIT $2 OFFSET $3",
            SELECT_COLUMNS
        ))
        .bind(project_id)
        .bind(pagination.limit)
        .bind(pagination.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(BulletinRow::into_model).collect())
    }

    pub async fn create(&self, bulletin: &Bulletin) -> RepositoryResult<Bulletin> {
        let row = sqlx::query_as::<_, BulletinRow>(&format!(
            r#"
            INSERT INTO bulletins
                (project_id, author_id, bulletin_type, payload, executed_at, active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(bulletin.project_id)
        .bind(bulletin.author_id)
        .bind(&bulletin.bulletin_type)
        .bind(&bulletin.payload)
        .bind(bulletin.executed_at)
        .bind(bulletin.active)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_model())
    }

    /// Record the rendered document path, first writer wins. Returns the
    /// path now stored on the row, which may be a competing writer's.
    pub async fn set_document_path(&self, id: Id, path: &str) -> RepositoryResult<String> {
        let stored = sqlx::query_scalar::<_, Option<String>>(
            r#"
            UPDATE bulletins
            SET document_path = COALESCE(document_path, $2)
            WHERE id = $1
            RETURNING document_path
            "#,
        )
        .bind(id)
        .bind(path)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Bulletin", "id", id))?;

        stored.ok_or_else(|| RepositoryError::Conflict("document path not recorded".into()))
    }
}
