//! Project repository

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use es_core::traits::Id;
use es_models::project::{Project, ProjectStatus, UpdateProjectDto};

use crate::repository::{Pagination, RepositoryError, RepositoryResult};

#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub id: i64,
    pub name: String,
    pub client_name: Option<String>,
    pub status: String,
    pub manager_id: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl ProjectRow {
    fn into_model(self) -> RepositoryResult<Project> {
        let status = ProjectStatus::parse(&self.status).ok_or_else(|| {
            RepositoryError::Conflict(format!("stored status {} is not recognized", self.status))
        })?;

        Ok(Project {
            id: Some(self.id),
            name: self.name,
            client_name: self.client_name,
            status,
            manager_id: self.manager_id,
            active: self.active,
            created_at: Some(self.created_at),
        })
    }
}

const SELECT_COLUMNS: &str = "id, name, client_name, status, manager_id, active, created_at";

/// Project repository implementation
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {} FROM projects WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ProjectRow::into_model).transpose()
    }

    pub async fn find_all(&self, pagination: Pagination) -> RepositoryResult<Vec<Project>> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {} FROM projects WHERE active ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            SELECT_COLUMNS
        ))
        .bind(pagination.limit)
        .bind(pagination.offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ProjectRow::into_model).collect()
    }

    pub async fn create(&self, project: &Project) -> RepositoryResult<Project> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            INSERT INTO projects (name, client_name, status, manager_id, active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(&project.name)
        .bind(&project.client_name)
        .bind(project.status.as_str())
        .bind(project.manager_id)
        .bind(project.active)
        .fetch_one(&self.pool)
        .await?;

        row.into_model()
    }

    /// Apply a partial update. Absent fields keep their stored values.
    pub async fn update(&self, id: Id, changes: &UpdateProjectDto) -> RepositoryResult<Project> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            UPDATE projects
            SET name = COALESCE($2, name),
                client_name = COALESCE($3, client_name),
                status = COALESCE($4, status),
                manager_id = COALESCE($5, manager_id)
            WHERE id = $1
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.client_name)
        .bind(changes.status.map(|s| s.as_str()))
        .bind(changes.manager_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Project", "id", id))?;

        row.into_model()
    }

    /// Soft-delete: deactivates the project and, cascading, its tasks and
    /// bulletins.
    pub async fn deactivate(&self, id: Id) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE projects SET active = FALSE WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("Project", "id", id));
        }

        sqlx::query("UPDATE tasks SET active = FALSE WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE bulletins SET active = FALSE WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
