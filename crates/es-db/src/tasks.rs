//! Task repository
//!
//! Collaborators live in task_collaborators. The two-collaborator cap is
//! re-verified inside the insert statement itself, so two writers racing the
//! same task cannot both land a third row.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use es_core::traits::Id;
use es_models::task::{Task, TaskStatus, MAX_COLLABORATORS};

use crate::repository::{Pagination, RepositoryError, RepositoryResult};

#[derive(Debug, Clone, FromRow)]
struct TaskRow {
    id: i64,
    title: String,
    description: Option<String>,
    status: String,
    project_id: i64,
    main_responsible_id: i64,
    active: bool,
    created_at: DateTime<Utc>,
}

impl TaskRow {
    fn into_model(self, collaborator_ids: Vec<Id>) -> RepositoryResult<Task> {
        let status = TaskStatus::parse(&self.status).ok_or_else(|| {
            RepositoryError::Conflict(format!("stored status {} is not recognized", self.status))
        })?;

        Ok(Task {
            id: Some(self.id),
            title: self.title,
            description: self.description,
            status,
            project_id: self.project_id,
            main_responsible_id: self.main_responsible_id,
            collaborator_ids,
            active: self.active,
            created_at: Some(self.created_at),
        })
    }
}

const SELECT_COLUMNS: &str =
    "id, title, description, status, project_id, main_responsible_id, active, created_at";

#[derive(Debug, PartialEq, Eq)]
enum CollaboratorInsert {
    Inserted,
    AlreadyPresent,
    CapReached,
}

/// Task repository implementation
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Task>> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {} FROM tasks WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let collaborators = self.collaborator_ids(row.id).await?;
                Ok(Some(row.into_model(collaborators)?))
            }
            None => Ok(None),
        }
    }

    pub async fn find_by_project(
        &self,
        project_id: Id,
        pagination: Pagination,
    ) -> RepositoryResult<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {} FROM tasks WHERE project_id = $1 AND active \
             ORDER BY created_at LIMIT $2 OFFSET $3",
            SELECT_COLUMNS
        ))
        .bind(project_id)
        .bind(pagination.limit)
        .bind(pagination.offset)
        .fetch_all(&self.pool)
        .await?;

        let mut tasks = Vec::with_capacity(rows.len());
        for row in rows {
            let collaborators = self.collaborator_ids(row.id).await?;
            tasks.push(row.into_model(collaborators)?);
        }
        Ok(tasks)
    }

    /// Persist a task with its initial collaborator set. The cap guard runs
    /// inside the same transaction, so an over-cap initial set rolls back.
    pub async fn create(&self, task: &Task) -> RepositoryResult<Task> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, TaskRow>(&format!(
            r#"
            INSERT INTO tasks (title, description, status, project_id, main_responsible_id, active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.project_id)
        .bind(task.main_responsible_id)
        .bind(task.active)
        .fetch_one(&mut *tx)
        .await?;

        for user_id in &task.collaborator_ids {
            let outcome = Self::guarded_collaborator_insert(&mut tx, row.id, *user_id).await?;
            if outcome == CollaboratorInsert::CapReached {
                return Err(RepositoryError::CollaboratorLimit { task_id: row.id });
            }
        }

        tx.commit().await?;
        Ok(row.into_model(task.collaborator_ids.clone())?)
    }

    /// Add a collaborator, re-checking the cap at the write boundary.
    ///
    /// The conditional insert counts existing rows in the same statement;
    /// when the cap is already met the caller gets
    /// [`RepositoryError::CollaboratorLimit`]. Re-adding an existing
    /// collaborator is a no-op, never a cap error.
    pub async fn add_collaborator(&self, task_id: Id, user_id: Id) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await?;
        let outcome = Self::guarded_collaborator_insert(&mut tx, task_id, user_id).await?;
        if outcome == CollaboratorInsert::CapReached {
            return Err(RepositoryError::CollaboratorLimit { task_id });
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn remove_collaborator(&self, task_id: Id, user_id: Id) -> RepositoryResult<()> {
        let result =
            sqlx::query("DELETE FROM task_collaborators WHERE task_id = $1 AND user_id = $2")
                .bind(task_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("TaskCollaborator", "user_id", user_id));
        }
        Ok(())
    }

    pub async fn update_status(&self, task_id: Id, status: TaskStatus) -> RepositoryResult<()> {
        let result = sqlx::query("UPDATE tasks SET status = $2 WHERE id = $1")
            .bind(task_id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("Task", "id", task_id));
        }
        Ok(())
    }

    async fn guarded_collaborator_insert(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        task_id: Id,
        user_id: Id,
    ) -> RepositoryResult<CollaboratorInsert> {
        let result = sqlx::query(
            r#"
            INSERT INTO task_collaborators (task_id, user_id)
            SELECT $1, $2
            WHERE (SELECT COUNT(*) FROM task_collaborators WHERE task_id = $1) < $3
            ON CONFLICT (task_id, user_id) DO NOTHING
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .bind(MAX_COLLABORATORS as i64)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(CollaboratorInsert::Inserted);
        }

        // Zero rows is ambiguous: the pair may already exist (conflict) or
        // the cap may be met. Distinguish inside the same transaction.
        let present = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM task_collaborators WHERE task_id = $1 AND user_id = $2)",
        )
        .bind(task_id)
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await?;

        if present {
            Ok(CollaboratorInsert::AlreadyPresent)
        } else {
            Ok(CollaboratorInsert::CapReached)
        }
    }

    async fn collaborator_ids(&self, task_id: Id) -> RepositoryResult<Vec<Id>> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT user_id FROM task_collaborators WHERE task_id = $1 ORDER BY user_id",
        )
        .bind(task_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }
}
