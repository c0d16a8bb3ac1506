//! Repository error and paging types

use es_core::error::{EsError, InvariantRule};

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Entity not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The write-boundary re-check of the collaborator cap rejected the row.
    #[error("Collaborator limit reached for task {task_id}")]
    CollaboratorLimit { task_id: i64 },
}

impl RepositoryError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }
}

impl From<RepositoryError> for EsError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound {
                entity,
                field,
                value,
            } => EsError::NotFound {
                entity,
                field,
                value,
            },
            RepositoryError::Database(e) => EsError::Database(e.to_string()),
            RepositoryError::Conflict(msg) => EsError::Database(msg),
            RepositoryError::CollaboratorLimit { task_id } => EsError::invariant(
                InvariantRule::CollaboratorLimit,
                format!("task {} already has the maximum number of collaborators", task_id),
            ),
        }
    }
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Pagination parameters for queries
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: 20,
            offset: 0,
        }
    }
}

impl Pagination {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_core_error() {
        let err: EsError = RepositoryError::not_found("Project", "id", 9).into();
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_collaborator_limit_maps_to_invariant() {
        let err: EsError = RepositoryError::CollaboratorLimit { task_id: 3 }.into();
        match err {
            EsError::InvariantViolation { rule, .. } => {
                assert_eq!(rule, InvariantRule::CollaboratorLimit);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
