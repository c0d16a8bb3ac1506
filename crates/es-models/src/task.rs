//! Task model
//!
//! Table: tasks (collaborators in task_collaborators)

use chrono::{DateTime, Utc};
use es_core::traits::{Activatable, Entity, Id, Identifiable, ProjectScoped, Timestamped};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Upper bound on the collaborator set of a task.
///
/// Enforced by the service layer and re-verified by the repository at the
/// write boundary; the storage schema itself does not carry the constraint.
pub const MAX_COLLABORATORS: usize = 2;

/// Task lifecycle status. Transition legality is left to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Pendente,
    EmExecucao,
    Bloqueada,
    Concluida,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pendente => "PENDENTE",
            Self::EmExecucao => "EM_EXECUCAO",
            Self::Bloqueada => "BLOQUEADA",
            Self::Concluida => "CONCLUIDA",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDENTE" => Some(Self::Pendente),
            "EM_EXECUCAO" => Some(Self::EmExecucao),
            "BLOQUEADA" => Some(Self::Bloqueada),
            "CONCLUIDA" => Some(Self::Concluida),
            _ => None,
        }
    }
}

/// Unit of work inside a project.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Task {
    pub id: Option<Id>,

    #[validate(length(min = 1, max = 255))]
    pub title: String,

    pub description: Option<String>,

    pub status: TaskStatus,

    /// Owning project
    pub project_id: Id,

    /// Exactly one main responsible user
    pub main_responsible_id: Id,

    /// Collaborator user ids, capped at [`MAX_COLLABORATORS`]
    pub collaborator_ids: Vec<Id>,

    pub active: bool,

    pub created_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(title: impl Into<String>, project_id: Id, main_responsible_id: Id) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: None,
            status: TaskStatus::Pendente,
            project_id,
            main_responsible_id,
            collaborator_ids: Vec::new(),
            active: true,
            created_at: None,
        }
    }

    /// Whether another collaborator still fits under the cap.
    pub fn has_collaborator_slot(&self) -> bool {
        self.collaborator_ids.len() < MAX_COLLABORATORS
    }
}

impl Identifiable for Task {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Timestamped for Task {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

impl Activatable for Task {
    fn is_active(&self) -> bool {
        self.active
    }
}

impl ProjectScoped for Task {
    fn project_id(&self) -> Id {
        self.project_id
    }
}

impl Entity for Task {
    const TABLE_NAME: &'static str = "tasks";
    const TYPE_NAME: &'static str = "Task";
}

/// DTO for creating a task
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskDto {
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    pub description: Option<String>,

    pub main_responsible_id: Id,

    #[serde(default)]
    pub collaborator_ids: Vec<Id>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collaborator_slot() {
        let mut task = Task::new("Furo SP-01", 1, 2);
        assert!(task.has_collaborator_slot());

        task.collaborator_ids.push(3);
        assert!(task.has_collaborator_slot());

        task.collaborator_ids.push(4);
        assert!(!task.has_collaborator_slot());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            TaskStatus::Pendente,
            TaskStatus::EmExecucao,
            TaskStatus::Bloqueada,
            TaskStatus::Concluida,
        ] {
            assert_eq!(TaskStatus::parse(status.as_str()), Some(status));
        }
    }
}
