//! Project model
//!
//! Table: projects

use chrono::{DateTime, Utc};
use es_core::traits::{Activatable, Entity, Id, Identifiable, Timestamped};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Project lifecycle status.
///
/// Only the set of states is fixed here; which transitions are legal is a
/// business-process concern outside this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    #[default]
    Planejamento,
    EmExecucao,
    Pausado,
    Concluido,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planejamento => "PLANEJAMENTO",
            Self::EmExecucao => "EM_EXECUCAO",
            Self::Pausado => "PAUSADO",
            Self::Concluido => "CONCLUIDO",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PLANEJAMENTO" => Some(Self::Planejamento),
            "EM_EXECUCAO" => Some(Self::EmExecucao),
            "PAUSADO" => Some(Self::Pausado),
            "CONCLUIDO" => Some(Self::Concluido),
            _ => None,
        }
    }
}

/// Geotechnical field project.
///
/// Owns its tasks and bulletins (cascading lifecycle). The manager must hold
/// LIDER_PROJETOS or higher; the service layer enforces that, not storage.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Project {
    pub id: Option<Id>,

    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(length(max = 255))]
    pub client_name: Option<String>,

    pub status: ProjectStatus,

    /// Managing user
    pub manager_id: Id,

    pub active: bool,

    pub created_at: Option<DateTime<Utc>>,
}

impl Project {
    pub fn new(name: impl Into<String>, manager_id: Id) -> Self {
        Self {
            id: None,
            name: name.into(),
            client_name: None,
            status: ProjectStatus::Planejamento,
            manager_id,
            active: true,
            created_at: None,
        }
    }
}

impl Identifiable for Project {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Timestamped for Project {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

impl Activatable for Project {
    fn is_active(&self) -> bool {
        self.active
    }
}

impl Entity for Project {
    const TABLE_NAME: &'static str = "projects";
    const TYPE_NAME: &'static str = "Project";
}

/// DTO for creating a project
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectDto {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    pub client_name: Option<String>,

    pub manager_id: Id,

    pub status: Option<ProjectStatus>,
}

/// DTO for updating a project. The manager is reassigned through the service
/// so eligibility stays checked.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectDto {
    pub name: Option<String>,
    pub client_name: Option<String>,
    pub status: Option<ProjectStatus>,
    pub manager_id: Option<Id>,
}
