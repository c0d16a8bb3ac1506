//! # es-models
//!
//! Domain models for Estrata RS.
//!
//! This crate contains the entity structs of the field-project domain and
//! their structural invariant helpers. Each model implements the core traits
//! from `es-core` (Entity, Identifiable, Timestamped).

pub use es_core::traits::{Activatable, Entity, Id, Identifiable, ProjectScoped, Timestamped};

pub mod bulletin;
pub mod project;
pub mod role;
pub mod task;
pub mod team;
pub mod user;

// Re-exports for convenience
pub use bulletin::{Bulletin, CreateBulletinRequest, ResistivityPayload, SptPayload};
pub use project::{CreateProjectDto, Project, ProjectStatus, UpdateProjectDto};
pub use role::Role;
pub use task::{CreateTaskDto, Task, TaskStatus, MAX_COLLABORATORS};
pub use team::DrillingTeam;
pub use user::{NewUser, User};
