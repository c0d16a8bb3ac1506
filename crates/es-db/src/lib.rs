//! # es-db
//!
//! Database layer for Estrata RS.
//!
//! PostgreSQL access using SQLx:
//! - Connection pool management
//! - Repositories for users, teams, projects, tasks, and bulletins
//!
//! The task-collaborator cap is re-verified here at the write boundary with
//! a conditional insert, so concurrent writers cannot race past the limit
//! the service layer already checked.
//!
//! ## Example
//!
//! ```ignore
//! use es_core::config::AppConfig;
//! use es_db::Database;
//! use es_db::projects::ProjectRepository;
//!
//! let config = AppConfig::from_env()?;
//! let db = Database::connect(&config.database).await?;
//! let repo = ProjectRepository::new(db.pool().clone());
//! let project = repo.find_by_id(1).await?;
//! ```

pub mod bulletins;
pub mod pool;
pub mod projects;
pub mod repository;
pub mod tasks;
pub mod teams;
pub mod users;

// Re-exports
pub use bulletins::BulletinRepository;
pub use pool::Database;
pub use projects::ProjectRepository;
pub use repository::{Pagination, RepositoryError, RepositoryResult};
pub use tasks::TaskRepository;
pub use teams::TeamRepository;
pub use users::UserRepository;
