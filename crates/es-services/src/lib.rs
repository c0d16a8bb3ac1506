//! # es-services
//!
//! Business logic services for Estrata RS.
//!
//! Services validate through `es-contracts`, run the structural invariants,
//! and hand writes to a store. Stores are traits so the services test
//! without a database; production wires them to the SQLx repositories.

pub mod projects;
pub mod stores;
pub mod tasks;
pub mod teams;
pub mod users;

#[cfg(test)]
mod workflow_tests;

pub use projects::ProjectService;
pub use stores::{
    MemoryProjectStore, MemoryTaskStore, MemoryTeamStore, MemoryUserStore, ProjectStore,
    TaskStore, TeamStore, UserStore,
};
pub use tasks::TaskService;
pub use teams::TeamService;
pub use users::UserService;
