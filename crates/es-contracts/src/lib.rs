//! # es-contracts
//!
//! Contract validation for Estrata RS.
//!
//! Contracts validate entities before create/update operations. Field-level
//! checks collect into `ValidationErrors`; the three structural business
//! rules (manager eligibility, collaborator cap, leader membership) surface
//! as typed `InvariantViolation` errors so the transport layer can report
//! the exact rule broken.

pub mod base;
pub mod invariants;
pub mod projects;
pub mod tasks;
pub mod teams;

pub use base::*;
