//! # es-api
//!
//! HTTP API layer for Estrata RS.
//!
//! Axum handlers over the service layer, a policy middleware gating every
//! route by `(role, method, path)`, and adapters wiring the service store
//! traits to the SQLx repositories.

pub mod adapters;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;

pub use error::{ApiError, ApiResult};
pub use extractors::{AppState, AuthenticatedUser};
pub use routes::router;
