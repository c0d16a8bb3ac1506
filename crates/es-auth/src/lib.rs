//! # es-auth
//!
//! Authentication and authorization for Estrata RS.
//!
//! - Argon2 password hashing (the credential store itself is external)
//! - JWT token service resolving an opaque token to `(user id, role)`
//! - `AccessPolicy`: the route authorization table, evaluated first-match
//!   by the transport layer before any handler runs

pub mod jwt;
pub mod password;
pub mod policy;
pub mod principal;

pub use jwt::{Claims, JwtError, TokenService};
pub use policy::{AccessDecision, AccessPolicy, DenyReason};
pub use principal::Principal;
