//! # es-core
//!
//! Core types, traits, and utilities for Estrata RS.
//!
//! This crate provides the foundational building blocks used across all other
//! crates:
//! - Common error types (`EsError`, `ValidationErrors`)
//! - Result type aliases
//! - Core entity traits (`Entity`, `Identifiable`, `Timestamped`)
//! - Application configuration

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::*;
pub use result::*;
pub use traits::*;
