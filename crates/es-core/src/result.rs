//! Result type aliases

use crate::error::EsError;

/// Standard Result type for Estrata operations
pub type EsResult<T> = Result<T, EsError>;
