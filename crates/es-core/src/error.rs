//! Core error types for Estrata RS
//!
//! Every fallible operation in the workspace surfaces one of these kinds to
//! the transport layer; nothing is swallowed silently.

use std::collections::HashMap;
use thiserror::Error;

/// Structural business rules that the service layer enforces.
///
/// Distinct from authorization failures: breaking one of these means the
/// write itself would corrupt the entity graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantRule {
    /// A task may have at most two collaborators.
    CollaboratorLimit,
    /// A project manager must hold LIDER_PROJETOS or a higher role.
    ManagerEligibility,
    /// A team leader must also be a member of the team.
    LeaderMembership,
    /// A user belongs to at most one drilling team.
    SingleTeamMembership,
}

impl InvariantRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CollaboratorLimit => "collaborator_limit",
            Self::ManagerEligibility => "manager_eligibility",
            Self::LeaderMembership => "leader_membership",
            Self::SingleTeamMembership => "single_team_membership",
        }
    }
}

impl std::fmt::Display for InvariantRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core error type for all Estrata operations
#[derive(Error, Debug)]
pub enum EsError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Unauthenticated: {message}")]
    Unauthenticated { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Unsupported bulletin type: {type_tag}")]
    UnsupportedBulletinType { type_tag: String },

    #[error("Invariant violated ({rule}): {message}")]
    InvariantViolation {
        rule: InvariantRule,
        message: String,
    },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Upstream failure: {service} - {message}")]
    Upstream { service: &'static str, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl EsError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn unsupported_bulletin_type(type_tag: impl Into<String>) -> Self {
        Self::UnsupportedBulletinType {
            type_tag: type_tag.into(),
        }
    }

    pub fn invariant(rule: InvariantRule, message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            rule,
            message: message.into(),
        }
    }

    pub fn upstream(service: &'static str, message: impl Into<String>) -> Self {
        Self::Upstream {
            service,
            message: message.into(),
        }
    }

    /// Whether the caller may retry the operation unchanged.
    ///
    /// Policy and invariant violations are client-input errors and must not
    /// be retried; only upstream collaborator failures are retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EsError::Upstream { .. } | EsError::Database(_))
    }
}

/// Validation errors collection keyed by field
#[derive(Error, Debug, Default, Clone)]
#[error("Validation errors: {errors:?}")]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> Vec<error_messages>
    pub errors: HashMap<String, Vec<String>>,
    /// Base errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
        self.base_errors.extend(other.base_errors);
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        for (field, field_messages) in &self.errors {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }
}

/// HTTP status code mapping for errors
impl EsError {
    pub fn status_code(&self) -> u16 {
        match self {
            EsError::NotFound { .. } => 404,
            EsError::Unauthenticated { .. } => 401,
            EsError::Forbidden { .. } => 403,
            EsError::UnsupportedBulletinType { .. } => 422,
            EsError::InvariantViolation { .. } => 422,
            EsError::Validation(_) => 422,
            EsError::Database(_) | EsError::Internal(_) | EsError::Config(_) => 500,
            EsError::Upstream { .. } => 502,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EsError::NotFound { .. } => "not_found",
            EsError::Unauthenticated { .. } => "unauthenticated",
            EsError::Forbidden { .. } => "forbidden",
            EsError::UnsupportedBulletinType { .. } => "unsupported_bulletin_type",
            EsError::InvariantViolation { .. } => "invariant_violation",
            EsError::Validation(_) => "validation_failed",
            EsError::Database(_) => "database_error",
            EsError::Upstream { .. } => "upstream_failure",
            EsError::Config(_) => "configuration_error",
            EsError::Internal(_) => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(EsError::not_found("Project", "id", 7).status_code(), 404);
        assert_eq!(EsError::unauthenticated("no token").status_code(), 401);
        assert_eq!(EsError::forbidden("role too low").status_code(), 403);
        assert_eq!(
            EsError::unsupported_bulletin_type("rotary").status_code(),
            422
        );
        assert_eq!(
            EsError::invariant(InvariantRule::CollaboratorLimit, "task full").status_code(),
            422
        );
        assert_eq!(EsError::upstream("storage", "disk full").status_code(), 502);
    }

    #[test]
    fn test_retryability() {
        assert!(EsError::upstream("renderer", "timeout").is_retryable());
        assert!(!EsError::forbidden("nope").is_retryable());
        assert!(!EsError::invariant(InvariantRule::ManagerEligibility, "x").is_retryable());
        assert!(!EsError::unsupported_bulletin_type("rotary").is_retryable());
    }

    #[test]
    fn test_validation_errors() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "can't be blank");
        errors.add_base("something else");

        assert!(errors.has_error("name"));
        assert!(!errors.has_error("title"));
        assert_eq!(errors.full_messages().len(), 2);
    }

    #[test]
    fn test_invariant_rule_labels() {
        assert_eq!(
            InvariantRule::CollaboratorLimit.as_str(),
            "collaborator_limit"
        );
        assert_eq!(
            InvariantRule::ManagerEligibility.to_string(),
            "manager_eligibility"
        );
    }
}
