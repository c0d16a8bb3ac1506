//! Base contract system

use es_core::error::ValidationErrors;

/// Result of contract validation
pub type ValidationResult = Result<(), ValidationErrors>;

/// Base contract trait
pub trait Contract<T>: Send + Sync {
    /// Validate the entity
    fn validate(&self, entity: &T) -> ValidationResult;

    /// Check if an attribute is writable
    fn is_writable(&self, _attribute: &str) -> bool {
        true
    }
}

/// Shared field validations
pub(crate) fn validate_presence(
    field: &'static str,
    value: &str,
    errors: &mut ValidationErrors,
) {
    if value.trim().is_empty() {
        errors.add(field, "can't be blank");
    }
}

/// Run the field rules declared on the entity itself and fold the failures
/// into the contract's error set. Fields the contract already flagged are
/// skipped so a blank name is reported once, not twice.
pub(crate) fn run_derived_rules<T: validator::Validate>(
    entity: &T,
    errors: &mut ValidationErrors,
) {
    if let Err(derived) = entity.validate() {
        for (field, field_errors) in derived.field_errors() {
            if errors.has_error(field) {
                continue;
            }
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| match error.code.as_ref() {
                        "length" => "is too long (maximum is 255 characters)".to_string(),
                        code => format!("is invalid ({code})"),
                    });
                errors.add(field, message);
            }
        }
    }
}
