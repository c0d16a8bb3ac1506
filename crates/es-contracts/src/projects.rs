//! Project contracts

use es_core::error::ValidationErrors;
use es_models::project::Project;

use crate::base::{run_derived_rules, validate_presence, Contract, ValidationResult};

/// Contract for creating a project.
///
/// Manager eligibility is an invariant, not a field validation; services run
/// `invariants::check_manager_eligibility` against the resolved manager after
/// this contract passes.
#[derive(Default)]
pub struct CreateProjectContract;

impl Contract<Project> for CreateProjectContract {
    fn validate(&self, project: &Project) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        validate_presence("name", &project.name, &mut errors);
        run_derived_rules(project, &mut errors);

        if project.manager_id <= 0 {
            errors.add("manager_id", "must reference a user");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn is_writable(&self, attribute: &str) -> bool {
        matches!(attribute, "name" | "client_name" | "status" | "manager_id")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_project() {
        let contract = CreateProjectContract;
        let project = Project::new("Obra Litoral", 3);
        assert!(contract.validate(&project).is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        let contract = CreateProjectContract;
        let project = Project::new("  ", 3);
        let errors = contract.validate(&project).unwrap_err();
        assert!(errors.has_error("name"));
    }

    #[test]
    fn test_overlong_name_rejected() {
        let contract = CreateProjectContract;
        let project = Project::new("O".repeat(300), 3);
        let errors = contract.validate(&project).unwrap_err();
        assert!(errors.has_error("name"));
    }

    #[test]
    fn test_overlong_client_name_rejected() {
        let contract = CreateProjectContract;
        let mut project = Project::new("Obra Litoral", 3);
        project.client_name = Some("C".repeat(300));
        let errors = contract.validate(&project).unwrap_err();
        assert!(errors.has_error("client_name"));
    }

    #[test]
    fn test_missing_manager_rejected() {
        let contract = CreateProjectContract;
        let project = Project::new("Obra", 0);
        let errors = contract.validate(&project).unwrap_err();
        assert!(errors.has_error("manager_id"));
    }

    #[test]
    fn test_role_not_writable() {
        let contract = CreateProjectContract;
        assert!(contract.is_writable("name"));
        assert!(!contract.is_writable("created_at"));
    }
}
