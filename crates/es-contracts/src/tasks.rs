//! Task contracts

use es_core::error::ValidationErrors;
use es_models::task::{Task, MAX_COLLABORATORS};

use crate::base::{run_derived_rules, validate_presence, Contract, ValidationResult};

/// Contract for creating a task.
pub struct CreateTaskContract;

impl Contract<Task> for CreateTaskContract {
    fn validate(&self, task: &Task) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        validate_presence("title", &task.title, &mut errors);
        run_derived_rules(task, &mut errors);

        if task.main_responsible_id <= 0 {
            errors.add("main_responsible_id", "must reference a user");
        }

        if task.collaborator_ids.len() > MAX_COLLABORATORS {
            errors.add(
                "collaborator_ids",
                format!("may contain at most {} users", MAX_COLLABORATORS),
            );
        }

        let mut seen = std::collections::HashSet::new();
        for id in &task.collaborator_ids {
            if !seen.insert(id) {
                errors.add("collaborator_ids", "contains duplicate users");
                break;
            }
        }

        if task
            .collaborator_ids
            .contains(&task.main_responsible_id)
        {
            errors.add(
                "collaborator_ids",
                "must not include the main responsible",
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn is_writable(&self, attribute: &str) -> bool {
        matches!(
            attribute,
            "title" | "description" | "status" | "main_responsible_id" | "collaborator_ids"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_task() {
        let contract = CreateTaskContract;
        let mut task = Task::new("Furo SP-01", 1, 2);
        task.collaborator_ids = vec![3, 4];
        assert!(contract.validate(&task).is_ok());
    }

    #[test]
    fn test_overlong_title_rejected() {
        let contract = CreateTaskContract;
        let task = Task::new("F".repeat(300), 1, 2);
        let errors = contract.validate(&task).unwrap_err();
        assert!(errors.has_error("title"));
    }

    #[test]
    fn test_over_cap_rejected() {
        let contract = CreateTaskContract;
        let mut task = Task::new("Furo SP-02", 1, 2);
        task.collaborator_ids = vec![3, 4, 5];
        let errors = contract.validate(&task).unwrap_err();
        assert!(errors.has_error("collaborator_ids"));
    }

    #[test]
    fn test_duplicate_collaborators_rejected() {
        let contract = CreateTaskContract;
        let mut task = Task::new("Furo SP-03", 1, 2);
        task.collaborator_ids = vec![3, 3];
        let errors = contract.validate(&task).unwrap_err();
        assert!(errors.has_error("collaborator_ids"));
    }

    #[test]
    fn test_responsible_cannot_collaborate() {
        let contract = CreateTaskContract;
        let mut task = Task::new("Furo SP-04", 1, 2);
        task.collaborator_ids = vec![2];
        let errors = contract.validate(&task).unwrap_err();
        assert!(errors.has_error("collaborator_ids"));
    }
}
