//! Team contracts

use es_core::error::ValidationErrors;
use es_models::team::DrillingTeam;

use crate::base::{run_derived_rules, validate_presence, Contract, ValidationResult};

/// Contract for creating or updating a drilling team.
pub struct TeamContract;

impl Contract<DrillingTeam> for TeamContract {
    fn validate(&self, team: &DrillingTeam) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        validate_presence("name", &team.name, &mut errors);
        run_derived_rules(team, &mut errors);

        let mut seen = std::collections::HashSet::new();
        for id in &team.member_ids {
            if !seen.insert(id) {
                errors.add("member_ids", "contains duplicate users");
                break;
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn is_writable(&self, attribute: &str) -> bool {
        matches!(attribute, "name" | "leader_id" | "member_ids")
    }
}
