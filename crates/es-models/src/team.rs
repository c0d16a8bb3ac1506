//! Drilling team model
//!
//! Table: drilling_teams

use chrono::{DateTime, Utc};
use es_core::traits::{Activatable, Entity, Id, Identifiable, Timestamped};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Field crew operating drilling equipment.
///
/// References users but does not own them. A leader, if designated, must also
/// appear among the members; the contract layer enforces that before writes.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DrillingTeam {
    pub id: Option<Id>,

    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Designated leader, at most one
    pub leader_id: Option<Id>,

    /// Member user ids
    pub member_ids: Vec<Id>,

    pub active: bool,

    pub created_at: Option<DateTime<Utc>>,
}

impl DrillingTeam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            leader_id: None,
            member_ids: Vec::new(),
            active: true,
            created_at: None,
        }
    }

    /// Structural check: a leader must be one of the members.
    pub fn leader_is_member(&self) -> bool {
        match self.leader_id {
            Some(leader) => self.member_ids.contains(&leader),
            None => true,
        }
    }
}

impl Identifiable for DrillingTeam {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Timestamped for DrillingTeam {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

impl Activatable for DrillingTeam {
    fn is_active(&self) -> bool {
        self.active
    }
}

impl Entity for DrillingTeam {
    const TABLE_NAME: &'static str = "drilling_teams";
    const TYPE_NAME: &'static str = "DrillingTeam";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leader_must_be_member() {
        let mut team = DrillingTeam::new("Sondagem Norte");
        assert!(team.leader_is_member());

        team.leader_id = Some(7);
        assert!(!team.leader_is_member());

        team.member_ids.push(7);
        assert!(team.leader_is_member());
    }
}
