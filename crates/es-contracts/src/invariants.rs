//! Structural business-rule checks
//!
//! Each check maps to one `InvariantRule`. Services run these before handing
//! a write to the repository; the task-collaborator cap is additionally
//! re-verified inside the repository's conditional insert.

use es_core::error::{EsError, InvariantRule};
use es_core::result::EsResult;
use es_core::traits::Id;
use es_models::task::MAX_COLLABORATORS;
use es_models::team::DrillingTeam;
use es_models::role::Role;

/// A project manager must hold LIDER_PROJETOS or a higher role.
pub fn check_manager_eligibility(manager_role: Role) -> EsResult<()> {
    if manager_role.at_least(Role::LiderProjetos) {
        Ok(())
    } else {
        Err(EsError::invariant(
            InvariantRule::ManagerEligibility,
            format!(
                "manager role {} is below {}",
                manager_role,
                Role::LiderProjetos
            ),
        ))
    }
}

/// A task may have at most [`MAX_COLLABORATORS`] collaborators.
pub fn check_collaborator_cap(current: usize, adding: usize) -> EsResult<()> {
    if current + adding <= MAX_COLLABORATORS {
        Ok(())
    } else {
        Err(EsError::invariant(
            InvariantRule::CollaboratorLimit,
            format!(
                "task already has {} of {} collaborators",
                current, MAX_COLLABORATORS
            ),
        ))
    }
}

/// A team leader, if designated, must also be a team member.
pub fn check_leader_membership(team: &DrillingTeam) -> EsResult<()> {
    if team.leader_is_member() {
        Ok(())
    } else {
        Err(EsError::invariant(
            InvariantRule::LeaderMembership,
            format!("leader {:?} is not a member of team {}", team.leader_id, team.name),
        ))
    }
}

/// A user belongs to at most one drilling team.
///
/// `own_team_id` excludes the team being rewritten so reassigning its own
/// members does not trip the check.
pub fn check_single_team_membership(
    member_ids: &[Id],
    own_team_id: Option<Id>,
    existing_teams: &[DrillingTeam],
) -> EsResult<()> {
    for team in existing_teams.iter().filter(|t| t.active) {
        if own_team_id.is_some() && team.id == own_team_id {
            continue;
        }
        if let Some(member) = member_ids.iter().find(|m| team.member_ids.contains(m)) {
            return Err(EsError::invariant(
                InvariantRule::SingleTeamMembership,
                format!("user {} already belongs to team {}", member, team.name),
            ));
        }
    }
    Ok(())
}
