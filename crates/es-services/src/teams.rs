//! Drilling team services

use std::sync::Arc;

use tracing::{info, instrument};

use es_contracts::base::Contract;
use es_contracts::invariants::{check_leader_membership, check_single_team_membership};
use es_contracts::teams::TeamContract;
use es_core::error::EsError;
use es_core::result::EsResult;
use es_core::traits::Id;
use es_models::team::DrillingTeam;

use crate::stores::{TeamStore, UserStore};

pub struct TeamService<T: TeamStore, U: UserStore> {
    teams: Arc<T>,
    users: Arc<U>,
}

impl<T: TeamStore, U: UserStore> TeamService<T, U> {
    pub fn new(teams: Arc<T>, users: Arc<U>) -> Self {
        Self { teams, users }
    }

    #[instrument(skip(self, team), fields(name = %team.name))]
    pub async fn create(&self, team: DrillingTeam) -> EsResult<DrillingTeam> {
        TeamContract.validate(&team)?;
        check_leader_membership(&team)?;

        for member_id in &team.member_ids {
            self.require_user(*member_id).await?;
        }

        let existing = self.teams.list_teams().await?;
        check_single_team_membership(&team.member_ids, None, &existing)?;

        let created = self.teams.insert_team(&team).await?;
        info!(id = ?created.id, members = created.member_ids.len(), "Team created");
        Ok(created)
    }

    pub async fn get(&self, id: Id) -> EsResult<DrillingTeam> {
        self.teams
            .find_team(id)
            .await?
            .filter(|t| t.active)
            .ok_or_else(|| EsError::not_found("DrillingTeam", "id", id))
    }

    pub async fn list(&self) -> EsResult<Vec<DrillingTeam>> {
        self.teams.list_teams().await
    }

    /// Replace leader and membership together so the membership invariant is
    /// checked against the final state, not an intermediate one.
    #[instrument(skip(self, member_ids))]
    pub async fn update_members(
        &self,
        team_id: Id,
        leader_id: Option<Id>,
        member_ids: Vec<Id>,
    ) -> EsResult<DrillingTeam> {
        let mut team = self.get(team_id).await?;
        team.leader_id = leader_id;
        team.member_ids = member_ids;

        TeamContract.validate(&team)?;
        check_leader_membership(&team)?;

        for member_id in &team.member_ids {
            self.require_user(*member_id).await?;
        }

        let existing = self.teams.list_teams().await?;
        check_single_team_membership(&team.member_ids, Some(team_id), &existing)?;

        self.teams
            .update_team_members(team_id, team.leader_id, &team.member_ids)
            .await?;
        Ok(team)
    }

    async fn require_user(&self, user_id: Id) -> EsResult<()> {
        self.users
            .find_user(user_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| EsError::not_found("User", "id", user_id))
    }
}
