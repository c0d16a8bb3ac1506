//! Drilling team repository
//!
//! Membership lives in team_members; the leader is a column on the team row
//! and must also appear in the membership table (enforced upstream). The
//! denormalized users.team_id column is kept in sync inside the same
//! transaction as every membership write.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use es_core::traits::Id;
use es_models::team::DrillingTeam;

use crate::repository::{Pagination, RepositoryError, RepositoryResult};

#[derive(Debug, Clone, FromRow)]
struct TeamRow {
    id: i64,
    name: String,
    leader_id: Option<i64>,
    active: bool,
    created_at: DateTime<Utc>,
}

impl TeamRow {
    fn into_model(self, member_ids: Vec<Id>) -> DrillingTeam {
        DrillingTeam {
            id: Some(self.id),
            name: self.name,
            leader_id: self.leader_id,
            member_ids,
            active: self.active,
            created_at: Some(self.created_at),
        }
    }
}

/// Drilling team repository implementation
pub struct TeamRepository {
    pool: PgPool,
}

impl TeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<DrillingTeam>> {
        let row = sqlx::query_as::<_, TeamRow>(
            "SELECT id, name, leader_id, active, created_at FROM drilling_teams WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let members = self.member_ids(row.id).await?;
                Ok(Some(row.into_model(members)))
            }
            None => Ok(None),
        }
    }

    pub async fn find_all(&self, pagination: Pagination) -> RepositoryResult<Vec<DrillingTeam>> {
        let rows = sqlx::query_as::<_, TeamRow>(
            "SELECT id, name, leader_id, active, created_at FROM drilling_teams \
             WHERE active ORDER BY name LIMIT $1 OFFSET $2",
        )
        .bind(pagination.limit)
        .bind(pagination.offset)
        .fetch_all(&self.pool)
        .await?;

        let mut teams = Vec::with_capacity(rows.len());
        for row in rows {
            let members = self.member_ids(row.id).await?;
            teams.push(row.into_model(members));
        }
        Ok(teams)
    }

    /// Persist a team and its membership in one transaction.
    pub async fn create(&self, team: &DrillingTeam) -> RepositoryResult<DrillingTeam> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, TeamRow>(
            r#"
            INSERT INTO drilling_teams (name, leader_id, active)
            VALUES ($1, $2, $3)
            RETURNING id, name, leader_id, active, created_at
            "#,
        )
        .bind(&team.name)
        .bind(team.leader_id)
        .bind(team.active)
        .fetch_one(&mut *tx)
        .await?;

        for member_id in &team.member_ids {
            sqlx::query("INSERT INTO team_members (team_id, user_id) VALUES ($1, $2)")
                .bind(row.id)
                .bind(member_id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("UPDATE users SET team_id = $1 WHERE id = ANY($2)")
            .bind(row.id)
            .bind(&team.member_ids)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row.into_model(team.member_ids.clone()))
    }

    /// Replace the membership set and leader of a team.
    pub async fn update_members(
        &self,
        team_id: Id,
        leader_id: Option<Id>,
        member_ids: &[Id],
    ) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE drilling_teams SET leader_id = $2 WHERE id = $1")
            .bind(team_id)
            .bind(leader_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("DrillingTeam", "id", team_id));
        }

        sqlx::query("DELETE FROM team_members WHERE team_id = $1")
            .bind(team_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE users SET team_id = NULL WHERE team_id = $1")
            .bind(team_id)
            .execute(&mut *tx)
            .await?;

        for member_id in member_ids {
            sqlx::query("INSERT INTO team_members (team_id, user_id) VALUES ($1, $2)")
                .bind(team_id)
                .bind(member_id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("UPDATE users SET team_id = $1 WHERE id = ANY($2)")
            .bind(team_id)
            .bind(member_ids)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn member_ids(&self, team_id: Id) -> RepositoryResult<Vec<Id>> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT user_id FROM team_members WHERE team_id = $1 ORDER BY user_id",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }
}
