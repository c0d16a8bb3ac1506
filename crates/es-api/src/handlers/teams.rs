//! Drilling team handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use es_core::traits::Id;
use es_models::team::DrillingTeam;

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    pub name: String,
    pub leader_id: Option<Id>,
    #[serde(default)]
    pub member_ids: Vec<Id>,
}

/// GET /api/teams
pub async fn list_teams(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let teams = state.teams.list().await?;
    Ok(Json(teams))
}

/// GET /api/teams/:id
pub async fn get_team(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let team = state.teams.get(id).await?;
    Ok(Json(team))
}

/// POST /api/teams
pub async fn create_team(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(request): Json<CreateTeamRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut team = DrillingTeam::new(request.name);
    team.leader_id = request.leader_id;
    team.member_ids = request.member_ids;

    let created = state.teams.create(team).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMembersRequest {
    pub leader_id: Option<Id>,
    #[serde(default)]
    pub member_ids: Vec<Id>,
}

/// PUT /api/teams/:id/members
pub async fn update_members(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Id>,
    Json(request): Json<UpdateMembersRequest>,
) -> ApiResult<impl IntoResponse> {
    let team = state
        .teams
        .update_members(id, request.leader_id, request.member_ids)
        .await?;
    Ok(Json(team))
}
