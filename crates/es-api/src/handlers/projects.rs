//! Project handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use es_core::traits::Id;
use es_models::project::{CreateProjectDto, UpdateProjectDto};

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser};

/// GET /api/projects
pub async fn list_projects(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let projects = state.projects.list().await?;
    Ok(Json(projects))
}

/// GET /api/projects/:id
pub async fn get_project(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let project = state.projects.get(id).await?;
    Ok(Json(project))
}

/// POST /api/projects
pub async fn create_project(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(dto): Json<CreateProjectDto>,
) -> ApiResult<impl IntoResponse> {
    tracing::info!(caller = %user.username, name = %dto.name, "Project creation requested");
    let project = state.projects.create(dto).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// PATCH /api/projects/:id
pub async fn update_project(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Id>,
    Json(changes): Json<UpdateProjectDto>,
) -> ApiResult<impl IntoResponse> {
    let project = state.projects.update(id, changes).await?;
    Ok(Json(project))
}

/// DELETE /api/projects/:id
pub async fn delete_project(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    tracing::info!(caller = %user.username, id = id, "Project deactivation requested");
    state.projects.deactivate(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
