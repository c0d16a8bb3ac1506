//! Task handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use es_core::traits::Id;
use es_models::task::{CreateTaskDto, TaskStatus};

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser};

/// GET /api/projects/:id/tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(project_id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let tasks = state.tasks.list_for_project(project_id).await?;
    Ok(Json(tasks))
}

/// POST /api/projects/:id/tasks
pub async fn create_task(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(project_id): Path<Id>,
    Json(dto): Json<CreateTaskDto>,
) -> ApiResult<impl IntoResponse> {
    let task = state.tasks.create(project_id, dto).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /api/tasks/:id
pub async fn get_task(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let task = state.tasks.get(id).await?;
    Ok(Json(task))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCollaboratorRequest {
    pub user_id: Id,
}

/// POST /api/tasks/:id/collaborators
pub async fn add_collaborator(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(task_id): Path<Id>,
    Json(request): Json<AddCollaboratorRequest>,
) -> ApiResult<impl IntoResponse> {
    state
        .tasks
        .add_collaborator(task_id, request.user_id)
        .await?;
    let task = state.tasks.get(task_id).await?;
    Ok(Json(task))
}

/// DELETE /api/tasks/:id/collaborators/:user_id
pub async fn remove_collaborator(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path((task_id, user_id)): Path<(Id, Id)>,
) -> ApiResult<impl IntoResponse> {
    state.tasks.remove_collaborator(task_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: TaskStatus,
}

/// PATCH /api/tasks/:id/status
pub async fn set_status(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(task_id): Path<Id>,
    Json(request): Json<SetStatusRequest>,
) -> ApiResult<impl IntoResponse> {
    state.tasks.set_status(task_id, request.status).await?;
    let task = state.tasks.get(task_id).await?;
    Ok(Json(task))
}
