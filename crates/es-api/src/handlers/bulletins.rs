//! Bulletin handlers
//!
//! The document endpoint triggers the lazy render: the first GET produces
//! and stores the file, later GETs serve it unchanged.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use es_core::traits::Id;
use es_models::bulletin::CreateBulletinRequest;

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser};

/// POST /api/bulletins
pub async fn create_bulletin(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateBulletinRequest>,
) -> ApiResult<impl IntoResponse> {
    let bulletin = state.bulletins.create_bulletin(request, user.id).await?;
    Ok((StatusCode::CREATED, Json(bulletin)))
}

/// GET /api/bulletins/:id
pub async fn get_bulletin(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let bulletin = state.bulletins.get_bulletin(id).await?;
    Ok(Json(bulletin))
}

/// GET /api/projects/:id/bulletins
pub async fn list_for_project(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(project_id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let bulletins = state.bulletins.list_for_project(project_id).await?;
    Ok(Json(bulletins))
}

/// GET /api/bulletins/:id/document
pub async fn get_document(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let (bulletin, data) = state.bulletins.get_bulletin_document(id).await?;

    let filename = format!(
        "{}-{}.txt",
        bulletin.bulletin_type().to_lowercase(),
        id
    );

    Ok((
        [
            (
                header::CONTENT_TYPE,
                es_bulletins::content_type_for(&filename),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        data,
    ))
}
