//! Administration handlers
//!
//! Everything under /api/admin is gated to ADMIN by the route policy.

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletinTypesResponse {
    pub types: Vec<&'static str>,
}

/// GET /api/admin/bulletin-types
pub async fn list_bulletin_types(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(BulletinTypesResponse {
        types: state.registry.known_tags(),
    }))
}
