//! Human resources handlers
//!
//! Everything under /api/hr is gated to RH, DIRETOR, or ADMIN by the route
//! policy.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

use es_core::traits::Id;

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser};

/// GET /api/hr/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let user = state.users.get(id).await?;
    Ok(Json(user))
}
