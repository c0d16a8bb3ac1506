//! Authentication handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use es_core::error::EsError;
use es_models::role::Role;
use es_models::user::{NewUser, User};

use crate::error::ApiResult;
use crate::extractors::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub user: User,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .users
        .authenticate(&request.username, &request.password)
        .await?;

    let user_id = user
        .id
        .ok_or_else(|| EsError::Internal("authenticated user has no id".into()))?;

    let token = state
        .tokens
        .issue(
            user_id,
            &user.username,
            user.role,
            state.token_expiration_seconds,
        )
        .map_err(|e| EsError::Internal(e.to_string()))?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer",
        expires_in: state.token_expiration_seconds,
        user,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub full_name: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: Role,
    pub team_id: Option<i64>,
}

fn default_role() -> Role {
    Role::AuxiliarTecnico
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let new_user = NewUser {
        username: request.username,
        full_name: request.full_name,
        role: request.role,
        team_id: request.team_id,
    };

    let user = state.users.register(new_user, &request.password).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_defaults_to_lowest_role() {
        let request: RegisterRequest = serde_json::from_str(
            r#"{"username":"campo1","fullName":"Pessoa de Campo","password":"senha-segura"}"#,
        )
        .unwrap();
        assert_eq!(request.role, Role::AuxiliarTecnico);
    }

    #[test]
    fn test_register_accepts_role_name() {
        let request: RegisterRequest = serde_json::from_str(
            r#"{"username":"rh1","fullName":"RH","password":"senha-segura","role":"RH"}"#,
        )
        .unwrap();
        assert_eq!(request.role, Role::Rh);
    }
}
