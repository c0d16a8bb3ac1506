//! API routes and the policy gate
//!
//! Every request passes the access-policy middleware before any handler
//! runs; the policy decides on `(role, method, path)` alone.

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, put},
    Router,
};

use es_auth::jwt::extract_bearer_token;
use es_auth::policy::{AccessDecision, DenyReason};
use es_core::error::EsError;
use es_models::role::Role;

use crate::error::ApiError;
use crate::extractors::AppState;
use crate::handlers::{admin, auth, bulletins, hr, projects, tasks, teams};

/// Build the API router with the policy gate applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/auth", auth_router())
        .nest("/api/projects", projects_router())
        .nest("/api/tasks", tasks_router())
        .nest("/api/teams", teams_router())
        .nest("/api/bulletins", bulletins_router())
        .nest("/api/admin", admin_router())
        .nest("/api/hr", hr_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            enforce_policy,
        ))
        .with_state(state)
}

fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
}

fn projects_router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list_projects))
        .route("/", post(projects::create_project))
        .route("/:id", get(projects::get_project))
        .route("/:id", patch(projects::update_project))
        .route("/:id", delete(projects::delete_project))
        .route("/:id/tasks", get(tasks::list_tasks))
        .route("/:id/tasks", post(tasks::create_task))
        .route("/:id/bulletins", get(bulletins::list_for_project))
}

fn tasks_router() -> Router<AppState> {
    Router::new()
        .route("/:id", get(tasks::get_task))
        .route("/:id/status", patch(tasks::set_status))
        .route("/:id/collaborators", post(tasks::add_collaborator))
        .route(
            "/:id/collaborators/:user_id",
            delete(tasks::remove_collaborator),
        )
}

fn teams_router() -> Router<AppState> {
    Router::new()
        .route("/", get(teams::list_teams))
        .route("/", post(teams::create_team))
        .route("/:id", get(teams::get_team))
        .route("/:id/members", put(teams::update_members))
}

fn bulletins_router() -> Router<AppState> {
    Router::new()
        .route("/", post(bulletins::create_bulletin))
        .route("/:id", get(bulletins::get_bulletin))
        .route("/:id/document", get(bulletins::get_document))
}

fn admin_router() -> Router<AppState> {
    Router::new().route("/bulletin-types", get(admin::list_bulletin_types))
}

fn hr_router() -> Router<AppState> {
    Router::new().route("/users/:id", get(hr::get_user))
}

/// Resolve the caller role (if any) and evaluate the route policy.
///
/// A malformed or expired token counts as no caller; whether that denies
/// the request is the policy's call, so public routes stay reachable with a
/// stale token.
async fn enforce_policy(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let role = caller_role(&state, &request);
    let method = request.method().as_str().to_string();
    let path = request.uri().path().to_string();

    match state.policy.authorize(role, &method, &path) {
        AccessDecision::Allow => next.run(request).await,
        AccessDecision::Deny(DenyReason::Unauthenticated) => {
            ApiError(EsError::unauthenticated("authentication required")).into_response()
        }
        AccessDecision::Deny(DenyReason::Forbidden) => {
            tracing::debug!(method = %method, path = %path, "Role rejected by route policy");
            ApiError(EsError::forbidden("insufficient role for this route")).into_response()
        }
    }
}

fn caller_role(state: &AppState, request: &Request) -> Option<Role> {
    let header = request.headers().get("authorization")?.to_str().ok()?;
    let token = extract_bearer_token(header)?;
    state.tokens.resolve(token).ok().map(|p| p.role)
}
