//! Application state and axum extractors

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Query},
    http::request::Parts,
};

use es_auth::jwt::{extract_bearer_token, TokenService};
use es_auth::policy::AccessPolicy;
use es_auth::principal::Principal;
use es_bulletins::{BulletinRegistry, BulletinService, LocalDocumentStorage};
use es_core::config::AppConfig;
use es_core::error::EsError;
use es_db::{
    BulletinRepository, Database, ProjectRepository, TaskRepository, TeamRepository,
    UserRepository,
};
use es_services::{ProjectService, TaskService, TeamService, UserService};

use crate::adapters::{
    SqlBulletinStore, SqlProjectDirectory, SqlProjectStore, SqlTaskStore, SqlTeamStore,
    SqlUserStore,
};
use crate::error::ApiError;

pub type Users = UserService<SqlUserStore>;
pub type Projects = ProjectService<SqlProjectStore, SqlUserStore>;
pub type Tasks = TaskService<SqlTaskStore, SqlProjectStore, SqlUserStore>;
pub type Teams = TeamService<SqlTeamStore, SqlUserStore>;
pub type Bulletins = BulletinService<SqlBulletinStore, SqlProjectDirectory, LocalDocumentStorage>;

/// Shared application state: services, token service, and the route policy.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<Users>,
    pub projects: Arc<Projects>,
    pub tasks: Arc<Tasks>,
    pub teams: Arc<Teams>,
    pub bulletins: Arc<Bulletins>,
    pub registry: Arc<BulletinRegistry>,
    pub tokens: Arc<TokenService>,
    pub policy: Arc<AccessPolicy>,
    pub token_expiration_seconds: u64,
}

impl AppState {
    /// Wire every service to the database pool.
    pub fn new(db: &Database, registry: Arc<BulletinRegistry>, config: &AppConfig) -> Self {
        let pool = db.pool().clone();

        let user_store = Arc::new(SqlUserStore::new(UserRepository::new(pool.clone())));
        let project_store = Arc::new(SqlProjectStore::new(ProjectRepository::new(pool.clone())));
        let task_store = Arc::new(SqlTaskStore::new(TaskRepository::new(pool.clone())));
        let team_store = Arc::new(SqlTeamStore::new(TeamRepository::new(pool.clone())));
        let bulletin_store = Arc::new(SqlBulletinStore::new(BulletinRepository::new(pool.clone())));
        let project_directory = Arc::new(SqlProjectDirectory::new(ProjectRepository::new(pool)));
        let storage = Arc::new(LocalDocumentStorage::new(&config.storage.document_path));

        Self {
            users: Arc::new(UserService::new(user_store.clone())),
            projects: Arc::new(ProjectService::new(project_store.clone(), user_store.clone())),
            tasks: Arc::new(TaskService::new(
                task_store,
                project_store,
                user_store.clone(),
            )),
            teams: Arc::new(TeamService::new(team_store, user_store)),
            bulletins: Arc::new(BulletinService::new(
                bulletin_store,
                project_directory,
                storage,
                registry.clone(),
            )),
            registry,
            tokens: Arc::new(TokenService::new(config.auth.jwt_secret.as_bytes())),
            policy: Arc::new(AccessPolicy::standard()),
            token_expiration_seconds: config.auth.token_expiration_seconds,
        }
    }
}

/// Authenticated caller, resolved from the bearer token.
pub struct AuthenticatedUser(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError(EsError::unauthenticated("missing bearer token")))?;

        let token = extract_bearer_token(header)
            .ok_or_else(|| ApiError(EsError::unauthenticated("missing bearer token")))?;

        let principal = app_state
            .tokens
            .resolve(token)
            .map_err(|e| ApiError(EsError::unauthenticated(e.to_string())))?;

        Ok(AuthenticatedUser(principal))
    }
}

impl std::ops::Deref for AuthenticatedUser {
    type Target = Principal;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Pagination query parameters
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_page_size() -> usize {
    20
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page_size: 20,
            offset: 0,
        }
    }
}

pub struct Pagination(pub PaginationParams);

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PaginationParams>::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|_| Query(PaginationParams::default()));
        Ok(Pagination(params))
    }
}

impl std::ops::Deref for Pagination {
    type Target = PaginationParams;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
