//! SQLx-backed store adapters
//!
//! Bridges the service-layer store traits onto the repositories in `es-db`.
//! Repository errors convert into core errors here; the collaborator-cap
//! rejection from the conditional insert surfaces as an invariant violation.

use async_trait::async_trait;

use es_bulletins::service::{BulletinStore, ProjectDirectory};
use es_core::result::EsResult;
use es_core::traits::Id;
use es_db::{
    BulletinRepository, Pagination, ProjectRepository, TaskRepository, TeamRepository,
    UserRepository,
};
use es_models::bulletin::Bulletin;
use es_models::project::{Project, UpdateProjectDto};
use es_models::task::{Task, TaskStatus};
use es_models::team::DrillingTeam;
use es_models::user::User;
use es_services::stores::{ProjectStore, TaskStore, TeamStore, UserStore};

const LIST_PAGE: Pagination = Pagination {
    limit: 200,
    offset: 0,
};

pub struct SqlUserStore {
    repo: UserRepository,
}

impl SqlUserStore {
    pub fn new(repo: UserRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserStore for SqlUserStore {
    async fn find_user(&self, id: Id) -> EsResult<Option<User>> {
        Ok(self.repo.find_by_id(id).await?)
    }

    async fn find_user_by_username(&self, username: &str) -> EsResult<Option<User>> {
        Ok(self.repo.find_by_username(username).await?)
    }

    async fn insert_user(&self, user: &User) -> EsResult<User> {
        Ok(self.repo.create(user).await?)
    }
}

pub struct SqlProjectStore {
    repo: ProjectRepository,
}

impl SqlProjectStore {
    pub fn new(repo: ProjectRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl ProjectStore for SqlProjectStore {
    async fn find_project(&self, id: Id) -> EsResult<Option<Project>> {
        Ok(self.repo.find_by_id(id).await?)
    }

    async fn list_projects(&self) -> EsResult<Vec<Project>> {
        Ok(self.repo.find_all(LIST_PAGE).await?)
    }

    async fn insert_project(&self, project: &Project) -> EsResult<Project> {
        Ok(self.repo.create(project).await?)
    }

    async fn update_project(&self, id: Id, changes: &UpdateProjectDto) -> EsResult<Project> {
        Ok(self.repo.update(id, changes).await?)
    }

    async fn deactivate_project(&self, id: Id) -> EsResult<()> {
        Ok(self.repo.deactivate(id).await?)
    }
}

pub struct SqlTaskStore {
    repo: TaskRepository,
}

impl SqlTaskStore {
    pub fn new(repo: TaskRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl TaskStore for SqlTaskStore {
    async fn find_task(&self, id: Id) -> EsResult<Option<Task>> {
        Ok(self.repo.find_by_id(id).await?)
    }

    async fn list_tasks_for_project(&self, project_id: Id) -> EsResult<Vec<Task>> {
        Ok(self.repo.find_by_project(project_id, LIST_PAGE).await?)
    }

    async fn insert_task(&self, task: &Task) -> EsResult<Task> {
        Ok(self.repo.create(task).await?)
    }

    async fn add_collaborator(&self, task_id: Id, user_id: Id) -> EsResult<()> {
        Ok(self.repo.add_collaborator(task_id, user_id).await?)
    }

    async fn remove_collaborator(&self, task_id: Id, user_id: Id) -> EsResult<()> {
        Ok(self.repo.remove_collaborator(task_id, user_id).await?)
    }

    async fn set_task_status(&self, task_id: Id, status: TaskStatus) -> EsResult<()> {
        Ok(self.repo.update_status(task_id, status).await?)
    }
}

pub struct SqlTeamStore {
    repo: TeamRepository,
}

impl SqlTeamStore {
    pub fn new(repo: TeamRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl TeamStore for SqlTeamStore {
    async fn find_team(&self, id: Id) -> EsResult<Option<DrillingTeam>> {
        Ok(self.repo.find_by_id(id).await?)
    }

    async fn list_teams(&self) -> EsResult<Vec<DrillingTeam>> {
        Ok(self.repo.find_all(LIST_PAGE).await?)
    }

    async fn insert_team(&self, team: &DrillingTeam) -> EsResult<DrillingTeam> {
        Ok(self.repo.create(team).await?)
    }

    async fn update_team_members(
        &self,
        team_id: Id,
        leader_id: Option<Id>,
        member_ids: &[Id],
    ) -> EsResult<()> {
        Ok(self
            .repo
            .update_members(team_id, leader_id, member_ids)
            .await?)
    }
}

pub struct SqlBulletinStore {
    repo: BulletinRepository,
}

impl SqlBulletinStore {
    pub fn new(repo: BulletinRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl BulletinStore for SqlBulletinStore {
    async fn create(&self, bulletin: &mut Bulletin) -> EsResult<Id> {
        let created = self.repo.create(bulletin).await?;
        bulletin.id = created.id;
        bulletin.created_at = created.created_at;
        created
            .id
            .ok_or_else(|| es_core::error::EsError::Internal("insert returned no id".into()))
    }

    async fn get(&self, id: Id) -> EsResult<Option<Bulletin>> {
        Ok(self.repo.find_by_id(id).await?)
    }

    async fn list_for_project(&self, project_id: Id) -> EsResult<Vec<Bulletin>> {
        Ok(self.repo.find_by_project(project_id, LIST_PAGE).await?)
    }

    async fn set_document_path(&self, id: Id, path: &str) -> EsResult<String> {
        Ok(self.repo.set_document_path(id, path).await?)
    }
}

/// Project lookup for the bulletin pipeline, backed by the same table the
/// project store uses.
pub struct SqlProjectDirectory {
    repo: ProjectRepository,
}

impl SqlProjectDirectory {
    pub fn new(repo: ProjectRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl ProjectDirectory for SqlProjectDirectory {
    async fn find_project(&self, id: Id) -> EsResult<Option<Project>> {
        Ok(self.repo.find_by_id(id).await?)
    }
}
