//! Persistence interfaces for the service layer
//!
//! Services talk to these traits; production wires them to the SQLx
//! repositories, tests use the in-memory implementations below. The memory
//! task store enforces the collaborator cap under its write lock, the same
//! guarantee the conditional insert gives in Postgres.

use async_trait::async_trait;
use tokio::sync::RwLock;

use es_core::error::{EsError, InvariantRule};
use es_core::result::EsResult;
use es_core::traits::Id;
use es_models::project::{Project, UpdateProjectDto};
use es_models::task::{Task, TaskStatus, MAX_COLLABORATORS};
use es_models::team::DrillingTeam;
use es_models::user::User;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, id: Id) -> EsResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> EsResult<Option<User>>;

    async fn insert_user(&self, user: &User) -> EsResult<User>;
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn find_project(&self, id: Id) -> EsResult<Option<Project>>;

    async fn list_projects(&self) -> EsResult<Vec<Project>>;

    async fn insert_project(&self, project: &Project) -> EsResult<Project>;

    async fn update_project(&self, id: Id, changes: &UpdateProjectDto) -> EsResult<Project>;

    async fn deactivate_project(&self, id: Id) -> EsResult<()>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn find_task(&self, id: Id) -> EsResult<Option<Task>>;

    async fn list_tasks_for_project(&self, project_id: Id) -> EsResult<Vec<Task>>;

    async fn insert_task(&self, task: &Task) -> EsResult<Task>;

    /// Must re-verify the collaborator cap atomically with the write.
    async fn add_collaborator(&self, task_id: Id, user_id: Id) -> EsResult<()>;

    async fn remove_collaborator(&self, task_id: Id, user_id: Id) -> EsResult<()>;

    async fn set_task_status(&self, task_id: Id, status: TaskStatus) -> EsResult<()>;
}

#[async_trait]
pub trait TeamStore: Send + Sync {
    async fn find_team(&self, id: Id) -> EsResult<Option<DrillingTeam>>;

    async fn list_teams(&self) -> EsResult<Vec<DrillingTeam>>;

    async fn insert_team(&self, team: &DrillingTeam) -> EsResult<DrillingTeam>;

    async fn update_team_members(
        &self,
        team_id: Id,
        leader_id: Option<Id>,
        member_ids: &[Id],
    ) -> EsResult<()>;
}

fn next_id(counter: &std::sync::atomic::AtomicI64) -> Id {
    counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// In-memory user store for testing
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
    next_id: std::sync::atomic::AtomicI64,
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
            next_id: std::sync::atomic::AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_user(&self, id: Id) -> EsResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == Some(id)).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> EsResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn insert_user(&self, user: &User) -> EsResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == user.username) {
            let mut errors = es_core::error::ValidationErrors::new();
            errors.add("username", "is already taken");
            return Err(errors.into());
        }

        let mut stored = user.clone();
        stored.id = Some(next_id(&self.next_id));
        stored.created_at = Some(chrono::Utc::now());
        users.push(stored.clone());
        Ok(stored)
    }
}

/// In-memory project store for testing
pub struct MemoryProjectStore {
    projects: RwLock<Vec<Project>>,
    next_id: std::sync::atomic::AtomicI64,
}

impl Default for MemoryProjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self {
            projects: RwLock::new(Vec::new()),
            next_id: std::sync::atomic::AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn find_project(&self, id: Id) -> EsResult<Option<Project>> {
        let projects = self.projects.read().await;
        Ok(projects.iter().find(|p| p.id == Some(id)).cloned())
    }

    async fn list_projects(&self) -> EsResult<Vec<Project>> {
        let projects = self.projects.read().await;
        Ok(projects.iter().filter(|p| p.active).cloned().collect())
    }

    async fn insert_project(&self, project: &Project) -> EsResult<Project> {
        let mut projects = self.projects.write().await;
        let mut stored = project.clone();
        stored.id = Some(next_id(&self.next_id));
        stored.created_at = Some(chrono::Utc::now());
        projects.push(stored.clone());
        Ok(stored)
    }

    async fn update_project(&self, id: Id, changes: &UpdateProjectDto) -> EsResult<Project> {
        let mut projects = self.projects.write().await;
        let project = projects
            .iter_mut()
            .find(|p| p.id == Some(id))
            .ok_or_else(|| EsError::not_found("Project", "id", id))?;

        if let Some(name) = &changes.name {
            project.name = name.clone();
        }
        if let Some(client) = &changes.client_name {
            project.client_name = Some(client.clone());
        }
        if let Some(status) = changes.status {
            project.status = status;
        }
        if let Some(manager_id) = changes.manager_id {
            project.manager_id = manager_id;
        }

        Ok(project.clone())
    }

    async fn deactivate_project(&self, id: Id) -> EsResult<()> {
        let mut projects = self.projects.write().await;
        let project = projects
            .iter_mut()
            .find(|p| p.id == Some(id))
            .ok_or_else(|| EsError::not_found("Project", "id", id))?;
        project.active = false;
        Ok(())
    }
}

/// In-memory task store for testing
pub struct MemoryTaskStore {
    tasks: RwLock<Vec<Task>>,
    next_id: std::sync::atomic::AtomicI64,
}

impl Default for MemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self {
            tasks: RwLock::new(Vec::new()),
            next_id: std::sync::atomic::AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn find_task(&self, id: Id) -> EsResult<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.iter().find(|t| t.id == Some(id)).cloned())
    }

    async fn list_tasks_for_project(&self, project_id: Id) -> EsResult<Vec<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks
            .iter()
            .filter(|t| t.project_id == project_id && t.active)
            .cloned()
            .collect())
    }

    async fn insert_task(&self, task: &Task) -> EsResult<Task> {
        if task.collaborator_ids.len() > MAX_COLLABORATORS {
            return Err(EsError::invariant(
                InvariantRule::CollaboratorLimit,
                "initial collaborator set exceeds the cap",
            ));
        }

        let mut tasks = self.tasks.write().await;
        let mut stored = task.clone();
        stored.id = Some(next_id(&self.next_id));
        stored.created_at = Some(chrono::Utc::now());
        tasks.push(stored.clone());
        Ok(stored)
    }

    async fn add_collaborator(&self, task_id: Id, user_id: Id) -> EsResult<()> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == Some(task_id))
            .ok_or_else(|| EsError::not_found("Task", "id", task_id))?;

        if task.collaborator_ids.contains(&user_id) {
            return Ok(());
        }
        if !task.has_collaborator_slot() {
            return Err(EsError::invariant(
                InvariantRule::CollaboratorLimit,
                format!(
                    "task {} already has the maximum number of collaborators",
                    task_id
                ),
            ));
        }

        task.collaborator_ids.push(user_id);
        Ok(())
    }

    async fn remove_collaborator(&self, task_id: Id, user_id: Id) -> EsResult<()> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == Some(task_id))
            .ok_or_else(|| EsError::not_found("Task", "id", task_id))?;

        let before = task.collaborator_ids.len();
        task.collaborator_ids.retain(|id| *id != user_id);
        if task.collaborator_ids.len() == before {
            return Err(EsError::not_found("TaskCollaborator", "user_id", user_id));
        }
        Ok(())
    }

    async fn set_task_status(&self, task_id: Id, status: TaskStatus) -> EsResult<()> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == Some(task_id))
            .ok_or_else(|| EsError::not_found("Task", "id", task_id))?;
        task.status = status;
        Ok(())
    }
}

/// In-memory team store for testing
pub struct MemoryTeamStore {
    teams: RwLock<Vec<DrillingTeam>>,
    next_id: std::sync::atomic::AtomicI64,
}

impl Default for MemoryTeamStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTeamStore {
    pub fn new() -> Self {
        Self {
            teams: RwLock::new(Vec::new()),
            next_id: std::sync::atomic::AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl TeamStore for MemoryTeamStore {
    async fn find_team(&self, id: Id) -> EsResult<Option<DrillingTeam>> {
        let teams = self.teams.read().await;
        Ok(teams.iter().find(|t| t.id == Some(id)).cloned())
    }

    async fn list_teams(&self) -> EsResult<Vec<DrillingTeam>> {
        let teams = self.teams.read().await;
        Ok(teams.iter().filter(|t| t.active).cloned().collect())
    }

    async fn insert_team(&self, team: &DrillingTeam) -> EsResult<DrillingTeam> {
        let mut teams = self.teams.write().await;
        let mut stored = team.clone();
        stored.id = Some(next_id(&self.next_id));
        stored.created_at = Some(chrono::Utc::now());
        teams.push(stored.clone());
        Ok(stored)
    }

    async fn update_team_members(
        &self,
        team_id: Id,
        leader_id: Option<Id>,
        member_ids: &[Id],
    ) -> EsResult<()> {
        let mut teams = self.teams.write().await;
        let team = teams
            .iter_mut()
            .find(|t| t.id == Some(team_id))
            .ok_or_else(|| EsError::not_found("DrillingTeam", "id", team_id))?;
        team.leader_id = leader_id;
        team.member_ids = member_ids.to_vec();
        Ok(())
    }
}
