//! Task services
//!
//! The collaborator cap is checked twice on purpose: once here against the
//! loaded task, and once atomically in the store at the write boundary. The
//! first gives a clean error early; the second closes the race.

use std::sync::Arc;

use tracing::{info, instrument};

use es_contracts::base::Contract;
use es_contracts::invariants::check_collaborator_cap;
use es_contracts::tasks::CreateTaskContract;
use es_core::error::EsError;
use es_core::result::EsResult;
use es_core::traits::Id;
use es_models::task::{CreateTaskDto, Task, TaskStatus};

use crate::stores::{ProjectStore, TaskStore, UserStore};

pub struct TaskService<T: TaskStore, P: ProjectStore, U: UserStore> {
    tasks: Arc<T>,
    projects: Arc<P>,
    users: Arc<U>,
}

impl<T: TaskStore, P: ProjectStore, U: UserStore> TaskService<T, P, U> {
    pub fn new(tasks: Arc<T>, projects: Arc<P>, users: Arc<U>) -> Self {
        Self {
            tasks,
            projects,
            users,
        }
    }

    #[instrument(skip(self, dto), fields(title = %dto.title, project_id = project_id))]
    pub async fn create(&self, project_id: Id, dto: CreateTaskDto) -> EsResult<Task> {
        let project = self
            .projects
            .find_project(project_id)
            .await?
            .filter(|p| p.active)
            .ok_or_else(|| EsError::not_found("Project", "id", project_id))?;

        let mut task = Task::new(dto.title, project.id.unwrap_or(project_id), dto.main_responsible_id);
        task.description = dto.description;
        task.collaborator_ids = dto.collaborator_ids;

        CreateTaskContract.validate(&task)?;

        self.require_user(task.main_responsible_id).await?;
        for user_id in &task.collaborator_ids {
            self.require_user(*user_id).await?;
        }

        let created = self.tasks.insert_task(&task).await?;
        info!(id = ?created.id, "Task created");
        Ok(created)
    }

    pub async fn get(&self, id: Id) -> EsResult<Task> {
        self.tasks
            .find_task(id)
            .await?
            .filter(|t| t.active)
            .ok_or_else(|| EsError::not_found("Task", "id", id))
    }

    pub async fn list_for_project(&self, project_id: Id) -> EsResult<Vec<Task>> {
        self.tasks.list_tasks_for_project(project_id).await
    }

    #[instrument(skip(self))]
    pub async fn add_collaborator(&self, task_id: Id, user_id: Id) -> EsResult<()> {
        let task = self.get(task_id).await?;
        self.require_user(user_id).await?;

        if user_id == task.main_responsible_id {
            let mut errors = es_core::error::ValidationErrors::new();
            errors.add("collaborator_ids", "must not include the main responsible");
            return Err(errors.into());
        }
        if task.collaborator_ids.contains(&user_id) {
            return Ok(());
        }

        check_collaborator_cap(task.collaborator_ids.len(), 1)?;

        self.tasks.add_collaborator(task_id, user_id).await?;
        info!(task_id = task_id, user_id = user_id, "Collaborator added");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn remove_collaborator(&self, task_id: Id, user_id: Id) -> EsResult<()> {
        self.get(task_id).await?;
        self.tasks.remove_collaborator(task_id, user_id).await?;
        info!(task_id = task_id, user_id = user_id, "Collaborator removed");
        Ok(())
    }

    pub async fn set_status(&self, task_id: Id, status: TaskStatus) -> EsResult<()> {
        self.get(task_id).await?;
        self.tasks.set_task_status(task_id, status).await
    }

    async fn require_user(&self, user_id: Id) -> EsResult<()> {
        self.users
            .find_user(user_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| EsError::not_found("User", "id", user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::{MemoryProjectStore, MemoryTaskStore, MemoryUserStore};
    use es_core::error::InvariantRule;
    use es_models::project::Project;
    use es_models::role::Role;
    use es_models::user::User;

    type TestService = TaskService<MemoryTaskStore, MemoryProjectStore, MemoryUserStore>;

    async fn setup() -> (TestService, Id) {
        let users = Arc::new(MemoryUserStore::new());
        for (name, role) in [
            ("resp", Role::AnalistaTecnico),
            ("aux1", Role::AuxiliarTecnico),
            ("aux2", Role::AuxiliarTecnico),
            ("aux3", Role::AuxiliarTecnico),
        ] {
            users
                .insert_user(&User::new(name, name, role))
                .await
                .unwrap();
        }

        let projects = Arc::new(MemoryProjectStore::new());
        let project = projects
            .insert_project(&Project::new("Obra Litoral", 1))
            .await
            .unwrap();

        (
            TaskService::new(Arc::new(MemoryTaskStore::new()), projects, users),
            project.id.unwrap(),
        )
    }

    fn dto(responsible: Id, collaborators: Vec<Id>) -> CreateTaskDto {
        CreateTaskDto {
            title: "Furo SP-01".into(),
            description: None,
            main_responsible_id: responsible,
            collaborator_ids: collaborators,
        }
    }

    #[tokio::test]
    async fn test_create_task() {
        let (service, project_id) = setup().await;
        let task = service
            .create(project_id, dto(1, vec![2, 3]))
            .await
            .unwrap();
        assert_eq!(task.collaborator_ids, vec![2, 3]);
    }

    #[tokio::test]
    async fn test_create_in_unknown_project() {
        let (service, _) = setup().await;
        let err = service.create(999, dto(1, vec![])).await.unwrap_err();
        assert!(matches!(err, EsError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_third_collaborator_rejected() {
        let (service, project_id) = setup().await;
        let task = service
            .create(project_id, dto(1, vec![2, 3]))
            .await
            .unwrap();

        let err = service
            .add_collaborator(task.id.unwrap(), 4)
            .await
            .unwrap_err();
        match err {
            EsError::InvariantViolation { rule, .. } => {
                assert_eq!(rule, InvariantRule::CollaboratorLimit)
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_add_after_removal_succeeds() {
        let (service, project_id) = setup().await;
        let task = service
            .create(project_id, dto(1, vec![2, 3]))
            .await
            .unwrap();
        let id = task.id.unwrap();

        service.remove_collaborator(id, 2).await.unwrap();
        service.add_collaborator(id, 4).await.unwrap();

        let reloaded = service.get(id).await.unwrap();
        assert_eq!(reloaded.collaborator_ids, vec![3, 4]);
    }

    #[tokio::test]
    async fn test_responsible_cannot_collaborate() {
        let (service, project_id) = setup().await;
        let task = service.create(project_id, dto(1, vec![])).await.unwrap();

        let err = service
            .add_collaborator(task.id.unwrap(), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, EsError::Validation(_)));
    }

    #[tokio::test]
    async fn test_adding_existing_collaborator_is_noop() {
        let (service, project_id) = setup().await;
        let task = service
            .create(project_id, dto(1, vec![2]))
            .await
            .unwrap();
        let id = task.id.unwrap();

        service.add_collaborator(id, 2).await.unwrap();
        let reloaded = service.get(id).await.unwrap();
        assert_eq!(reloaded.collaborator_ids, vec![2]);
    }

    #[tokio::test]
    async fn test_readding_at_cap_is_not_a_cap_error() {
        let (service, project_id) = setup().await;
        let task = service
            .create(project_id, dto(1, vec![2, 3]))
            .await
            .unwrap();
        let id = task.id.unwrap();

        // Both slots taken; re-adding an existing collaborator must stay a
        // no-op instead of surfacing as a cap violation.
        service.add_collaborator(id, 3).await.unwrap();
        let reloaded = service.get(id).await.unwrap();
        assert_eq!(reloaded.collaborator_ids, vec![2, 3]);
    }
}
