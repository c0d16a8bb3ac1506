//! Project services
//!
//! Creation and manager reassignment both resolve the manager and run the
//! eligibility invariant; a project never points at a manager below
//! LIDER_PROJETOS.

use std::sync::Arc;

use tracing::{info, instrument};

use es_contracts::base::Contract;
use es_contracts::invariants::check_manager_eligibility;
use es_contracts::projects::CreateProjectContract;
use es_core::error::EsError;
use es_core::result::EsResult;
use es_core::traits::Id;
use es_models::project::{CreateProjectDto, Project, UpdateProjectDto};

use crate::stores::{ProjectStore, UserStore};

pub struct ProjectService<P: ProjectStore, U: UserStore> {
    projects: Arc<P>,
    users: Arc<U>,
}

impl<P: ProjectStore, U: UserStore> ProjectService<P, U> {
    pub fn new(projects: Arc<P>, users: Arc<U>) -> Self {
        Self { projects, users }
    }

    #[instrument(skip(self, dto), fields(name = %dto.name))]
    pub async fn create(&self, dto: CreateProjectDto) -> EsResult<Project> {
        let mut project = Project::new(dto.name, dto.manager_id);
        project.client_name = dto.client_name;
        if let Some(status) = dto.status {
            project.status = status;
        }

        CreateProjectContract.validate(&project)?;
        self.check_manager(project.manager_id).await?;

        let created = self.projects.insert_project(&project).await?;
        info!(id = ?created.id, manager_id = created.manager_id, "Project created");
        Ok(created)
    }

    pub async fn get(&self, id: Id) -> EsResult<Project> {
        self.projects
            .find_project(id)
            .await?
            .filter(|p| p.active)
            .ok_or_else(|| EsError::not_found("Project", "id", id))
    }

    pub async fn list(&self) -> EsResult<Vec<Project>> {
        self.projects.list_projects().await
    }

    /// Partial update. Reassigning the manager re-runs the eligibility
    /// invariant against the new user.
    #[instrument(skip(self, changes))]
    pub async fn update(&self, id: Id, changes: UpdateProjectDto) -> EsResult<Project> {
        self.get(id).await?;

        if let Some(name) = changes.name.as_deref() {
            if name.trim().is_empty() {
                let mut errors = es_core::error::ValidationErrors::new();
                errors.add("name", "can't be blank");
                return Err(errors.into());
            }
        }

        if let Some(manager_id) = changes.manager_id {
            self.check_manager(manager_id).await?;
        }

        self.projects.update_project(id, &changes).await
    }

    #[instrument(skip(self))]
    pub async fn deactivate(&self, id: Id) -> EsResult<()> {
        self.get(id).await?;
        self.projects.deactivate_project(id).await?;
        info!(id = id, "Project deactivated");
        Ok(())
    }

    async fn check_manager(&self, manager_id: Id) -> EsResult<()> {
        let manager = self
            .users
            .find_user(manager_id)
            .await?
            .ok_or_else(|| EsError::not_found("User", "id", manager_id))?;
        check_manager_eligibility(manager.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::{MemoryProjectStore, MemoryUserStore};
    use es_core::error::InvariantRule;
    use es_models::role::Role;
    use es_models::user::User;

    async fn service_with_users() -> ProjectService<MemoryProjectStore, MemoryUserStore> {
        let users = Arc::new(MemoryUserStore::new());

        users
            .insert_user(&User::new("diretor", "A Diretora", Role::Diretor))
            .await
            .unwrap();
        users
            .insert_user(&User::new("analista", "O Analista", Role::AnalistaTecnico))
            .await
            .unwrap();

        ProjectService::new(Arc::new(MemoryProjectStore::new()), users)
    }

    fn dto(name: &str, manager_id: Id) -> CreateProjectDto {
        CreateProjectDto {
            name: name.into(),
            client_name: None,
            manager_id,
            status: None,
        }
    }

    #[tokio::test]
    async fn test_create_with_eligible_manager() {
        let service = service_with_users().await;
        let project = service.create(dto("Obra Litoral", 1)).await.unwrap();
        assert_eq!(project.manager_id, 1);
        assert!(project.id.is_some());
    }

    #[tokio::test]
    async fn test_create_rejects_ineligible_manager() {
        let service = service_with_users().await;
        let err = service.create(dto("Obra Litoral", 2)).await.unwrap_err();
        match err {
            EsError::InvariantViolation { rule, .. } => {
                assert_eq!(rule, InvariantRule::ManagerEligibility)
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_manager() {
        let service = service_with_users().await;
        let err = service.create(dto("Obra", 99)).await.unwrap_err();
        assert!(matches!(err, EsError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_rechecks_manager() {
        let service = service_with_users().await;
        let project = service.create(dto("Obra", 1)).await.unwrap();

        let changes = UpdateProjectDto {
            manager_id: Some(2),
            ..Default::default()
        };
        let err = service
            .update(project.id.unwrap(), changes)
            .await
            .unwrap_err();
        assert!(matches!(err, EsError::InvariantViolation { .. }));
    }

    #[tokio::test]
    async fn test_deactivated_project_is_gone() {
        let service = service_with_users().await;
        let project = service.create(dto("Obra", 1)).await.unwrap();
        let id = project.id.unwrap();

        service.deactivate(id).await.unwrap();
        let err = service.get(id).await.unwrap_err();
        assert!(matches!(err, EsError::NotFound { .. }));
    }
}
