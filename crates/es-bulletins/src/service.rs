//! Bulletin service
//!
//! Orchestrates bulletin creation and document delivery. Creation never
//! renders; the document is produced on first read and the stored path is
//! reused from then on.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use es_core::error::EsError;
use es_core::result::EsResult;
use es_core::traits::Id;
use es_models::bulletin::{Bulletin, CreateBulletinRequest};
use es_models::project::Project;

use crate::registry::BulletinRegistry;
use crate::storage::{document_key, DocumentStorage};

/// Persistence interface for bulletin records
#[async_trait]
pub trait BulletinStore: Send + Sync {
    async fn create(&self, bulletin: &mut Bulletin) -> EsResult<Id>;

    async fn get(&self, id: Id) -> EsResult<Option<Bulletin>>;

    async fn list_for_project(&self, project_id: Id) -> EsResult<Vec<Bulletin>>;

    /// Record the document path, first writer wins. Returns the path now on
    /// the record, which may belong to a competing writer.
    async fn set_document_path(&self, id: Id, path: &str) -> EsResult<String>;
}

/// Project lookup interface; the service only needs existence and the
/// fields that end up in rendered documents.
#[async_trait]
pub trait ProjectDirectory: Send + Sync {
    async fn find_project(&self, id: Id) -> EsResult<Option<Project>>;
}

/// In-memory bulletin store for testing
pub struct MemoryBulletinStore {
    bulletins: RwLock<Vec<Bulletin>>,
    next_id: std::sync::atomic::AtomicI64,
}

impl Default for MemoryBulletinStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBulletinStore {
    pub fn new() -> Self {
        Self {
            bulletins: RwLock::new(Vec::new()),
            next_id: std::sync::atomic::AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl BulletinStore for MemoryBulletinStore {
    async fn create(&self, bulletin: &mut Bulletin) -> EsResult<Id> {
        let id = self
            .next_id
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        bulletin.id = Some(id);
        bulletin.created_at = Some(chrono::Utc::now());

        let mut bulletins = self.bulletins.write().await;
        bulletins.push(bulletin.clone());

        Ok(id)
    }

    async fn get(&self, id: Id) -> EsResult<Option<Bulletin>> {
        let bulletins = self.bulletins.read().await;
        Ok(bulletins.iter().find(|b| b.id == Some(id)).cloned())
    }

    async fn list_for_project(&self, project_id: Id) -> EsResult<Vec<Bulletin>> {
        let bulletins = self.bulletins.read().await;
        Ok(bulletins
            .iter()
            .filter(|b| b.project_id == project_id && b.active)
            .cloned()
            .collect())
    }

    async fn set_document_path(&self, id: Id, path: &str) -> EsResult<String> {
        let mut bulletins = self.bulletins.write().await;
        let bulletin = bulletins
            .iter_mut()
            .find(|b| b.id == Some(id))
            .ok_or_else(|| EsError::not_found("Bulletin", "id", id))?;

        if bulletin.document_path.as_deref().map_or(true, str::is_empty) {
            bulletin.document_path = Some(path.to_string());
        }
        Ok(bulletin
            .document_path
            .clone()
            .unwrap_or_else(|| path.to_string()))
    }
}

/// In-memory project directory for testing
pub struct MemoryProjectDirectory {
    projects: RwLock<Vec<Project>>,
}

impl Default for MemoryProjectDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProjectDirectory {
    pub fn new() -> Self {
        Self {
            projects: RwLock::new(Vec::new()),
        }
    }

    pub async fn insert(&self, project: Project) {
        let mut projects = self.projects.write().await;
        projects.push(project);
    }
}

#[async_trait]
impl ProjectDirectory for MemoryProjectDirectory {
    async fn find_project(&self, id: Id) -> EsResult<Option<Project>> {
        let projects = self.projects.read().await;
        Ok(projects.iter().find(|p| p.id == Some(id)).cloned())
    }
}

/// Bulletin orchestrator
pub struct BulletinService<St: BulletinStore, P: ProjectDirectory, S: DocumentStorage> {
    store: Arc<St>,
    projects: Arc<P>,
    storage: Arc<S>,
    registry: Arc<BulletinRegistry>,
}

impl<St: BulletinStore, P: ProjectDirectory, S: DocumentStorage> BulletinService<St, P, S> {
    pub fn new(
        store: Arc<St>,
        projects: Arc<P>,
        storage: Arc<S>,
        registry: Arc<BulletinRegistry>,
    ) -> Self {
        Self {
            store,
            projects,
            storage,
            registry,
        }
    }

    /// Create a bulletin of the requested type.
    ///
    /// The project is resolved first, then the processor; nothing is
    /// persisted when either lookup fails. No document is rendered here.
    #[instrument(skip(self, request), fields(tag = %request.type_tag, project_id = request.project_id))]
    pub async fn create_bulletin(
        &self,
        request: CreateBulletinRequest,
        author_id: Id,
    ) -> EsResult<Bulletin> {
        let project = self
            .projects
            .find_project(request.project_id)
            .await?
            .ok_or_else(|| EsError::not_found("Project", "id", request.project_id))?;
        if !project.active {
            return Err(EsError::not_found("Project", "id", request.project_id));
        }

        let processor = self.registry.resolve(&request.type_tag)?;
        let mut bulletin = processor.build(&request, author_id)?;
        let id = self.store.create(&mut bulletin).await?;

        info!(id = id, tag = bulletin.bulletin_type(), "Bulletin created");
        Ok(bulletin)
    }

    pub async fn get_bulletin(&self, id: Id) -> EsResult<Bulletin> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| EsError::not_found("Bulletin", "id", id))
    }

    pub async fn list_for_project(&self, project_id: Id) -> EsResult<Vec<Bulletin>> {
        self.store.list_for_project(project_id).await
    }

    /// Fetch the rendered document, producing it on first access.
    ///
    /// Re-reads serve the stored document unchanged; losing a render race
    /// still returns the bytes just produced, since both writers rendered
    /// from the same record.
    #[instrument(skip(self))]
    pub async fn get_bulletin_document(&self, id: Id) -> EsResult<(Bulletin, Bytes)> {
        let bulletin = self.get_bulletin(id).await?;

        if let Some(path) = bulletin.document_path.as_deref().filter(|p| !p.is_empty()) {
            if self.storage.exists(path).await.map_err(EsError::from)? {
                let data = self.storage.get(path).await.map_err(EsError::from)?;
                debug!(id = id, path = path, "Serving cached document");
                return Ok((bulletin, data));
            }
        }

        let project = self
            .projects
            .find_project(bulletin.project_id)
            .await?
            .ok_or_else(|| EsError::not_found("Project", "id", bulletin.project_id))?;

        let processor = self.registry.resolve(bulletin.bulletin_type())?;
        let data = processor.render(&bulletin, &project)?;

        let key = match bulletin.document_path.as_deref().filter(|p| !p.is_empty()) {
            Some(existing) => existing.to_string(),
            None => document_key(bulletin.project_id, &processor.document_filename(&bulletin)),
        };

        self.storage
            .put(&key, data.clone())
            .await
            .map_err(EsError::from)?;
        let stored_path = self.store.set_document_path(id, &key).await?;

        info!(id = id, path = %stored_path, "Bulletin document rendered");

        let mut bulletin = bulletin;
        bulletin.document_path = Some(stored_path);
        Ok((bulletin, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryDocumentStorage;
    use serde_json::json;

    type TestService =
        BulletinService<MemoryBulletinStore, MemoryProjectDirectory, MemoryDocumentStorage>;

    async fn service_with_project() -> (TestService, Id) {
        let store = Arc::new(MemoryBulletinStore::new());
        let projects = Arc::new(MemoryProjectDirectory::new());
        let storage = Arc::new(MemoryDocumentStorage::new());
        let registry = Arc::new(BulletinRegistry::with_defaults());

        let mut project = Project::new("Obra Litoral", 3);
        project.id = Some(10);
        projects.insert(project).await;

        (
            BulletinService::new(store, projects, storage, registry),
            10,
        )
    }

    fn spt_request(project_id: Id) -> CreateBulletinRequest {
        CreateBulletinRequest {
            type_tag: "spt".into(),
            project_id,
            executed_at: None,
            data: json!({ "soilClassification": "Argila siltosa", "finalDepth": 12.5 }),
        }
    }

    #[tokio::test]
    async fn test_create_does_not_render() {
        let (service, project_id) = service_with_project().await;

        let bulletin = service
            .create_bulletin(spt_request(project_id), 4)
            .await
            .unwrap();

        assert_eq!(bulletin.bulletin_type(), "SPT");
        assert!(bulletin.id.is_some());
        assert!(!bulletin.has_document());
    }

    #[tokio::test]
    async fn test_create_unknown_type() {
        let (service, project_id) = service_with_project().await;

        let request = CreateBulletinRequest {
            type_tag: "rotary".into(),
            project_id,
            executed_at: None,
            data: json!({}),
        };

        let err = service.create_bulletin(request, 4).await.unwrap_err();
        assert!(matches!(err, EsError::UnsupportedBulletinType { .. }));
    }

    #[tokio::test]
    async fn test_create_missing_project() {
        let (service, _) = service_with_project().await;

        let err = service
            .create_bulletin(spt_request(999), 4)
            .await
            .unwrap_err();
        assert!(matches!(err, EsError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_missing_project_reported_before_unknown_type() {
        let (service, _) = service_with_project().await;

        let request = CreateBulletinRequest {
            type_tag: "rotary".into(),
            project_id: 999,
            executed_at: None,
            data: json!({}),
        };

        let err = service.create_bulletin(request, 4).await.unwrap_err();
        assert!(matches!(err, EsError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_document_rendered_on_first_read() {
        let (service, project_id) = service_with_project().await;

        let bulletin = service
            .create_bulletin(spt_request(project_id), 4)
            .await
            .unwrap();
        let id = bulletin.id.unwrap();

        let (first, data) = service.get_bulletin_document(id).await.unwrap();
        assert!(first.has_document());

        let text = String::from_utf8(data.to_vec()).unwrap();
        assert!(text.contains("Obra Litoral"));
        assert!(text.contains("Argila siltosa"));
    }

    #[tokio::test]
    async fn test_document_read_is_idempotent() {
        let (service, project_id) = service_with_project().await;

        let bulletin = service
            .create_bulletin(spt_request(project_id), 4)
            .await
            .unwrap();
        let id = bulletin.id.unwrap();

        let (first, first_data) = service.get_bulletin_document(id).await.unwrap();
        let (second, second_data) = service.get_bulletin_document(id).await.unwrap();

        assert_eq!(first.document_path, second.document_path);
        assert_eq!(first_data, second_data);
    }

    #[tokio::test]
    async fn test_get_bulletin_not_found() {
        let (service, _) = service_with_project().await;
        let err = service.get_bulletin(404).await.unwrap_err();
        assert!(matches!(err, EsError::NotFound { .. }));
    }
}
