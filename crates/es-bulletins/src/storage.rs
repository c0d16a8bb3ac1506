//! Document storage
//!
//! Rendered bulletin documents land here, keyed by a path-like string. The
//! local backend keeps everything under one root directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, instrument};

use es_core::error::EsError;

/// Storage errors
#[derive(Debug, Error)]
pub enum DocumentStorageError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

pub type DocumentStorageResult<T> = Result<T, DocumentStorageError>;

impl From<DocumentStorageError> for EsError {
    fn from(err: DocumentStorageError) -> Self {
        match err {
            DocumentStorageError::NotFound(key) => {
                EsError::not_found("Document", "key", key)
            }
            other => EsError::upstream("document-storage", other.to_string()),
        }
    }
}

/// Metadata for a stored document
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub size: u64,
    /// SHA256 digest of the content
    pub digest: String,
}

/// Storage backend for rendered documents
#[async_trait]
pub trait DocumentStorage: Send + Sync {
    async fn put(&self, key: &str, data: Bytes) -> DocumentStorageResult<StoredDocument>;

    async fn get(&self, key: &str) -> DocumentStorageResult<Bytes>;

    async fn exists(&self, key: &str) -> DocumentStorageResult<bool>;

    async fn delete(&self, key: &str) -> DocumentStorageResult<()>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

fn calculate_digest(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Local filesystem storage
pub struct LocalDocumentStorage {
    root: PathBuf,
}

impl LocalDocumentStorage {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Storage under a temp directory, for tests and local runs.
    pub fn temp() -> std::io::Result<Self> {
        let dir = std::env::temp_dir().join("estrata-documents");
        std::fs::create_dir_all(&dir)?;
        Ok(Self::new(dir))
    }

    /// Resolve a key to a full path, rejecting traversal.
    fn resolve_path(&self, key: &str) -> DocumentStorageResult<PathBuf> {
        if key.contains("..") || key.starts_with('/') || key.starts_with('\\') {
            return Err(DocumentStorageError::InvalidPath(key.to_string()));
        }
        Ok(self.root.join(key))
    }

    async fn ensure_parent(&self, path: &Path) -> DocumentStorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStorage for LocalDocumentStorage {
    #[instrument(skip(self, data), fields(storage = "local"))]
    async fn put(&self, key: &str, data: Bytes) -> DocumentStorageResult<StoredDocument> {
        let path = self.resolve_path(key)?;
        self.ensure_parent(&path).await?;

        let digest = calculate_digest(&data);
        let size = data.len() as u64;

        let mut file = fs::File::create(&path).await?;
        file.write_all(&data).await?;
        file.sync_all().await?;

        debug!(path = ?path, size = size, "Document stored");

        Ok(StoredDocument { size, digest })
    }

    #[instrument(skip(self), fields(storage = "local"))]
    async fn get(&self, key: &str) -> DocumentStorageResult<Bytes> {
        let path = self.resolve_path(key)?;

        if !path.exists() {
            return Err(DocumentStorageError::NotFound(key.to_string()));
        }

        let mut file = fs::File::open(&path).await?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer).await?;

        Ok(Bytes::from(buffer))
    }

    async fn exists(&self, key: &str) -> DocumentStorageResult<bool> {
        let path = self.resolve_path(key)?;
        Ok(path.exists())
    }

    #[instrument(skip(self), fields(storage = "local"))]
    async fn delete(&self, key: &str) -> DocumentStorageResult<()> {
        let path = self.resolve_path(key)?;

        if path.exists() {
            fs::remove_file(&path).await?;
            debug!(path = ?path, "Document deleted");
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "local"
    }
}

/// In-memory storage for testing
pub struct MemoryDocumentStorage {
    files: tokio::sync::RwLock<std::collections::HashMap<String, Bytes>>,
}

impl Default for MemoryDocumentStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocumentStorage {
    pub fn new() -> Self {
        Self {
            files: tokio::sync::RwLock::new(std::collections::HashMap::new()),
        }
    }
}

#[async_trait]
impl DocumentStorage for MemoryDocumentStorage {
    async fn put(&self, key: &str, data: Bytes) -> DocumentStorageResult<StoredDocument> {
        let stored = StoredDocument {
            size: data.len() as u64,
            digest: calculate_digest(&data),
        };

        let mut files = self.files.write().await;
        files.insert(key.to_string(), data);

        Ok(stored)
    }

    async fn get(&self, key: &str) -> DocumentStorageResult<Bytes> {
        let files = self.files.read().await;
        files
            .get(key)
            .cloned()
            .ok_or_else(|| DocumentStorageError::NotFound(key.to_string()))
    }

    async fn exists(&self, key: &str) -> DocumentStorageResult<bool> {
        let files = self.files.read().await;
        Ok(files.contains_key(key))
    }

    async fn delete(&self, key: &str) -> DocumentStorageResult<()> {
        let mut files = self.files.write().await;
        files.remove(key);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Storage key for a bulletin document: scoped by project.
pub fn document_key(project_id: i64, filename: &str) -> String {
    format!("bulletins/{}/{}", project_id, filename)
}

/// MIME type for a document key, from its extension.
pub fn content_type_for(key: &str) -> String {
    mime_guess::from_path(key)
        .first_or_text_plain()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_put_get() {
        let storage = MemoryDocumentStorage::new();
        let data = Bytes::from("boletim");

        let stored = storage.put("bulletins/1/spt-1.txt", data.clone()).await.unwrap();
        assert_eq!(stored.size, 7);

        let retrieved = storage.get("bulletins/1/spt-1.txt").await.unwrap();
        assert_eq!(retrieved, data);
    }

    #[tokio::test]
    async fn test_memory_not_found() {
        let storage = MemoryDocumentStorage::new();
        let result = storage.get("missing.txt").await;
        assert!(matches!(result, Err(DocumentStorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_memory_delete() {
        let storage = MemoryDocumentStorage::new();
        storage.put("a.txt", Bytes::from("x")).await.unwrap();
        assert!(storage.exists("a.txt").await.unwrap());

        storage.delete("a.txt").await.unwrap();
        assert!(!storage.exists("a.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_local_storage_path_traversal() {
        let storage = LocalDocumentStorage::temp().unwrap();
        let result = storage.get("../../../etc/passwd").await;
        assert!(matches!(result, Err(DocumentStorageError::InvalidPath(_))));
    }

    #[test]
    fn test_document_key() {
        assert_eq!(document_key(4, "spt-9.txt"), "bulletins/4/spt-9.txt");
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type_for("bulletins/4/spt-9.txt"), "text/plain");
        assert_eq!(content_type_for("bulletins/4/raw.pdf"), "application/pdf");
    }
}
