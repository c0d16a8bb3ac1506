//! # es-bulletins
//!
//! Bulletin processing pipeline for Estrata RS.
//!
//! ## Features
//!
//! - One processor per bulletin kind, resolved by type tag
//! - Registry-based dispatch; unknown tags fail as unsupported
//! - Lazy document rendering with storage-backed caching
//!
//! ## Example
//!
//! ```rust,ignore
//! use es_bulletins::{BulletinRegistry, BulletinService, MemoryBulletinStore};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(BulletinRegistry::with_defaults());
//! let service = BulletinService::new(store, projects, storage, registry);
//!
//! let bulletin = service.create_bulletin(request, author_id).await?;
//! let (bulletin, document) = service.get_bulletin_document(bulletin.id.unwrap()).await?;
//! ```

pub mod processor;
pub mod registry;
pub mod resistivity;
pub mod service;
pub mod spt;
pub mod storage;

pub use processor::BulletinProcessor;
pub use registry::BulletinRegistry;
pub use resistivity::ResistivityProcessor;
pub use service::{
    BulletinService, BulletinStore, MemoryBulletinStore, MemoryProjectDirectory, ProjectDirectory,
};
pub use spt::SptProcessor;
pub use storage::{
    content_type_for, document_key, DocumentStorage, DocumentStorageError, DocumentStorageResult,
    LocalDocumentStorage, MemoryDocumentStorage, StoredDocument,
};
