//! Bulletin type registry
//!
//! Maps type tags to processors. Registration order is the lookup order;
//! an unmatched tag is an UnsupportedBulletinType error, never a fallback.

use std::sync::Arc;

use es_core::error::EsError;
use es_core::result::EsResult;

use crate::processor::BulletinProcessor;
use crate::resistivity::ResistivityProcessor;
use crate::spt::SptProcessor;

pub struct BulletinRegistry {
    processors: Vec<Arc<dyn BulletinProcessor>>,
}

impl BulletinRegistry {
    pub fn new() -> Self {
        Self {
            processors: Vec::new(),
        }
    }

    /// Registry with every built-in processor.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(SptProcessor));
        registry.register(Arc::new(ResistivityProcessor));
        registry
    }

    pub fn register(&mut self, processor: Arc<dyn BulletinProcessor>) {
        tracing::debug!(tag = processor.type_tag(), "Bulletin processor registered");
        self.processors.push(processor);
    }

    /// Resolve the processor for a tag, case-insensitively.
    pub fn resolve(&self, tag: &str) -> EsResult<Arc<dyn BulletinProcessor>> {
        self.processors
            .iter()
            .find(|p| p.supports(tag))
            .cloned()
            .ok_or_else(|| EsError::unsupported_bulletin_type(tag))
    }

    /// Canonical tags of every registered processor.
    pub fn known_tags(&self) -> Vec<&'static str> {
        self.processors.iter().map(|p| p.type_tag()).collect()
    }
}

impl Default for BulletinRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
