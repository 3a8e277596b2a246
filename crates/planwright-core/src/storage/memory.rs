//! In-memory storage implementation.

use super::{Storage, StorageError, StorageResult};
use crate::document::PlanDocument;
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStorage {
    documents: RwLock<HashMap<String, PlanDocument>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, document: &PlanDocument) -> StorageResult<()> {
        self.documents.write().insert(id.to_string(), document.clone());
        Ok(())
    }

    fn load(&self, id: &str) -> StorageResult<PlanDocument> {
        self.documents
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        Ok(self.documents.read().keys().cloned().collect())
    }

    fn exists(&self, id: &str) -> StorageResult<bool> {
        Ok(self.documents.read().contains_key(id))
    }
}
