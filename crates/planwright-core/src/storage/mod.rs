//! Storage abstraction for persistence.

mod autosave;
mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use autosave::{AutoSaveManager, DEFAULT_AUTOSAVE_INTERVAL_SECS, LAST_DOCUMENT_KEY};
pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::{FileStorage, read_document};

use crate::document::PlanDocument;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for plan storage backends.
///
/// Calls complete synchronously; the editor only reaches for storage on an
/// explicit save/load or an autosave tick.
pub trait Storage: Send + Sync {
    /// Save a document.
    fn save(&self, id: &str, document: &PlanDocument) -> StorageResult<()>;

    /// Load a document.
    fn load(&self, id: &str) -> StorageResult<PlanDocument>;

    /// List all document IDs.
    fn list(&self) -> StorageResult<Vec<String>>;

    /// Check if a document exists.
    fn exists(&self, id: &str) -> StorageResult<bool>;
}
