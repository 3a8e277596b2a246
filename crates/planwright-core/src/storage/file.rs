//! File-based storage implementation for native platforms.

use super::{Storage, StorageError, StorageResult};
use crate::document::PlanDocument;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a plan from an arbitrary JSON file, such as one dropped on the
/// window.
pub fn read_document(path: &Path) -> StorageResult<PlanDocument> {
    if !path.exists() {
        return Err(StorageError::NotFound(path.display().to_string()));
    }

    let json = fs::read_to_string(path).map_err(|e| {
        StorageError::Io(format!("Failed to read {}: {}", path.display(), e))
    })?;

    PlanDocument::from_json(&json).map_err(|e| {
        StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// File-based storage for native platforms.
///
/// Stores plans as JSON files in a specified directory.
pub struct FileStorage {
    /// Base directory for plan storage.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create file storage in the default location.
    ///
    /// On Unix: `~/.local/share/planwright/plans/`
    /// On Windows: `%LOCALAPPDATA%\planwright\plans\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;

        Self::new(base.join("planwright").join("plans"))
    }

    /// Get the file path for a document ID.
    pub fn document_path(&self, id: &str) -> PathBuf {
        // Sanitize ID to be safe for filenames
        let safe_id: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe_id))
    }

    /// Get the base path.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for FileStorage {
    fn save(&self, id: &str, document: &PlanDocument) -> StorageResult<()> {
        let path = self.document_path(id);
        let json = document
            .to_json()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        fs::write(&path, json).map_err(|e| {
            StorageError::Io(format!("Failed to write {}: {}", path.display(), e))
        })
    }

    fn load(&self, id: &str) -> StorageResult<PlanDocument> {
        let path = self.document_path(id);
        if !path.exists() {
            return Err(StorageError::NotFound(id.to_string()));
        }
        read_document(&path)
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        if !self.base_path.exists() {
            return Ok(vec![]);
        }

        let entries = fs::read_dir(&self.base_path)
            .map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;

        let mut ids = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            // Only include .json files
            if path.extension().is_some_and(|e| e == "json") {
                if let Some(name) = path.file_stem().and_then(|n| n.to_str()) {
                    ids.push(name.to_string());
                }
            }
        }
        Ok(ids)
    }

    fn exists(&self, id: &str) -> StorageResult<bool> {
        Ok(self.document_path(id).exists())
    }
}
