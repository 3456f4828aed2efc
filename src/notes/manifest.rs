//! Manifest persistence
//!
//! The whole note collection is serialized to one JSON file in managed
//! storage and rewritten on every mutation. Writes go through a temp file
//! plus rename so a crash mid-write cannot corrupt the manifest. A manifest
//! that fails to parse is backed up and replaced with an empty collection;
//! the backup keeps the corrupt bytes recoverable.

use super::types::Note;
use crate::{Result, ZapError};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Manifest filename inside managed storage
pub const MANIFEST_FILE: &str = "notes.json";

/// Suffix for the in-progress write
const TMP_SUFFIX: &str = ".tmp";

/// Suffix for the backup taken when the manifest fails to parse
const CORRUPT_SUFFIX: &str = ".corrupt";

/// File-backed store for the serialized note collection
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
}

impl Manifest {
    /// Manifest handle inside the given managed storage directory
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(MANIFEST_FILE),
        }
    }

    /// Path of the manifest file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the note collection.
    ///
    /// A missing manifest is a fresh install and yields an empty collection.
    /// An unparseable manifest is moved aside to `notes.json.corrupt` and an
    /// empty collection is returned; the session continues rather than
    /// failing hard.
    pub fn load(&self) -> Vec<Note> {
        let data = match std::fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No manifest at {:?}, starting empty", self.path);
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to read manifest {:?}: {}", self.path, e);
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<Note>>(&data) {
            Ok(notes) => {
                debug!("Loaded {} notes from manifest", notes.len());
                notes
            }
            Err(e) => {
                warn!("Manifest {:?} failed to parse: {}", self.path, e);
                self.back_up_corrupt();
                Vec::new()
            }
        }
    }

    /// Persist the full collection, replacing prior contents.
    ///
    /// Serializes to a sibling temp file first and renames it over the
    /// manifest so readers never observe a partial write.
    pub fn save(&self, notes: &[Note]) -> Result<()> {
        let json = serde_json::to_vec_pretty(notes)
            .map_err(|e| ZapError::PersistenceError(e.to_string()))?;

        let tmp = self.sibling(TMP_SUFFIX);
        std::fs::write(&tmp, &json)
            .map_err(|e| ZapError::PersistenceError(format!("write {:?}: {}", tmp, e)))?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| ZapError::PersistenceError(format!("rename {:?}: {}", tmp, e)))?;

        debug!("Persisted {} notes to {:?}", notes.len(), self.path);
        Ok(())
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .unwrap_or_default()
            .to_os_string();
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn back_up_corrupt(&self) {
        let backup = self.sibling(CORRUPT_SUFFIX);
        match std::fs::rename(&self.path, &backup) {
            Ok(()) => info!("Backed up corrupt manifest to {:?}", backup),
            Err(e) => warn!("Failed to back up corrupt manifest: {}", e),
        }
    }
}
