//! Managed storage for media blobs
//!
//! All media referenced by notes lives in a single directory and is addressed
//! by relative filename. Deletion is best-effort: a missing or undeletable
//! file is logged and tolerated, never fatal.

use crate::{Result, ZapError};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Handle to the managed storage directory
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
}

impl MediaStorage {
    /// Open (creating if necessary) the managed storage directory
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Root directory of managed storage
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative media reference to an absolute path.
    ///
    /// Rejects empty refs, absolute paths, and parent-directory traversal so
    /// a manifest can never point outside managed storage.
    pub fn resolve(&self, media_ref: &str) -> Result<PathBuf> {
        if media_ref.is_empty() {
            return Err(ZapError::InvalidMediaRef("empty reference".to_string()));
        }
        let rel = Path::new(media_ref);
        if rel.is_absolute() {
            return Err(ZapError::InvalidMediaRef(media_ref.to_string()));
        }
        for component in rel.components() {
            match component {
                Component::Normal(_) => {}
                _ => return Err(ZapError::InvalidMediaRef(media_ref.to_string())),
            }
        }
        Ok(self.root.join(rel))
    }

    /// Check whether the referenced file is present.
    ///
    /// A `false` result is a non-fatal rendering condition; callers show a
    /// placeholder instead of failing.
    pub fn exists(&self, media_ref: &str) -> bool {
        self.resolve(media_ref)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }

    /// Read the referenced file into memory
    pub fn read(&self, media_ref: &str) -> Result<Vec<u8>> {
        let path = self.resolve(media_ref)?;
        if !path.is_file() {
            return Err(ZapError::MediaMissing(media_ref.to_string()));
        }
        Ok(std::fs::read(path)?)
    }

    /// Write a media blob under the given relative filename
    pub fn write(&self, media_ref: &str, data: &[u8]) -> Result<()> {
        let path = self.resolve(media_ref)?;
        std::fs::write(&path, data)?;
        debug!("Stored media blob: {} ({} bytes)", media_ref, data.len());
        Ok(())
    }

    /// Best-effort removal of the referenced file
    pub fn remove(&self, media_ref: &str) {
        match self.resolve(media_ref) {
            Ok(path) => {
                if let Err(e) = std::fs::remove_file(&path) {
                    warn!("Failed to delete media file {}: {}", media_ref, e);
                }
            }
            Err(e) => warn!("Skipping media delete for {}: {}", media_ref, e),
        }
    }
}
