//! File-backed roster persistence.
//!
//! The file holds a single roster snapshot as produced by
//! [`lineup_core::encode_roster`].  A missing file reads as "nothing stored".

use std::path::{Path, PathBuf};

use lineup_core::{PersistError, RosterPersistence};
use tracing::debug;

/// Stores the roster snapshot in one text file.
#[derive(Debug, Clone)]
pub struct RosterFile {
    path: PathBuf,
}

impl RosterFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn error(&self, action: &str, e: std::io::Error) -> PersistError {
        PersistError::new(format!("{action} {}: {e}", self.path.display()))
    }
}

impl RosterPersistence for RosterFile {
    fn read(&self) -> Result<Option<String>, PersistError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                debug!(bytes = content.len(), "read roster from {}", self.path.display());
                Ok(Some(content))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.error("cannot read", e)),
        }
    }

    fn write(&mut self, snapshot: &str) -> Result<(), PersistError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| self.error("cannot create directory for", e))?;
        }
        std::fs::write(&self.path, snapshot).map_err(|e| self.error("cannot write", e))
    }
}
