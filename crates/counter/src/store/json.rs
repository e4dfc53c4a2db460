//! JSON file backend: the local per-device order document.

use std::path::PathBuf;

use super::{BackendError, OrderBackend, StoredState};

/// Persists the full order document as pretty-printed JSON at a fixed path.
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    /// Backend over the given document path. The file is created on first
    /// save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OrderBackend for JsonFileBackend {
    /// A missing file loads as the empty state; a malformed one degrades to
    /// the empty state with a warning rather than failing the service.
    fn load(&self) -> Result<StoredState, BackendError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoredState::default());
            }
            Err(e) => return Err(BackendError::Io(e)),
        };
        match serde_json::from_str(&raw) {
            Ok(state) => Ok(state),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e,
                    "malformed order document, starting empty");
                Ok(StoredState::default())
            }
        }
    }

    fn save(&self, state: &StoredState) -> Result<(), BackendError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let raw = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}
