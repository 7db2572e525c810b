//! File-based SessionRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use mafia_core::GameState;

use super::traits::decode_session;
use super::{RepositoryError, Result, SessionRepository};

/// Stores the session as one pretty-printed JSON document.
///
/// Writes go to `<file>.tmp` first and are renamed into place, so a crash
/// mid-write leaves the previous save intact.
pub struct FileSessionRepository {
    path: PathBuf,
}

impl FileSessionRepository {
    /// Create a repository backed by `path`, creating its parent directory.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(RepositoryError::Io)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl SessionRepository for FileSessionRepository {
    fn save(&self, state: &GameState) -> Result<()> {
        let json = serde_json::to_string_pretty(state)?;
        let temp_path = self.temp_path();

        fs::write(&temp_path, json).map_err(RepositoryError::Io)?;
        fs::rename(&temp_path, &self.path).map_err(RepositoryError::Io)?;

        tracing::debug!(
            "Saved session ({}, day {}) to {}",
            state.phase,
            state.day,
            self.path.display()
        );
        Ok(())
    }

    fn load(&self) -> Result<Option<GameState>> {
        let blob = match self.raw() {
            Ok(Some(blob)) => blob,
            Ok(None) => return Ok(None),
            Err(RepositoryError::CorruptedData(reason)) => {
                tracing::warn!("Discarding unreadable saved session: {}", reason);
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        let state = decode_session(&blob);
        if state.is_some() {
            tracing::debug!("Loaded session from {}", self.path.display());
        }
        Ok(state)
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(RepositoryError::Io)?;
            tracing::debug!("Deleted saved session {}", self.path.display());
        }
        Ok(())
    }

    fn raw(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&self.path).map_err(RepositoryError::Io)?;
        let blob = String::from_utf8(bytes).map_err(|err| {
            RepositoryError::CorruptedData(format!("{} is not UTF-8: {err}", self.path.display()))
        })?;
        Ok(Some(blob))
    }
}
