//! In-memory SessionRepository for tests and throwaway games.

use std::sync::RwLock;

use mafia_core::GameState;

use super::traits::decode_session;
use super::{RepositoryError, Result, SessionRepository};

/// Keeps the serialized blob in memory, so saves go through the same JSON
/// encoding as the file repository.
#[derive(Default)]
pub struct InMemorySessionRepository {
    blob: RwLock<Option<String>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repository with a raw document, as if it had been saved.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: RwLock::new(Some(blob.into())),
        }
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn save(&self, state: &GameState) -> Result<()> {
        let json = serde_json::to_string(state)?;
        let mut blob = self
            .blob
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *blob = Some(json);
        Ok(())
    }

    fn load(&self) -> Result<Option<GameState>> {
        let blob = self.blob.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(blob.as_deref().and_then(decode_session))
    }

    fn clear(&self) -> Result<()> {
        let mut blob = self
            .blob
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *blob = None;
        Ok(())
    }

    fn raw(&self) -> Result<Option<String>> {
        let blob = self.blob.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(blob.clone())
    }
}
