//! Repository contract for the saved session.

use mafia_core::GameState;

use super::Result;

/// Storage for the single saved session.
///
/// The whole [`GameState`] is written on every save; there is no partial
/// update and no version history beyond what the state itself carries.
pub trait SessionRepository: Send + Sync {
    /// Overwrite the saved session.
    fn save(&self, state: &GameState) -> Result<()>;

    /// Load the saved session, if any.
    ///
    /// A blob that cannot be decoded or fails the structural checks is
    /// reported as `Ok(None)`: the caller starts a fresh game.
    fn load(&self) -> Result<Option<GameState>>;

    /// Remove the saved session.
    fn clear(&self) -> Result<()>;

    /// Raw saved document, for export and inspection.
    fn raw(&self) -> Result<Option<String>>;
}

/// Decode a saved blob, discarding anything that is not a usable session.
pub(crate) fn decode_session(blob: &str) -> Option<GameState> {
    let state: GameState = match serde_json::from_str(blob) {
        Ok(state) => state,
        Err(err) => {
            tracing::warn!("Discarding unreadable saved session: {}", err);
            return None;
        }
    };
    if !state.is_consistent() {
        tracing::warn!(
            "Discarding inconsistent saved session ({} players, phase {})",
            state.roster.len(),
            state.phase
        );
        return None;
    }
    Some(state)
}
