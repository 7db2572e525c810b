//! Persistence for the moderated session.
//!
//! The session is saved as a single JSON document after every successful
//! mutation and removed when the game returns to setup. Loading never fails
//! on bad data: an unreadable or inconsistent blob is discarded with a
//! warning and the caller starts over.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileSessionRepository;
pub use memory::InMemorySessionRepository;
pub use traits::SessionRepository;
