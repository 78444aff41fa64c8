//! Session Store Port - keyed storage for in-flight analysis sessions.
//!
//! Entries live only for the duration of one request. Methods are
//! synchronous so a session can be released from `Drop` when a request is
//! cancelled mid-flight.

use crate::domain::foundation::SessionId;
use crate::domain::session::AnalysisSession;

/// Errors that can occur during session store operations
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("Session already exists: {0}")]
    AlreadyExists(SessionId),

    #[error("Session store unavailable: {0}")]
    Unavailable(String),
}

/// Port for holding sessions keyed by identifier.
///
/// Implementations must allow concurrent insert/remove of unrelated keys.
pub trait SessionStore: Send + Sync {
    /// Insert a new session.
    ///
    /// # Errors
    /// `AlreadyExists` if the identifier is taken
    fn create(&self, session: AnalysisSession) -> Result<(), SessionStoreError>;

    /// Overwrite an existing session with its latest state.
    ///
    /// # Errors
    /// `NotFound` if the session was never created or already removed
    fn save(&self, session: &AnalysisSession) -> Result<(), SessionStoreError>;

    /// Load a snapshot of a session.
    fn load(&self, id: SessionId) -> Result<AnalysisSession, SessionStoreError>;

    /// Remove a session, returning it if it was present.
    fn remove(&self, id: SessionId) -> Result<Option<AnalysisSession>, SessionStoreError>;

    /// Number of sessions currently held.
    fn active_count(&self) -> usize;
}
