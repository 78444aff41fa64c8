//! Scoped ownership of a stored session.

use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::ports::SessionStore;

/// Removes its session from the store when dropped.
///
/// Held for the whole orchestration call, so the session is released on
/// success, on exhausted retries, and when the caller abandons the future.
pub struct SessionLease {
    store: Arc<dyn SessionStore>,
    id: SessionId,
}

impl SessionLease {
    pub fn new(store: Arc<dyn SessionStore>, id: SessionId) -> Self {
        Self { store, id }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }
}

impl Drop for SessionLease {
    fn drop(&mut self) {
        match self.store.remove(self.id) {
            Ok(_) => tracing::debug!(session_id = %self.id, "Session released"),
            Err(e) => tracing::warn!(session_id = %self.id, error = %e, "Failed to release session"),
        }
    }
}
