//! In-Memory Session Store Adapter
//!
//! Holds in-flight analysis sessions in a shared map. Each entry is touched
//! only by the orchestration call that owns it.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::foundation::SessionId;
use crate::domain::session::AnalysisSession;
use crate::ports::{SessionStore, SessionStoreError};

/// In-memory storage for analysis sessions
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, AnalysisSession>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Entries are replaced whole, so a poisoned map is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<SessionId, AnalysisSession>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<SessionId, AnalysisSession>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for InMemorySessionStore {
    fn create(&self, session: AnalysisSession) -> Result<(), SessionStoreError> {
        let mut sessions = self.write();
        let id = session.id();
        if sessions.contains_key(&id) {
            return Err(SessionStoreError::AlreadyExists(id));
        }
        sessions.insert(id, session);
        Ok(())
    }

    fn save(&self, session: &AnalysisSession) -> Result<(), SessionStoreError> {
        let mut sessions = self.write();
        match sessions.get_mut(&session.id()) {
            Some(slot) => {
                *slot = session.clone();
                Ok(())
            }
            None => Err(SessionStoreError::NotFound(session.id())),
        }
    }

    fn load(&self, id: SessionId) -> Result<AnalysisSession, SessionStoreError> {
        self.read()
            .get(&id)
            .cloned()
            .ok_or(SessionStoreError::NotFound(id))
    }

    fn remove(&self, id: SessionId) -> Result<Option<AnalysisSession>, SessionStoreError> {
        Ok(self.write().remove(&id))
    }

    fn active_count(&self) -> usize {
        self.read().len()
    }
}
