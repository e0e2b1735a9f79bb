pub mod store;

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::ClientResult;
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};

/// Local record of the authentication token and admin flag.
///
/// `is_admin` only decides what the client offers to show. The API enforces
/// authorization from the token on every privileged call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

impl Session {
    pub fn new(token: impl Into<String>, is_admin: bool) -> Self {
        Self {
            token: Some(token.into()),
            is_admin,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn is_admin(&self) -> bool {
        self.is_authenticated() && self.is_admin
    }
}

/// Shared session handle. Every mutation is written through to the store.
pub struct SessionState {
    current: RwLock<Session>,
    store: Box<dyn SessionStore>,
}

pub type SharedSession = Arc<SessionState>;

impl SessionState {
    /// Restore whatever the store holds; a missing record is an empty session
    pub fn load(store: impl SessionStore + 'static) -> ClientResult<Self> {
        let current = store.load()?;
        Ok(Self {
            current: RwLock::new(current),
            store: Box::new(store),
        })
    }

    /// Empty session backed by memory only
    pub fn in_memory() -> Self {
        Self {
            current: RwLock::new(Session::default()),
            store: Box::new(MemorySessionStore::default()),
        }
    }

    pub fn shared(self) -> SharedSession {
        Arc::new(self)
    }

    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone().filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.read().is_admin()
    }

    pub fn set_session(&self, token: impl Into<String>, is_admin: bool) -> ClientResult<()> {
        let session = Session::new(token, is_admin);
        self.store.save(&session)?;
        *self.write() = session;
        tracing::debug!(is_admin, "session stored");
        Ok(())
    }

    pub fn clear_session(&self) -> ClientResult<()> {
        // Drop the in-memory copy first so a storage failure still signs out
        *self.write() = Session::default();
        self.store.clear()?;
        tracing::debug!("session cleared");
        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Session> {
        self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Session> {
        self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let session = self.read();
        f.debug_struct("SessionState")
            .field("authenticated", &session.is_authenticated())
            .field("is_admin", &session.is_admin)
            .finish()
    }
}
