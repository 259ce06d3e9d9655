//! Session store holding the authenticated-user context shared by every authenticated call.
//!
//! A cloneable handle over one `Session`; repositories read it per call and
//! login/logout replace it wholesale.

use std::sync::{Arc, RwLock};

use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: String,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_session(&self, token: impl Into<String>, user_id: impl Into<String>) {
        let session = Session {
            token: token.into(),
            user_id: user_id.into(),
        };
        debug!(user_id = %session.user_id, "Session replaced");
        *self.write() = session;
    }

    pub fn clear(&self) {
        debug!("Session cleared");
        *self.write() = Session::default();
    }

    /// Snapshot of the latest session value.
    pub fn current(&self) -> Session {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_authenticated()
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Session> {
        // A panicking writer can only have left a whole Session behind.
        self.inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
