//! Maps conversation keys to their sessions.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::session::Session;
use crate::types::SessionKey;

/// A session shared between the processing pass and the dispatcher.
pub type SharedSession = Arc<Mutex<Session>>;

/// Owns the key→session table.
///
/// Sessions are created lazily on first inbound message and retained for
/// process lifetime; there is no eviction. Control actions use [`lookup`]
/// and never create.
///
/// [`lookup`]: SessionRouter::lookup
#[derive(Default)]
pub struct SessionRouter {
    sessions: Mutex<HashMap<SessionKey, SharedSession>>,
}

impl SessionRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session for `key`, creating it on first contact.
    pub async fn entry(&self, key: &SessionKey) -> SharedSession {
        let mut sessions = self.sessions.lock().await;
        Arc::clone(
            sessions
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(Session::new()))),
        )
    }

    /// Returns the session for `key` if one exists.
    pub async fn lookup(&self, key: &SessionKey) -> Option<SharedSession> {
        self.sessions.lock().await.get(key).map(Arc::clone)
    }
}
