//! Server-side session state keyed by an opaque token.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

/// Default lifetime of a stored session.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub logged_in: bool,
    pub username: String,
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, token: &str) -> Option<Session>;

    async fn set(&self, token: &str, session: Session);

    /// Remove the session; returns what was stored, if anything.
    async fn clear(&self, token: &str) -> Option<Session>;
}

#[derive(Debug)]
struct Entry {
    session: Session,
    issued_at: Instant,
}

/// Process-local store; sessions do not survive a restart.
///
/// Entries older than the ttl read as absent and are swept whenever a new
/// session is stored, so abandoned logins do not accumulate.
#[derive(Debug)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Entry>>,
    ttl: Duration,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Stored entries, expired ones included until the next sweep.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn expired(&self, entry: &Entry, now: Instant) -> bool {
        now.duration_since(entry.issued_at) >= self.ttl
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, token: &str) -> Option<Session> {
        let now = Instant::now();
        self.sessions
            .read()
            .await
            .get(token)
            .filter(|entry| !self.expired(entry, now))
            .map(|entry| entry.session.clone())
    }

    async fn set(&self, token: &str, session: Session) {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !self.expired(entry, now));
        let swept = before - sessions.len();
        if swept > 0 {
            debug!(swept, "expired sessions removed");
        }
        sessions.insert(
            token.to_string(),
            Entry {
                session,
                issued_at: now,
            },
        );
    }

    async fn clear(&self, token: &str) -> Option<Session> {
        let now = Instant::now();
        self.sessions
            .write()
            .await
            .remove(token)
            .filter(|entry| !self.expired(entry, now))
            .map(|entry| entry.session)
    }
}
