//! Credential verification and session checks for the admin endpoints.

use crate::db::Storage;
use crate::error::AuthError;
use crate::service::session_store::{Session, SessionStore};
use rand::distr::{Alphanumeric, SampleString};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

const TOKEN_LEN: usize = 64;

/// Opaque token handed to the client; the session itself stays server-side.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    fn generate() -> Self {
        Self(Alphanumeric.sample_string(&mut rand::rng(), TOKEN_LEN))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

/// Proof of an authenticated session. Only the gate can mint one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    username: String,
}

impl Identity {
    pub fn username(&self) -> &str {
        &self.username
    }
}

#[derive(Clone)]
pub struct SessionGate {
    storage: Arc<dyn Storage>,
    sessions: Arc<dyn SessionStore>,
    hash_cost: u32,
}

impl SessionGate {
    pub fn new(storage: Arc<dyn Storage>, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            storage,
            sessions,
            hash_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// bcrypt cost used when seeding accounts.
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    /// Verify credentials and open a session.
    ///
    /// Unknown users and wrong passwords both yield `InvalidCredentials`.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<SessionToken, AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            warn!("Login attempt: missing credentials");
            return Err(AuthError::MissingCredentials);
        }

        let Some(admin) = self.storage.get_admin_by_username(username).await? else {
            warn!(username, "Login failed: invalid credentials");
            return Err(AuthError::InvalidCredentials);
        };

        let password = password.to_string();
        let hash = admin.password_hash;
        let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        if !verified {
            warn!(username, "Login failed: invalid credentials");
            return Err(AuthError::InvalidCredentials);
        }

        let token = SessionToken::generate();
        self.sessions
            .set(
                token.as_str(),
                Session {
                    logged_in: true,
                    username: username.to_string(),
                },
            )
            .await;
        info!(username, "Login successful");
        Ok(token)
    }

    /// Resolve the caller's session; anything but an active login is `Unauthorized`.
    pub async fn require_session(&self, token: Option<&str>) -> Result<Identity, AuthError> {
        let token = token.ok_or(AuthError::Unauthorized)?;
        match self.sessions.get(token).await {
            Some(Session {
                logged_in: true,
                username,
            }) => Ok(Identity { username }),
            _ => Err(AuthError::Unauthorized),
        }
    }

    /// Drop the caller's session. Safe to call repeatedly.
    pub async fn logout(&self, token: Option<&str>) {
        let Some(token) = token else {
            return;
        };
        if let Some(session) = self.sessions.clear(token).await {
            info!(username = %session.username, "Logout");
        }
    }

    /// Seed `username` when no admin account exists yet. Returns whether one was created.
    pub async fn ensure_default_admin(
        &self,
        username: &str,
        password: &str,
    ) -> Result<bool, AuthError> {
        if self.storage.count_admins().await? > 0 {
            return Ok(false);
        }
        let password = password.to_string();
        let cost = self.hash_cost;
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        let created = self.storage.insert_admin(username, &hash).await?;
        if created {
            info!(username, "Default admin user created");
        }
        Ok(created)
    }
}
