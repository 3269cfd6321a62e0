use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef},
    middleware,
    routing::{delete, get, post},
};
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};
use std::sync::Arc;

use crate::config::Config;
use crate::db::Storage;
use crate::handlers::{admin_page, auth, health, leads};
use crate::service::{AdminService, LeadIngestService, SessionGate, SessionStore};

/// Request bodies above this size are refused with 413.
pub const BODY_LIMIT: usize = 64 * 1024;

#[derive(Clone)]
pub struct LeadboxState {
    pub ingest: LeadIngestService,
    pub admin: AdminService,
    pub gate: SessionGate,
    pub secure_cookie: bool,
    key: Key,
}

impl LeadboxState {
    pub fn new(storage: Arc<dyn Storage>, sessions: Arc<dyn SessionStore>, cfg: &Config) -> Self {
        Self {
            ingest: LeadIngestService::new(storage.clone()),
            admin: AdminService::new(storage.clone()),
            gate: SessionGate::new(storage, sessions),
            secure_cookie: cfg.secure_cookie,
            key: cookie_key(&cfg.secret_key),
        }
    }
}

impl FromRef<LeadboxState> for Key {
    fn from_ref(state: &LeadboxState) -> Self {
        state.key.clone()
    }
}

/// Cookie encryption key stretched from the configured secret of any length.
fn cookie_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

pub fn leadbox_router(state: LeadboxState) -> Router {
    Router::new()
        .route("/api/leads", post(leads::create_lead).get(leads::list_leads))
        .route("/api/leads/{id}", delete(leads::delete_lead))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/health", get(health::health))
        .route("/admin", get(admin_page::admin_page))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(middleware::from_fn(crate::middleware::log_request))
        .with_state(state)
}
