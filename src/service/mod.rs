//! Lead capture services: validation, ingestion with retry, session gate, admin operations.

pub mod admin;
pub mod ingest;
pub mod retry;
pub mod session_gate;
pub mod session_store;
pub mod validation;

pub use admin::AdminService;
pub use ingest::{LeadIngestService, LeadSubmission};
pub use session_gate::{Identity, SessionGate, SessionToken};
pub use session_store::{MemorySessionStore, Session, SessionStore};
