pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod service;

pub use error::LeadboxError;
pub use router::{LeadboxState, leadbox_router};
