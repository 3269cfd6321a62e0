//! Database module: models, schema and the storage seam used by the services.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database
//! - `sqlite.rs`: the SQLite-backed `Storage`

pub mod models;
pub mod schema;
pub mod sqlite;

#[cfg(test)]
pub(crate) mod memory;

pub use models::{AdminUser, Lead, LeadId, NewLead};
pub use schema::SQLITE_INIT;
pub use sqlite::SqliteStorage;

use crate::error::StorageError;
use async_trait::async_trait;

/// Row-level operations over `leads` and `admin_users`.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Insert one lead; returns the storage-assigned id.
    async fn insert_lead(&self, lead: &NewLead) -> Result<LeadId, StorageError>;

    /// All leads, newest first.
    async fn list_leads(&self) -> Result<Vec<Lead>, StorageError>;

    /// Delete by id; returns whether a row was removed.
    async fn delete_lead(&self, id: LeadId) -> Result<bool, StorageError>;

    async fn get_admin_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AdminUser>, StorageError>;

    async fn count_admins(&self) -> Result<i64, StorageError>;

    /// Insert an admin unless the username already exists. Returns whether a row was added.
    async fn insert_admin(&self, username: &str, password_hash: &str)
    -> Result<bool, StorageError>;
}
