//! In-memory `Storage` for service and router tests.

use crate::db::Storage;
use crate::db::models::{AdminUser, Lead, LeadId, NewLead};
use crate::error::StorageError;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
struct Inner {
    leads: Vec<Lead>,
    admins: Vec<AdminUser>,
    next_lead_id: LeadId,
    /// Remaining insert attempts that report lock contention.
    busy_inserts: usize,
    /// Every insert fails with a non-retryable error.
    broken_inserts: bool,
    insert_attempts: usize,
}

#[derive(Default)]
pub(crate) struct MemoryStorage {
    inner: Mutex<Inner>,
    calls: AtomicUsize,
}

impl MemoryStorage {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The next `n` inserts fail as if the write lock were held.
    pub(crate) fn with_busy_inserts(self, n: usize) -> Self {
        self.inner.lock().unwrap().busy_inserts = n;
        self
    }

    pub(crate) fn with_broken_inserts(self) -> Self {
        self.inner.lock().unwrap().broken_inserts = true;
        self
    }

    /// Total calls made through the `Storage` trait.
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn insert_attempts(&self) -> usize {
        self.inner.lock().unwrap().insert_attempts
    }

    pub(crate) fn lead_count(&self) -> usize {
        self.inner.lock().unwrap().leads.len()
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn insert_lead(&self, lead: &NewLead) -> Result<LeadId, StorageError> {
        self.touch();
        let mut inner = self.inner.lock().unwrap();
        inner.insert_attempts += 1;
        if inner.broken_inserts {
            return Err(StorageError::Database(sqlx::Error::Protocol(
                "disk I/O error".into(),
            )));
        }
        if inner.busy_inserts > 0 {
            inner.busy_inserts -= 1;
            return Err(StorageError::Busy("database is locked".into()));
        }
        inner.next_lead_id += 1;
        let id = inner.next_lead_id;
        // distinct, increasing timestamps
        let created_at = Utc::now() + Duration::milliseconds(id);
        inner.leads.push(Lead {
            id,
            name: lead.name.clone(),
            email: Some(lead.email.clone()),
            contact: Some(lead.contact.clone()),
            message: Some(lead.message.clone()),
            budget: Some(lead.budget.clone()),
            form_type: Some(lead.form_type.clone()),
            created_at,
        });
        Ok(id)
    }

    async fn list_leads(&self) -> Result<Vec<Lead>, StorageError> {
        self.touch();
        let mut leads = self.inner.lock().unwrap().leads.clone();
        leads.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(leads)
    }

    async fn delete_lead(&self, id: LeadId) -> Result<bool, StorageError> {
        self.touch();
        let mut inner = self.inner.lock().unwrap();
        let before = inner.leads.len();
        inner.leads.retain(|l| l.id != id);
        Ok(inner.leads.len() < before)
    }

    async fn get_admin_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AdminUser>, StorageError> {
        self.touch();
        let inner = self.inner.lock().unwrap();
        Ok(inner.admins.iter().find(|a| a.username == username).cloned())
    }

    async fn count_admins(&self) -> Result<i64, StorageError> {
        self.touch();
        Ok(self.inner.lock().unwrap().admins.len() as i64)
    }

    async fn insert_admin(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<bool, StorageError> {
        self.touch();
        let mut inner = self.inner.lock().unwrap();
        if inner.admins.iter().any(|a| a.username == username) {
            return Ok(false);
        }
        let id = inner.admins.len() as i64 + 1;
        inner.admins.push(AdminUser {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        });
        Ok(true)
    }
}
