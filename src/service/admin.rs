use crate::db::{Lead, LeadId, Storage};
use crate::error::{DeleteError, StorageError};
use crate::service::session_gate::Identity;
use std::sync::Arc;
use tracing::{info, warn};

/// Authenticated reads and deletes over `leads`.
///
/// Every operation takes an `Identity`, so callers must have passed the
/// session gate first.
#[derive(Clone)]
pub struct AdminService {
    storage: Arc<dyn Storage>,
}

impl AdminService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list_leads(&self, who: &Identity) -> Result<Vec<Lead>, StorageError> {
        let leads = self.storage.list_leads().await?;
        info!(
            count = leads.len(),
            username = who.username(),
            "Leads listed"
        );
        Ok(leads)
    }

    pub async fn delete_lead(&self, who: &Identity, id: LeadId) -> Result<(), DeleteError> {
        if !self.storage.delete_lead(id).await? {
            warn!(id, "Lead not found for deletion");
            return Err(DeleteError::NotFound(id));
        }
        info!(id, username = who.username(), "Lead deleted");
        Ok(())
    }
}
