use crate::db::{LeadId, NewLead, Storage};
use crate::error::IngestError;
use crate::service::retry::{LinearBuilder, retry_on_contention};
use crate::service::validation::validate;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};

pub const DEFAULT_FORM_TYPE: &str = "inline";

/// Raw fields of a public form submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub contact: Option<String>,
    pub message: Option<String>,
    pub budget: Option<String>,
    pub form_type: Option<String>,
}

impl LeadSubmission {
    /// Trim free-text fields and apply the `form_type` default.
    pub fn normalize(self) -> NewLead {
        fn trimmed(v: Option<String>) -> String {
            v.map(|s| s.trim().to_string()).unwrap_or_default()
        }
        let form_type = self
            .form_type
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FORM_TYPE.to_string());
        NewLead {
            name: trimmed(self.name),
            email: trimmed(self.email),
            contact: trimmed(self.contact),
            message: trimmed(self.message),
            budget: trimmed(self.budget),
            form_type,
        }
    }
}

/// Validated write path from raw submission to stored lead.
#[derive(Clone)]
pub struct LeadIngestService {
    storage: Arc<dyn Storage>,
    retry_policy: LinearBuilder,
}

impl LeadIngestService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            retry_policy: LinearBuilder::default(),
        }
    }

    pub fn with_retry_policy(mut self, policy: LinearBuilder) -> Self {
        self.retry_policy = policy;
        self
    }

    pub async fn ingest(&self, raw: Option<LeadSubmission>) -> Result<LeadId, IngestError> {
        let Some(raw) = raw else {
            warn!("Create lead: no data provided");
            return Err(IngestError::NoData);
        };
        let lead = raw.normalize();

        if let Some(reason) = validate(
            Some(&lead.name),
            Some(&lead.email),
            Some(&lead.contact),
            Some(&lead.message),
        ) {
            warn!("Create lead: validation failed - {}", reason);
            return Err(IngestError::Invalid(reason));
        }

        match retry_on_contention(|| self.storage.insert_lead(&lead), self.retry_policy).await {
            Ok(id) => {
                info!(id, name = %lead.name, form_type = %lead.form_type, "Lead created");
                Ok(id)
            }
            Err(e) if e.is_lock_contention() => {
                error!("Failed to create lead after all retries: {}", e);
                Err(IngestError::StorageUnavailable)
            }
            Err(e) => {
                error!("Database error creating lead: {}", e);
                Err(IngestError::StorageFailure(e))
            }
        }
    }
}
