use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub type LeadId = i64;

/// A stored lead as returned to the admin view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub email: Option<String>,
    pub contact: Option<String>,
    pub message: Option<String>,
    pub budget: Option<String>,
    pub form_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A normalized lead ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLead {
    pub name: String,
    pub email: String,
    pub contact: String,
    pub message: String,
    pub budget: String,
    pub form_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}
