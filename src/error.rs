use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

use crate::service::validation::Rejection;

/// SQLite primary result codes for a held write lock.
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

/// Failures reported by the storage layer, split by whether they are worth retrying.
#[derive(Debug, ThisError)]
pub enum StorageError {
    #[error("database is locked: {0}")]
    Busy(String),

    #[error("database error: {0}")]
    Database(#[source] SqlxError),
}

impl StorageError {
    /// True for transient single-writer lock contention.
    pub fn is_lock_contention(&self) -> bool {
        matches!(self, StorageError::Busy(_))
    }
}

impl From<SqlxError> for StorageError {
    fn from(e: SqlxError) -> Self {
        match &e {
            SqlxError::PoolTimedOut => StorageError::Busy(e.to_string()),
            SqlxError::Database(db_err) => {
                let primary_code = db_err
                    .code()
                    .and_then(|c| c.parse::<i32>().ok())
                    .map(|c| c & 0xff);
                let locked_message = db_err.message().to_lowercase().contains("database is locked");
                if matches!(primary_code, Some(SQLITE_BUSY | SQLITE_LOCKED)) || locked_message {
                    StorageError::Busy(db_err.message().to_string())
                } else {
                    StorageError::Database(e)
                }
            }
            _ => StorageError::Database(e),
        }
    }
}

#[derive(Debug, ThisError)]
pub enum IngestError {
    #[error("No data provided")]
    NoData,

    #[error("{0}")]
    Invalid(Rejection),

    #[error("storage failure: {0}")]
    StorageFailure(StorageError),

    #[error("storage unavailable after retries")]
    StorageUnavailable,
}

#[derive(Debug, ThisError)]
pub enum AuthError {
    #[error("Username and password required")]
    MissingCredentials,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("credential lookup failed: {0}")]
    Storage(#[from] StorageError),

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

#[derive(Debug, ThisError)]
pub enum DeleteError {
    #[error("Lead not found: {0}")]
    NotFound(i64),

    #[error("Lead not found: malformed id {0}")]
    MalformedId(String),

    #[error("delete failed: {0}")]
    Storage(#[from] StorageError),
}

/// Errors surfaced at the HTTP boundary.
#[derive(Debug, ThisError)]
pub enum LeadboxError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Delete(#[from] DeleteError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("request body too large")]
    PayloadTooLarge,

    #[error("internal error: {0}")]
    Internal(String),
}

const MSG_DB_ERROR: &str = "Database error";
const MSG_DB_UNAVAILABLE: &str = "Database temporarily unavailable";
const MSG_INTERNAL: &str = "Internal server error";

fn storage_status(e: &StorageError) -> (StatusCode, String) {
    if e.is_lock_contention() {
        (StatusCode::SERVICE_UNAVAILABLE, MSG_DB_UNAVAILABLE.to_string())
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, MSG_DB_ERROR.to_string())
    }
}

impl LeadboxError {
    /// Status code and client-facing message. Server-side detail never leaks here.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            LeadboxError::Ingest(e) => match e {
                IngestError::NoData => (StatusCode::BAD_REQUEST, e.to_string()),
                IngestError::Invalid(reason) => (StatusCode::BAD_REQUEST, reason.to_string()),
                IngestError::StorageFailure(inner) => storage_status(inner),
                IngestError::StorageUnavailable => {
                    (StatusCode::SERVICE_UNAVAILABLE, MSG_DB_UNAVAILABLE.to_string())
                }
            },
            LeadboxError::Auth(e) => match e {
                AuthError::MissingCredentials => (StatusCode::BAD_REQUEST, e.to_string()),
                AuthError::InvalidCredentials | AuthError::Unauthorized => {
                    (StatusCode::UNAUTHORIZED, e.to_string())
                }
                AuthError::Storage(inner) => storage_status(inner),
                AuthError::Hashing(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL.to_string())
                }
            },
            LeadboxError::Delete(e) => match e {
                DeleteError::NotFound(_) | DeleteError::MalformedId(_) => {
                    (StatusCode::NOT_FOUND, "Lead not found".to_string())
                }
                DeleteError::Storage(inner) => storage_status(inner),
            },
            LeadboxError::Storage(e) => storage_status(e),
            LeadboxError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Request body too large".to_string(),
            ),
            LeadboxError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL.to_string())
            }
        }
    }
}

impl IntoResponse for LeadboxError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            error!(status = %status, error = %self, "request failed");
        }
        (status, Json(ApiErrorResponse { error: message })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: String,
}
