use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::db::{Lead, LeadId};
use crate::error::{DeleteError, LeadboxError};
use crate::middleware::RequireSession;
use crate::router::LeadboxState;
use crate::service::LeadSubmission;

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub id: LeadId,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

#[derive(Debug, Serialize)]
pub struct LeadList {
    pub leads: Vec<Lead>,
}

/// POST /api/leads -> public form submission.
pub async fn create_lead(
    State(state): State<LeadboxState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), LeadboxError> {
    let raw = match payload {
        Ok(Json(value)) => submission_from_value(value),
        Err(rejection) if body_too_large(&rejection) => {
            return Err(LeadboxError::PayloadTooLarge);
        }
        Err(rejection) => {
            debug!("lead body rejected: {}", rejection.body_text());
            None
        }
    };
    let id = state.ingest.ingest(raw).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse { success: true, id }),
    ))
}

/// The body limit surfaces as a JSON rejection; callers turn it into a 413.
pub(crate) fn body_too_large(rejection: &JsonRejection) -> bool {
    rejection.status() == StatusCode::PAYLOAD_TOO_LARGE
}

/// An empty object or a body of the wrong shape counts as no data.
fn submission_from_value(value: Value) -> Option<LeadSubmission> {
    match value {
        Value::Object(map) if !map.is_empty() => {
            serde_json::from_value(Value::Object(map)).ok()
        }
        _ => None,
    }
}

/// GET /api/leads -> every lead, newest first.
pub async fn list_leads(
    State(state): State<LeadboxState>,
    RequireSession(who): RequireSession,
) -> Result<Json<LeadList>, LeadboxError> {
    let leads = state.admin.list_leads(&who).await?;
    Ok(Json(LeadList { leads }))
}

/// DELETE /api/leads/{id}
///
/// Ids that are not integers can never match a row, so they get the same 404.
pub async fn delete_lead(
    State(state): State<LeadboxState>,
    RequireSession(who): RequireSession,
    id: Result<Path<LeadId>, PathRejection>,
) -> Result<Json<SuccessResponse>, LeadboxError> {
    let Path(id) = id.map_err(|rejection| {
        debug!("lead id rejected: {}", rejection.body_text());
        DeleteError::MalformedId(rejection.body_text())
    })?;
    state.admin.delete_lead(&who, id).await?;
    Ok(SuccessResponse::ok())
}
