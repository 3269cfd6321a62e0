use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;

use crate::error::LeadboxError;
use crate::handlers::leads::{SuccessResponse, body_too_large};
use crate::middleware::RequireSession;
use crate::middleware::session::{clear_session_cookie, session_token, store_session_cookie};
use crate::router::LeadboxState;

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// POST /api/login -> verifies credentials and sets the session cookie.
pub async fn login(
    State(state): State<LeadboxState>,
    jar: PrivateCookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(PrivateCookieJar, Json<SuccessResponse>), LeadboxError> {
    let creds = match payload {
        Ok(Json(creds)) => creds,
        Err(rejection) if body_too_large(&rejection) => {
            return Err(LeadboxError::PayloadTooLarge);
        }
        Err(_) => LoginRequest::default(),
    };
    let token = state.gate.authenticate(&creds.username, &creds.password).await?;

    // a fresh login replaces whatever session the browser held
    state.gate.logout(session_token(&jar).as_deref()).await;
    let jar = store_session_cookie(jar, token, state.secure_cookie);
    Ok((jar, SuccessResponse::ok()))
}

/// POST /api/logout
pub async fn logout(
    State(state): State<LeadboxState>,
    RequireSession(_who): RequireSession,
    jar: PrivateCookieJar,
) -> (PrivateCookieJar, Json<SuccessResponse>) {
    state.gate.logout(session_token(&jar).as_deref()).await;
    (clear_session_cookie(jar), SuccessResponse::ok())
}
