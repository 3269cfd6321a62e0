use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};

use crate::error::{AuthError, LeadboxError};
use crate::router::LeadboxState;
use crate::service::{Identity, SessionToken};

pub(crate) const SESSION_COOKIE: &str = "leadbox_session";

/// Extractor for protected routes: resolves the session cookie through the
/// session gate or rejects with 401 before the handler runs.
#[derive(Debug, Clone)]
pub struct RequireSession(pub Identity);

impl FromRequestParts<LeadboxState> for RequireSession {
    type Rejection = LeadboxError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &LeadboxState,
    ) -> Result<Self, Self::Rejection> {
        let jar = match PrivateCookieJar::<Key>::from_request_parts(parts, state).await {
            Ok(jar) => jar,
            Err(never) => match never {},
        };
        let token = session_token(&jar);
        state
            .gate
            .require_session(token.as_deref())
            .await
            .map(RequireSession)
            .map_err(|_| LeadboxError::Auth(AuthError::Unauthorized))
    }
}

/// Token carried by the (decrypted) session cookie, if any.
pub fn session_token(jar: &PrivateCookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_owned())
}

pub fn store_session_cookie(
    jar: PrivateCookieJar,
    token: SessionToken,
    secure: bool,
) -> PrivateCookieJar {
    jar.add(build_cookie(SESSION_COOKIE, token.into_inner(), secure))
}

pub fn clear_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(clear_cookie(SESSION_COOKIE))
}

// No max-age: the cookie lives for the browser session.
fn build_cookie(name: &str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build(Cookie::new(name.to_string(), value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

fn clear_cookie(name: &str) -> Cookie<'static> {
    Cookie::build(Cookie::new(name.to_string(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
