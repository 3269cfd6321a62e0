use axum::{extract::State, response::Html};
use axum_extra::extract::cookie::PrivateCookieJar;

use crate::middleware::session::session_token;
use crate::router::LeadboxState;

const LOGIN_HTML: &str = include_str!("../../assets/login.html");
const DASHBOARD_HTML: &str = include_str!("../../assets/dashboard.html");

/// GET /admin -> dashboard for a logged-in admin, login form otherwise.
pub async fn admin_page(
    State(state): State<LeadboxState>,
    jar: PrivateCookieJar,
) -> Html<&'static str> {
    let token = session_token(&jar);
    match state.gate.require_session(token.as_deref()).await {
        Ok(_) => Html(DASHBOARD_HTML),
        Err(_) => Html(LOGIN_HTML),
    }
}
