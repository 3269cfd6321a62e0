use axum::Json;
use serde_json::{Value, json};
use tracing::debug;

/// GET /health
pub async fn health() -> Json<Value> {
    debug!("Health check");
    Json(json!({ "status": "ok" }))
}
