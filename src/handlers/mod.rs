//! HTTP and WebSocket handlers.

pub mod admin;
pub mod media_stream;
pub mod webhook;

use axum::Json;
use serde_json::{Value, json};

/// Liveness probe.
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "voicebridge" }))
}
