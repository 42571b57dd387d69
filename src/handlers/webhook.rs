//! Incoming-call webhook.
//!
//! The telephony provider posts here when a call arrives. The response is an
//! XML call-control document telling the provider to open a media-stream
//! WebSocket back to this server; the request's own `Host` header is echoed
//! (after validation) to build that URL, so the bridge works unchanged behind
//! tunnels and load balancers.
//!
//! This is also the moment the per-call instruction text is captured: the
//! admin-edited template plus the freshly fetched schedule document are
//! composed and published for the stream connection that follows.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};
use tracing::{info, warn};

use crate::core::instructions::{compose_instructions, fetch_schedule};
use crate::errors::{AppError, AppResult};
use crate::state::AppState;
use crate::utils::validate_echo_host;

/// Answer the incoming-call webhook with stream-connect markup.
pub async fn incoming_call(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("missing Host header".to_string()))?;
    let host = validate_echo_host(host).map_err(|e| {
        warn!("Rejecting incoming-call webhook: {e}");
        AppError::BadRequest(e.to_string())
    })?;

    // Capture the instruction text for this call now, at webhook time.
    let template = state.instruction_template();
    let schedule = match state.config.schedule_url.as_deref() {
        Some(url) => fetch_schedule(&state.http, url).await,
        None => String::new(),
    };
    state.publish_call_instructions(compose_instructions(&template, &schedule));

    info!(host = %host, "Answering incoming-call webhook");

    let twiml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Response>
  <Connect>
    <Stream url="wss://{host}/media-stream" />
  </Connect>
</Response>
"#
    );

    Ok(([(header::CONTENT_TYPE, "text/xml")], twiml).into_response())
}
