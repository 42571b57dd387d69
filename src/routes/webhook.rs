//! Incoming-call webhook route configuration.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::handlers::webhook::incoming_call;
use crate::state::AppState;

/// Create the webhook router
///
/// # Endpoint
///
/// `GET|POST /incoming-call` - answered with call-control markup:
///
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <Response>
///   <Connect>
///     <Stream url="wss://{host}/media-stream" />
///   </Connect>
/// </Response>
/// ```
///
/// The telephony provider follows the markup by opening the media-stream
/// WebSocket, which carries the rest of the call.
pub fn create_webhook_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/incoming-call", get(incoming_call).post(incoming_call))
        .layer(TraceLayer::new_for_http())
}
