//! Media stream WebSocket route configuration.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::handlers::media_stream::media_stream_handler;
use crate::state::AppState;

/// Create the media-stream WebSocket router
///
/// # Endpoint
///
/// `GET /media-stream` - WebSocket upgrade for one phone call
///
/// # Protocol
///
/// After the upgrade, the telephony provider sends JSON text frames
/// (`connected`, `start`, `media`, `mark`, `stop`); the server responds with
/// outbound `media` frames carrying AI audio and `mark` frames used to track
/// playback progress. Closing either side ends the call.
pub fn create_media_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/media-stream", get(media_stream_handler))
        .layer(TraceLayer::new_for_http())
}
