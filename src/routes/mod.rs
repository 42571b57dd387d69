//! Route configuration.

pub mod admin;
pub mod media;
pub mod webhook;

use std::sync::Arc;

use axum::{Router, routing::get};

use crate::handlers;
use crate::state::AppState;

/// Assemble the full application router: public health check, the
/// incoming-call webhook, the media-stream WebSocket, and the secret-guarded
/// admin page.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::health_check))
        .merge(webhook::create_webhook_router())
        .merge(media::create_media_router())
        .merge(admin::create_admin_router(state.clone()))
        .with_state(state)
}
