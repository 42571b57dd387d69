//! Admin route configuration.

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::admin::{admin_page, update_instructions};
use crate::middleware::admin_auth_middleware;
use crate::state::AppState;

/// Create the admin router
///
/// # Endpoints
///
/// - `GET /admin` - instruction template editor
/// - `POST /admin/instructions` - apply a template update
///
/// Both are guarded by the shared admin secret (bearer token or `?token=`
/// query parameter). With no secret configured the endpoints refuse every
/// request.
pub fn create_admin_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin", get(admin_page))
        .route("/admin/instructions", post(update_instructions))
        .layer(middleware::from_fn_with_state(state, admin_auth_middleware))
        .layer(TraceLayer::new_for_http())
}
