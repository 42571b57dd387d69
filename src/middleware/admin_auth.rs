//! Shared-secret authentication for the admin endpoints.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::state::AppState;

/// Extract the admin token from a request.
///
/// Supports two token sources for browser compatibility:
/// 1. Authorization header: `Authorization: Bearer <token>` (preferred)
/// 2. Query parameter: `?token=<token>` (for plain links and form posts)
fn extract_token(request: &Request) -> Option<String> {
    if let Some(header) = request.headers().get("authorization")
        && let Ok(value) = header.to_str()
        && let Some(token) = value.strip_prefix("Bearer ")
    {
        debug!("Admin token extracted from Authorization header");
        return Some(token.to_string());
    }

    if let Some(query) = request.uri().query() {
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if key == "token" {
                debug!("Admin token extracted from query parameter");
                return Some(value.into_owned());
            }
        }
    }

    None
}

/// Middleware guarding the admin endpoints with a single shared secret.
///
/// Requests are refused outright when no secret is configured; the comparison
/// is constant-time when one is.
pub async fn admin_auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(secret) = state.config.admin_secret.as_deref() else {
        warn!("Admin endpoint requested but no admin secret is configured");
        return Err(AppError::Unauthorized(
            "admin secret not configured".to_string(),
        ));
    };

    let token = extract_token(&request)
        .ok_or_else(|| AppError::Unauthorized("missing admin token".to_string()))?;

    if bool::from(token.as_bytes().ct_eq(secret.as_bytes())) {
        Ok(next.run(request).await)
    } else {
        warn!("Admin authentication failed: token mismatch");
        Err(AppError::Unauthorized("invalid admin token".to_string()))
    }
}
