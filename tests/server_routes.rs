//! Server route tests
//!
//! Exercises the HTTP surface with in-process requests: the public health
//! check, the incoming-call webhook (markup, host echo and validation,
//! instruction capture), and the shared-secret gate on the admin page.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::util::ServiceExt;

use voicebridge::config::ServerConfig;
use voicebridge::routes;
use voicebridge::state::AppState;

/// Helper function to create a minimal test configuration
fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        tls: None,
        openai_api_key: "sk-test".to_string(),
        realtime_model: "gpt-4o-realtime-preview".to_string(),
        voice: "alloy".to_string(),
        temperature: 0.7,
        vad_threshold: 0.5,
        vad_prefix_padding_ms: 300,
        vad_silence_duration_ms: 500,
        greeting: None,
        instruction_template: "You are a test receptionist.".to_string(),
        schedule_url: None,
        admin_secret: Some("s3cret".to_string()),
    }
}

fn test_app(config: ServerConfig) -> (Arc<AppState>, Router) {
    let state = AppState::new(config);
    let app = routes::build_router(state.clone());
    (state, app)
}

async fn body_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, 1024 * 1024).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_health_check_is_public() {
    let (_state, app) = test_app(test_config());

    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response.into_body()).await;
    assert!(body.contains("ok"));
}

#[tokio::test]
async fn test_webhook_returns_stream_markup() {
    let (_state, app) = test_app(test_config());

    let request = Request::post("/incoming-call")
        .header(header::HOST, "bridge.example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/xml"));

    let body = body_string(response.into_body()).await;
    assert!(body.contains("<Connect>"));
    assert!(body.contains("wss://bridge.example.com/media-stream"));
}

#[tokio::test]
async fn test_webhook_accepts_get_as_well() {
    let (_state, app) = test_app(test_config());

    let request = Request::get("/incoming-call")
        .header(header::HOST, "bridge.example.com:8443")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response.into_body()).await;
    assert!(body.contains("wss://bridge.example.com:8443/media-stream"));
}

#[tokio::test]
async fn test_webhook_rejects_host_with_forbidden_characters() {
    let (_state, app) = test_app(test_config());

    let request = Request::post("/incoming-call")
        .header(header::HOST, "evil.example.com/path")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_webhook_captures_call_instructions() {
    let (state, app) = test_app(test_config());

    let request = Request::post("/incoming-call")
        .header(header::HOST, "bridge.example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(
        state.call_instructions().as_str(),
        "You are a test receptionist."
    );
}

#[tokio::test]
async fn test_admin_requires_a_token() {
    let (_state, app) = test_app(test_config());

    let response = app
        .oneshot(Request::get("/admin").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_rejects_a_wrong_token() {
    let (_state, app) = test_app(test_config());

    let response = app
        .oneshot(
            Request::get("/admin?token=nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_accepts_the_bearer_token() {
    let (_state, app) = test_app(test_config());

    let request = Request::get("/admin")
        .header(header::AUTHORIZATION, "Bearer s3cret")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response.into_body()).await;
    assert!(body.contains("You are a test receptionist."));
}

#[tokio::test]
async fn test_admin_update_replaces_the_template() {
    let (state, app) = test_app(test_config());

    let request = Request::post("/admin/instructions?token=s3cret")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("instructions=Updated+call+script"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(state.instruction_template(), "Updated call script");
}

#[tokio::test]
async fn test_admin_refuses_when_no_secret_is_configured() {
    let mut config = test_config();
    config.admin_secret = None;
    let (_state, app) = test_app(config);

    let request = Request::get("/admin?token=anything")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
