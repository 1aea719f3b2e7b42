//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/cards/:card_id", get(snapshot_handler))
        .route("/cards/:card_id/start", post(start_handler))
        .route("/cards/:card_id/pause", post(pause_handler))
        .route("/cards/:card_id/lap", post(lap_handler))
        .route("/cards/:card_id/reset", post(reset_handler))
        .route("/cards/:card_id/laps/clear", post(clear_laps_handler))
        .route("/cards/:card_id/mode", post(mode_handler))
        .route("/cards/:card_id/target", post(target_handler))
        .route("/cards/:card_id/key", post(key_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        let state = Arc::new(AppState::new("127.0.0.1".to_string(), 4217, 2, 600, 70.0));
        create_router(state)
    }

    fn post(uri: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app().oneshot(get_req("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_unknown_card_is_404() {
        let response = app().oneshot(post("/cards/9/start")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_start_returns_running_snapshot() {
        let response = app().oneshot(post("/cards/1/start")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["message"], "Timer started");
        assert_eq!(json["card"]["run_state"], "running");
        assert_eq!(json["card"]["status"], "Running");
        assert_eq!(json["card"]["controls"]["start"], false);
        assert_eq!(json["card"]["controls"]["pause"], true);
    }

    #[tokio::test]
    async fn test_pause_without_running_is_ignored() {
        let response = app().oneshot(post("/cards/1/pause")).await.unwrap();
        let json = body_json(response).await;
        assert_eq!(json["status"], "ignored");
        assert_eq!(json["card"]["run_state"], "idle");
    }

    #[tokio::test]
    async fn test_mode_change_while_running_is_rejected() {
        let app = app();
        app.clone().oneshot(post("/cards/1/start")).await.unwrap();

        let response = app
            .oneshot(post_json("/cards/1/mode", r#"{"mode":"countdown"}"#))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["status"], "rejected");
        assert_eq!(json["error"], "mode_change_rejected");
        // Snapshot reports the unchanged mode so the client reverts
        assert_eq!(json["card"]["mode"], "countup");
        assert_eq!(json["card"]["run_state"], "running");
    }

    #[tokio::test]
    async fn test_target_applies_to_countdown() {
        let app = app();
        app.clone()
            .oneshot(post_json("/cards/1/mode", r#"{"mode":"countdown"}"#))
            .await
            .unwrap();

        let response = app
            .oneshot(post_json("/cards/1/target", r#"{"target":"01:30"}"#))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["card"]["target_seconds"], 90);
        assert_eq!(json["card"]["seconds"], 90);
        assert_eq!(json["card"]["display"], "01:30");
    }

    #[tokio::test]
    async fn test_invalid_target_is_rejected() {
        let response = app()
            .oneshot(post_json("/cards/1/target", r#"{"target":"99:99"}"#))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["status"], "rejected");
        assert_eq!(json["error"], "invalid_format");
        assert_eq!(json["card"]["target_seconds"], 600);
    }

    #[tokio::test]
    async fn test_space_key_toggles_start_and_pause() {
        let app = app();
        let response = app
            .clone()
            .oneshot(post_json("/cards/1/key", r#"{"key":" "}"#))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["message"], "Timer started");

        let response = app
            .oneshot(post_json("/cards/1/key", r#"{"key":" "}"#))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["message"], "Timer paused");
        assert_eq!(json["card"]["run_state"], "paused");
    }

    #[tokio::test]
    async fn test_uppercase_key_maps_and_unknown_key_ignored() {
        let app = app();
        let response = app
            .clone()
            .oneshot(post_json("/cards/1/key", r#"{"key":"R"}"#))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["message"], "Timer reset");

        let response = app
            .oneshot(post_json("/cards/1/key", r#"{"key":"x"}"#))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["status"], "ignored");
        assert_eq!(json["message"], "Key not mapped");
    }

    #[tokio::test]
    async fn test_cards_are_independent_and_status_aggregates() {
        let app = app();
        app.clone().oneshot(post("/cards/2/start")).await.unwrap();

        let response = app.oneshot(get_req("/status")).await.unwrap();
        let json = body_json(response).await;
        assert_eq!(json["cards"][0]["run_state"], "idle");
        assert_eq!(json["cards"][1]["run_state"], "running");
        assert_eq!(json["last_action"], "card-2:start");
        // The shared feedback service retained card 2's start toast
        assert_eq!(json["last_toast"]["card"], "card-2");
        assert_eq!(json["last_toast"]["message"], "Timer started");
        assert_eq!(json["alarms_sounded"], 0);
    }

    #[tokio::test]
    async fn test_snapshot_endpoint() {
        let response = app().oneshot(get_req("/cards/1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["card"], "card-1");
        assert_eq!(json["display"], "00:00");
        assert_eq!(json["ring_radius"], 70.0);
    }
}
