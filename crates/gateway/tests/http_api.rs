//! HTTP contract tests — the axum surface over a scripted engine.
//!
//! `tower::ServiceExt::oneshot` drives the real router without binding a
//! socket, so these pin status codes and wire shapes, not networking.

use std::collections::VecDeque;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tower::ServiceExt;

use tt_domain::config::Config;
use tt_domain::error::{Error, Result};
use tt_domain::message::ChatMessage;
use tt_gateway::api;
use tt_gateway::runtime::SessionLockMap;
use tt_gateway::state::AppState;
use tt_ops::{seed, RestaurantStore};
use tt_providers::ModelTransport;
use tt_registry::Registry;
use tt_sessions::MemorySessionStore;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Harness
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<String>>>,
}

#[async_trait::async_trait]
impl ModelTransport for ScriptedTransport {
    async fn send(&self, _messages: &[ChatMessage]) -> Result<String> {
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Http("script exhausted".into())))
    }

    fn transport_id(&self) -> &str {
        "scripted"
    }
}

fn harness(replies: Vec<Result<String>>) -> (axum::Router, AppState, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let restaurants = Arc::new(RestaurantStore::new(dir.path()).unwrap());
    seed::seed(&restaurants).unwrap();

    let mut registry = Registry::new();
    tt_ops::register_all(&mut registry, &restaurants).unwrap();

    let state = AppState {
        config: Arc::new(Config::default()),
        transport: Arc::new(ScriptedTransport {
            replies: Mutex::new(replies.into()),
        }),
        registry: Arc::new(registry),
        sessions: Arc::new(MemorySessionStore::new()),
        session_locks: Arc::new(SessionLockMap::new()),
        restaurants,
    };
    (api::router().with_state(state.clone()), state, dir)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_chat(payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/chat")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Routes
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn health_reports_registry_and_store_counts() {
    let (app, _state, _dir) = harness(vec![]);

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["operations"], 8);
    assert_eq!(body["restaurants"], 1);
}

#[tokio::test]
async fn operations_catalog_in_registration_order() {
    let (app, _state, _dir) = harness(vec![]);

    let response = app.oneshot(get("/v1/operations")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["count"], 8);
    let names: Vec<&str> = body["operations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|op| op["name"].as_str().unwrap())
        .collect();
    assert_eq!(names[0], "update_business_hours");
    assert!(names.contains(&"toggle_menu_item_tag"));
    assert_eq!(
        body["operations"][0]["schema"]["required"][0],
        "restaurant_id"
    );
}

#[tokio::test]
async fn chat_runs_a_turn_and_returns_the_reply() {
    let raw = json!({
        "type": "ask_user",
        "message": "Which day?",
        "current_operation": "update_business_hours",
        "partial_arguments": {},
    })
    .to_string();
    let (app, _state, _dir) = harness(vec![Ok(raw)]);

    let response = app
        .oneshot(post_chat(json!({ "message": "change my hours" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    // No session_id in the request, so the server minted one.
    assert!(!body["session_id"].as_str().unwrap().is_empty());
    assert_eq!(body["kind"], "ask");
    assert_eq!(body["text"], "Which day?");
    assert_eq!(body["operation"], "update_business_hours");
    assert_eq!(body["missing_fields"], json!(["day", "hours"]));
}

#[tokio::test]
async fn blank_message_is_rejected() {
    let (app, _state, _dir) = harness(vec![]);

    let response = app
        .oneshot(post_chat(json!({ "message": "   " })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "message must not be empty");
}

#[tokio::test]
async fn concurrent_turn_on_same_session_is_rejected() {
    let (app, state, _dir) = harness(vec![]);

    // Hold the turn permit as an in-flight turn would.
    let _held = state.session_locks.try_acquire("s1").unwrap();

    let response = app
        .oneshot(post_chat(json!({ "session_id": "s1", "message": "hello" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}
