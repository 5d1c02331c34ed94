pub mod chat;
pub mod health;
pub mod operations;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/v1/chat", post(chat::chat))
        .route("/v1/operations", get(operations::list_operations))
}
