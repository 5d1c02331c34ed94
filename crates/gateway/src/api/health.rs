//! Liveness probe.

use axum::extract::State;
use axum::response::Json;
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "operations": state.registry.len(),
        "restaurants": state.restaurants.len(),
    }))
}
