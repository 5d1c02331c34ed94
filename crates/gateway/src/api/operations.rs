//! Operation catalog endpoint, for dashboards and debugging.

use axum::extract::State;
use axum::response::Json;
use serde_json::json;

use crate::state::AppState;

/// `GET /v1/operations` — every registered operation with its schema,
/// in registration order (the same order the model sees).
pub async fn list_operations(State(state): State<AppState>) -> Json<serde_json::Value> {
    let operations: Vec<serde_json::Value> = state
        .registry
        .specs()
        .map(|spec| {
            json!({
                "name": spec.name,
                "description": spec.description,
                "schema": spec.schema_json(),
            })
        })
        .collect();
    let count = operations.len();
    Json(json!({ "count": count, "operations": operations }))
}
