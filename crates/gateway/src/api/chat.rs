//! Chat API — one conversational turn per request.
//!
//! `POST /v1/chat` feeds the message through [`process_message`] and
//! returns the reply. Model trouble never surfaces as an HTTP error;
//! only session-store I/O does.

use axum::extract::State;
use axum::response::{IntoResponse, Json};
use serde::{Deserialize, Serialize};

use tt_domain::response::Reply;

use crate::runtime::{process_message, TurnInput};
use crate::state::AppState;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request / response shapes
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Session to continue. Absent: a fresh session is started and its
    /// ID returned in the response.
    #[serde(default)]
    pub session_id: Option<String>,
    /// User message text.
    pub message: String,
    #[serde(default = "d_owner_id")]
    pub owner_id: i64,
    #[serde(default = "d_restaurant_id")]
    pub restaurant_id: i64,
}

fn d_owner_id() -> i64 {
    1
}

fn d_restaurant_id() -> i64 {
    1
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub reply: Reply,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /v1/chat
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> impl IntoResponse {
    if body.message.trim().is_empty() {
        return (
            axum::http::StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "message must not be empty" })),
        )
            .into_response();
    }

    let session_id = body
        .session_id
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    // One turn at a time per session; a concurrent call gets 429 instead
    // of interleaving.
    let _permit = match state.session_locks.try_acquire(&session_id) {
        Ok(permit) => permit,
        Err(busy) => {
            return (
                axum::http::StatusCode::TOO_MANY_REQUESTS,
                Json(serde_json::json!({ "error": busy.to_string() })),
            )
                .into_response();
        }
    };

    let input = TurnInput {
        session_id: session_id.clone(),
        owner_id: body.owner_id,
        restaurant_id: body.restaurant_id,
        message: body.message,
    };

    match process_message(&state, input).await {
        Ok(reply) => Json(ChatResponse { session_id, reply }).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "turn failed");
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "internal error, see server logs" })),
            )
                .into_response()
        }
    }
}
