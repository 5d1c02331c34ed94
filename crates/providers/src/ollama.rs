//! Ollama chat transport.
//!
//! Talks to a local Ollama daemon over its native `/api/chat` endpoint.
//! Requests are non-streaming and ask for JSON-formatted output, since the
//! conversation layer expects exactly one JSON object per model turn.

use crate::traits::ModelTransport;
use serde_json::Value;
use tt_domain::config::ModelConfig;
use tt_domain::error::{Error, Result};
use tt_domain::message::ChatMessage;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Transport struct
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A model transport backed by an Ollama server.
pub struct OllamaTransport {
    id: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaTransport {
    /// Create a transport from the deserialized model config.
    ///
    /// A `timeout_secs` of zero disables the client-side timeout entirely.
    pub fn from_config(cfg: &ModelConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if cfg.timeout_secs > 0 {
            builder = builder.timeout(std::time::Duration::from_secs(cfg.timeout_secs));
        }
        let client = builder.build().map_err(from_reqwest)?;

        Ok(Self {
            id: "ollama".into(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            model: cfg.model.clone(),
            client,
        })
    }

    // ── Internal: build the JSON body ─────────────────────────────

    fn build_chat_body(&self, messages: &[ChatMessage]) -> Value {
        serde_json::json!({
            "model": self.model,
            "messages": messages,
            "stream": false,
            "format": "json",
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn parse_chat_response(body: &Value) -> Result<String> {
    body.get("message")
        .and_then(|m| m.get("content"))
        .and_then(|v| v.as_str())
        .map(String::from)
        .ok_or_else(|| Error::Http("ollama reply has no message.content".into()))
}

/// Map transport failures into the domain error, keeping timeouts
/// distinguishable from other HTTP trouble.
fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Http(e.to_string())
    }
}

#[async_trait::async_trait]
impl ModelTransport for OllamaTransport {
    async fn send(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);
        let body = self.build_chat_body(messages);

        tracing::debug!(
            transport = %self.id,
            url = %url,
            model = %self.model,
            messages = messages.len(),
            "ollama chat request"
        );

        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = resp.status();
        let resp_text = resp.text().await.map_err(from_reqwest)?;

        if !status.is_success() {
            return Err(Error::Http(format!(
                "ollama: HTTP {} - {}",
                status.as_u16(),
                resp_text
            )));
        }

        let resp_json: Value = serde_json::from_str(&resp_text)?;
        parse_chat_response(&resp_json)
    }

    fn transport_id(&self) -> &str {
        &self.id
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
