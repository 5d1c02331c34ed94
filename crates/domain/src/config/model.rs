use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Model endpoint
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Which model to talk to and how patient to be with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Base URL of the Ollama server.
    #[serde(default = "d_base_url")]
    pub base_url: String,
    /// Model name passed in the chat request (e.g. `"llama3"`).
    #[serde(default = "d_model")]
    pub model: String,
    /// Per-attempt request deadline in seconds.
    #[serde(default = "d_120")]
    pub timeout_secs: u64,
    /// Total attempts per turn (one initial call plus retries with a
    /// corrective note).
    #[serde(default = "d_3")]
    pub max_attempts: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: d_base_url(),
            model: d_model(),
            timeout_secs: 120,
            max_attempts: 3,
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_base_url() -> String {
    "http://localhost:11434".into()
}

fn d_model() -> String {
    "llama3".into()
}

fn d_120() -> u64 {
    120
}

fn d_3() -> u32 {
    3
}
