//! The session state machine.
//!
//! Invariants held after every transition:
//! - `status == Collecting` exactly when `current_operation` is set
//! - every collected key is declared by the current operation's spec
//! - `missing_fields` is always the recomputed difference
//!   `required(current_operation) − keys(collected_arguments)`, in
//!   declaration order — never the model's claim
//! - an idle session has no operation, no arguments, no missing fields

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tt_domain::message::Role;
use tt_domain::operation::{ArgMap, OperationSpec};

/// Rolling history keeps this many most-recent entries.
pub const HISTORY_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Idle,
    Collecting,
}

/// One user-visible line of the conversation. Raw model output that
/// failed validation never lands here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub text: String,
}

/// Conversation state for one chat, keyed by `session_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub owner_id: i64,
    pub restaurant_id: i64,
    #[serde(default)]
    pub status: SessionStatus,
    #[serde(default)]
    pub current_operation: Option<String>,
    #[serde(default)]
    pub collected_arguments: ArgMap,
    #[serde(default)]
    pub missing_fields: Vec<String>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new_idle(session_id: impl Into<String>, owner_id: i64, restaurant_id: i64) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            owner_id,
            restaurant_id,
            status: SessionStatus::Idle,
            current_operation: None,
            collected_arguments: ArgMap::new(),
            missing_fields: Vec::new(),
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_collecting(&self) -> bool {
        self.status == SessionStatus::Collecting
    }

    // ── Transitions ───────────────────────────────────────────────

    /// Enter (or stay in) collection for `spec` with exactly `args`.
    ///
    /// Used when dispatch fails and the merged arguments should survive,
    /// and as the primitive under [`merge_partials`](Self::merge_partials).
    pub fn set_collecting(&mut self, spec: &OperationSpec, args: ArgMap) {
        self.status = SessionStatus::Collecting;
        self.current_operation = Some(spec.name.clone());
        self.missing_fields = spec.missing_from(&args);
        self.collected_arguments = args;
    }

    /// Merge newly extracted partials into the collection for `spec`.
    ///
    /// Newer values win on key conflict. Switching to a different
    /// operation discards the old partials first.
    pub fn merge_partials(&mut self, spec: &OperationSpec, partials: &ArgMap) {
        let mut merged = if self.current_operation.as_deref() == Some(spec.name.as_str()) {
            self.collected_arguments.clone()
        } else {
            ArgMap::new()
        };
        for (key, value) in partials {
            merged.insert(key.clone(), value.clone());
        }
        self.set_collecting(spec, merged);
    }

    /// Back to idle: collection state cleared, history kept.
    pub fn reset_to_idle(&mut self) {
        self.status = SessionStatus::Idle;
        self.current_operation = None;
        self.collected_arguments.clear();
        self.missing_fields.clear();
    }

    /// Append one line of conversation, trimming to [`HISTORY_LIMIT`].
    pub fn push_history(&mut self, role: Role, text: impl Into<String>) {
        self.history.push(HistoryEntry {
            role,
            text: text.into(),
        });
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
        }
    }
}
