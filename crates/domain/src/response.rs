//! The two-shape model response contract and the orchestrator's reply.

use serde::{Deserialize, Serialize};

use crate::operation::ArgMap;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Model response contract
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// What the model is allowed to say, discriminated by a `type` tag.
///
/// Anything else the model emits is rejected by the response validator
/// and never reaches a handler. `missing_fields` on the ask shape is
/// advisory only — the orchestrator recomputes its own list from the
/// operation spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelResponse {
    /// The model needs more information before an operation can run.
    AskUser {
        /// Text shown to the user.
        message: String,
        /// Operation being collected for, when one has been identified.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        current_operation: Option<String>,
        /// Arguments extracted so far.
        #[serde(default, skip_serializing_if = "ArgMap::is_empty")]
        partial_arguments: ArgMap,
        /// The model's own claim of what is still needed. Ignored.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        missing_fields: Vec<String>,
    },
    /// The model believes the operation is ready to run.
    CallOperation {
        name: String,
        #[serde(default)]
        arguments: ArgMap,
    },
}

impl ModelResponse {
    /// The operation this response concerns, when it names one.
    pub fn operation(&self) -> Option<&str> {
        match self {
            ModelResponse::AskUser {
                current_operation, ..
            } => current_operation.as_deref(),
            ModelResponse::CallOperation { name, .. } => Some(name),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Orchestrator reply
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// What a turn returns to the caller.
///
/// `text` is always user-presentable: raw model output never appears
/// here, and neither do internal error strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub kind: ReplyKind,
    /// Operation asked about or executed, when one is in play.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    /// Recomputed missing required fields (ask replies only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyKind {
    Ask,
    Result,
    Error,
}

impl Reply {
    pub fn ask(
        text: impl Into<String>,
        operation: Option<String>,
        missing_fields: Vec<String>,
    ) -> Self {
        Self {
            text: text.into(),
            kind: ReplyKind::Ask,
            operation,
            missing_fields,
        }
    }

    pub fn result(text: impl Into<String>, operation: Option<String>) -> Self {
        Self {
            text: text.into(),
            kind: ReplyKind::Result,
            operation,
            missing_fields: Vec::new(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: ReplyKind::Error,
            operation: None,
            missing_fields: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ask_user_round_trips_with_tag() {
        let raw = json!({
            "type": "ask_user",
            "message": "Which day?",
            "current_operation": "update_business_hours",
            "partial_arguments": { "hours": "09:00-17:00" }
        });
        let resp: ModelResponse = serde_json::from_value(raw).unwrap();
        match &resp {
            ModelResponse::AskUser {
                message,
                current_operation,
                partial_arguments,
                ..
            } => {
                assert_eq!(message, "Which day?");
                assert_eq!(current_operation.as_deref(), Some("update_business_hours"));
                assert_eq!(partial_arguments["hours"], json!("09:00-17:00"));
            }
            other => panic!("wrong shape: {other:?}"),
        }
        assert_eq!(resp.operation(), Some("update_business_hours"));
    }

    #[test]
    fn call_operation_defaults_empty_arguments() {
        let raw = json!({ "type": "call_operation", "name": "update_prep_time" });
        let resp: ModelResponse = serde_json::from_value(raw).unwrap();
        match resp {
            ModelResponse::CallOperation { name, arguments } => {
                assert_eq!(name, "update_prep_time");
                assert!(arguments.is_empty());
            }
            other => panic!("wrong shape: {other:?}"),
        }
    }

    #[test]
    fn reply_kind_serializes_lowercase() {
        let reply = Reply::ask("Which day?", Some("update_business_hours".into()), vec![
            "day".into(),
        ]);
        let v = serde_json::to_value(&reply).unwrap();
        assert_eq!(v["kind"], "ask");
        assert_eq!(v["missing_fields"], json!(["day"]));
    }
}
