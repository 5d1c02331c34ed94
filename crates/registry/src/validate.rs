//! Strict validation of raw model output against the response contract.
//!
//! Every failure maps to a precise error variant so the gateway can tell
//! the model exactly what it got wrong. Nothing is silently coerced: a
//! reply that is not one of the two contract shapes is rejected, not
//! downgraded to a chat message.

use serde_json::{Map, Value};

use tt_domain::error::{Error, Result};
use tt_domain::operation::{json_type_name, ArgMap};
use tt_domain::response::ModelResponse;

use crate::dispatch::check_keys_and_types;
use crate::registry::Registry;

/// Validate one raw model reply.
///
/// `expected_operation` is the session's current operation, when it is
/// collecting: an `ask_user` naming a *different* operation is a contract
/// violation (topic switches go through `call_operation`).
pub fn validate_response(
    raw: &str,
    registry: &Registry,
    expected_operation: Option<&str>,
) -> Result<ModelResponse> {
    let cleaned = strip_code_fences(raw);
    let value: Value = serde_json::from_str(cleaned)
        .map_err(|e| Error::MalformedOutput(format!("not valid JSON: {e}")))?;
    let obj = value.as_object().ok_or_else(|| {
        Error::MalformedOutput(format!("expected an object, got {}", json_type_name(&value)))
    })?;

    let tag = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::MalformedOutput("missing string field 'type'".into()))?;

    match tag {
        "ask_user" => validate_ask_user(obj, registry, expected_operation),
        "call_operation" => validate_call_operation(obj, registry),
        other => Err(Error::UnknownResponseType(other.to_owned())),
    }
}

/// Models wrap JSON in Markdown fences even when told not to.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Per-shape checks
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn validate_ask_user(
    obj: &Map<String, Value>,
    registry: &Registry,
    expected_operation: Option<&str>,
) -> Result<ModelResponse> {
    let message = obj
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| {
            Error::MalformedOutput("ask_user requires a non-empty string 'message'".into())
        })?
        .to_owned();

    let current_operation = match obj.get("current_operation") {
        None | Some(Value::Null) => None,
        Some(Value::String(name)) => {
            if !registry.contains(name) {
                return Err(Error::UnknownOperation(name.clone()));
            }
            if let Some(expected) = expected_operation {
                if name != expected {
                    return Err(Error::MalformedOutput(format!(
                        "ask_user names operation '{name}' but the conversation is \
                         collecting '{expected}'; call the new operation instead of \
                         asking under a different name"
                    )));
                }
            }
            Some(name.clone())
        }
        Some(other) => {
            return Err(Error::MalformedOutput(format!(
                "'current_operation' must be a string, got {}",
                json_type_name(other)
            )))
        }
    };

    let partial_arguments: ArgMap = match obj.get("partial_arguments") {
        None | Some(Value::Null) => ArgMap::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(other) => {
            return Err(Error::MalformedOutput(format!(
                "'partial_arguments' must be an object, got {}",
                json_type_name(other)
            )))
        }
    };

    if !partial_arguments.is_empty() {
        // Partials are attributed to the named operation, falling back to
        // the one the session is collecting.
        match current_operation.as_deref().or(expected_operation) {
            Some(op) => {
                let registered = registry.resolve(op)?;
                check_keys_and_types(&registered.spec, &partial_arguments)?;
            }
            None => {
                let key = partial_arguments.keys().next().cloned().unwrap_or_default();
                return Err(Error::InvalidArgumentKey {
                    operation: "none".into(),
                    key,
                });
            }
        }
    }

    let missing_fields = match obj.get("missing_fields") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect(),
        Some(other) => {
            return Err(Error::MalformedOutput(format!(
                "'missing_fields' must be an array, got {}",
                json_type_name(other)
            )))
        }
    };

    Ok(ModelResponse::AskUser {
        message,
        current_operation,
        partial_arguments,
        missing_fields,
    })
}

fn validate_call_operation(
    obj: &Map<String, Value>,
    registry: &Registry,
) -> Result<ModelResponse> {
    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| {
            Error::MalformedOutput("call_operation requires a string 'name'".into())
        })?
        .to_owned();

    let registered = registry.resolve(&name)?;

    let arguments: ArgMap = match obj.get("arguments") {
        None | Some(Value::Null) => ArgMap::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(other) => {
            return Err(Error::MalformedOutput(format!(
                "'arguments' must be an object, got {}",
                json_type_name(other)
            )))
        }
    };

    check_keys_and_types(&registered.spec, &arguments)?;

    Ok(ModelResponse::CallOperation { name, arguments })
}
