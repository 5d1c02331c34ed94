//! Typed catalog of the operations the model may invoke.
//!
//! An [`OperationSpec`] describes one invocable operation: its name, what
//! it does, and an **ordered** list of parameters. Declaration order is
//! load-bearing — prompts render parameters in this order and
//! missing-field lists follow it.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Argument object flowing between validator, session state, and dispatch.
pub type ArgMap = Map<String, Value>;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Parameter kinds
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The JSON type a parameter accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "lowercase")]
pub enum ParamKind {
    String,
    /// A whole JSON number. `3` passes, `3.5` (and `3.0`) do not.
    Integer,
    /// Any JSON number.
    Number,
    Boolean,
    /// A string restricted to a fixed set of values.
    Enum(Vec<String>),
}

impl ParamKind {
    /// Name used in prompts and mismatch messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Integer => "integer",
            ParamKind::Number => "number",
            ParamKind::Boolean => "boolean",
            ParamKind::Enum(_) => "enum",
        }
    }

    /// Whether `value` satisfies this kind.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ParamKind::String => value.is_string(),
            ParamKind::Integer => value.as_i64().is_some() || value.as_u64().is_some(),
            ParamKind::Number => value.is_number(),
            ParamKind::Boolean => value.is_boolean(),
            ParamKind::Enum(allowed) => value
                .as_str()
                .map(|s| allowed.iter().any(|a| a == s))
                .unwrap_or(false),
        }
    }

    /// JSON-schema fragment for this kind.
    fn schema(&self, description: &str) -> Value {
        match self {
            ParamKind::Enum(allowed) => json!({
                "type": "string",
                "enum": allowed,
                "description": description,
            }),
            other => json!({
                "type": other.type_name(),
                "description": description,
            }),
        }
    }
}

/// Name of the JSON type of `value`, for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Parameter + operation specs
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One parameter of an operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub description: String,
    pub kind: ParamKind,
    #[serde(default)]
    pub required: bool,
}

impl ParamSpec {
    pub fn required(
        name: impl Into<String>,
        kind: ParamKind,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            required: true,
        }
    }

    pub fn optional(
        name: impl Into<String>,
        kind: ParamKind,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            required: false,
        }
    }
}

/// An operation exposed to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationSpec {
    pub name: String,
    pub description: String,
    pub params: Vec<ParamSpec>,
}

impl OperationSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    /// Look up a parameter by name.
    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn declares(&self, name: &str) -> bool {
        self.param(name).is_some()
    }

    /// Required parameter names in declaration order.
    pub fn required_names(&self) -> impl Iterator<Item = &str> {
        self.params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
    }

    /// Required parameters not present in `args`, in declaration order.
    ///
    /// This is the single source of truth for missing-field lists; the
    /// model's own claims are never used.
    pub fn missing_from(&self, args: &ArgMap) -> Vec<String> {
        self.required_names()
            .filter(|name| !args.contains_key(*name))
            .map(String::from)
            .collect()
    }

    /// Render as a JSON-schema-shaped object for prompts:
    /// `{"type": "object", "properties": {...}, "required": [...]}`.
    pub fn schema_json(&self) -> Value {
        let mut properties = Map::new();
        for p in &self.params {
            properties.insert(p.name.clone(), p.kind.schema(&p.description));
        }
        let required: Vec<&str> = self.required_names().collect();
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}
