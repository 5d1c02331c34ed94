//! Argument checking and handler invocation.
//!
//! The dispatcher re-checks everything at the last gate: required
//! parameters present, every value the right JSON type, no undeclared
//! keys. A handler is never invoked with arguments that fail any of
//! these checks.

use tt_domain::error::{Error, Result};
use tt_domain::operation::{json_type_name, ArgMap, OperationSpec};

use crate::registry::Registry;

/// Identity of the turn an operation runs in. Handlers use it for
/// ownership checks; the orchestrator uses it to inject `restaurant_id`.
#[derive(Debug, Clone, Copy)]
pub struct OpContext {
    pub owner_id: i64,
    pub restaurant_id: i64,
}

/// Executes one operation. Implementations return user-presentable text;
/// failures are reported with [`Error::Handler`] and are equally
/// user-presentable.
#[async_trait::async_trait]
pub trait OperationHandler: Send + Sync {
    async fn call(&self, ctx: &OpContext, args: &ArgMap) -> Result<String>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Argument checks
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Reject undeclared keys and wrong-typed values.
///
/// Shared between the response validator (model output) and dispatch
/// (merged session arguments).
pub fn check_keys_and_types(spec: &OperationSpec, args: &ArgMap) -> Result<()> {
    for (key, value) in args {
        let param = spec.param(key).ok_or_else(|| Error::InvalidArgumentKey {
            operation: spec.name.clone(),
            key: key.clone(),
        })?;
        if !param.kind.accepts(value) {
            return Err(Error::ArgumentTypeMismatch {
                operation: spec.name.clone(),
                key: key.clone(),
                expected: param.kind.type_name().to_owned(),
                actual: json_type_name(value).to_owned(),
            });
        }
    }
    Ok(())
}

/// Reject when any required parameter is absent.
pub fn check_required(spec: &OperationSpec, args: &ArgMap) -> Result<()> {
    let missing = spec.missing_from(args);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::IncompleteArguments {
            operation: spec.name.clone(),
            missing,
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Dispatch
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

impl Registry {
    /// Validate `args` against the operation's spec and run its handler.
    pub async fn dispatch(&self, name: &str, ctx: &OpContext, args: &ArgMap) -> Result<String> {
        let registered = self.resolve(name)?;
        check_required(&registered.spec, args)?;
        check_keys_and_types(&registered.spec, args)?;

        tracing::debug!(operation = %name, restaurant_id = ctx.restaurant_id, "dispatching operation");

        match registered.handler.call(ctx, args).await {
            Ok(text) => Ok(text),
            Err(e @ Error::Handler { .. }) => Err(e),
            Err(e) => Err(Error::Handler {
                operation: name.to_owned(),
                message: e.to_string(),
            }),
        }
    }
}
