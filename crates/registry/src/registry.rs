//! The operation catalog, keyed by name, registration order preserved.

use std::collections::HashMap;
use std::sync::Arc;

use tt_domain::error::{Error, Result};
use tt_domain::operation::OperationSpec;

use crate::dispatch::OperationHandler;

/// One registered operation: its spec plus the handler that executes it.
pub struct Registered {
    pub spec: OperationSpec,
    pub(crate) handler: Arc<dyn OperationHandler>,
}

impl std::fmt::Debug for Registered {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registered")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

/// Registry of every operation the model may invoke.
///
/// Prompts list operations in registration order, so order is kept.
#[derive(Default)]
pub struct Registry {
    ops: Vec<Registered>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an operation. Fails when the name is already taken.
    pub fn register(
        &mut self,
        spec: OperationSpec,
        handler: Arc<dyn OperationHandler>,
    ) -> Result<()> {
        if self.index.contains_key(&spec.name) {
            return Err(Error::DuplicateOperation(spec.name.clone()));
        }
        tracing::debug!(operation = %spec.name, params = spec.params.len(), "operation registered");
        self.index.insert(spec.name.clone(), self.ops.len());
        self.ops.push(Registered { spec, handler });
        Ok(())
    }

    /// Resolve an operation by name.
    pub fn resolve(&self, name: &str) -> Result<&Registered> {
        self.index
            .get(name)
            .map(|&i| &self.ops[i])
            .ok_or_else(|| Error::UnknownOperation(name.to_owned()))
    }

    pub fn get_spec(&self, name: &str) -> Option<&OperationSpec> {
        self.index.get(name).map(|&i| &self.ops[i].spec)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All specs, in registration order.
    pub fn specs(&self) -> impl Iterator<Item = &OperationSpec> {
        self.ops.iter().map(|r| &r.spec)
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{OpContext, OperationHandler};
    use tt_domain::operation::ArgMap;

    struct Noop;

    #[async_trait::async_trait]
    impl OperationHandler for Noop {
        async fn call(&self, _ctx: &OpContext, _args: &ArgMap) -> Result<String> {
            Ok(String::new())
        }
    }

    fn spec(name: &str) -> OperationSpec {
        OperationSpec::new(name, "test operation")
    }

    #[test]
    fn duplicate_registration_rejected() {
        let mut reg = Registry::new();
        reg.register(spec("update_prep_time"), Arc::new(Noop)).unwrap();
        let err = reg
            .register(spec("update_prep_time"), Arc::new(Noop))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateOperation(name) if name == "update_prep_time"));
    }

    #[test]
    fn resolve_unknown_fails() {
        let reg = Registry::new();
        let err = reg.resolve("nope").unwrap_err();
        assert!(matches!(err, Error::UnknownOperation(name) if name == "nope"));
    }

    #[test]
    fn specs_keep_registration_order() {
        let mut reg = Registry::new();
        for name in ["c_op", "a_op", "b_op"] {
            reg.register(spec(name), Arc::new(Noop)).unwrap();
        }
        let names: Vec<&str> = reg.specs().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["c_op", "a_op", "b_op"]);
        assert_eq!(reg.len(), 3);
        assert!(reg.contains("a_op"));
    }
}
