//! Host-provided extern functions and their registry.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::HostError;
use crate::model::Value;

/// Contract for a host function: typed arguments in, optional result out.
/// The host side checks its own argument types; the interpreter does not
/// coerce.
pub type ExternFn = dyn Fn(&[Value]) -> Result<Option<Value>, HostError> + Send + Sync;

/// Two-level registry of host functions: module name, then item name.
#[derive(Clone, Default)]
pub struct Externs {
    map: HashMap<String, HashMap<String, Arc<ExternFn>>>,
}

impl Externs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `f` under `module`.`name`, replacing any previous entry.
    pub fn register<F>(&mut self, module: impl Into<String>, name: impl Into<String>, f: F)
    where
        F: Fn(&[Value]) -> Result<Option<Value>, HostError> + Send + Sync + 'static,
    {
        self.map
            .entry(module.into())
            .or_default()
            .insert(name.into(), Arc::new(f));
    }

    pub fn resolve(&self, module: &str, name: &str) -> Option<&Arc<ExternFn>> {
        self.map.get(module)?.get(name)
    }
}

impl std::fmt::Debug for Externs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<String> = self
            .map
            .iter()
            .flat_map(|(m, inner)| inner.keys().map(move |n| format!("{m}.{n}")))
            .collect();
        names.sort();
        f.debug_struct("Externs").field("functions", &names).finish()
    }
}
