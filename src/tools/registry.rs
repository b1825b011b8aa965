//! Name-keyed tool registry.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use super::arguments::ToolArguments;
use super::tool::{Tool, ToolExecutionContext};
use super::validation::validate_arguments;
use crate::error::ColloquyError;
use crate::provider::ToolDefinition;
use crate::types::JsonObject;

/// Owns the name → tool association.
///
/// Registration takes the write lock, lookups take the read lock, so a
/// registry shared behind an `Arc` follows a single-writer, many-reader
/// discipline. Handlers run after the lock is released.
#[derive(Default)]
pub struct ToolRegistry {
    tools: RwLock<HashMap<String, Arc<dyn Tool>>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tool, replacing any previous tool with the same name.
    pub fn register(&self, tool: Arc<dyn Tool>) -> Result<(), ColloquyError> {
        let name = tool.name().trim();
        if name.is_empty() {
            return Err(ColloquyError::Validation(
                "tool name cannot be empty".to_string(),
            ));
        }
        let name = name.to_string();
        debug!(tool = %name, "registering tool");
        self.write().insert(name, tool);
        Ok(())
    }

    /// Builder-style registration.
    pub fn with_tool(self, tool: Arc<dyn Tool>) -> Result<Self, ColloquyError> {
        self.register(tool)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Registered tool names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Provider-facing declarations for `names`, in request order.
    ///
    /// Unknown names are skipped so callers can ask for a superset of the
    /// tools that may be available. Duplicates are offered once.
    pub fn definitions_for<S: AsRef<str>>(&self, names: &[S]) -> Vec<ToolDefinition> {
        let tools = self.read();
        let mut seen = std::collections::HashSet::new();
        names
            .iter()
            .map(|name| name.as_ref())
            .filter(|name| seen.insert(*name))
            .filter_map(|name| tools.get(name))
            .map(|tool| ToolDefinition::from_tool(tool.as_ref()))
            .collect()
    }

    /// Run the named tool.
    ///
    /// Unknown names are a hard error here, unlike in `definitions_for`.
    /// Arguments are checked against the parameter schema first.
    pub async fn dispatch(
        &self,
        name: &str,
        args: JsonObject,
        ctx: &ToolExecutionContext,
    ) -> Result<JsonObject, ColloquyError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ColloquyError::ToolNotFound(name.to_string()))?;

        validate_arguments(&args, &tool.parameters().schema)
            .map_err(|msg| ColloquyError::InvalidArgument(format!("{name}: {msg}")))?;

        let args = ToolArguments::new(args);
        match tool.execute(&args, ctx).await {
            Ok(result) => Ok(result),
            Err(ColloquyError::Canceled) => Err(ColloquyError::Canceled),
            Err(ColloquyError::ToolExecution { tool_name, message }) => {
                Err(ColloquyError::ToolExecution { tool_name, message })
            }
            Err(err) => Err(ColloquyError::ToolExecution {
                tool_name: name.to_string(),
                message: err.to_string(),
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<dyn Tool>>> {
        self.tools.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<dyn Tool>>> {
        self.tools.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
