//! Typed access to tool call arguments.

use crate::error::ColloquyError;
use crate::types::JsonObject;

/// Wrapper around tool call arguments providing typed extraction.
#[derive(Debug, Clone, Default)]
pub struct ToolArguments {
    args: JsonObject,
}

impl ToolArguments {
    pub fn new(args: JsonObject) -> Self {
        Self { args }
    }

    /// Get the raw argument object.
    pub fn raw(&self) -> &JsonObject {
        &self.args
    }

    /// Get a string argument by key.
    pub fn get_str(&self, key: &str) -> Result<&str, ColloquyError> {
        self.args
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| ColloquyError::InvalidArgument(format!("Missing string argument: {key}")))
    }

    /// Get an optional string argument.
    pub fn get_str_opt(&self, key: &str) -> Option<&str> {
        self.args.get(key).and_then(|v| v.as_str())
    }

    pub fn get_i64(&self, key: &str) -> Result<i64, ColloquyError> {
        self.args
            .get(key)
            .and_then(|v| v.as_i64())
            .ok_or_else(|| ColloquyError::InvalidArgument(format!("Missing integer argument: {key}")))
    }

    /// Deserialize the entire arguments into a typed struct.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T, ColloquyError> {
        serde_json::from_value(serde_json::Value::Object(self.args.clone())).map_err(|e| {
            ColloquyError::InvalidArgument(format!("Failed to deserialize arguments: {e}"))
        })
    }
}
