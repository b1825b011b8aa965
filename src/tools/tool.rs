//! Tool trait and closure-based tool wrapper.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::arguments::ToolArguments;
use super::types::ToolSchema;
use crate::error::ColloquyError;
use crate::types::JsonObject;

/// Context available during tool execution.
#[derive(Debug, Clone, Default)]
pub struct ToolExecutionContext {
    pub session_id: Option<String>,
    pub tool_call_id: Option<String>,
    /// Canceled when the caller of the surrounding `send` goes away.
    pub cancel: CancellationToken,
}

/// A named, schema-described capability the model may ask to run.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (must match what the model calls).
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// JSON Schema for the arguments.
    fn parameters(&self) -> &ToolSchema;

    /// JSON Schema for the result, if declared.
    fn response(&self) -> Option<&ToolSchema> {
        None
    }

    /// Execute the tool with parsed arguments.
    async fn execute(
        &self,
        args: &ToolArguments,
        ctx: &ToolExecutionContext,
    ) -> Result<JsonObject, ColloquyError>;
}

type ToolHandler = dyn Fn(
        ToolArguments,
        ToolExecutionContext,
    ) -> Pin<Box<dyn Future<Output = Result<JsonObject, ColloquyError>> + Send>>
    + Send
    + Sync;

/// Closure-based tool declaration.
pub struct FunctionTool {
    name: String,
    description: String,
    parameters: ToolSchema,
    response: Option<ToolSchema>,
    handler: Arc<ToolHandler>,
}

impl FunctionTool {
    /// Create a tool from a closure.
    pub fn new<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: ToolSchema,
        handler: F,
    ) -> Self
    where
        F: Fn(ToolArguments, ToolExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<JsonObject, ColloquyError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            response: None,
            handler: Arc::new(move |args, ctx| Box::pin(handler(args, ctx))),
        }
    }

    /// Attach a response schema.
    pub fn with_response(mut self, response: ToolSchema) -> Self {
        self.response = Some(response);
        self
    }
}

#[async_trait]
impl Tool for FunctionTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> &ToolSchema {
        &self.parameters
    }

    fn response(&self) -> Option<&ToolSchema> {
        self.response.as_ref()
    }

    async fn execute(
        &self,
        args: &ToolArguments,
        ctx: &ToolExecutionContext,
    ) -> Result<JsonObject, ColloquyError> {
        (self.handler)(args.clone(), ctx.clone()).await
    }
}

impl std::fmt::Debug for FunctionTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionTool")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

/// Wrap an arbitrary JSON value as a tool result object.
pub fn into_result_object(value: serde_json::Value) -> JsonObject {
    match value {
        serde_json::Value::Object(map) => map,
        other => {
            let mut map = JsonObject::new();
            map.insert("result".to_string(), other);
            map
        }
    }
}
