//! Tool system for function calling.

pub mod arguments;
pub mod builtin;
pub mod registry;
pub mod tool;
pub mod types;
pub mod validation;

pub use arguments::ToolArguments;
pub use registry::ToolRegistry;
pub use tool::{into_result_object, FunctionTool, Tool, ToolExecutionContext};
pub use types::{SchemaBuilder, ToolSchema};
pub use validation::validate_arguments;
