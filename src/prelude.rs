//! Convenience re-exports for common use.

pub use crate::agent::Agent;
pub use crate::config::AgentConfig;
pub use crate::error::{ColloquyError, Result};
pub use crate::provider::{ModelProvider, ProviderRequest, ProviderResponse};
pub use crate::session::{FileSessionRepository, InMemorySessionRepository, SessionRepository};
pub use crate::tools::{FunctionTool, Tool, ToolArguments, ToolRegistry, ToolSchema};
pub use crate::types::{Content, FunctionCall, FunctionResponse, JsonObject, Part, Role};
