//! Language-model provider boundary.

pub mod http;

#[cfg(feature = "google")]
pub mod google;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::AgentConfig;
use crate::error::ColloquyError;
use crate::tools::Tool;
use crate::types::Content;

/// Tool declaration as offered to the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<serde_json::Value>,
}

impl ToolDefinition {
    pub fn from_tool(tool: &dyn Tool) -> Self {
        Self {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            parameters: tool.parameters().schema.clone(),
            response: tool.response().map(|schema| schema.schema.clone()),
        }
    }
}

/// One generation call: the running history, the system instruction, and the
/// tools the model may request in this call.
#[derive(Debug, Clone, Default)]
pub struct ProviderRequest {
    pub history: Vec<Content>,
    pub system_instruction: Option<String>,
    pub tools: Vec<ToolDefinition>,
}

/// Candidate turns returned by one generation call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderResponse {
    pub candidates: Vec<Content>,
}

impl ProviderResponse {
    pub fn single(candidate: Content) -> Self {
        Self {
            candidates: vec![candidate],
        }
    }
}

/// Core trait implemented by model providers.
///
/// Retry policy, if any, belongs to the implementation; callers treat every
/// error as final.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g., "google").
    fn provider_name(&self) -> &str;

    /// The model ID this provider instance serves.
    fn model_id(&self) -> &str;

    async fn generate(&self, request: &ProviderRequest) -> Result<ProviderResponse, ColloquyError>;
}

/// Create the provider selected by `config`.
#[cfg(feature = "google")]
pub fn create_provider(config: &AgentConfig) -> Result<Box<dyn ModelProvider>, ColloquyError> {
    let api_key = config
        .api_key
        .clone()
        .ok_or_else(|| ColloquyError::Authentication("Missing GEMINI_API_KEY".into()))?;
    let mut provider = google::GoogleProvider::new(config.model.clone(), api_key);
    if let Some(base_url) = &config.base_url {
        provider = provider.with_base_url(base_url.clone());
    }
    Ok(Box::new(provider))
}

/// Create the provider selected by `config`.
#[cfg(not(feature = "google"))]
pub fn create_provider(_config: &AgentConfig) -> Result<Box<dyn ModelProvider>, ColloquyError> {
    Err(ColloquyError::Configuration(
        "no provider enabled via feature flags".into(),
    ))
}
