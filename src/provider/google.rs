//! Google Gemini API provider.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::ColloquyError;
use crate::types::*;
use crate::util::retry::RetryPolicy;

use super::http::{shared_client, status_to_error};
use super::{ModelProvider, ProviderRequest, ProviderResponse, ToolDefinition};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GoogleProvider {
    model: String,
    api_key: String,
    base_url: String,
    retry: RetryPolicy,
}

impl GoogleProvider {
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
            retry: RetryPolicy::default(),
        }
    }

    /// Point the client at another endpoint (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn build_request_body(&self, request: &ProviderRequest) -> serde_json::Value {
        let contents: Vec<serde_json::Value> = request
            .history
            .iter()
            .map(|turn| {
                serde_json::json!({
                    "role": wire_role(turn.role),
                    "parts": turn.parts.iter().map(wire_part).collect::<Vec<_>>(),
                })
            })
            .collect();

        let mut body = serde_json::json!({ "contents": contents });

        if let Some(system) = request.system_instruction.as_deref().filter(|s| !s.is_empty()) {
            body["systemInstruction"] = serde_json::json!({ "parts": [{ "text": system }] });
        }

        if !request.tools.is_empty() {
            let declarations: Vec<serde_json::Value> =
                request.tools.iter().map(wire_declaration).collect();
            body["tools"] = serde_json::json!([{ "functionDeclarations": declarations }]);
        }

        body
    }

    async fn generate_once(&self, body: &serde_json::Value) -> Result<ProviderResponse, ColloquyError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let resp = shared_client()
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        let data: GeminiResponse = resp.json().await?;
        Ok(ProviderResponse {
            candidates: data
                .candidates
                .into_iter()
                .filter_map(|candidate| candidate.content)
                .map(into_content)
                .collect(),
        })
    }
}

#[async_trait]
impl ModelProvider for GoogleProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &ProviderRequest) -> Result<ProviderResponse, ColloquyError> {
        let body = self.build_request_body(request);

        debug!(
            model = %self.model,
            turns = request.history.len(),
            tools = request.tools.len(),
            "Google generate"
        );

        self.retry.execute(|| self.generate_once(&body)).await
    }
}

/// Gemini only knows `user` and `model`; tool results travel as user turns.
fn wire_role(role: Role) -> &'static str {
    match role {
        Role::Model => "model",
        Role::User | Role::Tool => "user",
    }
}

fn wire_part(part: &Part) -> serde_json::Value {
    match part {
        Part::Text(text) => serde_json::json!({ "text": text }),
        Part::FunctionCall(call) => {
            let mut fc = serde_json::json!({ "name": call.name, "args": call.args });
            if !call.id.is_empty() {
                fc["id"] = serde_json::json!(call.id);
            }
            serde_json::json!({ "functionCall": fc })
        }
        Part::FunctionResponse(resp) => {
            let mut fr = serde_json::json!({ "name": resp.name, "response": resp.response });
            if !resp.id.is_empty() {
                fr["id"] = serde_json::json!(resp.id);
            }
            serde_json::json!({ "functionResponse": fr })
        }
    }
}

fn wire_declaration(tool: &ToolDefinition) -> serde_json::Value {
    let mut decl = serde_json::json!({
        "name": tool.name,
        "description": tool.description,
        "parametersJsonSchema": tool.parameters,
    });
    if let Some(response) = &tool.response {
        decl["responseJsonSchema"] = response.clone();
    }
    decl
}

fn into_content(content: GeminiContent) -> Content {
    let parts = content
        .parts
        .into_iter()
        .filter_map(|part| {
            if let Some(fc) = part.function_call {
                let id = fc
                    .id
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
                return Some(Part::FunctionCall(FunctionCall::new(
                    id,
                    fc.name,
                    fc.args.unwrap_or_default(),
                )));
            }
            part.text.map(Part::Text)
        })
        .collect();
    Content::model_parts(parts)
}

// Internal Gemini response types

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    function_call: Option<GeminiFunctionCall>,
}

#[derive(Deserialize)]
struct GeminiFunctionCall {
    id: Option<String>,
    name: String,
    args: Option<JsonObject>,
}
