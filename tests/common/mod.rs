//! Shared test helpers: a scripted provider and an instrumented repository.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use colloquy::error::ColloquyError;
use colloquy::provider::{ModelProvider, ProviderRequest, ProviderResponse};
use colloquy::session::{InMemorySessionRepository, SessionRepository};
use colloquy::tools::{FunctionTool, ToolExecutionContext, ToolRegistry, ToolSchema};
use colloquy::types::*;

/// A provider that replays queued responses and records every request.
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<ProviderResponse, ColloquyError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
    delay: Option<Duration>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Sleep before answering each request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn then_text(self, text: &str) -> Self {
        self.then(Ok(ProviderResponse::single(Content::model(text))))
    }

    pub fn then_calls(self, calls: Vec<FunctionCall>) -> Self {
        let parts = calls.into_iter().map(Part::FunctionCall).collect();
        self.then(Ok(ProviderResponse::single(Content::model_parts(parts))))
    }

    pub fn then_candidates(self, candidates: Vec<Content>) -> Self {
        self.then(Ok(ProviderResponse { candidates }))
    }

    pub fn then_error(self, err: ColloquyError) -> Self {
        self.then(Err(err))
    }

    pub fn then(self, response: Result<ProviderResponse, ColloquyError>) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model_id(&self) -> &str {
        "scripted-model"
    }

    async fn generate(&self, request: &ProviderRequest) -> Result<ProviderResponse, ColloquyError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(ProviderResponse::single(Content::model("(script exhausted)"))))
    }
}

/// In-memory repository that counts calls and can be told to fail saves.
#[derive(Default)]
pub struct CountingRepository {
    inner: InMemorySessionRepository,
    pub saves: AtomicUsize,
    pub loads: AtomicUsize,
    pub deletes: AtomicUsize,
    fail_saves: bool,
}

impl CountingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_saves() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    pub fn total_calls(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
            + self.loads.load(Ordering::SeqCst)
            + self.deletes.load(Ordering::SeqCst)
    }

    pub async fn stored(&self, session_id: &str) -> Option<Vec<Content>> {
        self.inner.load(session_id).await.unwrap()
    }
}

#[async_trait]
impl SessionRepository for CountingRepository {
    async fn save(&self, session_id: &str, history: &[Content]) -> Result<(), ColloquyError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves {
            return Err(ColloquyError::repository(session_id, "disk full"));
        }
        self.inner.save(session_id, history).await
    }

    async fn load(&self, session_id: &str) -> Result<Option<Vec<Content>>, ColloquyError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load(session_id).await
    }

    async fn delete(&self, session_id: &str) -> Result<(), ColloquyError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(session_id).await
    }
}

pub fn call(id: &str, name: &str, args: serde_json::Value) -> FunctionCall {
    FunctionCall::new(id, name, args.as_object().cloned().unwrap_or_default())
}

/// Registry with `get_weather` (requires `location`) and an always-failing `explode`.
pub fn test_registry() -> Arc<ToolRegistry> {
    let registry = ToolRegistry::new();
    registry
        .register(Arc::new(FunctionTool::new(
            "get_weather",
            "Current weather for a city",
            ToolSchema::object()
                .string("location", "City name", true)
                .build(),
            |args, _ctx: ToolExecutionContext| async move {
                let location = args.get_str("location")?.to_string();
                Ok(json!({"location": location, "temperature": "22°C"})
                    .as_object()
                    .cloned()
                    .unwrap_or_default())
            },
        )))
        .unwrap();
    registry
        .register(Arc::new(FunctionTool::new(
            "explode",
            "Always fails",
            ToolSchema::empty(),
            |_args, _ctx: ToolExecutionContext| async move {
                Err(ColloquyError::ToolExecution {
                    tool_name: "explode".into(),
                    message: "boom".into(),
                })
            },
        )))
        .unwrap();
    Arc::new(registry)
}
