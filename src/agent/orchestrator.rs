//! The `Agent`: resolves a prompt into a final answer across tool round-trips.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{AgentConfig, DEFAULT_MAX_TOOL_ROUNDS};
use crate::error::ColloquyError;
use crate::provider::{ModelProvider, ProviderRequest};
use crate::session::{SessionLocks, SessionRepository};
use crate::tools::{ToolExecutionContext, ToolRegistry};
use crate::types::{Content, FunctionResponse, Role};
use crate::util::cancel::{cancellable, check_canceled};

/// Drives a conversation for any number of sessions.
///
/// Each `send` loads the session, appends the prompt, and calls the provider
/// until it answers without function calls. Calls to the same session id are
/// serialized; different sessions proceed concurrently.
pub struct Agent {
    provider: Arc<dyn ModelProvider>,
    repository: Arc<dyn SessionRepository>,
    registry: Arc<ToolRegistry>,
    system_instruction: Option<String>,
    max_tool_rounds: usize,
    locks: SessionLocks,
}

impl Agent {
    /// Create an agent with an empty tool registry.
    pub fn new(provider: Arc<dyn ModelProvider>, repository: Arc<dyn SessionRepository>) -> Self {
        Self {
            provider,
            repository,
            registry: Arc::new(ToolRegistry::new()),
            system_instruction: None,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            locks: SessionLocks::new(),
        }
    }

    /// Create an agent with the system instruction and round limit from `config`.
    pub fn from_config(
        config: &AgentConfig,
        provider: Arc<dyn ModelProvider>,
        repository: Arc<dyn SessionRepository>,
    ) -> Self {
        Self::new(provider, repository)
            .with_system_instruction(config.system_instruction.clone())
            .with_max_tool_rounds(config.max_tool_rounds)
    }

    /// Set the tool registry.
    pub fn with_registry(mut self, registry: Arc<ToolRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Set the system instruction sent with every provider call.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Set how many tool rounds a single `send` may resolve.
    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    pub fn max_tool_rounds(&self) -> usize {
        self.max_tool_rounds
    }

    /// Resolve `prompt` within `session_id` and return the model-produced turns.
    ///
    /// The returned sequence holds every model turn of this call in order:
    /// turns carrying function calls followed by the terminal answer. Only the
    /// first candidate of each provider response is used. Tools named in
    /// `available_tools` but not registered are silently left out.
    ///
    /// Provider, tool and cancellation errors abort the call with nothing
    /// persisted. A failed save is logged and does not fail the call.
    pub async fn send<S: AsRef<str>>(
        &self,
        session_id: &str,
        available_tools: &[S],
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Content>, ColloquyError> {
        validate_session_id(session_id)?;
        if prompt.trim().is_empty() {
            return Err(ColloquyError::Validation("prompt is required".into()));
        }
        check_canceled(cancel)?;

        let _guard = cancellable(cancel, async { Ok(self.locks.acquire(session_id).await) }).await?;

        let mut history = cancellable(cancel, self.repository.load(session_id))
            .await?
            .unwrap_or_default();
        history.push(Content::user(prompt));

        let mut tools = self.registry.definitions_for(available_tools);
        debug!(
            session_id,
            turns = history.len(),
            tools = tools.len(),
            "send: history loaded"
        );

        let mut produced = Vec::new();
        let mut rounds = 0usize;

        loop {
            let request = ProviderRequest {
                history: history.clone(),
                system_instruction: self.system_instruction.clone(),
                tools: std::mem::take(&mut tools),
            };

            debug!(session_id, round = rounds, "send: calling provider");
            let response = cancellable(cancel, self.provider.generate(&request)).await?;

            let mut candidates = response.candidates.into_iter();
            let Some(mut turn) = candidates.next() else {
                debug!(session_id, "send: provider returned no candidates");
                break;
            };
            let ignored = candidates.count();
            if ignored > 0 {
                debug!(session_id, ignored, "send: extra candidates ignored");
            }
            turn.role = Role::Model;

            if !turn.has_function_calls() {
                history.push(turn.clone());
                produced.push(turn);
                break;
            }

            if rounds >= self.max_tool_rounds {
                warn!(session_id, limit = self.max_tool_rounds, "send: tool round limit reached");
                return Err(ColloquyError::ToolResolutionLimitExceeded {
                    limit: self.max_tool_rounds,
                });
            }
            rounds += 1;

            let mut responses = Vec::new();
            for call in turn.function_calls() {
                let ctx = ToolExecutionContext {
                    session_id: Some(session_id.to_string()),
                    tool_call_id: Some(call.id.clone()),
                    cancel: cancel.clone(),
                };
                debug!(session_id, tool = call.name.as_str(), call_id = call.id.as_str(), "send: dispatching tool");
                let result =
                    cancellable(cancel, self.registry.dispatch(&call.name, call.args.clone(), &ctx))
                        .await
                        .map_err(|err| {
                            warn!(session_id, tool = call.name.as_str(), error = %err, "Tool execution failed");
                            err
                        })?;
                responses.push(FunctionResponse::for_call(call, result));
            }

            history.push(turn.clone());
            history.push(Content::tool_results(responses));
            produced.push(turn);
        }

        check_canceled(cancel)?;
        match cancellable(cancel, self.repository.save(session_id, &history)).await {
            Ok(()) => {}
            Err(ColloquyError::Canceled) => return Err(ColloquyError::Canceled),
            Err(err) => {
                warn!(session_id, error = %err, "failed to save session; returning unsaved response");
            }
        }

        info!(
            session_id,
            rounds,
            turns = history.len(),
            "send: completed"
        );
        Ok(produced)
    }

    /// Delete the stored history for `session_id`. Idempotent.
    pub async fn clear_session(
        &self,
        session_id: &str,
        cancel: &CancellationToken,
    ) -> Result<(), ColloquyError> {
        validate_session_id(session_id)?;
        let _guard = cancellable(cancel, async { Ok(self.locks.acquire(session_id).await) }).await?;
        cancellable(cancel, self.repository.delete(session_id)).await?;
        info!(session_id, "session cleared");
        Ok(())
    }

    /// Stored history for `session_id`, empty when none exists.
    pub async fn get_session(
        &self,
        session_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Content>, ColloquyError> {
        validate_session_id(session_id)?;
        let history = cancellable(cancel, self.repository.load(session_id)).await?;
        Ok(history.unwrap_or_default())
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("provider", &self.provider.provider_name())
            .field("model", &self.provider.model_id())
            .field("registry", &self.registry)
            .field("max_tool_rounds", &self.max_tool_rounds)
            .finish()
    }
}

fn validate_session_id(session_id: &str) -> Result<(), ColloquyError> {
    if session_id.trim().is_empty() {
        return Err(ColloquyError::Validation("session_id is required".into()));
    }
    Ok(())
}
