//! Conversation orchestration: one prompt in, tool calls resolved, history persisted.

pub mod orchestrator;

pub use orchestrator::Agent;
