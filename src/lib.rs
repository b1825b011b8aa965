//! Colloquy: a conversational agent runtime.
//!
//! Resolves user prompts into answers through a model provider, running any
//! tools the model asks for, and persists each session's history through a
//! pluggable repository. A local document index is exposed to the model as
//! the `search_docs` tool.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use colloquy::prelude::*;
//! use colloquy::provider::google::GoogleProvider;
//! use colloquy::retrieval::{DocumentIndex, IndexOptions};
//! use colloquy::tools::builtin::default_registry;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> colloquy::error::Result<()> {
//! let index = DocumentIndex::build("docs", IndexOptions::default())?;
//! let agent = Agent::new(
//!     Arc::new(GoogleProvider::new("gemini-2.5-flash", "api-key")),
//!     Arc::new(InMemorySessionRepository::new()),
//! )
//! .with_registry(Arc::new(default_registry(Arc::new(index))?));
//!
//! let turns = agent
//!     .send("session-1", &["get_weather"], "Weather in Paris?", &CancellationToken::new())
//!     .await?;
//! println!("{}", turns.last().map(|t| t.text()).unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod prelude;
pub mod provider;
pub mod retrieval;
pub mod session;
pub mod tools;
pub mod types;
pub mod util;

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "cli")]
pub mod cli;
