//! CLI definitions for the `colloquy` binary.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::config::{AgentConfig, SessionBackend};

/// Conversational agent with tool calling, durable sessions and document search.
#[derive(Parser, Debug)]
#[command(name = "colloquy", version, about = "Colloquy conversational agent")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Send a single prompt and print the answer
    Chat(ChatArgs),
    /// Show or clear a session's history
    History(HistoryArgs),
    /// Search the document corpus directly
    Search(SearchArgs),
}

/// Arguments for `colloquy serve`.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory of documents to index for search_docs
    #[arg(long)]
    pub docs: Option<PathBuf>,

    /// Directory holding session files
    #[arg(long)]
    pub sessions: Option<PathBuf>,

    /// Keep sessions in memory only
    #[arg(long, conflicts_with = "sessions")]
    pub memory: bool,
}

impl ServeArgs {
    /// Layer the flags over `config`.
    pub fn apply(&self, mut config: AgentConfig) -> AgentConfig {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(docs) = &self.docs {
            config.docs_dir = docs.clone();
        }
        if let Some(sessions) = &self.sessions {
            config.sessions_dir = sessions.clone();
            config.session_backend = SessionBackend::File;
        }
        if self.memory {
            config.session_backend = SessionBackend::Memory;
        }
        config
    }
}

/// Arguments for `colloquy chat`.
#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Session to continue
    #[arg(short, long)]
    pub session: String,

    /// Tools to offer, comma separated (default: all)
    #[arg(long, value_delimiter = ',')]
    pub tools: Option<Vec<String>>,

    /// Directory of documents to index for search_docs
    #[arg(long)]
    pub docs: Option<PathBuf>,

    /// Directory holding session files
    #[arg(long)]
    pub sessions: Option<PathBuf>,

    /// User prompt
    pub prompt: String,
}

impl ChatArgs {
    pub fn apply(&self, mut config: AgentConfig) -> AgentConfig {
        if let Some(docs) = &self.docs {
            config.docs_dir = docs.clone();
        }
        if let Some(sessions) = &self.sessions {
            config.sessions_dir = sessions.clone();
        }
        if let Some(tools) = &self.tools {
            config.tools = Some(tools.clone());
        }
        // A one-shot process has nothing to share an in-memory session with.
        config.session_backend = SessionBackend::File;
        config
    }
}

/// Arguments for `colloquy history`.
#[derive(Parser, Debug)]
pub struct HistoryArgs {
    /// Session to inspect
    #[arg(short, long)]
    pub session: String,

    /// Delete the history instead of printing it
    #[arg(long)]
    pub clear: bool,

    /// Directory holding session files
    #[arg(long)]
    pub sessions: Option<PathBuf>,
}

/// Arguments for `colloquy search`.
#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Directory of documents to index
    #[arg(long)]
    pub docs: Option<PathBuf>,

    /// Number of results
    #[arg(short = 'k', long, default_value_t = 3)]
    pub top_k: usize,

    /// Search query
    pub query: String,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Default log filter for the verbosity count.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
