//! Colloquy CLI binary entry point.

use std::sync::Arc;

use colloquy::agent::Agent;
use colloquy::cli::{ChatArgs, Cli, Commands, HistoryArgs, SearchArgs, ServeArgs};
use colloquy::config::{AgentConfig, SessionBackend};
use colloquy::error::ColloquyError;
use colloquy::provider::{create_provider, ModelProvider};
use colloquy::retrieval::{DocumentIndex, IndexOptions};
use colloquy::session::{FileSessionRepository, InMemorySessionRepository, SessionRepository};
use colloquy::tools::builtin::default_registry;
use colloquy::types::{Content, Part};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    // RUST_LOG wins over -v when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Serve(args) => handle_serve(args).await,
        Commands::Chat(args) => handle_chat(args).await,
        Commands::History(args) => handle_history(args).await,
        Commands::Search(args) => handle_search(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn repository_for(config: &AgentConfig) -> Arc<dyn SessionRepository> {
    match config.session_backend {
        SessionBackend::File => Arc::new(FileSessionRepository::new(config.sessions_dir.clone())),
        SessionBackend::Memory => Arc::new(InMemorySessionRepository::new()),
    }
}

/// Index the corpus, register the built-in tools and wire the agent.
fn build_agent(config: &AgentConfig) -> Result<(Agent, Vec<String>), ColloquyError> {
    let index = DocumentIndex::build(&config.docs_dir, IndexOptions::default())?;
    let registry = Arc::new(default_registry(Arc::new(index))?);
    let tools = config.tools.clone().unwrap_or_else(|| registry.names());

    let provider: Arc<dyn ModelProvider> = Arc::from(create_provider(config)?);
    let agent = Agent::from_config(config, provider, repository_for(config)).with_registry(registry);
    Ok((agent, tools))
}

/// Cancel `token` on Ctrl-C.
fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, shutting down");
            token.cancel();
        }
    });
}

async fn handle_serve(args: ServeArgs) -> Result<(), ColloquyError> {
    let config = args.apply(AgentConfig::from_env()?);
    let (agent, tools) = build_agent(&config)?;
    info!(
        model = config.model.as_str(),
        backend = %config.session_backend,
        tools = ?tools,
        "agent ready"
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    let shutdown = CancellationToken::new();
    cancel_on_ctrl_c(shutdown.clone());

    colloquy::server::serve(listener, colloquy::server::router(Arc::new(agent), tools), shutdown).await
}

async fn handle_chat(args: ChatArgs) -> Result<(), ColloquyError> {
    let config = args.apply(AgentConfig::from_env()?);
    let (agent, tools) = build_agent(&config)?;

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    let turns = agent.send(&args.session, &tools, &args.prompt, &cancel).await?;
    for turn in &turns {
        print_turn(turn);
    }
    Ok(())
}

async fn handle_history(args: HistoryArgs) -> Result<(), ColloquyError> {
    let mut config = AgentConfig::from_env()?;
    if let Some(sessions) = args.sessions {
        config.sessions_dir = sessions;
    }
    let repository = FileSessionRepository::new(config.sessions_dir);

    if args.clear {
        repository.delete(&args.session).await?;
        println!("Cleared session {}", args.session);
        return Ok(());
    }

    let history = repository.load(&args.session).await?.unwrap_or_default();
    println!("{}", serde_json::to_string_pretty(&history)?);
    Ok(())
}

fn handle_search(args: SearchArgs) -> Result<(), ColloquyError> {
    let mut config = AgentConfig::from_env()?;
    if let Some(docs) = args.docs {
        config.docs_dir = docs;
    }
    let index = DocumentIndex::build(&config.docs_dir, IndexOptions::default())?;
    if index.is_empty() {
        println!("No documents indexed from {}", config.docs_dir.display());
        return Ok(());
    }

    for hit in index.search(&args.query, args.top_k) {
        println!("[{:.3}] {}", hit.similarity, hit.document.filename);
        println!("{}\n", hit.document.text);
    }
    Ok(())
}

fn print_turn(turn: &Content) {
    for part in &turn.parts {
        match part {
            Part::Text(text) => println!("{text}"),
            Part::FunctionCall(call) => {
                println!("-> {}({})", call.name, serde_json::Value::Object(call.args.clone()));
            }
            Part::FunctionResponse(response) => {
                println!("<- {}: {}", response.name, serde_json::Value::Object(response.response.clone()));
            }
        }
    }
}
