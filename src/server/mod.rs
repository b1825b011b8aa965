//! HTTP surface over the agent: prompt, history and health endpoints.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::agent::Agent;
use crate::error::ColloquyError;

/// Shared handler state.
#[derive(Clone)]
struct AppState {
    agent: Arc<Agent>,
    /// Offered when a prompt request does not name its tools.
    default_tools: Arc<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct PromptRequest {
    #[serde(default)]
    session_id: String,
    #[serde(default)]
    prompt: String,
    tools: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    #[serde(default)]
    session_id: String,
}

/// Error body returned to HTTP clients.
struct ApiError(ColloquyError);

impl From<ColloquyError> for ApiError {
    fn from(err: ColloquyError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            ColloquyError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            warn!(error = %self.0, "request failed");
        }
        (status, self.0.to_string()).into_response()
    }
}

/// Build the router. `default_tools` is offered when a request names none.
pub fn router(agent: Arc<Agent>, default_tools: Vec<String>) -> Router {
    let state = AppState {
        agent,
        default_tools: Arc::new(default_tools),
    };

    Router::new()
        .route("/prompt", post(prompt_handler))
        .route("/history", get(get_history_handler).delete(clear_history_handler))
        .route("/health", get(health_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve `app` on `listener` until `shutdown` fires.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    shutdown: CancellationToken,
) -> Result<(), ColloquyError> {
    let addr = listener.local_addr()?;
    info!(url = %format!("http://{addr}"), "HTTP server ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

/// Cancels the in-flight agent call if the handler future is dropped, which
/// happens when the client disconnects.
fn request_token() -> (CancellationToken, tokio_util::sync::DropGuard) {
    let token = CancellationToken::new();
    let guard = token.clone().drop_guard();
    (token, guard)
}

async fn prompt_handler(
    State(state): State<AppState>,
    Json(request): Json<PromptRequest>,
) -> Result<Response, ApiError> {
    let (cancel, _guard) = request_token();
    let tools = request
        .tools
        .unwrap_or_else(|| state.default_tools.as_ref().clone());

    let turns = state
        .agent
        .send(&request.session_id, &tools, &request.prompt, &cancel)
        .await?;

    Ok(([(header::CACHE_CONTROL, "no-cache")], Json(turns)).into_response())
}

async fn get_history_handler(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Response, ApiError> {
    let (cancel, _guard) = request_token();
    let history = state.agent.get_session(&query.session_id, &cancel).await?;
    Ok(([(header::CACHE_CONTROL, "no-cache")], Json(history)).into_response())
}

async fn clear_history_handler(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<StatusCode, ApiError> {
    let (cancel, _guard) = request_token();
    state.agent.clear_session(&query.session_id, &cancel).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn health_handler() -> &'static str {
    "ok"
}
