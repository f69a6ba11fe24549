//! HTTP Endpoints
//!
//! REST API for the assistant.

use axum::{
    extract::{Json, Path, State},
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use emi_assist_agent::SessionState;
use emi_assist_core::TurnReply;

use crate::state::AppState;
use crate::ServerError;

/// Session used when the client does not send one
const DEFAULT_SESSION_ID: &str = "default";

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let config = state.config.read();
    let cors_layer = build_cors_layer(&config.server.cors_origins, config.server.cors_enabled);
    drop(config);

    Router::new()
        .route("/chat", post(chat))
        .route("/end", post(end))
        .route("/health", get(health_check))
        .route("/api/sessions", get(list_sessions))
        .route("/api/sessions/:id", get(get_session))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// CORS layer from configured origins
///
/// Disabled or empty origin lists allow any origin.
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled || origins.is_empty() {
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        tracing::error!("All configured CORS origins are invalid, allowing any origin");
        return CorsLayer::permissive();
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

fn session_or_default(session_id: Option<String>) -> String {
    session_id.unwrap_or_else(|| DEFAULT_SESSION_ID.to_string())
}

/// Chat request
#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
    #[serde(default)]
    session_id: Option<String>,
}

/// End request
#[derive(Debug, Deserialize)]
struct EndRequest {
    #[serde(default)]
    session_id: Option<String>,
}

/// Process one user message
async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<TurnReply>, ServerError> {
    if request.message.is_empty() {
        return Err(ServerError::Validation("message must not be empty".to_string()));
    }

    let session_id = session_or_default(request.session_id);
    let reply = state
        .orchestrator
        .process_turn(&session_id, &request.message)
        .await?;

    Ok(Json(reply))
}

/// End a session and return its disposition
async fn end(
    State(state): State<AppState>,
    Json(request): Json<EndRequest>,
) -> Json<TurnReply> {
    let session_id = session_or_default(request.session_id);
    Json(state.orchestrator.end_session(&session_id).await)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// List live sessions
async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    let sessions = state.orchestrator.session_ids();
    Json(serde_json::json!({
        "sessions": sessions,
        "count": sessions.len(),
    }))
}

/// Turn trace of one live session
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionState>, ServerError> {
    state
        .orchestrator
        .session_snapshot(&id)
        .map(Json)
        .ok_or_else(|| ServerError::NotFound(format!("Session '{}'", id)))
}
