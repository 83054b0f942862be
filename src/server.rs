use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    routing::{get, get_service, post},
};
use chrono::Local;
use serde::Serialize;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::AppState;
use crate::catalogue::{CatalogueStore, SqliteCatalogue};
use crate::config::AppConfig;
use crate::conversation::{ConversationStore, Exchange};
use crate::resilience;
use crate::widget::ChatRequest;

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let catalogue: Arc<dyn CatalogueStore> =
        Arc::new(SqliteCatalogue::connect(&config.persistence.database_url).await?);
    info!(
        name: "catalogue.ready",
        database_url = %config.persistence.database_url,
        "Catalogue ready"
    );

    let state = AppState::new(Arc::clone(&config), catalogue);
    spawn_session_sweeper(
        state.conversations.clone(),
        Duration::from_secs(config.sessions.sweep_interval_secs.max(1)),
    );
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// Periodically drop expired conversations for the life of the process.
pub fn spawn_session_sweeper(
    conversations: ConversationStore,
    every: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let removed = conversations.cleanup_expired();
            if removed > 0 {
                info!(
                    name: "chat.session.expired",
                    removed,
                    remaining = conversations.len(),
                    "Expired conversations dropped"
                );
            }
        }
    })
}

/// Build the application router: widget page, chat API and middleware.
pub fn build_router(state: AppState) -> Router {
    let static_dir = state.config.server.static_dir.clone();
    let index = format!("{static_dir}/index.html");

    Router::new()
        .route("/", get_service(ServeFile::new(index)))
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/api/sessions/{id}/messages", get(api_get_messages))
        .route("/api/sessions/{id}/reset", post(api_reset_session))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            resilience::timeout_middleware,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            resilience::rate_limit_middleware,
        ))
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// API Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Response from the chat endpoint.
#[derive(Debug, Serialize)]
struct ChatResponse {
    /// Answer text with `**bold**` runs and newlines.
    response: String,
    /// Follow-up questions, possibly empty.
    suggestions: Vec<String>,
    confidence: f32,
    source: String,
    /// Conversation the exchange was recorded in.
    session_id: String,
    /// `HH:MM`
    timestamp: String,
}

/// POST /chat - Answer one message.
async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, String)> {
    let message = req.message.trim();
    if message.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "message must not be empty".to_string()));
    }

    let conversation = state
        .conversations
        .get_or_create(req.session_id.as_deref().filter(|id| !id.is_empty()));

    tracing::info!(
        name: "chat.request",
        session_id = %conversation.id(),
        chars = message.chars().count(),
        "Received chat request"
    );

    let reply = state.responder.reply(message).await.map_err(|e| {
        tracing::error!(name: "chat.reply.failed", error = %e, "Responder failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "unable to answer right now".to_string(),
        )
    })?;

    conversation.record(Exchange::new(message, &reply));

    tracing::info!(
        name: "chat.reply",
        session_id = %conversation.id(),
        source = %reply.source,
        score = reply.score(),
        "Reply sent"
    );

    Ok(Json(ChatResponse {
        response: reply.response,
        suggestions: reply.suggestions,
        confidence: reply.confidence,
        source: reply.source,
        session_id: conversation.id().to_string(),
        timestamp: Local::now().format("%H:%M").to_string(),
    }))
}

/// GET /api/sessions/:id/messages - Exchanges of one conversation.
async fn api_get_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Exchange>>, StatusCode> {
    state
        .conversations
        .get(&id)
        .map(|conversation| Json(conversation.exchanges()))
        .ok_or(StatusCode::NOT_FOUND)
}

/// POST /api/sessions/:id/reset - Clear a conversation.
async fn api_reset_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> StatusCode {
    match state.conversations.get(&id) {
        Some(conversation) => {
            conversation.reset();
            info!(name: "chat.session.reset", session_id = %id, "Conversation reset");
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
