//! HTTP gateway for MINA.
//!
//! Serves the embedded web chat frontend and a small JSON API over a single
//! in-memory session:
//!
//! - `GET  /`          — embedded chat page
//! - `POST /api/chat`  — route one message, returns the reply
//! - `POST /api/clear` — reset the session log
//! - `GET  /api/stats` — session counters for the sidebar
//! - `GET  /health`    — liveness probe
//!
//! Built on Axum. Nothing is persisted: the session log lives in process
//! memory and dies with it.

pub mod frontend;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tracing::info;

use mina_chat::{ReplySource, ResponseRouter};
use mina_config::AppConfig;
use mina_core::{ASSISTANT_NAME, ConversationLog, Personality};

/// The one browser-facing conversation the gateway keeps.
struct ChatSession {
    log: ConversationLog,
    personality: Personality,
    temperature: f32,
}

/// Shared application state for the gateway.
///
/// The session sits behind an async mutex: turns are serialized, so two
/// browser tabs interleave into one coherent transcript instead of racing.
pub struct GatewayState {
    router: ResponseRouter,
    session: Mutex<ChatSession>,
    model: String,
    api_key_configured: bool,
}

type SharedState = Arc<GatewayState>;

impl GatewayState {
    /// Assemble state from parts. Tests use this to substitute the backend.
    pub fn new(
        router: ResponseRouter,
        personality: Personality,
        temperature: f32,
        model: impl Into<String>,
        api_key_configured: bool,
    ) -> Self {
        Self {
            router,
            session: Mutex::new(ChatSession {
                log: ConversationLog::new(),
                personality,
                temperature,
            }),
            model: model.into(),
            api_key_configured,
        }
    }

    /// Assemble state from configuration with the real backend client.
    pub fn from_config(config: &AppConfig) -> Self {
        let client = mina_providers::build_client(config);
        let router = ResponseRouter::new(config.knowledge_base(), client);
        Self::new(
            router,
            config.active_personality(),
            config.temperature,
            &config.model,
            config.has_api_key(),
        )
    }
}

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/api/clear", post(clear_handler))
        .route("/api/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .merge(frontend::frontend_router())
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the gateway HTTP server. Runs until the process is stopped.
pub async fn serve(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let state = Arc::new(GatewayState::from_config(&config));
    let app = build_router(state);

    info!(addr = %addr, model = %config.model, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Deserialize)]
struct ChatRequest {
    message: String,
    /// Personality name; updates the session when present.
    personality: Option<String>,
    /// Sampling temperature; updates the session when present.
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct ChatResponse {
    answer: String,
    display: String,
    source: ReplySource,
    message_count: usize,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn bad_request(error: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    let message = payload.message.trim();
    if message.is_empty() {
        return Err(bad_request("Il messaggio non può essere vuoto."));
    }

    let personality = match payload.personality.as_deref() {
        Some(name) => Some(
            Personality::from_name(name)
                .ok_or_else(|| bad_request(format!("Personalità sconosciuta: {name}")))?,
        ),
        None => None,
    };

    if let Some(t) = payload.temperature {
        if !(0.1..=2.0).contains(&t) {
            return Err(bad_request("La temperatura deve essere tra 0.1 e 2.0."));
        }
    }

    let mut session = state.session.lock().await;
    if let Some(p) = personality {
        session.personality = p;
    }
    if let Some(t) = payload.temperature {
        session.temperature = t;
    }

    let (personality, temperature) = (session.personality, session.temperature);
    let reply = state
        .router
        .route(&mut session.log, message, personality, temperature)
        .await;

    Ok(Json(ChatResponse {
        display: reply.display(),
        answer: reply.answer,
        source: reply.source,
        message_count: session.log.len(),
    }))
}

#[derive(Serialize)]
struct ClearResponse {
    cleared: bool,
    message_count: usize,
}

async fn clear_handler(State(state): State<SharedState>) -> Json<ClearResponse> {
    let mut session = state.session.lock().await;
    session.log.clear();
    info!("Session log cleared");
    Json(ClearResponse {
        cleared: true,
        message_count: 0,
    })
}

#[derive(Serialize)]
struct StatsResponse {
    message_count: usize,
    assistant: &'static str,
    model: String,
    personality: &'static str,
    temperature: f32,
    api_key_configured: bool,
}

async fn stats_handler(State(state): State<SharedState>) -> Json<StatsResponse> {
    let session = state.session.lock().await;
    Json(StatsResponse {
        message_count: session.log.len(),
        assistant: ASSISTANT_NAME,
        model: state.model.clone(),
        personality: session.personality.name(),
        temperature: session.temperature,
        api_key_configured: state.api_key_configured,
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "mina-gateway",
        version: env!("CARGO_PKG_VERSION"),
    })
}
