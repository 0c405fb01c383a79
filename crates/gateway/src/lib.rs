//! HTTP API gateway for Vocalis.
//!
//! Exposes the agent registry and chat over REST so the admin console and
//! the embeddable widget can reach them.
//!
//! Built on Axum for high performance async HTTP.

pub mod api;

use axum::extract::DefaultBodyLimit;
use axum::{Router, response::Json, routing::get};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use vocalis_agent::AgentService;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub service: AgentService,
}

pub type SharedState = Arc<GatewayState>;

/// Build the full router.
///
/// Layers applied:
/// - Permissive CORS, so the widget works from any origin
/// - Request body size limit (1 MB)
/// - HTTP trace logging
pub fn build_router(state: SharedState, permissive_cors: bool) -> Router {
    let router = Router::new()
        .route("/health", get(health_handler))
        .merge(api::agents_router(state))
        .layer(DefaultBodyLimit::max(1024 * 1024));

    let router = if permissive_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the gateway HTTP server.
pub async fn start(config: vocalis_config::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let service = AgentService::from_config(&config)?;
    info!(
        reasoning = service.reasoning_configured(),
        speech = service.speech_configured(),
        "Agent service ready"
    );

    let state = Arc::new(GatewayState { service });
    let app = build_router(state, config.gateway.permissive_cors);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
