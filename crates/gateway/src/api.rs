//! Agent registry and chat endpoints.
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | GET | /api/agents | List agents |
//! | POST | /api/agents | Create an agent |
//! | GET | /api/agents/{id} | Fetch one agent |
//! | PUT | /api/agents/{id} | Update an agent |
//! | DELETE | /api/agents/{id} | Delete an agent |
//! | POST | /api/agents/{id}/chat | One chat turn |

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use vocalis_core::agent::{AgentDraft, AgentProfile};
use vocalis_core::error::{Error, ErrorCategory};
use vocalis_core::message::ConversationTurn;

use crate::SharedState;

/// Build the `/api/agents` routes.
pub fn agents_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/agents", get(list_agents_handler).post(create_agent_handler))
        .route(
            "/api/agents/{id}",
            get(get_agent_handler)
                .put(update_agent_handler)
                .delete(delete_agent_handler),
        )
        .route("/api/agents/{id}/chat", post(chat_handler))
        .with_state(state)
}

// ── DTOs ──────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct AgentListResponse {
    agents: Vec<AgentProfile>,
}

#[derive(Serialize)]
struct AgentResponse {
    agent: AgentProfile,
}

#[derive(Serialize)]
struct DeleteResponse {
    success: bool,
}

#[derive(Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: String,
    /// Missing and `null` both mean no prior turns
    #[serde(default)]
    history: Option<Vec<ConversationTurn>>,
}

#[derive(Serialize)]
struct ChatResponse {
    reply: String,
    sources: Vec<String>,
    /// Base64-encoded speech for `reply`
    #[serde(skip_serializing_if = "Option::is_none")]
    audio: Option<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// An error rendered as `{error}` with a status derived from its category.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match err.category() {
            ErrorCategory::NotFound => StatusCode::NOT_FOUND,
            ErrorCategory::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorCategory::Upstream => StatusCode::BAD_GATEWAY,
            ErrorCategory::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %err, "Request failed");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

// ── Handlers ──────────────────────────────────────────────────────────────

async fn list_agents_handler(State(state): State<SharedState>) -> ApiResult<AgentListResponse> {
    let agents = state.service.list_agents().await?;
    Ok(Json(AgentListResponse { agents }))
}

async fn create_agent_handler(
    State(state): State<SharedState>,
    payload: Result<Json<AgentDraft>, JsonRejection>,
) -> ApiResult<AgentResponse> {
    let Json(mut draft) = payload?;
    // Creation always mints a fresh id.
    draft.id = None;

    let agent = state.service.save_agent(draft).await?;
    info!(agent_id = %agent.id, name = %agent.name, "Agent created");
    Ok(Json(AgentResponse { agent }))
}

async fn get_agent_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<AgentResponse> {
    let agent = state.service.get_agent(&id).await?;
    Ok(Json(AgentResponse { agent }))
}

async fn update_agent_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    payload: Result<Json<AgentDraft>, JsonRejection>,
) -> ApiResult<AgentResponse> {
    let Json(mut draft) = payload?;
    draft.id = Some(id);

    let agent = state.service.save_agent(draft).await?;
    info!(agent_id = %agent.id, "Agent updated");
    Ok(Json(AgentResponse { agent }))
}

async fn delete_agent_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<DeleteResponse> {
    let success = state.service.delete_agent(&id).await?;
    Ok(Json(DeleteResponse { success }))
}

async fn chat_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<ChatResponse> {
    let Json(request) = payload?;
    let history = request.history.unwrap_or_default();

    let outcome = state
        .service
        .chat(&id, &request.message, &history)
        .await?;

    Ok(Json(ChatResponse {
        reply: outcome.reply,
        sources: outcome.sources,
        audio: outcome.audio.map(|bytes| BASE64.encode(bytes)),
    }))
}
