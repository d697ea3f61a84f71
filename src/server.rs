//! HTTP layer: routing, handlers, and error mapping.
//!
//! Thin wiring over [`crate::conversation`] — every handler delegates to
//! a store operation and maps its result onto a status code.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::config::AppConfig;
use crate::conversation::{ChatError, Conversation, ConversationStore, Message};

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let store = ConversationStore::new();
    let state = AppState {
        store,
        config: config.clone(),
    };

    let app = build_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!(
        name: "server.started",
        address = %address,
        "Server started"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the application router.
///
/// Exposed separately from [`start_server`] so integration tests can run
/// the real routes without binding a socket.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(root))
        .route("/api/v1/chat/user", post(api_user_message))
        .route("/api/v1/chat/agent", post(api_agent_reply))
        .route(
            "/api/v1/conversation",
            get(api_list_conversations).post(api_create_conversation),
        )
        .route("/api/v1/conversation/{id}", get(api_get_conversation))
        .route("/api/v1/conversation/delete/all", delete(api_delete_all))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    // Mirrored methods/headers instead of wildcards: credentials are
    // allowed, and wildcards cannot be combined with them.
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = match self {
            ChatError::NotFound => StatusCode::NOT_FOUND,
            ChatError::InvalidSender | ChatError::InvalidTurnOrder => StatusCode::BAD_REQUEST,
            ChatError::InvalidContent => StatusCode::UNPROCESSABLE_ENTITY,
        };
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

/// GET / - Liveness message.
async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Chat API is running" }))
}

/// POST /api/v1/chat/user - Submit a user turn.
///
/// The payload is the full conversation with the new user message already
/// appended (or a fresh conversation started client-side). On success the
/// payload overwrites the stored entry; on a rejected turn the stored
/// state is untouched.
async fn api_user_message(
    State(state): State<AppState>,
    Json(conversation): Json<Conversation>,
) -> Result<Json<Conversation>, ChatError> {
    info!(
        conversation_id = %conversation.conversation_id,
        message_count = conversation.messages.len(),
        "Received user turn"
    );

    let committed = state.store.submit_user_turn(conversation)?;
    Ok(Json(committed))
}

/// Query parameters for the agent-reply endpoint.
#[derive(Debug, Deserialize)]
struct AgentReplyParams {
    /// Target conversation.
    conversation_id: Uuid,
}

/// POST /api/v1/chat/agent - Append an agent reply to a conversation.
async fn api_agent_reply(
    State(state): State<AppState>,
    Query(params): Query<AgentReplyParams>,
    Json(message): Json<Message>,
) -> Result<Json<serde_json::Value>, ChatError> {
    info!(
        conversation_id = %params.conversation_id,
        sender = ?message.sender,
        "Received agent reply"
    );

    let reply = state
        .store
        .submit_agent_reply(params.conversation_id, message)?;
    Ok(Json(json!({ "reply": reply })))
}

/// GET /api/v1/conversation - List all conversations.
///
/// Ordering is not guaranteed.
async fn api_list_conversations(
    State(state): State<AppState>,
) -> Json<HashMap<Uuid, Conversation>> {
    Json(state.store.list())
}

/// GET /api/v1/conversation/:id - Get a conversation by id.
async fn api_get_conversation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Conversation>, ChatError> {
    let conversation = state.store.get(id)?;
    Ok(Json(conversation))
}

/// POST /api/v1/conversation - Create a new conversation.
async fn api_create_conversation(State(state): State<AppState>) -> Json<Conversation> {
    let conversation = state.store.create();
    info!(
        conversation_id = %conversation.conversation_id,
        agent_id = conversation.agent_id,
        "Created conversation"
    );
    Json(conversation)
}

/// DELETE /api/v1/conversation/delete/all - Delete all conversations.
async fn api_delete_all(State(state): State<AppState>) -> Json<serde_json::Value> {
    let removed = state.store.len();
    state.store.clear();
    info!(removed, "Deleted all conversations");
    Json(json!({ "message": "All conversations deleted" }))
}
