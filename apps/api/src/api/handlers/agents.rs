use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::agents::{ChatRequest, ChatResponse, SearchRequest, SearchResponse};
use crate::api::errors::ApiError;
use crate::api::state::AppState;

/// Send a message to an agent
///
/// POST /api/chat
///
/// Agent failures come back as `success: false`; only an unknown
/// `agent_type` is rejected with 400.
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let response = state.gateway.dispatch_chat(req).await?;
    Ok(Json(response))
}

/// Search and summarize
///
/// POST /api/search
pub async fn search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Json<SearchResponse> {
    Json(state.gateway.dispatch_search(req).await)
}

/// Capability lists of the search and chat agents
///
/// GET /api/agents/capabilities
pub async fn capabilities(State(state): State<AppState>) -> Json<Value> {
    match state.gateway.capabilities_snapshot().await {
        Ok(snapshot) => Json(json!({
            "success": true,
            "capabilities": snapshot,
        })),
        Err(e) => {
            tracing::error!(error = %e, "Failed to resolve agent capabilities");
            Json(json!({
                "success": false,
                "error": e.to_string(),
            }))
        }
    }
}
