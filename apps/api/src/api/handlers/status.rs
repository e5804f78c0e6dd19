use axum::{extract::State, Json};
use serde_json::{json, Value};

use super::LIST_LIMIT;
use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::domain::repositories::FindOptions;
use crate::domain::status::{NewStatusCheck, StatusCheck};
use crate::infrastructure::repositories::DocumentRepository;

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}

/// GET /api/
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Hello World" }))
}

/// Record a status check
///
/// POST /api/status
pub async fn create_status_check(
    State(state): State<AppState>,
    Json(req): Json<NewStatusCheck>,
) -> Result<Json<StatusCheck>, ApiError> {
    let check = StatusCheck::new(req);

    DocumentRepository::<StatusCheck>::new(state.store)
        .create(&check)
        .await?;

    Ok(Json(check))
}

/// GET /api/status
pub async fn list_status_checks(
    State(state): State<AppState>,
) -> Result<Json<Vec<StatusCheck>>, ApiError> {
    let checks = DocumentRepository::<StatusCheck>::new(state.store)
        .list(&FindOptions::new().limit(LIST_LIMIT))
        .await?;

    Ok(Json(checks))
}
