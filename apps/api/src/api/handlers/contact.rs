use axum::{extract::State, http::StatusCode, Json};

use super::LIST_LIMIT;
use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::domain::contact::{ContactInquiry, NewInquiry};
use crate::domain::repositories::{FindOptions, SortDirection};
use crate::infrastructure::repositories::DocumentRepository;

/// Submit the contact form
///
/// POST /api/contact
pub async fn submit_inquiry(
    State(state): State<AppState>,
    Json(req): Json<NewInquiry>,
) -> Result<(StatusCode, Json<ContactInquiry>), ApiError> {
    let inquiry = ContactInquiry::new(req).map_err(ApiError::bad_request)?;

    DocumentRepository::<ContactInquiry>::new(state.store)
        .create(&inquiry)
        .await?;

    tracing::info!(inquiry_id = %inquiry.id, "Contact inquiry received");
    Ok((StatusCode::CREATED, Json(inquiry)))
}

/// Inquiries, newest first
///
/// GET /api/contact/inquiries
pub async fn list_inquiries(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContactInquiry>>, ApiError> {
    let options = FindOptions::new()
        .sort_by("submittedAt", SortDirection::Descending)
        .limit(LIST_LIMIT);

    let inquiries = DocumentRepository::<ContactInquiry>::new(state.store)
        .list(&options)
        .await?;

    Ok(Json(inquiries))
}
