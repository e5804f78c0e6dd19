use axum::{extract::State, http::StatusCode, Json};

use super::LIST_LIMIT;
use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::domain::repositories::{FindOptions, SortDirection};
use crate::domain::testimonial::{NewTestimonial, Testimonial};
use crate::infrastructure::repositories::DocumentRepository;

/// GET /api/testimonials
pub async fn list_testimonials(
    State(state): State<AppState>,
) -> Result<Json<Vec<Testimonial>>, ApiError> {
    let options = FindOptions::new()
        .sort_by("order", SortDirection::Ascending)
        .limit(LIST_LIMIT);

    let testimonials = DocumentRepository::<Testimonial>::new(state.store)
        .list(&options)
        .await?;

    Ok(Json(testimonials))
}

/// POST /api/testimonials
pub async fn create_testimonial(
    State(state): State<AppState>,
    Json(req): Json<NewTestimonial>,
) -> Result<(StatusCode, Json<Testimonial>), ApiError> {
    let testimonial = Testimonial::new(req).map_err(ApiError::bad_request)?;

    DocumentRepository::<Testimonial>::new(state.store)
        .create(&testimonial)
        .await?;

    Ok((StatusCode::CREATED, Json(testimonial)))
}
