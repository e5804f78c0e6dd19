use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::LIST_LIMIT;
use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::domain::photo::{NewPhoto, Photo, PhotoUpdate};
use crate::domain::repositories::{FindOptions, SortDirection};
use crate::infrastructure::repositories::DocumentRepository;

#[derive(Debug, Deserialize)]
pub struct PhotoQuery {
    pub category: Option<String>,
}

/// List photos in display order, optionally for one category
///
/// GET /api/photos?category=portrait
pub async fn list_photos(
    State(state): State<AppState>,
    Query(query): Query<PhotoQuery>,
) -> Result<Json<Vec<Photo>>, ApiError> {
    let mut options = FindOptions::new()
        .sort_by("order", SortDirection::Ascending)
        .limit(LIST_LIMIT);
    if let Some(category) = query.category.filter(|c| !c.is_empty()) {
        options = options.filter("category", category);
    }

    let photos = DocumentRepository::<Photo>::new(state.store)
        .list(&options)
        .await?;

    Ok(Json(photos))
}

/// Add a photo
///
/// POST /api/photos
pub async fn create_photo(
    State(state): State<AppState>,
    Json(req): Json<NewPhoto>,
) -> Result<(StatusCode, Json<Photo>), ApiError> {
    let photo = Photo::new(req).map_err(ApiError::bad_request)?;

    DocumentRepository::<Photo>::new(state.store)
        .create(&photo)
        .await?;

    tracing::info!(photo_id = %photo.id, category = %photo.category, "Photo created");
    Ok((StatusCode::CREATED, Json(photo)))
}

/// Partially update a photo
///
/// PUT /api/photos/:id
pub async fn update_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PhotoUpdate>,
) -> Result<Json<Photo>, ApiError> {
    req.validate().map_err(ApiError::bad_request)?;

    let photo = DocumentRepository::<Photo>::new(state.store)
        .update(&id, &req)
        .await?;

    Ok(Json(photo))
}

/// Delete a photo
///
/// DELETE /api/photos/:id
pub async fn delete_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    DocumentRepository::<Photo>::new(state.store)
        .delete(&id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Photo deleted",
    })))
}
