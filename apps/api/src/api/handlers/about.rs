use axum::{extract::State, Json};

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::domain::profile::{AboutProfile, AboutProfileUpdate};
use crate::infrastructure::repositories::SingletonRepository;

/// The about profile, or placeholder content if none was saved yet
///
/// GET /api/about
pub async fn get_about(State(state): State<AppState>) -> Result<Json<AboutProfile>, ApiError> {
    let profile = SingletonRepository::<AboutProfile>::new(state.store)
        .get(AboutProfile::placeholder)
        .await?;

    Ok(Json(profile))
}

/// Merge the provided fields into the about profile
///
/// PUT /api/about
pub async fn update_about(
    State(state): State<AppState>,
    Json(req): Json<AboutProfileUpdate>,
) -> Result<Json<AboutProfile>, ApiError> {
    let profile = SingletonRepository::<AboutProfile>::new(state.store)
        .update(&req)
        .await?;

    tracing::info!("About profile updated");
    Ok(Json(profile))
}
