use axum::{
    http::HeaderValue,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::handlers::{about, agents, contact, photos, status, testimonials};
use super::state::AppState;

/// Build the application router
///
/// Middleware (CORS, tracing) is layered on by the caller.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(status::health_check))
        .route("/api", get(status::root))
        .route("/api/", get(status::root))
        .route(
            "/api/status",
            post(status::create_status_check).get(status::list_status_checks),
        )
        // Agent gateway
        .route("/api/chat", post(agents::chat))
        .route("/api/search", post(agents::search))
        .route("/api/agents/capabilities", get(agents::capabilities))
        // Portfolio content
        .route(
            "/api/photos",
            get(photos::list_photos).post(photos::create_photo),
        )
        .route(
            "/api/photos/:id",
            put(photos::update_photo).delete(photos::delete_photo),
        )
        .route(
            "/api/testimonials",
            get(testimonials::list_testimonials).post(testimonials::create_testimonial),
        )
        .route("/api/contact", post(contact::submit_inquiry))
        .route("/api/contact/inquiries", get(contact::list_inquiries))
        .route("/api/about", get(about::get_about).put(about::update_about))
        .with_state(state)
}

/// CORS policy: any origin when `origins` is empty, otherwise exactly those
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(%origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
