// API layer module (HTTP adapter)
// Routes requests to the agent gateway and the content repositories

pub mod errors;
pub mod handlers;
pub mod routes;
pub mod state;

pub use errors::ApiError;
pub use routes::{cors_layer, router};
pub use state::AppState;
