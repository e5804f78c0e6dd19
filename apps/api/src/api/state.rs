use std::sync::Arc;

use crate::agents::AgentGateway;
use crate::domain::repositories::DocumentStore;

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub gateway: Arc<AgentGateway>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, gateway: Arc<AgentGateway>) -> Self {
        Self { store, gateway }
    }
}
