use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repositories::Entity;

/// A liveness ping recorded by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusCheck {
    pub id: String,
    pub client_name: String,
    #[serde(with = "crate::domain::timestamp")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStatusCheck {
    pub client_name: String,
}

impl StatusCheck {
    pub fn new(input: NewStatusCheck) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            client_name: input.client_name,
            timestamp: Utc::now(),
        }
    }
}

impl Entity for StatusCheck {
    const COLLECTION: &'static str = "status_checks";
    const NAME: &'static str = "Status check";

    fn id(&self) -> &str {
        &self.id
    }
}
