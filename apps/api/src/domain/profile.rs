use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::repositories::SingletonEntity;

pub const ABOUT_KEY: &str = "about";

fn about_key() -> String {
    ABOUT_KEY.to_string()
}

/// The photographer's "about" profile
///
/// A singleton resource: exactly zero or one exists, stored under
/// [`ABOUT_KEY`]. Fields missing from the stored document (for example after
/// a single-field upsert into an empty store) read as empty strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutProfile {
    #[serde(default = "about_key")]
    pub id: String,
    #[serde(default)]
    pub bio_text: String,
    #[serde(default)]
    pub photographer_name: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub portrait_image: String,
    #[serde(default = "Utc::now", with = "crate::domain::timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl AboutProfile {
    /// Content shown before the photographer has written their own
    pub fn placeholder() -> Self {
        Self {
            id: about_key(),
            bio_text: "Professional photographer capturing moments that matter.".to_string(),
            photographer_name: "Your Name".to_string(),
            tagline: "Capturing Life's Beautiful Moments".to_string(),
            portrait_image: String::new(),
            updated_at: Utc::now(),
        }
    }
}

impl SingletonEntity for AboutProfile {
    const COLLECTION: &'static str = "about";
    const KEY: &'static str = ABOUT_KEY;
}

/// Partial update of the profile; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutProfileUpdate {
    pub bio_text: Option<String>,
    pub photographer_name: Option<String>,
    pub tagline: Option<String>,
    pub portrait_image: Option<String>,
}
