use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repositories::Entity;

/// A portfolio photo entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    pub title: String,
    /// portrait, wedding, landscape, commercial, ...
    pub category: String,
    /// Image URL, data URI or base64 payload
    pub image_data: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub order: i64,
    #[serde(with = "crate::domain::timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Request body for creating a photo
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPhoto {
    pub title: String,
    pub category: String,
    pub image_data: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub order: i64,
}

/// Partial update of a photo; `None` fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoUpdate {
    pub title: Option<String>,
    pub category: Option<String>,
    pub image_data: Option<String>,
    pub description: Option<String>,
    pub featured: Option<bool>,
    pub order: Option<i64>,
}

impl Photo {
    /// Creates a new photo with a fresh id and creation time
    ///
    /// # Errors
    /// Returns a message if the title, category or image data is blank.
    pub fn new(input: NewPhoto) -> Result<Self, String> {
        require_text("Title", &input.title)?;
        require_text("Category", &input.category)?;
        require_text("Image data", &input.image_data)?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            category: input.category,
            image_data: input.image_data,
            description: input.description,
            featured: input.featured,
            order: input.order,
            created_at: Utc::now(),
        })
    }
}

impl PhotoUpdate {
    /// Applies the creation rules to every field the update sets
    ///
    /// # Errors
    /// Returns a message if a set title, category or image data is blank.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(title) = &self.title {
            require_text("Title", title)?;
        }
        if let Some(category) = &self.category {
            require_text("Category", category)?;
        }
        if let Some(image_data) = &self.image_data {
            require_text("Image data", image_data)?;
        }
        Ok(())
    }
}

fn require_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} cannot be empty", field));
    }
    Ok(())
}

impl Entity for Photo {
    const COLLECTION: &'static str = "photos";
    const NAME: &'static str = "Photo";

    fn id(&self) -> &str {
        &self.id
    }
}
