use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repositories::Entity;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// A client testimonial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: String,
    pub client_name: String,
    pub testimonial_text: String,
    pub rating: i64,
    #[serde(default)]
    pub order: i64,
    #[serde(with = "crate::domain::timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTestimonial {
    pub client_name: String,
    pub testimonial_text: String,
    pub rating: i64,
    #[serde(default)]
    pub order: i64,
}

impl Testimonial {
    /// Creates a new testimonial
    ///
    /// # Business Rules Enforced
    /// - Client name and text must not be blank
    /// - Rating must be between 1 and 5
    pub fn new(input: NewTestimonial) -> Result<Self, String> {
        if input.client_name.trim().is_empty() {
            return Err("Client name cannot be empty".to_string());
        }
        if input.testimonial_text.trim().is_empty() {
            return Err("Testimonial text cannot be empty".to_string());
        }
        if !(MIN_RATING..=MAX_RATING).contains(&input.rating) {
            return Err(format!(
                "Rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            ));
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            client_name: input.client_name,
            testimonial_text: input.testimonial_text,
            rating: input.rating,
            order: input.order,
            created_at: Utc::now(),
        })
    }
}

impl Entity for Testimonial {
    const COLLECTION: &'static str = "testimonials";
    const NAME: &'static str = "Testimonial";

    fn id(&self) -> &str {
        &self.id
    }
}
