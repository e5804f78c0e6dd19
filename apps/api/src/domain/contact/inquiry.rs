use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::{Email, InquiryStatus};
use crate::domain::repositories::Entity;

/// A message left through the contact form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInquiry {
    pub id: String,
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub phone: String,
    pub message: String,
    #[serde(with = "crate::domain::timestamp")]
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub status: InquiryStatus,
}

/// Request body of the contact form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInquiry {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub message: String,
}

impl ContactInquiry {
    /// Creates a new inquiry in the `new` state
    ///
    /// # Business Rules Enforced
    /// - Email must be valid
    /// - Name and message must not be blank
    pub fn new(input: NewInquiry) -> Result<Self, String> {
        let email = Email::new(input.email)?;
        if input.name.trim().is_empty() {
            return Err("Name cannot be empty".to_string());
        }
        if input.message.trim().is_empty() {
            return Err("Message cannot be empty".to_string());
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            email,
            phone: input.phone,
            message: input.message,
            submitted_at: Utc::now(),
            status: InquiryStatus::New,
        })
    }
}

impl Entity for ContactInquiry {
    const COLLECTION: &'static str = "contact_inquiries";
    const NAME: &'static str = "Inquiry";

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(email: &str) -> NewInquiry {
        NewInquiry {
            name: "Ana".to_string(),
            email: email.to_string(),
            phone: String::new(),
            message: "Do you shoot weddings in June?".to_string(),
        }
    }

    #[test]
    fn new_inquiry_starts_as_new() {
        let inquiry = ContactInquiry::new(input("ana@example.com")).unwrap();

        assert_eq!(inquiry.status, InquiryStatus::New);
        assert_eq!(inquiry.email.as_str(), "ana@example.com");
    }

    #[test]
    fn invalid_email_is_rejected() {
        let err = ContactInquiry::new(input("ana")).unwrap_err();
        assert_eq!(err, "Invalid email: ana");
    }

    #[test]
    fn serialized_form_uses_camel_case() {
        let inquiry = ContactInquiry::new(input("ana@example.com")).unwrap();
        let value = serde_json::to_value(&inquiry).unwrap();

        assert_eq!(value["status"], "new");
        assert_eq!(value["email"], "ana@example.com");
        assert!(value.get("submittedAt").is_some());
    }
}
