use serde::{Deserialize, Serialize};
use std::fmt;

/// Email address submitted with a contact inquiry
///
/// # Invariants
/// - Must contain '@' character
/// - Must be at least 3 characters long
/// - Surrounding whitespace is stripped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Creates a new Email value object
    ///
    /// # Example
    /// ```
    /// use portfolio_api::domain::contact::Email;
    ///
    /// let email = Email::new(" client@example.com ").expect("valid email");
    /// assert_eq!(email.as_str(), "client@example.com");
    /// ```
    pub fn new(email: impl Into<String>) -> Result<Self, String> {
        let email = email.into();
        let trimmed = email.trim();
        if trimmed.contains('@') && trimmed.len() >= 3 {
            Ok(Email(trimmed.to_string()))
        } else {
            Err(format!("Invalid email: {}", email))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Email::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Follow-up state of an inquiry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    /// Not yet answered
    #[default]
    New,
    /// The photographer has replied
    Contacted,
    Closed,
}

impl fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InquiryStatus::New => write!(f, "new"),
            InquiryStatus::Contacted => write!(f, "contacted"),
            InquiryStatus::Closed => write!(f, "closed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_email() {
        assert!(Email::new("client@example.com").is_ok());
    }

    #[test]
    fn valid_email_minimum_length() {
        assert!(Email::new("a@b").is_ok());
    }

    #[test]
    fn invalid_email_no_at_symbol() {
        assert!(Email::new("client.example.com").is_err());
    }

    #[test]
    fn invalid_email_too_short() {
        assert!(Email::new(" a@ ").is_err());
    }

    #[test]
    fn deserializing_validates() {
        assert!(serde_json::from_str::<Email>(r#""nope""#).is_err());
        let email: Email = serde_json::from_str(r#""x@y.z""#).unwrap();
        assert_eq!(serde_json::to_string(&email).unwrap(), r#""x@y.z""#);
    }

    #[test]
    fn status_uses_lowercase_names() {
        assert_eq!(
            serde_json::to_string(&InquiryStatus::Contacted).unwrap(),
            r#""contacted""#
        );
        assert_eq!(InquiryStatus::default(), InquiryStatus::New);
        assert_eq!(InquiryStatus::Closed.to_string(), "closed");
    }
}
