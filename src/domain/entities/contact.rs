use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::{COMPANY_PLACEHOLDER, DEFAULT_INTEREST};

/// Contact form submission as posted by the site.
///
/// Every field defaults when absent so that missing required values surface
/// as validation errors with a consistent response body instead of a bare
/// deserialization failure.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewContactForm {
    #[serde(default)]
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = 200, message = "Company name is too long"))]
    pub company: Option<String>,

    /// Which service the sender is interested in.
    #[serde(default)]
    pub interest: Option<String>,

    #[serde(default)]
    #[validate(length(min = 5, max = 5000, message = "Message must be between 5 and 5000 characters"))]
    pub message: String,

    #[serde(default)]
    pub privacy_policy: bool,

    /// Honeypot. The field is hidden from real users; any value flags a bot.
    #[serde(default)]
    pub phone_number: Option<String>,

    #[serde(default)]
    pub csrf_token: Option<String>,
}

impl NewContactForm {
    pub fn is_likely_bot(&self) -> bool {
        self.phone_number
            .as_deref()
            .is_some_and(|value| !value.trim().is_empty())
    }

    pub fn company_or_placeholder(&self) -> &str {
        match self.company.as_deref() {
            Some(company) if !company.trim().is_empty() => company,
            _ => COMPANY_PLACEHOLDER,
        }
    }

    pub fn interest_or_default(&self) -> &str {
        match self.interest.as_deref() {
            Some(interest) if !interest.trim().is_empty() => interest,
            _ => DEFAULT_INTEREST,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<serde_json::Value>,
}

impl ContactResponse {
    /// The one success body. Bot submissions get the identical response so
    /// the honeypot stays invisible to whoever triggered it.
    pub fn accepted() -> Self {
        ContactResponse {
            success: true,
            message: "Your message has been sent. Check your inbox for a confirmation \
                      (it may land in the spam folder)."
                .to_string(),
            debug: None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrfTokenResponse {
    pub csrf_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> NewContactForm {
        NewContactForm {
            name: "Jan Kowalski".to_string(),
            email: "jan@example.com".to_string(),
            company: None,
            interest: None,
            message: "I would like to automate my invoicing.".to_string(),
            privacy_policy: true,
            phone_number: None,
            csrf_token: None,
        }
    }

    #[test]
    fn valid_form_passes_validation() {
        assert!(form().validate().is_ok());
    }

    #[test]
    fn empty_name_fails_validation() {
        let mut submission = form();
        submission.name = "".to_string();

        assert!(submission.validate().is_err());
    }

    #[test]
    fn honeypot_detection_ignores_whitespace() {
        let mut submission = form();
        assert!(!submission.is_likely_bot());

        submission.phone_number = Some("   ".to_string());
        assert!(!submission.is_likely_bot());

        submission.phone_number = Some("+48 123 456 789".to_string());
        assert!(submission.is_likely_bot());
    }

    #[test]
    fn defaults_apply_to_optional_fields() {
        let submission = form();

        assert_eq!(submission.company_or_placeholder(), "Not provided");
        assert_eq!(submission.interest_or_default(), "websites");
    }

    #[test]
    fn absent_fields_deserialize_to_defaults() {
        let submission: NewContactForm = serde_json::from_str("{}").unwrap();

        assert!(submission.name.is_empty());
        assert!(!submission.privacy_policy);
        assert!(submission.validate().is_err());
    }
}
