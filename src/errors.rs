use std::fmt;

use actix_web::{
    HttpResponse,
    error::ResponseError,
    http::{StatusCode, header::ContentType},
};
use serde::Serialize;
use validator::ValidationErrors;

#[derive(Debug)]
pub enum AppError {
    Validation(Vec<FieldError>),
    SecurityVerification(String),
    RateLimited,
    MethodNotAllowed,
    Configuration(String),
    MailDelivery(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(errors) => {
                let messages = errors
                    .iter()
                    .map(|e| format!("{}:{}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "validation error: {}", messages)
            }
            AppError::SecurityVerification(msg) => write!(f, "Security verification failed: {}", msg),
            AppError::RateLimited => write!(f, "Too many requests"),
            AppError::MethodNotAllowed => write!(f, "Method not allowed"),
            AppError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            AppError::MailDelivery(msg) => write!(f, "Mail delivery failed: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal server error: {}", msg),
        }
    }
}

impl AppError {
    /// Message safe to show to the end user. Transport and configuration
    /// detail stays in logs; it may carry hostnames or account names.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(_) => "All required fields must be filled in.".to_string(),
            AppError::SecurityVerification(_) => {
                "Security verification failed. Please reload the page and try again.".to_string()
            }
            AppError::RateLimited => {
                "Too many requests. Please try again later.".to_string()
            }
            AppError::MethodNotAllowed => "Method not allowed".to_string(),
            AppError::Configuration(_) | AppError::MailDelivery(_) | AppError::Internal(_) => {
                "There was a problem sending your message. Please try again later.".to_string()
            }
        }
    }

    pub fn to_http_response(&self) -> HttpResponse {
        self.error_response()
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Validation(errors) => serde_json::json!({
                "success": false,
                "message": self.user_message(),
                "details": errors,
            }),
            _ => serde_json::json!({
                "success": false,
                "message": self.user_message(),
            }),
        };
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::SecurityVerification(_) => StatusCode::FORBIDDEN,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::MailDelivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let field_errors = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(|e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string()),
                })
            })
            .collect();

        AppError::Validation(field_errors)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        FieldError {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}
