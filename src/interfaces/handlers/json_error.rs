use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};
use serde_json::json;

use crate::errors::AppError;

pub fn json_error(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(json!({
        "success": false,
        "message": message,
    }))
}

/// Maps an [`AppError`] to the contact endpoint's response body. Debug
/// detail rides along only when requested (development mode); the
/// user-facing message never carries transport or configuration detail.
pub fn handle_contact_error(err: &AppError, include_debug: bool) -> HttpResponse {
    let mut body = json!({
        "success": false,
        "message": err.user_message(),
    });
    if let AppError::Validation(details) = err {
        body["details"] = json!(details);
    }
    if include_debug {
        body["debug"] = json!(err.to_string());
    }
    HttpResponse::build(err.status_code()).json(body)
}

pub async fn not_found() -> HttpResponse {
    json_error(StatusCode::NOT_FOUND, "Resource not found")
}

/// Malformed JSON bodies get the same response shape as every other error.
pub fn json_extractor_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = json_error(StatusCode::BAD_REQUEST, "Invalid request body");
        actix_web::error::InternalError::from_response(err, response).into()
    })
}
