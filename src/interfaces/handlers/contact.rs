use actix_web::{HttpRequest, HttpResponse, Responder, http::StatusCode, web};

use crate::AppState;
use crate::entities::contact::{ContactResponse, CsrfTokenResponse, NewContactForm};
use crate::errors::AppError;
use crate::handlers::json_error::{handle_contact_error, json_error};
use crate::limiter::rate_limiter::{RateDecision, RateLimitStore};
use crate::utils::get_client_ip::get_client_ip;

pub async fn submit_contact(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Json<NewContactForm>,
) -> impl Responder {
    let form = form.into_inner();

    // Rate limiting is disabled entirely in development.
    if !state.config.is_development() {
        let client_ip = get_client_ip(&req, state.config.trust_proxy_headers);
        if let RateDecision::Limited { retry_after } = state.rate_limiter.check(&client_ip) {
            tracing::warn!(client_ip = %client_ip, "contact form rate limit exceeded");
            return HttpResponse::TooManyRequests()
                .insert_header(("Retry-After", retry_after.as_secs().max(1).to_string()))
                .json(serde_json::json!({
                    "success": false,
                    "message": AppError::RateLimited.user_message(),
                }));
        }
    }

    // A filled honeypot gets the standard success body and nothing else;
    // the caller must not learn it was detected.
    if form.is_likely_bot() {
        tracing::info!("honeypot field filled, dropping submission");
        return HttpResponse::Ok().json(ContactResponse::accepted());
    }

    if state.config.csrf_protection && !state.config.is_development() {
        let verified = form
            .csrf_token
            .as_deref()
            .is_some_and(|token| state.csrf_tokens.verify(token));
        if !verified {
            let err = AppError::SecurityVerification("missing or invalid CSRF token".to_string());
            tracing::warn!("{}", err);
            return handle_contact_error(&err, state.config.is_development());
        }
    }

    match state.contact_handler.submit(form).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            tracing::error!("contact submission failed: {}", e);
            handle_contact_error(&e, state.config.is_development())
        }
    }
}

pub async fn issue_csrf_token(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(CsrfTokenResponse {
        csrf_token: state.csrf_tokens.issue(),
    })
}

pub async fn method_not_allowed() -> HttpResponse {
    json_error(
        StatusCode::METHOD_NOT_ALLOWED,
        &AppError::MethodNotAllowed.user_message(),
    )
}
