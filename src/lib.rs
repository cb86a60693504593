mod domain;
mod infrastructure;
mod interfaces;

pub mod background_task;
pub mod constants;
pub mod errors;
pub mod graceful_shutdown;
pub mod settings;

pub use domain::{entities, use_cases};
pub use infrastructure::{limiter, mail, security, utils};
pub use interfaces::{handlers, routes};

use std::sync::Arc;

use limiter::rate_limiter::{FixedWindowLimiter, RateLimitStore};
use mail::messages::MailSettings;
use mail::smtp::SmtpMailer;
use mail::transport::MailTransport;
use security::csrf::CsrfTokenStore;
use use_cases::contact::ContactHandler;

pub struct AppState {
    pub contact_handler: ContactHandler,
    pub rate_limiter: Arc<dyn RateLimitStore>,
    pub csrf_tokens: CsrfTokenStore,
    pub config: settings::AppConfig,
}

impl AppState {
    /// Wires the production SMTP transport. Fails when the SMTP
    /// configuration is incomplete; there are no fallback credentials.
    pub fn new(config: &settings::AppConfig) -> Result<Self, errors::AppError> {
        let mailer = SmtpMailer::from_config(config)?;
        Ok(Self::with_transport(config, Arc::new(mailer)))
    }

    /// Injection seam for tests and alternative transports.
    pub fn with_transport(
        config: &settings::AppConfig,
        transport: Arc<dyn MailTransport>,
    ) -> Self {
        AppState {
            contact_handler: ContactHandler::new(transport, MailSettings::from(config)),
            rate_limiter: Arc::new(FixedWindowLimiter::new(
                constants::RATE_LIMIT_MAX_REQUESTS,
                constants::RATE_LIMIT_WINDOW,
            )),
            csrf_tokens: CsrfTokenStore::new(constants::CSRF_TOKEN_TTL),
            config: config.clone(),
        }
    }
}
