use std::time::Duration;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Contact form limit: at most 10 submissions per IP per fixed 60s window.
pub const RATE_LIMIT_MAX_REQUESTS: u32 = 10;
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);

/// Upper bound on a single SMTP send, connection setup included.
pub const MAIL_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Issued CSRF tokens are single-use and expire after an hour.
pub const CSRF_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

pub const COMPANY_PLACEHOLDER: &str = "Not provided";
pub const DEFAULT_INTEREST: &str = "websites";
