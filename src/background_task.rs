use std::sync::Arc;

use tokio::time::{Duration, interval};

use crate::limiter::rate_limiter::RateLimitStore;
use crate::security::csrf::CsrfTokenStore;

/// Periodically drops expired rate-limit windows and CSRF tokens so the
/// in-memory stores do not grow for the lifetime of the process.
pub async fn start_maintenance_task(
    rate_limiter: Arc<dyn RateLimitStore>,
    csrf_tokens: CsrfTokenStore,
) {
    let mut interval = interval(Duration::from_secs(600));

    loop {
        interval.tick().await;

        let windows = rate_limiter.evict_expired();
        let tokens = csrf_tokens.purge_expired();
        if windows > 0 || tokens > 0 {
            tracing::info!(
                "Maintenance sweep removed {} rate-limit windows and {} CSRF tokens",
                windows,
                tokens
            );
        }
    }
}
