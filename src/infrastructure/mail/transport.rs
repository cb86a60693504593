use async_trait::async_trait;
use lettre::Message;

use crate::errors::AppError;

/// Outbound mail seam. The production implementation talks SMTP; tests
/// substitute a mock or a recording transport.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: Message) -> Result<(), AppError>;

    /// Probes the relay without sending anything. Used by the health check.
    async fn check_connection(&self) -> Result<(), AppError>;
}
