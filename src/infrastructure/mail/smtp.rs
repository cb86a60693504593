use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    transport::smtp::authentication::Credentials,
};
use tokio::time::timeout;
use zeroize::Zeroizing;

use crate::constants::MAIL_SEND_TIMEOUT;
use crate::errors::AppError;
use crate::mail::transport::MailTransport;
use crate::settings::AppConfig;

/// SMTP relay client behind the [`MailTransport`] seam.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Builds the relay client from configuration. Incomplete parameters are
    /// a configuration error; no connection is attempted here.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        if config.smtp_host.trim().is_empty()
            || config.smtp_user.trim().is_empty()
            || config.smtp_password.trim().is_empty()
            || config.mail_recipient.trim().is_empty()
        {
            return Err(AppError::Configuration(
                "SMTP connection parameters are incomplete; set SMTP_HOST, SMTP_USER, \
                 SMTP_PASSWORD and MAIL_RECIPIENT"
                    .to_string(),
            ));
        }

        let password = Zeroizing::new(config.smtp_password.clone());
        let credentials = Credentials::new(config.smtp_user.clone(), password.to_string());

        // smtp_secure selects implicit TLS; otherwise the session is
        // upgraded with STARTTLS, matching the relay's submission port.
        let builder = if config.smtp_secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
        }
        .map_err(|e| {
            AppError::Configuration(format!("Invalid SMTP relay {}: {}", config.smtp_host, e))
        })?;

        let transport = builder
            .credentials(credentials)
            .port(config.smtp_port)
            .timeout(Some(MAIL_SEND_TIMEOUT))
            .build();

        Ok(SmtpMailer { transport })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, message: Message) -> Result<(), AppError> {
        match timeout(MAIL_SEND_TIMEOUT, self.transport.send(message)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(AppError::MailDelivery(e.to_string())),
            Err(_) => Err(AppError::MailDelivery(format!(
                "SMTP send timed out after {}s",
                MAIL_SEND_TIMEOUT.as_secs()
            ))),
        }
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        match timeout(MAIL_SEND_TIMEOUT, self.transport.test_connection()).await {
            Ok(Ok(true)) => Ok(()),
            Ok(Ok(false)) => Err(AppError::MailDelivery("SMTP relay rejected the probe".to_string())),
            Ok(Err(e)) => Err(AppError::MailDelivery(e.to_string())),
            Err(_) => Err(AppError::MailDelivery("SMTP connection check timed out".to_string())),
        }
    }
}
