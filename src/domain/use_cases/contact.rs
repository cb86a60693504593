use std::sync::Arc;

use validator::Validate;

use crate::entities::contact::{ContactResponse, NewContactForm};
use crate::errors::{AppError, FieldError};
use crate::mail::messages::{MailSettings, confirmation_message, notification_message};
use crate::mail::transport::MailTransport;

/// Orchestrates a contact submission: field validation, the administrator
/// notification, and the optional sender confirmation.
pub struct ContactHandler {
    pub mailer: Arc<dyn MailTransport>,
    pub settings: MailSettings,
}

impl ContactHandler {
    pub fn new(mailer: Arc<dyn MailTransport>, settings: MailSettings) -> Self {
        ContactHandler { mailer, settings }
    }

    /// Validates the submission and dispatches mail.
    ///
    /// The administrator notification is the success criterion: its failure
    /// fails the request. A confirmation failure after that point is logged
    /// and swallowed. Submissions are not deduplicated; posting the same
    /// payload twice sends twice.
    pub async fn submit(&self, form: NewContactForm) -> Result<ContactResponse, AppError> {
        form.validate()?;

        if !form.privacy_policy {
            return Err(AppError::Validation(vec![FieldError::new(
                "privacyPolicy",
                "The privacy policy must be accepted",
            )]));
        }

        let notification = notification_message(&form, &self.settings)?;
        self.mailer.send(notification).await?;
        tracing::info!(email = %form.email, "contact notification delivered");

        if self.settings.send_confirmation {
            match confirmation_message(&form, &self.settings) {
                Ok(confirmation) => {
                    if let Err(e) = self.mailer.send(confirmation).await {
                        tracing::warn!(email = %form.email, "confirmation send failed: {}", e);
                    }
                }
                Err(e) => {
                    tracing::warn!(email = %form.email, "confirmation build failed: {}", e);
                }
            }
        }

        Ok(ContactResponse::accepted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lettre::Message;
    use mockall::{Sequence, mock};

    mock! {
        pub Transport {}

        #[async_trait::async_trait]
        impl MailTransport for Transport {
            async fn send(&self, message: Message) -> Result<(), AppError>;
            async fn check_connection(&self) -> Result<(), AppError>;
        }
    }

    fn settings(send_confirmation: bool) -> MailSettings {
        MailSettings {
            from_address: "mailer@flowbit.pl".to_string(),
            recipient: "hello@flowbit.pl".to_string(),
            send_confirmation,
            site_name: "Flowbit".to_string(),
        }
    }

    fn valid_form() -> NewContactForm {
        NewContactForm {
            name: "Jan Kowalski".to_string(),
            email: "jan@example.com".to_string(),
            company: Some("Kowalski Sp. z o.o.".to_string()),
            interest: Some("automation".to_string()),
            message: "I would like to automate my invoicing.".to_string(),
            privacy_policy: true,
            phone_number: None,
            csrf_token: None,
        }
    }

    fn addressed_to(message: &Message, address: &str) -> bool {
        message.envelope().to().iter().any(|a| a.to_string() == address)
    }

    #[tokio::test]
    async fn valid_submission_sends_exactly_one_notification() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .withf(|m| addressed_to(m, "hello@flowbit.pl"))
            .returning(|_| Ok(()));

        let handler = ContactHandler::new(Arc::new(transport), settings(false));
        let response = handler.submit(valid_form()).await.unwrap();

        assert!(response.success);
    }

    #[tokio::test]
    async fn confirmation_follows_the_notification_when_enabled() {
        let mut transport = MockTransport::new();
        let mut seq = Sequence::new();
        transport
            .expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|m| addressed_to(m, "hello@flowbit.pl"))
            .returning(|_| Ok(()));
        transport
            .expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|m| addressed_to(m, "jan@example.com"))
            .returning(|_| Ok(()));

        let handler = ContactHandler::new(Arc::new(transport), settings(true));

        assert!(handler.submit(valid_form()).await.is_ok());
    }

    #[tokio::test]
    async fn confirmation_failure_does_not_fail_the_request() {
        let mut transport = MockTransport::new();
        let mut seq = Sequence::new();
        transport
            .expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        transport
            .expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(AppError::MailDelivery("relay closed the connection".to_string())));

        let handler = ContactHandler::new(Arc::new(transport), settings(true));

        assert!(handler.submit(valid_form()).await.is_ok());
    }

    #[tokio::test]
    async fn invalid_fields_reject_without_sending() {
        let mut transport = MockTransport::new();
        transport.expect_send().never();

        let handler = ContactHandler::new(Arc::new(transport), settings(true));

        let mut form = valid_form();
        form.email = "not-an-email".to_string();

        match handler.submit(form).await {
            Err(AppError::Validation(_)) => {}
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn unaccepted_privacy_policy_rejects_without_sending() {
        let mut transport = MockTransport::new();
        transport.expect_send().never();

        let handler = ContactHandler::new(Arc::new(transport), settings(true));

        let mut form = valid_form();
        form.privacy_policy = false;

        match handler.submit(form).await {
            Err(AppError::Validation(details)) => {
                assert!(details.iter().any(|d| d.field == "privacyPolicy"));
            }
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn notification_failure_fails_the_request() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Err(AppError::MailDelivery("relay unavailable".to_string())));

        let handler = ContactHandler::new(Arc::new(transport), settings(true));

        match handler.submit(valid_form()).await {
            Err(AppError::MailDelivery(_)) => {}
            other => panic!("expected mail delivery error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn identical_submissions_are_not_deduplicated() {
        let mut transport = MockTransport::new();
        transport.expect_send().times(2).returning(|_| Ok(()));

        let handler = ContactHandler::new(Arc::new(transport), settings(false));
        let form = valid_form();

        assert!(handler.submit(form.clone()).await.is_ok());
        assert!(handler.submit(form).await.is_ok());
    }
}
