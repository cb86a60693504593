use chrono::Utc;
use lettre::message::{Mailbox, MultiPart};
use lettre::{Address, Message};

use crate::entities::contact::NewContactForm;
use crate::errors::{AppError, FieldError};
use crate::settings::AppConfig;

/// Everything the dispatcher needs to address mail, extracted from the app
/// configuration so the use case does not drag the whole config around.
#[derive(Debug, Clone)]
pub struct MailSettings {
    /// Authenticated relay account; also the From address on both mails.
    pub from_address: String,
    /// Administrator inbox for notifications.
    pub recipient: String,
    pub send_confirmation: bool,
    pub site_name: String,
}

impl From<&AppConfig> for MailSettings {
    fn from(config: &AppConfig) -> Self {
        MailSettings {
            from_address: config.smtp_user.clone(),
            recipient: config.mail_recipient.clone(),
            send_confirmation: config.send_confirmation,
            site_name: config.name.clone(),
        }
    }
}

/// Notification to the administrator carrying the full submission.
pub fn notification_message(
    form: &NewContactForm,
    settings: &MailSettings,
) -> Result<Message, AppError> {
    let from = configured_mailbox("Contact form", &settings.from_address)?;
    let to = configured_mailbox(&settings.site_name, &settings.recipient)?;
    let reply_to = submitter_mailbox(form)?;

    let text = format!(
        "Name: {name}\n\
         Email: {email}\n\
         Company: {company}\n\
         Topic: {interest}\n\
         \n\
         Message:\n\
         {message}\n\
         \n\
         Privacy policy accepted: yes\n",
        name = form.name,
        email = form.email,
        company = form.company_or_placeholder(),
        interest = form.interest_or_default(),
        message = form.message,
    );

    let html = format!(
        "<h2>New message from the contact form</h2>\n\
         <p><strong>Name:</strong> {name}</p>\n\
         <p><strong>Email:</strong> {email}</p>\n\
         <p><strong>Company:</strong> {company}</p>\n\
         <p><strong>Topic:</strong> {interest}</p>\n\
         <p><strong>Message:</strong></p>\n\
         <p>{message}</p>\n\
         <p><strong>Privacy policy accepted:</strong> yes</p>\n",
        name = escape_html(&form.name),
        email = escape_html(&form.email),
        company = escape_html(form.company_or_placeholder()),
        interest = escape_html(form.interest_or_default()),
        message = escape_html(&form.message).replace('\n', "<br>"),
    );

    Message::builder()
        .from(from)
        .reply_to(reply_to)
        .to(to)
        .subject(format!("New message from {}", form.name))
        .multipart(MultiPart::alternative_plain_html(text, html))
        .map_err(|e| AppError::Internal(format!("Failed to build notification mail: {}", e)))
}

/// Acknowledgement back to the submitter. Built only when confirmation
/// sending is enabled.
pub fn confirmation_message(
    form: &NewContactForm,
    settings: &MailSettings,
) -> Result<Message, AppError> {
    let from = configured_mailbox(&settings.site_name, &settings.from_address)?;
    let to = submitter_mailbox(form)?;
    let sent_at = Utc::now().format("%d.%m.%Y %H:%M UTC");

    let text = format!(
        "Hello {name},\n\
         \n\
         Thank you for reaching out. We have received your message and will \
         reply as soon as possible, usually within 24-48 business hours.\n\
         \n\
         Your message:\n\
         - Topic: {interest}\n\
         - Sent at: {sent_at}\n\
         \n\
         Note: this is an automated message, please do not reply to it.\n\
         \n\
         Best regards,\n\
         The {site} team\n",
        name = form.name,
        interest = form.interest_or_default(),
        sent_at = sent_at,
        site = settings.site_name,
    );

    let html = format!(
        "<h2>Thank you for reaching out</h2>\n\
         <p>Hello <strong>{name}</strong>,</p>\n\
         <p>We have received your message and will reply as soon as possible, \
         usually within 24-48 business hours.</p>\n\
         <p><strong>Topic:</strong> {interest}<br>\n\
         <strong>Sent at:</strong> {sent_at}</p>\n\
         <p><em>This is an automated message, please do not reply to it.</em></p>\n\
         <p>Best regards,<br>The {site} team</p>\n",
        name = escape_html(&form.name),
        interest = escape_html(form.interest_or_default()),
        sent_at = sent_at,
        site = escape_html(&settings.site_name),
    );

    Message::builder()
        .from(from)
        .to(to)
        .subject(format!("Thank you for contacting {}", settings.site_name))
        .multipart(MultiPart::alternative_plain_html(text, html))
        .map_err(|e| AppError::Internal(format!("Failed to build confirmation mail: {}", e)))
}

/// Escapes user-controlled text for interpolation into an HTML body.
pub(crate) fn escape_html(value: &str) -> String {
    ammonia::clean_text(value)
}

fn configured_mailbox(display_name: &str, address: &str) -> Result<Mailbox, AppError> {
    let address = address.parse::<Address>().map_err(|e| {
        AppError::Configuration(format!("Invalid configured mail address: {}", e))
    })?;
    Ok(Mailbox::new(Some(display_name.to_string()), address))
}

fn submitter_mailbox(form: &NewContactForm) -> Result<Mailbox, AppError> {
    let address = form.email.parse::<Address>().map_err(|_| {
        AppError::Validation(vec![FieldError::new("email", "A valid email address is required")])
    })?;
    Ok(Mailbox::new(Some(form.name.clone()), address))
}
