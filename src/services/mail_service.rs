use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::MailSettings;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("Email build error: {0}")]
    Build(String),
}

/// Outgoing mail used by the auth flows.
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send_password_reset(&self, to: &str, reset_token: &str) -> Result<(), MailError>;
}

pub fn reset_link(frontend_url: &str, reset_token: &str) -> String {
    format!(
        "{}/reset-password?token={}",
        frontend_url,
        urlencoding::encode(reset_token)
    )
}

fn reset_email_body(link: &str) -> String {
    format!(
        "<h1>Password Reset Request</h1>\
         <p>Please click the following link to reset your password:</p>\
         <a href=\"{}\">Reset Password</a>\
         <p>If you didn't request this, please ignore this email.</p>",
        link
    )
}

/// STARTTLS SMTP relay. The transport is pooled and built once.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
    frontend_url: String,
}

impl SmtpMailer {
    pub fn new(settings: &MailSettings, frontend_url: &str) -> Result<Self, MailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
            .port(settings.port);

        match (&settings.user, &settings.password) {
            (Some(user), Some(password)) => {
                builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
            }
            _ => log::warn!("⚠️  MAIL_USER/MAIL_PASSWORD not set, sending without SMTP auth"),
        }

        Ok(Self {
            transport: builder.build(),
            from: settings.from.clone(),
            frontend_url: frontend_url.to_string(),
        })
    }
}

#[async_trait]
impl MailSender for SmtpMailer {
    async fn send_password_reset(&self, to: &str, reset_token: &str) -> Result<(), MailError> {
        let link = reset_link(&self.frontend_url, reset_token);

        let email = Message::builder()
            .from(self.from.parse()?)
            .to(to.parse()?)
            .subject("Password Reset Request")
            .header(ContentType::TEXT_HTML)
            .body(reset_email_body(&link))
            .map_err(|e| MailError::Build(e.to_string()))?;

        self.transport.send(email).await?;
        log::info!("📧 Password reset email sent to {}", to);
        Ok(())
    }
}
