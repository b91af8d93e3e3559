use anyhow::Context;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::error::{AppError, Result};
use crate::state::Config;

/// SMTP mailer for password-reset mail. Building one spawns the transport's
/// pool task, so `new` must run inside a Tokio runtime; no connection opens
/// until the first send.
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl Mailer {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let credentials = Credentials::new(
            config.smtp_user.clone(),
            config.smtp_password.clone(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .context("invalid SMTP host")?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        let from = config
            .smtp_user
            .parse()
            .context("SMTP_USER is not a valid mailbox address")?;

        Ok(Self { transport, from })
    }

    /// Send an HTML mail.
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let to = to
            .parse::<Mailbox>()
            .map_err(|_| AppError::BadRequest("Invalid email address".to_string()))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body.to_string())
            .map_err(|e| {
                tracing::error!("Failed to build email: {:?}", e);
                AppError::InternalError
            })?;

        self.transport.send(email).await.map_err(|e| {
            tracing::error!("Failed to send email: {:?}", e);
            AppError::InternalError
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mailer_creation() {
        let config = Config {
            jwt_secret: "secret".to_string(),
            jwt_expiration_hours: 24,
            sensor_url: "http://192.168.1.100".to_string(),
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            smtp_user: "noreply@example.com".to_string(),
            smtp_password: "password123".to_string(),
            frontend_origin: "http://localhost:5173".to_string(),
        };

        assert!(Mailer::new(&config).is_ok());
    }

    #[tokio::test]
    async fn test_mailer_rejects_bad_from_address() {
        let config = Config {
            jwt_secret: "secret".to_string(),
            jwt_expiration_hours: 24,
            sensor_url: "http://192.168.1.100".to_string(),
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            smtp_user: "not an address".to_string(),
            smtp_password: "password123".to_string(),
            frontend_origin: "http://localhost:5173".to_string(),
        };

        assert!(Mailer::new(&config).is_err());
    }
}
