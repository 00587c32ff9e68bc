use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;

use crate::config::MailConfig;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid email address: {0}")]
    InvalidAddress(#[from] lettre::address::AddressError),
    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Outgoing mail. Without an SMTP host, messages are only logged.
#[derive(Clone)]
pub struct Mailer {
    from: String,
    public_url: String,
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
}

impl std::fmt::Debug for Mailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mailer")
            .field("from", &self.from)
            .field("smtp", &self.transport.is_some())
            .finish()
    }
}

impl Mailer {
    pub fn new(config: &MailConfig, public_url: &str) -> Self {
        let transport = config.smtp_host.as_deref().map(|host| {
            let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
                .port(config.smtp_port);
            if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
                builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
            }
            builder.build()
        });

        Self {
            from: config.from_address.clone(),
            public_url: public_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    /// Mailer that never connects, used by tests and when mail is not configured.
    pub fn log_only() -> Self {
        Self::new(&MailConfig::default(), "http://localhost:8000")
    }

    pub fn reset_link(&self, token: &str) -> String {
        format!("{}/password-reset/confirm?token={}", self.public_url, token)
    }

    pub async fn send_password_reset(
        &self,
        to: &str,
        username: &str,
        token: &str,
    ) -> Result<(), MailError> {
        let link = self.reset_link(token);
        let body = format!(
            "Hola {},\n\nHemos recibido una solicitud para restablecer tu contraseña de GymFlow.\n\
             Abre el siguiente enlace en la próxima hora para elegir una nueva:\n\n{}\n\n\
             Si no has sido tú, ignora este mensaje.\n",
            username, link
        );

        let Some(transport) = &self.transport else {
            tracing::info!("SMTP not configured; password reset link for {}: {}", username, link);
            return Ok(());
        };

        let message = Message::builder()
            .from(self.from.parse::<Mailbox>()?)
            .to(to.parse::<Mailbox>()?)
            .subject("Restablecer contraseña de GymFlow")
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        transport.send(message).await?;
        tracing::info!("Sent password reset email to {}", username);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_link_uses_public_url() {
        let mailer = Mailer::new(&MailConfig::default(), "https://gym.example.com/");
        assert_eq!(
            mailer.reset_link("abc123"),
            "https://gym.example.com/password-reset/confirm?token=abc123"
        );
    }

    #[tokio::test]
    async fn test_log_only_mailer_succeeds() {
        let mailer = Mailer::log_only();
        assert!(mailer
            .send_password_reset("ana@example.com", "ana", "token")
            .await
            .is_ok());
    }
}
