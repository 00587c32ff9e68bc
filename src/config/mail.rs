use anyhow::Result;
use std::env;

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub from_address: String,
}

impl MailConfig {
    pub fn from_env() -> Result<Self> {
        let smtp_port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "25".to_string())
            .parse()
            .unwrap_or(25);

        Ok(MailConfig {
            smtp_host: env::var("SMTP_HOST").ok().filter(|host| !host.is_empty()),
            smtp_port,
            smtp_username: env::var("SMTP_USERNAME").ok(),
            smtp_password: env::var("SMTP_PASSWORD").ok(),
            from_address: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "GymFlow <no-reply@gymflow.local>".to_string()),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.smtp_host.is_some()
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: None,
            smtp_port: 25,
            smtp_username: None,
            smtp_password: None,
            from_address: "GymFlow <no-reply@gymflow.local>".to_string(),
        }
    }
}
