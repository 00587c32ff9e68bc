use anyhow::Result;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub log_level: String,
    pub jwt_secret: String,
    pub session_hours: i64,
    pub public_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse()
            .unwrap_or(8000);
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let jwt_secret = env::var("JWT_SECRET")
            .unwrap_or_else(|_| "gymflow-secret-change-in-production".to_string());
        let session_hours = env::var("SESSION_HOURS")
            .unwrap_or_else(|_| "12".to_string())
            .parse()
            .unwrap_or(12);
        let public_url = env::var("PUBLIC_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", port));

        Ok(AppConfig {
            host,
            port,
            environment,
            log_level,
            jwt_secret,
            session_hours,
            public_url,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            environment: "development".to_string(),
            log_level: "info".to_string(),
            jwt_secret: "gymflow-secret-change-in-production".to_string(),
            session_hours: 12,
            public_url: "http://localhost:8000".to_string(),
        }
    }
}
