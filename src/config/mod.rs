pub mod app;
pub mod catalog;
pub mod database;
pub mod mail;
pub mod seeding;

pub use app::AppConfig;
pub use catalog::{CatalogConfig, CatalogMode};
pub use database::{run_migrations, DatabaseConfig};
pub use mail::MailConfig;
pub use seeding::{AdminSeeder, AdminSetup};

use anyhow::Result;

/// All configuration sections, read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub catalog: CatalogConfig,
    pub mail: MailConfig,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            catalog: CatalogConfig::from_env()?,
            mail: MailConfig::from_env()?,
        })
    }
}
