use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::password::{hash_password, validate_new_password, PasswordPolicy};
use crate::auth::Role;
use crate::services::ProfileService;

/// Outcome of the administrator bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminSetup {
    Created,
    Promoted,
}

/// Bootstraps the administrator account from the command line.
pub struct AdminSeeder {
    pool: PgPool,
}

impl AdminSeeder {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the account with an admin profile, or promote it if it already exists.
    ///
    /// The password is only used when the account is created.
    pub async fn setup_admin(
        &self,
        username: &str,
        email: Option<&str>,
        password: &str,
    ) -> Result<AdminSetup> {
        let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to look up the administrator account")?;

        let profiles = ProfileService::new(self.pool.clone());

        if let Some(user_id) = existing {
            profiles
                .set_role(user_id, Role::Admin)
                .await
                .context("Failed to promote the account")?;
            tracing::info!("Promoted {} to administrator", username);
            return Ok(AdminSetup::Promoted);
        }

        validate_new_password(password, password, &PasswordPolicy::default())
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        let password_hash = hash_password(password).context("Failed to hash password")?;

        let mut tx = self.pool.begin().await?;
        let user_id = Uuid::new_v4();

        sqlx::query("INSERT INTO users (id, username, email, password_hash) VALUES ($1, $2, $3, $4)")
            .bind(user_id)
            .bind(username)
            .bind(email)
            .bind(&password_hash)
            .execute(&mut *tx)
            .await
            .context("Failed to create the administrator account")?;

        sqlx::query("INSERT INTO profiles (user_id, role) VALUES ($1, $2)")
            .bind(user_id)
            .bind(Role::Admin.as_str())
            .execute(&mut *tx)
            .await
            .context("Failed to create the administrator profile")?;

        tx.commit().await?;

        tracing::info!("Created administrator {}", username);
        Ok(AdminSetup::Created)
    }
}
