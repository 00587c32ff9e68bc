use chrono::{Duration, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::auth::password::{
    generate_reset_token, hash_password, reset_token_digest, validate_new_password, verify_password,
    PasswordPolicy,
};
use crate::auth::{
    AuthError, JwtService, LoginForm, PasswordResetConfirmForm, RegisterForm, Role, SignedIn,
    UserSession,
};
use crate::models::User;
use crate::services::ProfileService;

const RESET_TOKEN_LIFETIME_HOURS: i64 = 1;

#[derive(Debug, Clone)]
pub struct AuthService {
    jwt_service: JwtService,
    db: PgPool,
    policy: PasswordPolicy,
}

impl AuthService {
    pub fn new(db: PgPool, jwt_secret: &str, session_hours: i64) -> Self {
        Self {
            jwt_service: JwtService::new(jwt_secret, session_hours),
            db,
            policy: PasswordPolicy::default(),
        }
    }

    pub fn session_expires_in_seconds(&self) -> i64 {
        self.jwt_service.session_expires_in_seconds()
    }

    /// Create an account and its profile in one transaction, then sign the user in.
    pub async fn register(&self, form: &RegisterForm) -> Result<SignedIn, AuthError> {
        let username = form.username.trim();
        validate_new_password(&form.password1, &form.password2, &self.policy)
            .map_err(|e| AuthError::PasswordValidation(e.to_string()))?;

        if self.get_user_by_username(username).await?.is_some() {
            return Err(AuthError::UsernameTaken);
        }

        let password_hash = hash_password(&form.password1)?;
        let user_id = Uuid::new_v4();
        let email = form.email.as_deref().map(str::trim).filter(|e| !e.is_empty());

        let mut tx = self.db.begin().await?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, email, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING id, username, email, password_hash, is_active, created_at, updated_at",
        )
        .bind(user_id)
        .bind(username)
        .bind(email)
        .bind(&password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(username_conflict)?;

        sqlx::query("INSERT INTO profiles (user_id, role) VALUES ($1, $2)")
            .bind(user.id)
            .bind(Role::User.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!("Registered user {}", user.username);
        self.sign_in(&user, Role::User, false)
    }

    /// Check credentials; a missing profile is created on the way in.
    pub async fn login(&self, form: &LoginForm) -> Result<SignedIn, AuthError> {
        let user = self
            .get_user_by_username(form.username.trim())
            .await?
            .filter(|user| user.is_active)
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&form.password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let (profile, created) = ProfileService::new(self.db.clone())
            .ensure_profile(user.id)
            .await
            .map_err(|e| AuthError::Internal(e.into()))?;

        if created {
            tracing::info!("Created missing profile for {}", user.username);
        }

        self.sign_in(&user, profile.role, created)
    }

    /// Revoke the token until it would have expired anyway.
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        let claims = self.jwt_service.validate_token(token)?;
        self.blacklist_token(&claims.jti, claims.exp as i64).await
    }

    pub async fn is_token_blacklisted(&self, jti: &str) -> Result<bool, AuthError> {
        let result = sqlx::query("SELECT 1 FROM token_blacklist WHERE jti = $1 AND expires_at > NOW()")
            .bind(jti)
            .fetch_optional(&self.db)
            .await?;

        Ok(result.is_some())
    }

    /// Resolve the caller behind a token, reading the current role from the profile.
    pub async fn validate_session(&self, token: &str) -> Result<UserSession, AuthError> {
        let claims = self.jwt_service.validate_token(token)?;

        if self.is_token_blacklisted(&claims.jti).await? {
            return Err(AuthError::InvalidToken);
        }

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

        let row = sqlx::query(
            "SELECT u.username, COALESCE(p.role, 'user') AS role
             FROM users u
             LEFT JOIN profiles p ON p.user_id = u.id
             WHERE u.id = $1 AND u.is_active",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AuthError::UserNotFound)?;

        let role_text: String = row.try_get("role")?;
        let role = Role::from_str(&role_text).ok_or(AuthError::InvalidToken)?;

        Ok(UserSession {
            user_id,
            username: row.try_get("username")?,
            role,
            jti: claims.jti,
            exp: claims.exp,
        })
    }

    /// Issue a reset token for the account behind `email`, if there is one.
    ///
    /// Returns the user and the plain token so the caller can mail it; only the
    /// digest is stored.
    pub async fn request_password_reset(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, is_active, created_at, updated_at
             FROM users WHERE LOWER(email) = LOWER($1) AND is_active
             ORDER BY created_at LIMIT 1",
        )
        .bind(email.trim())
        .fetch_optional(&self.db)
        .await?;

        let Some(user) = user else {
            return Ok(None);
        };

        let token = generate_reset_token();
        let expires_at = Utc::now() + Duration::hours(RESET_TOKEN_LIFETIME_HOURS);

        sqlx::query(
            "INSERT INTO password_reset_tokens (id, user_id, token_hash, expires_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::new_v4())
        .bind(user.id)
        .bind(reset_token_digest(&token))
        .bind(expires_at)
        .execute(&self.db)
        .await?;

        Ok(Some((user, token)))
    }

    /// Consume a reset token and store the new password.
    pub async fn confirm_password_reset(
        &self,
        form: &PasswordResetConfirmForm,
    ) -> Result<(), AuthError> {
        validate_new_password(&form.new_password1, &form.new_password2, &self.policy)
            .map_err(|e| AuthError::PasswordValidation(e.to_string()))?;

        let mut tx = self.db.begin().await?;

        let row = sqlx::query(
            "UPDATE password_reset_tokens SET used = TRUE
             WHERE token_hash = $1 AND NOT used AND expires_at > NOW()
             RETURNING user_id",
        )
        .bind(reset_token_digest(form.token.trim()))
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AuthError::InvalidResetToken)?;

        let user_id: Uuid = row.try_get("user_id")?;
        let password_hash = hash_password(&form.new_password1)?;

        sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
            .bind(&password_hash)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, is_active, created_at, updated_at
             FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    fn sign_in(&self, user: &User, role: Role, profile_created: bool) -> Result<SignedIn, AuthError> {
        let token = self.jwt_service.create_session_token(user.id, &user.username)?;
        let claims = self.jwt_service.validate_token(&token)?;

        Ok(SignedIn {
            token,
            session: UserSession {
                user_id: user.id,
                username: user.username.clone(),
                role,
                jti: claims.jti,
                exp: claims.exp,
            },
            profile_created,
        })
    }

    async fn blacklist_token(&self, jti: &str, exp: i64) -> Result<(), AuthError> {
        let expires_at = chrono::DateTime::from_timestamp(exp, 0).ok_or(AuthError::InvalidToken)?;

        sqlx::query(
            "INSERT INTO token_blacklist (jti, expires_at) VALUES ($1, $2)
             ON CONFLICT (jti) DO NOTHING",
        )
        .bind(jti)
        .bind(expires_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }
}

/// A concurrent registration can pass the username check and still lose the insert.
fn username_conflict(error: sqlx::Error) -> AuthError {
    match error {
        sqlx::Error::Database(db) if db.is_unique_violation() => AuthError::UsernameTaken,
        other => AuthError::Database(other),
    }
}
