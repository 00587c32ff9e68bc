use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Usuario o contraseña incorrectos.")]
    InvalidCredentials,
    #[error("Ese nombre de usuario ya está en uso.")]
    UsernameTaken,
    #[error("User not found")]
    UserNotFound,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Missing session")]
    MissingSession,
    #[error("Invalid authorization header format")]
    InvalidAuthHeaderFormat,
    #[error("El enlace de recuperación no es válido o ha caducado.")]
    InvalidResetToken,
    #[error("{0}")]
    PasswordValidation(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("Password hashing error: {0}")]
    PasswordHashing(#[from] crate::auth::password::PasswordError),
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    /// Failures that mean "no usable session": the caller is sent to the login page.
    pub fn is_session_failure(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidToken
                | AuthError::TokenExpired
                | AuthError::MissingSession
                | AuthError::InvalidAuthHeaderFormat
                | AuthError::UserNotFound
                | AuthError::Jwt(_)
        )
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if self.is_session_failure() {
            let body = Json(json!({
                "redirect": "/login",
                "notice": {
                    "level": "info",
                    "message": "Inicia sesión para continuar.",
                },
            }));
            return (StatusCode::SEE_OTHER, [(header::LOCATION, "/login")], body).into_response();
        }

        let (status, error_message) = match self {
            AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            AuthError::UsernameTaken => (StatusCode::CONFLICT, "Username already exists"),
            AuthError::InvalidResetToken => (StatusCode::BAD_REQUEST, "Invalid reset token"),
            AuthError::PasswordValidation(_) => (StatusCode::BAD_REQUEST, "Password validation failed"),
            AuthError::Database(ref e) => {
                tracing::error!("Database error during authentication: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error")
            }
            AuthError::PasswordHashing(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Password processing error"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };

        let body = Json(json!({
            "error": error_message,
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}
