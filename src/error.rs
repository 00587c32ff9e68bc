use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

/// Field name to the messages shown next to it when a form is redisplayed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn into_result(self) -> Result<(), GymError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(GymError::Validation(self))
        }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, failures) in errors.field_errors() {
            for failure in failures {
                let message = failure
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Valor no válido ({})", failure.code));
                fields.add(&field.to_string(), message);
            }
        }
        fields
    }
}

/// Domain-level failure raised by services and translated by handlers.
#[derive(Error, Debug)]
pub enum GymError {
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ValidationErrors> for GymError {
    fn from(errors: ValidationErrors) -> Self {
        GymError::Validation(errors.into())
    }
}

impl GymError {
    pub fn forbidden(message: impl Into<String>) -> Self {
        GymError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        GymError::NotFound(message.into())
    }

    /// Text shown to the user in a notice.
    pub fn notice_text(&self) -> String {
        match self {
            GymError::Forbidden(message) | GymError::NotFound(message) => message.clone(),
            GymError::Validation(_) => "Revisa los datos del formulario.".to_string(),
            GymError::Database(_) | GymError::Internal(_) => {
                "Ha ocurrido un error inesperado. Inténtalo de nuevo.".to_string()
            }
        }
    }

    pub fn is_unexpected(&self) -> bool {
        matches!(self, GymError::Database(_) | GymError::Internal(_))
    }
}

pub type GymResult<T> = Result<T, GymError>;
