use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::UnknownVariant;

/// Profile roles. Every authorization checkpoint matches on all three.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Trainer,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::User, Role::Trainer, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Trainer => "trainer",
            Role::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "user" => Some(Role::User),
            "trainer" => Some(Role::Trainer),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "Usuario",
            Role::Trainer => "Entrenador",
            Role::Admin => "Administrador",
        }
    }

    /// Create, edit and delete routines and their entries.
    pub fn can_manage_routines(&self) -> bool {
        match self {
            Role::Trainer | Role::Admin => true,
            Role::User => false,
        }
    }

    /// Copy an own routine to another user.
    pub fn can_assign(&self) -> bool {
        match self {
            Role::Trainer => true,
            Role::User | Role::Admin => false,
        }
    }

    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::User => "/dashboard/user",
            Role::Trainer => "/dashboard/trainer",
            Role::Admin => "/dashboard/admin",
        }
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Role::from_str(&value).ok_or(UnknownVariant {
            kind: "role",
            value,
        })
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,      // User ID
    pub username: String,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,      // JWT ID (for revocation)
}

/// Authenticated caller, resolved per request.
///
/// The role is read from the profile on every request so that role changes made
/// by an administrator apply to sessions that are already open.
#[derive(Debug, Clone, Serialize)]
pub struct UserSession {
    pub user_id: Uuid,
    pub username: String,
    pub role: Role,
    #[serde(skip)]
    pub jti: String,
    #[serde(skip)]
    pub exp: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RegisterForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 150, message = "El nombre de usuario es obligatorio (máximo 150 caracteres)."))]
    pub username: String,

    #[serde(default, deserialize_with = "crate::models::empty_as_none")]
    #[validate(email(message = "Introduce un correo electrónico válido."))]
    pub email: Option<String>,

    #[serde(default, skip_serializing)]
    #[validate(length(min = 8, message = "La contraseña debe tener al menos 8 caracteres."))]
    pub password1: String,

    #[serde(default, skip_serializing)]
    #[validate(must_match(other = "password1", message = "Las contraseñas no coinciden."))]
    pub password2: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PasswordResetRequestForm {
    #[serde(default)]
    #[validate(email(message = "Introduce un correo electrónico válido."))]
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PasswordResetConfirmForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "El enlace de recuperación no es válido."))]
    pub token: String,

    #[serde(default, skip_serializing)]
    #[validate(length(min = 8, message = "La contraseña debe tener al menos 8 caracteres."))]
    pub new_password1: String,

    #[serde(default, skip_serializing)]
    #[validate(must_match(other = "new_password1", message = "Las contraseñas no coinciden."))]
    pub new_password2: String,
}

/// Result of a successful login or registration.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub token: String,
    pub session: UserSession,
    pub profile_created: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_role_permissions() {
        assert!(Role::Trainer.can_manage_routines());
        assert!(Role::Admin.can_manage_routines());
        assert!(!Role::User.can_manage_routines());

        assert!(Role::Trainer.can_assign());
        assert!(!Role::Admin.can_assign());
        assert!(!Role::User.can_assign());
    }

    #[test]
    fn test_role_round_trip_through_storage_text() {
        for role in Role::ALL {
            assert_eq!(Role::from_str(role.as_str()), Some(role));
        }
        assert_eq!(Role::from_str("coach"), None);
        assert!(Role::try_from("ADMIN".to_string()).is_ok());
    }

    #[test]
    fn test_dashboard_paths() {
        assert_eq!(Role::User.dashboard_path(), "/dashboard/user");
        assert_eq!(Role::Trainer.dashboard_path(), "/dashboard/trainer");
        assert_eq!(Role::Admin.dashboard_path(), "/dashboard/admin");
    }

    #[test]
    fn test_register_form_rules() {
        let valid = RegisterForm {
            username: "lucia".to_string(),
            email: None,
            password1: "segura123".to_string(),
            password2: "segura123".to_string(),
        };
        assert!(valid.validate().is_ok());

        let mismatch = RegisterForm {
            password2: "otra-cosa".to_string(),
            ..valid.clone()
        };
        let errors = mismatch.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password2"));

        let short = RegisterForm {
            password1: "corta".to_string(),
            password2: "corta".to_string(),
            ..valid.clone()
        };
        assert!(short.validate().is_err());

        let bad_email = RegisterForm {
            email: Some("no-es-correo".to_string()),
            ..valid
        };
        assert!(bad_email.validate().is_err());
    }
}
