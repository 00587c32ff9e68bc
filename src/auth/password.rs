use bcrypt::{hash, verify, DEFAULT_COST};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("La contraseña debe tener al menos {0} caracteres.")]
    TooShort(usize),
    #[error("La contraseña no puede superar {0} caracteres.")]
    TooLong(usize),
    #[error("Las contraseñas no coinciden.")]
    Mismatch,
    #[error("Failed to hash password")]
    HashingFailed,
    #[error("Failed to verify password")]
    VerificationFailed,
}

/// Password requirements. Length is the only strength rule.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 128,
        }
    }
}

/// Validate a new password and its confirmation according to policy.
pub fn validate_new_password(
    password: &str,
    confirmation: &str,
    policy: &PasswordPolicy,
) -> Result<(), PasswordError> {
    let length = password.chars().count();
    if length < policy.min_length {
        return Err(PasswordError::TooShort(policy.min_length));
    }
    if length > policy.max_length {
        return Err(PasswordError::TooLong(policy.max_length));
    }
    if password != confirmation {
        return Err(PasswordError::Mismatch);
    }
    Ok(())
}

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    hash(password, DEFAULT_COST).map_err(|_| PasswordError::HashingFailed)
}

/// Verify a password against its hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    verify(password, hash).map_err(|_| PasswordError::VerificationFailed)
}

/// Generate a random password reset token
pub fn generate_reset_token() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                            abcdefghijklmnopqrstuvwxyz\
                            0123456789";
    const TOKEN_LEN: usize = 32;

    let mut rng = rand::thread_rng();

    (0..TOKEN_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Digest stored in place of a reset token.
pub fn reset_token_digest(token: &str) -> String {
    format!("{:x}", md5::compute(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_password_validation() {
        let policy = PasswordPolicy::default();

        assert_matches!(
            validate_new_password("corta", "corta", &policy),
            Err(PasswordError::TooShort(8))
        );
        assert_matches!(
            validate_new_password("suficiente", "distinta1", &policy),
            Err(PasswordError::Mismatch)
        );
        assert_matches!(
            validate_new_password(&"x".repeat(129), &"x".repeat(129), &policy),
            Err(PasswordError::TooLong(128))
        );

        // No character-class requirements
        assert!(validate_new_password("solominusculas", "solominusculas", &policy).is_ok());
    }

    #[test]
    fn test_password_hashing() {
        let password = "entrena-duro";
        let hash = hash_password(password).unwrap();

        assert!(verify_password(password, &hash).unwrap());
        assert!(!verify_password("otra-clave", &hash).unwrap());
    }

    #[test]
    fn test_reset_token_generation() {
        let token1 = generate_reset_token();
        let token2 = generate_reset_token();

        assert_eq!(token1.len(), 32);
        assert_ne!(token1, token2);
        assert_eq!(reset_token_digest(&token1), reset_token_digest(&token1));
        assert_ne!(reset_token_digest(&token1), token1);
    }
}
