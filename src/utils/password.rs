use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::ErrorMessage;

/// Maximum allowed password length in characters
///
/// Argon2 is intentionally slow; unbounded input would let a client burn
/// server CPU with megabyte passwords.
const MAX_PASSWORD_LENGTH: usize = 64;

/// Hash a password using Argon2id
///
/// The output is a PHC string (`$argon2id$v=19$m=19456,t=2,p=1$<salt>$<hash>`)
/// that embeds the salt and cost parameters, so the hash string is the only
/// thing stored in the database. Each call generates a fresh random salt, so
/// the same password hashes differently every time.
pub fn hash(password: impl Into<String>) -> Result<String, ErrorMessage> {
    let password = password.into();

    if password.is_empty() {
        return Err(ErrorMessage::EmptyPassword);
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ErrorMessage::ExceededMaxPasswordLength(MAX_PASSWORD_LENGTH));
    }

    let salt = SaltString::generate(&mut OsRng);

    let hashed_password = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| ErrorMessage::HashingError)?
        .to_string();

    Ok(hashed_password)
}

/// Verify a password against a stored PHC-format hash
///
/// The salt and parameters are parsed back out of the stored string; the
/// comparison inside `verify_password` is constant-time.
pub fn compare(password: &str, hashed_password: &str) -> Result<bool, ErrorMessage> {
    if password.is_empty() {
        return Err(ErrorMessage::EmptyPassword);
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ErrorMessage::ExceededMaxPasswordLength(MAX_PASSWORD_LENGTH));
    }

    let parsed_hash =
        PasswordHash::new(hashed_password).map_err(|_| ErrorMessage::InvalidHashFormat)?;

    let password_matched = Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok();

    Ok(password_matched)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hashed = hash("pw123").unwrap();
        assert!(hashed.starts_with("$argon2id$"));
        assert!(compare("pw123", &hashed).unwrap());
        assert!(!compare("wrong", &hashed).unwrap());
    }

    #[test]
    fn empty_password_rejected() {
        assert_eq!(hash("").unwrap_err(), ErrorMessage::EmptyPassword);
        assert_eq!(
            compare("", "$argon2id$whatever").unwrap_err(),
            ErrorMessage::EmptyPassword
        );
    }

    #[test]
    fn oversized_password_rejected() {
        let long = "a".repeat(65);
        assert_eq!(
            hash(long).unwrap_err(),
            ErrorMessage::ExceededMaxPasswordLength(64)
        );
    }
}
