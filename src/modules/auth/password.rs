use pbkdf2::pbkdf2;
use rand::Rng;
use std::num::NonZeroU32;

use crate::HmacSha256;

/// PBKDF2 iteration count applied to every stored password
const HASH_ITERATIONS: u32 = 100_000;

/// Fixed set of special characters accepted by the password policy
const SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Password policy violations, reported with the first failed check
#[derive(Debug, PartialEq, Eq)]
pub enum PasswordError {
    TooShort,
    TooLong,
    NoUppercase,
    NoLowercase,
    NoSpecialChar,
}

impl PasswordError {
    /// Human-readable description used in validation messages
    pub fn message(&self) -> &'static str {
        match self {
            PasswordError::TooShort => "password must be at least 8 characters",
            PasswordError::TooLong => "password must be at most 16 characters",
            PasswordError::NoUppercase => "password must contain an uppercase letter",
            PasswordError::NoLowercase => "password must contain a lowercase letter",
            PasswordError::NoSpecialChar => "password must contain a special character",
        }
    }
}

/// Function to validate password strength. Length limits count characters,
/// not bytes, so multibyte passwords are measured the way users see them.
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    let length = password.chars().count();
    if length < 8 {
        return Err(PasswordError::TooShort);
    }
    if length > 16 {
        return Err(PasswordError::TooLong);
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Err(PasswordError::NoUppercase);
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return Err(PasswordError::NoLowercase);
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        return Err(PasswordError::NoSpecialChar);
    }
    Ok(())
}

/// Function to hash a password with PBKDF2 and a fresh random salt.
/// The stored form is "salt_hex$hash_hex"; the salt travels with the hash
/// so no extra store column is needed.
pub fn hash_password(password: &str) -> String {
    let salt = generate_random_salt();
    let hash = derive_hash(password, &salt);
    format!("{}${}", hex::encode(&salt), hex::encode(hash))
}

/// Compare a candidate password against a stored "salt$hash" entry.
/// Any malformed stored value simply fails the comparison.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let (salt_hex, hash_hex) = match stored.split_once('$') {
        Some(parts) => parts,
        None => return false,
    };
    let salt = match hex::decode(salt_hex) {
        Ok(salt) => salt,
        Err(_) => return false,
    };
    let expected = match hex::decode(hash_hex) {
        Ok(hash) => hash,
        Err(_) => return false,
    };
    derive_hash(password, &salt) == expected
}

/// Function to generate a random salt for PBKDF2
fn generate_random_salt() -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..16).map(|_| rng.gen()).collect()
}

/// Function to derive a 32-byte hash from the password using PBKDF2
fn derive_hash(password: &str, salt: &[u8]) -> Vec<u8> {
    let mut hash = vec![0u8; 32];
    let iterations = NonZeroU32::new(HASH_ITERATIONS).unwrap();

    pbkdf2::<HmacSha256>(password.as_bytes(), salt, iterations.get(), &mut hash);

    hash
}
