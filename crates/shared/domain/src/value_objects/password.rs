//! Password value objects.
//!
//! `Password` holds a plaintext password that satisfies the strength policy.
//! `HashedPassword` holds its bcrypt hash, either produced by
//! [`Password::hash`] or loaded from storage.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{
    HASHED_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH, PASSWORD_HASH_COST,
    PASSWORD_SPECIAL_CHARS,
};
use crate::error::{DomainError, DomainResult};

static BCRYPT_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\$2[abxy]?\$\d{2}\$[./A-Za-z0-9]").expect("Failed to compile bcrypt regex")
});

/// Plaintext password that passed the strength policy.
#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    value: String,
}

// Don't expose the password in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Validate a plaintext password.
    ///
    /// Order: empty, too long, too short, then the character-class mix.
    pub fn new(plain_text: impl Into<String>) -> DomainResult<Self> {
        let value = plain_text.into();
        let length = value.chars().count();

        if length == 0 {
            return Err(DomainError::EmptyPassword);
        }
        if length > MAX_PASSWORD_LENGTH {
            return Err(DomainError::LongPassword);
        }
        if length < MIN_PASSWORD_LENGTH {
            return Err(DomainError::ShortPassword);
        }
        if !Self::is_strong(&value) {
            return Err(DomainError::SoftPassword);
        }

        Ok(Self { value })
    }

    fn is_strong(value: &str) -> bool {
        let has_lower = value.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = value.chars().any(|c| c.is_ascii_uppercase());
        let has_digit = value.chars().any(|c| c.is_ascii_digit());
        let has_special = value.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c));

        has_lower && has_upper && has_digit && has_special
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }

    /// Hash with bcrypt at the default cost.
    pub fn hash(&self) -> DomainResult<HashedPassword> {
        self.hash_with_cost(PASSWORD_HASH_COST)
    }

    pub fn hash_with_cost(&self, cost: u32) -> DomainResult<HashedPassword> {
        let hash = bcrypt::hash(&self.value, cost)
            .map_err(|e| DomainError::HashFailed(e.to_string()))?;
        HashedPassword::new(hash)
    }
}

/// bcrypt hash as read back from storage.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl std::fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl HashedPassword {
    /// Accept a stored hash of the shape `$2a$NN$<53 chars>`.
    ///
    /// Order: empty, prefix shape, total length.
    pub fn new(hash: impl Into<String>) -> DomainResult<Self> {
        let hash = hash.into();

        if hash.is_empty() {
            return Err(DomainError::EmptyHashedPassword);
        }
        if !BCRYPT_PREFIX_REGEX.is_match(&hash) {
            return Err(DomainError::InvalidHashedPassword);
        }
        if hash.len() != HASHED_PASSWORD_LENGTH {
            return Err(DomainError::LengthHashedPassword(hash.len()));
        }

        Ok(Self { hash })
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Check a plaintext candidate against the hash.
    pub fn verify(&self, plain_text: &str) -> bool {
        bcrypt::verify(plain_text, &self.hash).unwrap_or(false)
    }

    /// Cost factor encoded in the hash prefix.
    pub fn cost(&self) -> u32 {
        // Prefix shape was checked on construction: `$2?$NN$`
        self.hash
            .split('$')
            .nth(2)
            .and_then(|cost| cost.parse().ok())
            .unwrap_or_default()
    }
}

impl From<HashedPassword> for String {
    fn from(password: HashedPassword) -> Self {
        password.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE_HASH: &str = "$2a$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy";

    #[test]
    fn test_strong_password() {
        let password = Password::new("Str0ng!Pass").unwrap();
        assert_eq!(password.as_str(), "Str0ng!Pass");
    }

    #[test]
    fn test_password_rule_order() {
        assert_eq!(Password::new(""), Err(DomainError::EmptyPassword));
        assert_eq!(Password::new("a".repeat(65)), Err(DomainError::LongPassword));
        assert_eq!(Password::new("Ab1!"), Err(DomainError::ShortPassword));
        assert_eq!(Password::new("abcdefgh"), Err(DomainError::SoftPassword));
    }

    #[test]
    fn test_password_length_bounds_are_inclusive() {
        assert!(Password::new("Abcdef1!").is_ok());
        let max = format!("Ab1!{}", "x".repeat(60));
        assert_eq!(max.len(), 64);
        assert!(Password::new(max).is_ok());
    }

    #[test]
    fn test_password_debug_is_redacted() {
        let password = Password::new("Str0ng!Pass").unwrap();
        assert!(!format!("{:?}", password).contains("Str0ng"));
    }

    #[test]
    fn test_hashed_password_accepts_bcrypt() {
        let hashed = HashedPassword::new(SAMPLE_HASH).unwrap();
        assert_eq!(hashed.as_str(), SAMPLE_HASH);
        assert_eq!(hashed.cost(), 10);
    }

    #[test]
    fn test_hashed_password_rule_order() {
        assert_eq!(HashedPassword::new(""), Err(DomainError::EmptyHashedPassword));
        assert_eq!(
            HashedPassword::new("plaintext-password"),
            Err(DomainError::InvalidHashedPassword)
        );
        assert_eq!(
            HashedPassword::new("$2a$10$tooshort"),
            Err(DomainError::LengthHashedPassword(15))
        );
    }

    #[test]
    fn test_hash_produces_a_storable_bcrypt_hash() {
        let password = Password::new("Str0ng!Pass").unwrap();
        let hashed = password.hash_with_cost(4).unwrap();

        assert_eq!(hashed.as_str().len(), HASHED_PASSWORD_LENGTH);
        assert_eq!(hashed.cost(), 4);
        assert!(hashed.verify("Str0ng!Pass"));
        assert!(!hashed.verify("Str0ng!Pas"));
        assert_eq!(HashedPassword::new(hashed.as_str()), Ok(hashed));
    }

    #[test]
    fn test_hash_rejects_invalid_cost() {
        let password = Password::new("Str0ng!Pass").unwrap();
        assert!(matches!(
            password.hash_with_cost(99),
            Err(DomainError::HashFailed(_))
        ));
    }

    proptest! {
        #[test]
        fn passwords_missing_a_class_are_soft(
            body in "[a-z]{8,60}",
            drop in 0usize..4,
        ) {
            // Start from a password with all four classes, then remove one.
            let mut parts = vec![body, "Q".to_string(), "7".to_string(), "#".to_string()];
            if drop == 0 {
                parts[0] = parts[0].to_uppercase();
            } else {
                parts.remove(drop);
            }
            let candidate = parts.concat();
            prop_assert_eq!(Password::new(candidate), Err(DomainError::SoftPassword));
        }
    }
}
