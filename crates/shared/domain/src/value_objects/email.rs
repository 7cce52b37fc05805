//! Email value object.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::MAX_EMAIL_LENGTH;
use crate::error::{DomainError, DomainResult};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$")
        .expect("Failed to compile email regex")
});

/// A validated email address.
///
/// The raw input is kept unchanged, so `Email::new(s)?.as_str() == s`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Validate an email address.
    ///
    /// Rules are checked in order and the first failure wins:
    /// empty, then shape (`local@domain.tld`), then length.
    pub fn new(raw: impl Into<String>) -> DomainResult<Self> {
        let raw = raw.into();

        if raw.is_empty() {
            return Err(DomainError::EmptyEmail);
        }
        if !EMAIL_REGEX.is_match(&raw) {
            return Err(DomainError::InvalidEmail(raw));
        }
        if raw.chars().count() > MAX_EMAIL_LENGTH {
            return Err(DomainError::LongEmail(raw));
        }

        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Email {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Email {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Email::new(raw).map_err(serde::de::Error::custom)
    }
}
