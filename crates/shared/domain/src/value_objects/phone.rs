//! Phone value object.

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_PHONE_LENGTH, MIN_PHONE_LENGTH};
use crate::error::{DomainError, DomainResult};

/// A phone number made of 8 to 10 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    /// Validate an optional phone number.
    ///
    /// A missing or empty value means "no phone" and is not an error, so the
    /// result is `Ok(None)` in both cases.
    pub fn new(raw: Option<&str>) -> DomainResult<Option<Self>> {
        match raw {
            None | Some("") => Ok(None),
            Some(value) => Self::parse(value).map(Some),
        }
    }

    /// Validate a phone number that must be present.
    pub fn parse(value: &str) -> DomainResult<Self> {
        if !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::NotNumericPhone(value.to_string()));
        }
        if value.len() < MIN_PHONE_LENGTH {
            return Err(DomainError::ShortPhone(value.to_string()));
        }
        if value.len() > MAX_PHONE_LENGTH {
            return Err(DomainError::LongPhone(value.to_string()));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Phone {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Phone> for String {
    fn from(phone: Phone) -> Self {
        phone.0
    }
}

impl std::fmt::Display for Phone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
