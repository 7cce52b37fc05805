//! Name validation shared by every person aggregate.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::MAX_NAME_LENGTH;
use crate::error::{DomainError, DomainResult};

static ALPHA_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\p{L}+(?: \p{L}+)*$").expect("Failed to compile name regex")
});

/// Letters, with single spaces between words only.
pub fn is_alpha_name(s: &str) -> bool {
    ALPHA_NAME_REGEX.is_match(s)
}

/// Validate a first/last name pair.
///
/// Both emptiness checks run before both length checks, which run before
/// both alphabet checks.
pub fn validate_names(first_name: &str, last_name: &str) -> DomainResult<()> {
    if first_name.is_empty() {
        return Err(DomainError::EmptyFirstName);
    }
    if last_name.is_empty() {
        return Err(DomainError::EmptyLastName);
    }
    if first_name.chars().count() > MAX_NAME_LENGTH {
        return Err(DomainError::LongFirstName(first_name.to_string()));
    }
    if last_name.chars().count() > MAX_NAME_LENGTH {
        return Err(DomainError::LongLastName(last_name.to_string()));
    }
    if !is_alpha_name(first_name) {
        return Err(DomainError::NonAlphaFirstName(first_name.to_string()));
    }
    if !is_alpha_name(last_name) {
        return Err(DomainError::NonAlphaLastName(last_name.to_string()));
    }
    Ok(())
}
