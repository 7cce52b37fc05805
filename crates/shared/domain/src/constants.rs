//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Contact data
// =============================================================================

/// Maximum length of an email address
pub const MAX_EMAIL_LENGTH: usize = 200;

/// Minimum number of digits of a phone number
pub const MIN_PHONE_LENGTH: usize = 8;

/// Maximum number of digits of a phone number
pub const MAX_PHONE_LENGTH: usize = 10;

/// Age a person must have reached to be registered
pub const ADULT_AGE_YEARS: u32 = 18;

// =============================================================================
// Passwords
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length requirement
pub const MAX_PASSWORD_LENGTH: usize = 64;

/// Characters accepted as the mandatory special character of a password
pub const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*()-_=+[]{};:,.<>?/|~";

/// Total length of a bcrypt hash (`$2a$NN$` followed by 53 characters)
pub const HASHED_PASSWORD_LENGTH: usize = 60;

/// bcrypt cost used when hashing new passwords
pub const PASSWORD_HASH_COST: u32 = 10;

// =============================================================================
// Person names
// =============================================================================

/// Maximum length of a first or last name
pub const MAX_NAME_LENGTH: usize = 100;

// =============================================================================
// Geography
// =============================================================================

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

// =============================================================================
// Contracts
// =============================================================================

/// Minimum number of calendar days between today and a contract start date
pub const MIN_START_LEAD_DAYS: i64 = 2;

/// Days covered by a half-month contract (start day included)
pub const HALF_MONTH_DAYS: i64 = 15;

/// Days covered by a monthly contract (start day included)
pub const MONTHLY_DAYS: i64 = 30;
