//! Domain-level errors.
//!
//! Every rule of the value objects, factories and state machines maps to
//! exactly one variant, so callers can match on the kind of the first rule
//! that failed. They are independent of infrastructure concerns.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::contract::{ContractStatus, DeliveryStatus};

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    // Email
    #[error("email must not be empty")]
    EmptyEmail,

    #[error("email '{0}' is not a valid address")]
    InvalidEmail(String),

    #[error("email '{0}' is too long")]
    LongEmail(String),

    // Password (the plaintext is never echoed back)
    #[error("password must not be empty")]
    EmptyPassword,

    #[error("password is too long")]
    LongPassword,

    #[error("password is too short")]
    ShortPassword,

    #[error("password must mix lower case, upper case, digits and a special character")]
    SoftPassword,

    #[error("hashed password must not be empty")]
    EmptyHashedPassword,

    #[error("hashed password does not look like a bcrypt hash")]
    InvalidHashedPassword,

    #[error("hashed password has length {0}")]
    LengthHashedPassword(usize),

    #[error("password could not be hashed: {0}")]
    HashFailed(String),

    // Phone
    #[error("phone '{0}' must contain digits only")]
    NotNumericPhone(String),

    #[error("phone '{0}' is too short")]
    ShortPhone(String),

    #[error("phone '{0}' is too long")]
    LongPhone(String),

    // Birth date
    #[error("date {0} is in the future")]
    FutureDate(NaiveDate),

    #[error("date {0} belongs to someone under age")]
    UnderageDate(NaiveDate),

    // Gender
    #[error("'{0}' is not a gender")]
    NotAGender(String),

    // Coordinates
    #[error("latitude {0} is out of bounds")]
    LatitudeOutOfBounds(f64),

    #[error("longitude {0} is out of bounds")]
    LongitudeOutOfBounds(f64),

    // Person names
    #[error("first name must not be empty")]
    EmptyFirstName,

    #[error("last name must not be empty")]
    EmptyLastName,

    #[error("first name '{0}' is too long")]
    LongFirstName(String),

    #[error("last name '{0}' is too long")]
    LongLastName(String),

    #[error("first name '{0}' must contain letters and single spaces only")]
    NonAlphaFirstName(String),

    #[error("last name '{0}' must contain letters and single spaces only")]
    NonAlphaLastName(String),

    // Contract
    #[error("administrator id is not valid")]
    InvalidAdministratorId,

    #[error("patient id is not valid")]
    InvalidPatientId,

    #[error("'{0}' is not a contract type")]
    InvalidContractType(String),

    #[error("'{0}' is not a contract status")]
    InvalidContractStatus(String),

    #[error("start date {start} is too soon, earliest allowed is {earliest}")]
    StartTooSoon { start: NaiveDate, earliest: NaiveDate },

    #[error("start date {0} leaves no room for the contract calendar")]
    StartOutOfRange(NaiveDate),

    #[error("cost {0} must be positive")]
    NonPositiveCost(i64),

    #[error("street must not be empty")]
    EmptyStreet,

    #[error("street number {0} must be positive")]
    NonPositiveNumber(i32),

    #[error("invalid contract transition from {from} to {to}")]
    InvalidTransition {
        from: ContractStatus,
        to: ContractStatus,
    },

    // Delivery
    #[error("'{0}' is not a delivery status")]
    InvalidDeliveryStatus(String),

    #[error("invalid delivery transition from {from} to {to}")]
    InvalidDeliveryTransition {
        from: DeliveryStatus,
        to: DeliveryStatus,
    },

    #[error("delivery {0} does not belong to this contract")]
    DeliveryNotFound(Uuid),
}

impl DomainError {
    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::EmptyEmail => "EMPTY_EMAIL",
            DomainError::InvalidEmail(_) => "INVALID_EMAIL",
            DomainError::LongEmail(_) => "LONG_EMAIL",
            DomainError::EmptyPassword => "EMPTY_PASSWORD",
            DomainError::LongPassword => "LONG_PASSWORD",
            DomainError::ShortPassword => "SHORT_PASSWORD",
            DomainError::SoftPassword => "SOFT_PASSWORD",
            DomainError::EmptyHashedPassword => "EMPTY_HASHED_PASSWORD",
            DomainError::InvalidHashedPassword => "INVALID_HASHED_PASSWORD",
            DomainError::LengthHashedPassword(_) => "LENGTH_HASHED_PASSWORD",
            DomainError::HashFailed(_) => "HASH_FAILED",
            DomainError::NotNumericPhone(_) => "NOT_NUMERIC_PHONE",
            DomainError::ShortPhone(_) => "SHORT_PHONE",
            DomainError::LongPhone(_) => "LONG_PHONE",
            DomainError::FutureDate(_) => "FUTURE_DATE",
            DomainError::UnderageDate(_) => "UNDERAGE_DATE",
            DomainError::NotAGender(_) => "NOT_A_GENDER",
            DomainError::LatitudeOutOfBounds(_) => "LATITUDE_OUT_OF_BOUNDS",
            DomainError::LongitudeOutOfBounds(_) => "LONGITUDE_OUT_OF_BOUNDS",
            DomainError::EmptyFirstName => "EMPTY_FIRST_NAME",
            DomainError::EmptyLastName => "EMPTY_LAST_NAME",
            DomainError::LongFirstName(_) => "LONG_FIRST_NAME",
            DomainError::LongLastName(_) => "LONG_LAST_NAME",
            DomainError::NonAlphaFirstName(_) => "NON_ALPHA_FIRST_NAME",
            DomainError::NonAlphaLastName(_) => "NON_ALPHA_LAST_NAME",
            DomainError::InvalidAdministratorId => "INVALID_ADMINISTRATOR_ID",
            DomainError::InvalidPatientId => "INVALID_PATIENT_ID",
            DomainError::InvalidContractType(_) => "INVALID_CONTRACT_TYPE",
            DomainError::InvalidContractStatus(_) => "INVALID_CONTRACT_STATUS",
            DomainError::StartTooSoon { .. } => "START_TOO_SOON",
            DomainError::StartOutOfRange(_) => "START_OUT_OF_RANGE",
            DomainError::NonPositiveCost(_) => "NON_POSITIVE_COST",
            DomainError::EmptyStreet => "EMPTY_STREET",
            DomainError::NonPositiveNumber(_) => "NON_POSITIVE_NUMBER",
            DomainError::InvalidTransition { .. } => "INVALID_TRANSITION",
            DomainError::InvalidDeliveryStatus(_) => "INVALID_DELIVERY_STATUS",
            DomainError::InvalidDeliveryTransition { .. } => "INVALID_DELIVERY_TRANSITION",
            DomainError::DeliveryNotFound(_) => "DELIVERY_NOT_FOUND",
        }
    }

    /// Whether the error was raised while rebuilding a stored record.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidContractType(_)
                | DomainError::InvalidContractStatus(_)
                | DomainError::InvalidDeliveryStatus(_)
                | DomainError::EmptyHashedPassword
                | DomainError::InvalidHashedPassword
                | DomainError::LengthHashedPassword(_)
        )
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
