//! Immutable, self-validating primitives shared by every aggregate.
//!
//! Construction is the only validation point: once built, a value is valid.

mod birth_date;
mod coordinates;
mod email;
mod gender;
mod password;
mod phone;

pub use birth_date::BirthDate;
pub use coordinates::Coordinates;
pub use email::Email;
pub use gender::Gender;
pub use password::{HashedPassword, Password};
pub use phone::Phone;
