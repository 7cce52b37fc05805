//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! the value objects every aggregate is built from, the person aggregates
//! (administrators and patients) and the meal-delivery contract with its
//! delivery calendar and status machine. Nothing here performs I/O.

mod code_enum;

pub mod clock;
pub mod constants;
pub mod contract;
pub mod error;
pub mod person;
pub mod timestamps;
pub mod value_objects;

pub use clock::{Clock, FixedClock, SystemClock};
pub use constants::*;
pub use contract::{
    Contract, ContractRecord, ContractResponse, ContractStatus, ContractType, CreateContract,
    Delivery, DeliveryRecord, DeliveryResponse, DeliveryStatus,
};
pub use error::{DomainError, DomainResult};
pub use person::{
    Administrator, AdministratorRole, Credential, NewPerson, Patient, PatientRole, Person,
    PersonRecord, PersonResponse, Role, UpdatePerson,
};
pub use timestamps::Timestamps;
pub use value_objects::{BirthDate, Coordinates, Email, Gender, HashedPassword, Password, Phone};
