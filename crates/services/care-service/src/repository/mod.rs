//! Repository layer for data access.
//!
//! The traits are the persistence contract of the service; the in-memory
//! stores back the CLI and the tests.

mod contract_repository;
mod person_repository;

use domain::{AdministratorRole, PatientRole};

pub use contract_repository::{ContractRepository, InMemoryContractStore};
pub use person_repository::{InMemoryPersonStore, PersonRepository};

#[cfg(any(test, feature = "test-utils"))]
pub use contract_repository::MockContractRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use person_repository::MockPersonRepository;

pub type InMemoryAdministratorStore = InMemoryPersonStore<AdministratorRole>;
pub type InMemoryPatientStore = InMemoryPersonStore<PatientRole>;
