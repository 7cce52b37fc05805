//! Care service business logic.

mod contract_service;
mod person_service;

pub use contract_service::{ContractManager, ContractService, UpdateDelivery};
pub use person_service::{
    AdministratorManager, PatientManager, PersonCounts, PersonManager, PersonService,
    RegisterPerson, UpdatePersonRequest,
};
