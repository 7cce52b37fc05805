//! Contract aggregate, its deliveries and their status codes.

mod aggregate;
mod delivery;
mod kind;
mod response;

pub use aggregate::{earliest_start, Contract, ContractRecord, CreateContract};
pub use delivery::{Delivery, DeliveryRecord, DeliveryStatus};
pub use kind::{ContractStatus, ContractType};
pub use response::{ContractResponse, DeliveryResponse};
