//! Serializable views of a contract (safe to return to clients).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::aggregate::Contract;
use super::delivery::{Delivery, DeliveryStatus};
use super::kind::{ContractStatus, ContractType};
use crate::value_objects::Coordinates;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryResponse {
    pub id: Uuid,
    pub contract_id: Uuid,
    pub date: NaiveDate,
    pub street: String,
    pub number: i32,
    pub coordinates: Coordinates,
    pub status: DeliveryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractResponse {
    pub id: Uuid,
    pub administrator_id: Uuid,
    pub patient_id: Uuid,
    pub contract_type: ContractType,
    pub contract_status: ContractStatus,
    pub creation_date: DateTime<Utc>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub cost_value: i64,
    pub deliveries: Vec<DeliveryResponse>,
    /// Soft delete timestamp (if deleted)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<&Delivery> for DeliveryResponse {
    fn from(delivery: &Delivery) -> Self {
        Self {
            id: delivery.id(),
            contract_id: delivery.contract_id(),
            date: delivery.date(),
            street: delivery.street().to_string(),
            number: delivery.number(),
            coordinates: delivery.coordinates(),
            status: delivery.status(),
            updated_at: delivery.updated_at(),
        }
    }
}

impl From<&Contract> for ContractResponse {
    fn from(contract: &Contract) -> Self {
        Self {
            id: contract.id(),
            administrator_id: contract.administrator_id(),
            patient_id: contract.patient_id(),
            contract_type: contract.contract_type(),
            contract_status: contract.contract_status(),
            creation_date: contract.creation_date(),
            start_date: contract.start_date(),
            end_date: contract.end_date(),
            cost_value: contract.cost_value(),
            deliveries: contract.deliveries().iter().map(DeliveryResponse::from).collect(),
            deleted_at: contract.timestamps().deleted_at(),
        }
    }
}

impl From<Contract> for ContractResponse {
    fn from(contract: Contract) -> Self {
        ContractResponse::from(&contract)
    }
}
