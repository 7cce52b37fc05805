//! Contract aggregate root.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::delivery::{validate_address, Delivery, DeliveryRecord, DeliveryStatus};
use super::kind::{ContractStatus, ContractType};
use crate::constants::MIN_START_LEAD_DAYS;
use crate::error::{DomainError, DomainResult};
use crate::timestamps::Timestamps;
use crate::value_objects::Coordinates;

/// Raw input of the contract factory.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContract {
    pub administrator_id: Uuid,
    pub patient_id: Uuid,
    /// Long or short contract type code
    pub contract_type: String,
    pub start_date: NaiveDate,
    pub cost_value: i64,
    pub street: String,
    pub number: i32,
    pub coordinates: Coordinates,
}

/// Contract row as stored, with its deliveries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRecord {
    pub id: Uuid,
    pub administrator_id: Uuid,
    pub patient_id: Uuid,
    pub contract_type: String,
    pub contract_status: String,
    pub creation_date: DateTime<Utc>,
    pub start_date: NaiveDate,
    pub cost_value: i64,
    pub deliveries: Vec<DeliveryRecord>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Meal-delivery contract between an administrator and a patient.
///
/// `end_date` and the delivery calendar are derived once, from the type and
/// start date, when the contract is built. The type cannot change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Contract {
    id: Uuid,
    administrator_id: Uuid,
    patient_id: Uuid,
    contract_type: ContractType,
    contract_status: ContractStatus,
    creation_date: DateTime<Utc>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    cost_value: i64,
    deliveries: Vec<Delivery>,
    timestamps: Timestamps,
}

impl Contract {
    /// Build a new contract, reading the current time.
    pub fn create(input: CreateContract) -> DomainResult<Self> {
        Self::create_at(input, Utc::now())
    }

    /// Build a new contract as of `now`.
    ///
    /// Checks run in order and stop at the first failure: party ids, type,
    /// start date lead time, cost, street, street number.
    pub fn create_at(input: CreateContract, now: DateTime<Utc>) -> DomainResult<Self> {
        if input.administrator_id.is_nil() {
            return Err(DomainError::InvalidAdministratorId);
        }
        if input.patient_id.is_nil() {
            return Err(DomainError::InvalidPatientId);
        }

        let contract_type = ContractType::parse(&input.contract_type)?;

        let earliest = earliest_start(now);
        if input.start_date < earliest {
            return Err(DomainError::StartTooSoon {
                start: input.start_date,
                earliest,
            });
        }

        if input.cost_value <= 0 {
            return Err(DomainError::NonPositiveCost(input.cost_value));
        }

        validate_address(&input.street, input.number)?;

        let end_date = contract_type.end_date(input.start_date)?;

        let id = Uuid::new_v4();
        let deliveries = input
            .start_date
            .iter_days()
            .take_while(|date| *date <= end_date)
            .map(|date| {
                Delivery::scheduled(id, date, &input.street, input.number, input.coordinates)
            })
            .collect();

        Ok(Self {
            id,
            administrator_id: input.administrator_id,
            patient_id: input.patient_id,
            contract_type,
            contract_status: ContractStatus::Created,
            creation_date: now,
            start_date: input.start_date,
            end_date,
            cost_value: input.cost_value,
            deliveries,
            timestamps: Timestamps::default(),
        })
    }

    /// Rebuild a stored contract.
    ///
    /// Creation-time rules are not re-applied; only the type, status and
    /// delivery codes are parsed again, so corrupt rows fail here.
    pub fn from_record(record: ContractRecord) -> DomainResult<Self> {
        let contract_type = ContractType::parse(&record.contract_type)?;
        let contract_status = ContractStatus::parse(&record.contract_status)?;
        let end_date = contract_type.end_date(record.start_date)?;
        let deliveries = record
            .deliveries
            .into_iter()
            .map(Delivery::from_record)
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(Self {
            id: record.id,
            administrator_id: record.administrator_id,
            patient_id: record.patient_id,
            contract_type,
            contract_status,
            creation_date: record.creation_date,
            start_date: record.start_date,
            end_date,
            cost_value: record.cost_value,
            deliveries,
            timestamps: Timestamps::from_stored(
                record.created_at,
                record.updated_at,
                record.deleted_at,
            ),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn administrator_id(&self) -> Uuid {
        self.administrator_id
    }

    pub fn patient_id(&self) -> Uuid {
        self.patient_id
    }

    pub fn contract_type(&self) -> ContractType {
        self.contract_type
    }

    pub fn contract_status(&self) -> ContractStatus {
        self.contract_status
    }

    pub fn creation_date(&self) -> DateTime<Utc> {
        self.creation_date
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn cost_value(&self) -> i64 {
        self.cost_value
    }

    pub fn deliveries(&self) -> &[Delivery] {
        &self.deliveries
    }

    pub fn delivery(&self, delivery_id: Uuid) -> Option<&Delivery> {
        self.deliveries.iter().find(|d| d.id() == delivery_id)
    }

    pub fn pending_deliveries(&self) -> impl Iterator<Item = &Delivery> {
        self.deliveries.iter().filter(|d| d.is_pending())
    }

    pub fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }

    pub fn is_active(&self) -> bool {
        self.contract_status == ContractStatus::Active
    }

    pub fn is_deleted(&self) -> bool {
        self.timestamps.is_deleted()
    }

    // =========================================================================
    // State machine
    // =========================================================================

    /// `Created -> Active`.
    pub fn activate(&mut self) -> DomainResult<()> {
        self.activate_at(Utc::now())
    }

    pub fn activate_at(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.transition(ContractStatus::Active, now)
    }

    /// `Active -> Finished`.
    pub fn complete(&mut self) -> DomainResult<()> {
        self.complete_at(Utc::now())
    }

    pub fn complete_at(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.transition(ContractStatus::Finished, now)
    }

    /// Apply a status change requested by code (e.g. from a repository call).
    pub fn change_status_at(&mut self, next: ContractStatus, now: DateTime<Utc>) -> DomainResult<()> {
        self.transition(next, now)
    }

    fn transition(&mut self, next: ContractStatus, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.contract_status.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.contract_status,
                to: next,
            });
        }

        self.contract_status = next;
        self.timestamps.touch(now);
        Ok(())
    }

    // =========================================================================
    // Deliveries
    // =========================================================================

    pub fn update_delivery_at(
        &mut self,
        delivery_id: Uuid,
        street: &str,
        number: i32,
        coordinates: Coordinates,
        now: DateTime<Utc>,
    ) -> DomainResult<&Delivery> {
        let delivery = self.delivery_mut(delivery_id)?;
        delivery.update_at(street, number, coordinates, now)?;
        Ok(delivery)
    }

    pub fn change_delivery_status_at(
        &mut self,
        delivery_id: Uuid,
        next: DeliveryStatus,
        now: DateTime<Utc>,
    ) -> DomainResult<&Delivery> {
        let delivery = self.delivery_mut(delivery_id)?;
        delivery.change_status_at(next, now)?;
        Ok(delivery)
    }

    /// Swap in a delivery changed outside the aggregate (e.g. through a
    /// repository). It must be the same scheduled visit: same id, contract
    /// and date. A status change is checked against the status currently
    /// held, so a copy taken before another change cannot undo it.
    pub fn replace_delivery(&mut self, delivery: Delivery) -> DomainResult<()> {
        let slot = self.delivery_mut(delivery.id())?;
        if slot.contract_id() != delivery.contract_id() || slot.date() != delivery.date() {
            return Err(DomainError::DeliveryNotFound(delivery.id()));
        }

        let (from, to) = (slot.status(), delivery.status());
        if from != to && !from.can_transition_to(to) {
            return Err(DomainError::InvalidDeliveryTransition { from, to });
        }

        *slot = delivery;
        Ok(())
    }

    fn delivery_mut(&mut self, delivery_id: Uuid) -> DomainResult<&mut Delivery> {
        self.deliveries
            .iter_mut()
            .find(|d| d.id() == delivery_id)
            .ok_or(DomainError::DeliveryNotFound(delivery_id))
    }

    // =========================================================================
    // Persistence bookkeeping
    // =========================================================================

    pub fn mark_persisted_at(&mut self, now: DateTime<Utc>) {
        self.timestamps.mark_persisted(now);
    }

    /// Soft delete the contract together with its deliveries.
    pub fn soft_delete_at(&mut self, now: DateTime<Utc>) {
        self.timestamps.soft_delete(now);
        for delivery in &mut self.deliveries {
            delivery.soft_delete_at(now);
        }
    }

    pub fn restore_at(&mut self, now: DateTime<Utc>) {
        self.timestamps.restore(now);
        for delivery in &mut self.deliveries {
            delivery.restore_at(now);
        }
    }
}

/// First start date accepted on the day of `now`. Saturates at
/// `NaiveDate::MAX`.
pub fn earliest_start(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive()
        .checked_add_days(Days::new(MIN_START_LEAD_DAYS.unsigned_abs()))
        .unwrap_or(NaiveDate::MAX)
}
