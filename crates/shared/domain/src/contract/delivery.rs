//! Delivery entity: one scheduled visit of a contract.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::code_enum::code_enum;
use crate::error::{DomainError, DomainResult};
use crate::timestamps::Timestamps;
use crate::value_objects::Coordinates;

code_enum! {
    /// Outcome of a single visit.
    pub enum DeliveryStatus (error = DomainError::InvalidDeliveryStatus) {
        Pending => ("pending", "P"),
        Delivered => ("delivered", "D"),
        Cancelled => ("cancelled", "C"),
    }
}

impl DeliveryStatus {
    /// Only a pending visit can be resolved; delivered and cancelled are final.
    pub fn can_transition_to(&self, next: DeliveryStatus) -> bool {
        matches!(
            (self, next),
            (DeliveryStatus::Pending, DeliveryStatus::Delivered)
                | (DeliveryStatus::Pending, DeliveryStatus::Cancelled)
        )
    }
}

/// Street address of a visit.
pub(crate) fn validate_address(street: &str, number: i32) -> DomainResult<()> {
    if street.trim().is_empty() {
        return Err(DomainError::EmptyStreet);
    }
    if number <= 0 {
        return Err(DomainError::NonPositiveNumber(number));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    id: Uuid,
    contract_id: Uuid,
    date: NaiveDate,
    street: String,
    number: i32,
    coordinates: Coordinates,
    status: DeliveryStatus,
    timestamps: Timestamps,
}

/// Delivery row as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    pub id: Uuid,
    pub contract_id: Uuid,
    pub date: NaiveDate,
    pub street: String,
    pub number: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Delivery {
    /// New pending visit. The address was validated by the contract factory.
    pub(crate) fn scheduled(
        contract_id: Uuid,
        date: NaiveDate,
        street: &str,
        number: i32,
        coordinates: Coordinates,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            contract_id,
            date,
            street: street.to_string(),
            number,
            coordinates,
            status: DeliveryStatus::Pending,
            timestamps: Timestamps::default(),
        }
    }

    /// Rebuild a stored delivery. Only the status code and coordinates are
    /// re-validated.
    pub fn from_record(record: DeliveryRecord) -> DomainResult<Self> {
        let status = DeliveryStatus::parse(&record.status)?;
        let coordinates = Coordinates::new(record.latitude, record.longitude)?;

        Ok(Self {
            id: record.id,
            contract_id: record.contract_id,
            date: record.date,
            street: record.street,
            number: record.number,
            coordinates,
            status,
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

    pub fn contract_id(&self) -> Uuid {
        self.contract_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn number(&self) -> i32 {
        self.number
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    pub fn status(&self) -> DeliveryStatus {
        self.status
    }

    pub fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.timestamps.updated_at()
    }

    pub fn is_pending(&self) -> bool {
        self.status == DeliveryStatus::Pending
    }

    /// Move the visit to another address.
    pub fn update(&mut self, street: &str, number: i32, coordinates: Coordinates) -> DomainResult<()> {
        self.update_at(street, number, coordinates, Utc::now())
    }

    pub fn update_at(
        &mut self,
        street: &str,
        number: i32,
        coordinates: Coordinates,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        validate_address(street, number)?;

        self.street = street.to_string();
        self.number = number;
        self.coordinates = coordinates;
        self.timestamps.touch(now);
        Ok(())
    }

    pub fn change_status_at(&mut self, next: DeliveryStatus, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidDeliveryTransition {
                from: self.status,
                to: next,
            });
        }

        self.status = next;
        self.timestamps.touch(now);
        Ok(())
    }

    pub fn mark_delivered_at(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.change_status_at(DeliveryStatus::Delivered, now)
    }

    pub fn cancel_at(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.change_status_at(DeliveryStatus::Cancelled, now)
    }

    pub(crate) fn soft_delete_at(&mut self, now: DateTime<Utc>) {
        self.timestamps.soft_delete(now);
    }

    pub(crate) fn restore_at(&mut self, now: DateTime<Utc>) {
        self.timestamps.restore(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    fn delivery() -> Delivery {
        Delivery::scheduled(
            Uuid::new_v4(),
            NaiveDate::from_ymd_opt(2024, 5, 4).unwrap(),
            "Elm St",
            30,
            Coordinates::new(-34.6, -58.4).unwrap(),
        )
    }

    #[test]
    fn test_scheduled_delivery_is_pending() {
        let d = delivery();
        assert!(d.is_pending());
        assert_eq!(d.updated_at(), None);
    }

    #[test]
    fn test_update_moves_address_and_touches() {
        let mut d = delivery();
        let coords = Coordinates::new(10.0, 20.0).unwrap();
        d.update_at("Oak Ave", 12, coords, now()).unwrap();

        assert_eq!(d.street(), "Oak Ave");
        assert_eq!(d.number(), 12);
        assert_eq!(d.coordinates(), coords);
        assert_eq!(d.updated_at(), Some(now()));
    }

    #[test]
    fn test_update_rejects_bad_address() {
        let mut d = delivery();
        let coords = d.coordinates();
        assert_eq!(d.update_at("  ", 12, coords, now()), Err(DomainError::EmptyStreet));
        assert_eq!(
            d.update_at("Oak Ave", 0, coords, now()),
            Err(DomainError::NonPositiveNumber(0))
        );
        assert_eq!(d.street(), "Elm St");
    }

    #[test]
    fn test_resolved_deliveries_are_final() {
        let mut d = delivery();
        d.mark_delivered_at(now()).unwrap();
        assert_eq!(d.status(), DeliveryStatus::Delivered);

        assert_eq!(
            d.cancel_at(now()),
            Err(DomainError::InvalidDeliveryTransition {
                from: DeliveryStatus::Delivered,
                to: DeliveryStatus::Cancelled,
            })
        );

        let mut cancelled = delivery();
        cancelled.cancel_at(now()).unwrap();
        assert!(cancelled.mark_delivered_at(now()).is_err());
        assert!(cancelled.cancel_at(now()).is_err());
    }

    #[test]
    fn test_from_record_validates_status() {
        let d = delivery();
        let mut record = DeliveryRecord {
            id: d.id(),
            contract_id: d.contract_id(),
            date: d.date(),
            street: "Elm St".into(),
            number: 30,
            latitude: 1.0,
            longitude: 2.0,
            status: "delivered".into(),
            created_at: Some(now()),
            updated_at: Some(now()),
            deleted_at: None,
        };

        let restored = Delivery::from_record(record.clone()).unwrap();
        assert_eq!(restored.status(), DeliveryStatus::Delivered);
        assert_eq!(restored.timestamps().created_at(), Some(now()));

        record.status = "lost".into();
        assert_eq!(
            Delivery::from_record(record),
            Err(DomainError::InvalidDeliveryStatus("lost".into()))
        );
    }
}
