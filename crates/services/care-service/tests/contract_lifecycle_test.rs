//! Contract lifecycle against the in-memory stores.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use care_service_lib::service::{ContractService, PersonService, RegisterPerson, UpdateDelivery};
use care_service_lib::CareServices;
use common::AppError;
use domain::{
    ContractStatus, Coordinates, CreateContract, DeliveryStatus, DomainError, FixedClock,
};

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 2, 20, 9, 30, 0).unwrap(),
    ))
}

fn person(email: &str) -> RegisterPerson {
    RegisterPerson {
        first_name: "Lucia".into(),
        last_name: "Fernandez".into(),
        email: email.into(),
        password: "Secur3!Pass".into(),
        gender: "F".into(),
        birth_date: NaiveDate::from_ymd_opt(1970, 6, 15).unwrap(),
        phone: Some("12345678".into()),
    }
}

fn contract(administrator_id: Uuid, patient_id: Uuid, contract_type: &str) -> CreateContract {
    CreateContract {
        administrator_id,
        patient_id,
        contract_type: contract_type.into(),
        start_date: NaiveDate::from_ymd_opt(2024, 2, 22).unwrap(),
        cost_value: 1500,
        street: "San Martin".into(),
        number: 742,
        coordinates: Coordinates::new(-31.4, -64.18).unwrap(),
    }
}

async fn parties(services: &CareServices) -> (Uuid, Uuid) {
    let administrator = services
        .administrators
        .register(person("admin@example.com"))
        .await
        .unwrap();
    let patient = services
        .patients
        .register(person("patient@example.com"))
        .await
        .unwrap();
    (administrator.id(), patient.id())
}

#[tokio::test]
async fn test_monthly_contract_over_leap_day() {
    let services = CareServices::in_memory(clock());
    let (administrator_id, patient_id) = parties(&services).await;

    let created = services
        .contracts
        .create_contract(contract(administrator_id, patient_id, "monthly"))
        .await
        .unwrap();

    assert_eq!(created.end_date(), NaiveDate::from_ymd_opt(2024, 3, 22).unwrap());
    let dates: Vec<NaiveDate> = services
        .contracts
        .list_deliveries(created.id())
        .await
        .unwrap()
        .iter()
        .map(|d| d.date())
        .collect();
    assert_eq!(dates.len(), 30);
    assert!(dates.contains(&NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
    assert!(dates.windows(2).all(|w| w[1] - w[0] == Duration::days(1)));
}

#[tokio::test]
async fn test_full_lifecycle() {
    let clock = clock();
    let services = CareServices::in_memory(clock.clone());
    let (administrator_id, patient_id) = parties(&services).await;

    let created = services
        .contracts
        .create_contract(contract(administrator_id, patient_id, "HM"))
        .await
        .unwrap();
    let id = created.id();
    assert_eq!(created.contract_status(), ContractStatus::Created);

    clock.advance(Duration::hours(1));
    let active = services.contracts.activate_contract(id).await.unwrap();
    assert_eq!(active.contract_status(), ContractStatus::Active);

    let first = active.deliveries()[0].id();
    let delivered = services.contracts.mark_delivered(first).await.unwrap();
    assert_eq!(delivered.status(), DeliveryStatus::Delivered);

    let err = services.contracts.cancel_delivery(first).await.unwrap_err();
    assert_eq!(
        err.domain(),
        Some(&DomainError::InvalidDeliveryTransition {
            from: DeliveryStatus::Delivered,
            to: DeliveryStatus::Cancelled,
        })
    );

    let second = active.deliveries()[1].id();
    let moved = services
        .contracts
        .update_delivery(
            second,
            UpdateDelivery {
                street: "Belgrano".into(),
                number: 15,
                latitude: -31.41,
                longitude: -64.19,
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.street(), "Belgrano");
    assert_eq!(moved.date(), active.deliveries()[1].date());

    let finished = services.contracts.complete_contract(id).await.unwrap();
    assert_eq!(finished.contract_status(), ContractStatus::Finished);
    assert_eq!(finished.deliveries()[0].status(), DeliveryStatus::Delivered);
    assert_eq!(finished.deliveries()[1].street(), "Belgrano");

    let err = services.contracts.activate_contract(id).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Domain(DomainError::InvalidTransition { .. })
    ));
    assert_eq!(services.contracts.count_contracts().await.unwrap(), 1);
}

#[tokio::test]
async fn test_contract_requires_registered_parties() {
    let services = CareServices::in_memory(clock());
    let (administrator_id, _) = parties(&services).await;

    let err = services
        .contracts
        .create_contract(contract(administrator_id, Uuid::new_v4(), "monthly"))
        .await
        .unwrap_err();

    assert_eq!(err, AppError::NotFound("Patient".into()));
    assert_eq!(services.contracts.count_contracts().await.unwrap(), 0);
}

#[tokio::test]
async fn test_deleted_administrator_cannot_sign() {
    let services = CareServices::in_memory(clock());
    let (administrator_id, patient_id) = parties(&services).await;
    services.administrators.delete(administrator_id).await.unwrap();

    let err = services
        .contracts
        .create_contract(contract(administrator_id, patient_id, "monthly"))
        .await
        .unwrap_err();

    assert_eq!(err, AppError::NotFound("Administrator".into()));
}

#[tokio::test]
async fn test_contracts_listed_oldest_first() {
    let clock = clock();
    let services = CareServices::in_memory(clock.clone());
    let (administrator_id, patient_id) = parties(&services).await;

    let first = services
        .contracts
        .create_contract(contract(administrator_id, patient_id, "monthly"))
        .await
        .unwrap();
    clock.advance(Duration::minutes(5));
    let second = services
        .contracts
        .create_contract(contract(administrator_id, patient_id, "half_month"))
        .await
        .unwrap();

    let ids: Vec<Uuid> = services
        .contracts
        .list_contracts()
        .await
        .unwrap()
        .iter()
        .map(|c| c.id())
        .collect();
    assert_eq!(ids, vec![first.id(), second.id()]);
}
