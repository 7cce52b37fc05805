//! Care Service Library
//!
//! This crate wires the meal-delivery domain to its persistence contracts and
//! exposes the application services used by the `care-service` binary.
//! Storage is in-memory; the repository traits are the seam for a real
//! backend.

pub mod config;
pub mod repository;
pub mod service;

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use common::{AppError, AppResult};
use domain::{Clock, Contract, ContractResponse, Coordinates, CreateContract};

use crate::repository::{
    InMemoryAdministratorStore, InMemoryContractStore, InMemoryPatientStore,
};
use crate::service::{
    AdministratorManager, ContractManager, ContractService, PatientManager, PersonCounts,
    PersonService, RegisterPerson, UpdateDelivery,
};

/// Application services sharing one clock.
pub struct CareServices {
    pub administrators: Arc<AdministratorManager>,
    pub patients: Arc<PatientManager>,
    pub contracts: Arc<ContractManager>,
}

impl CareServices {
    /// Build every service on top of fresh in-memory stores.
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        let administrator_repo = Arc::new(InMemoryAdministratorStore::new(clock.clone()));
        let patient_repo = Arc::new(InMemoryPatientStore::new(clock.clone()));
        let contract_repo = Arc::new(InMemoryContractStore::new(clock.clone()));

        Self {
            administrators: Arc::new(AdministratorManager::new(
                administrator_repo.clone(),
                clock.clone(),
            )),
            patients: Arc::new(PatientManager::new(patient_repo.clone(), clock.clone())),
            contracts: Arc::new(ContractManager::new(
                contract_repo,
                administrator_repo,
                patient_repo,
                clock,
            )),
        }
    }
}

/// Validate a contract request without storing it and return the resulting
/// calendar. Both party ids are taken as given.
pub fn plan_contract(input: CreateContract, clock: &dyn Clock) -> AppResult<ContractResponse> {
    let contract = Contract::create_at(input, clock.now())?;
    info!(
        contract_type = %contract.contract_type(),
        deliveries = contract.deliveries().len(),
        "Contract planned"
    );
    Ok(ContractResponse::from(contract))
}

/// Outcome of [`run_demo`].
#[derive(Debug, Serialize)]
pub struct DemoReport {
    pub contract: ContractResponse,
    pub administrators: PersonCounts,
    pub patients: PersonCounts,
    pub contracts: u64,
}

/// Run a full lifecycle against in-memory stores: register both parties,
/// create a half-month contract, activate it, resolve a few deliveries,
/// move one address and finish the contract.
pub async fn run_demo(clock: Arc<dyn Clock>) -> AppResult<DemoReport> {
    let services = CareServices::in_memory(clock.clone());

    let administrator = services
        .administrators
        .register(RegisterPerson {
            first_name: "Marta".into(),
            last_name: "Gomez".into(),
            email: "marta.gomez@example.com".into(),
            password: "Adm1n!Secure".into(),
            gender: "female".into(),
            birth_date: demo_date(1980, 3, 14)?,
            phone: Some("1155551234".into()),
        })
        .await?;

    let patient = services
        .patients
        .register(RegisterPerson {
            first_name: "Jose".into(),
            last_name: "Perez".into(),
            email: "jose.perez@example.com".into(),
            password: "Pat1ent!Secure".into(),
            gender: "M".into(),
            birth_date: demo_date(1948, 11, 2)?,
            phone: None,
        })
        .await?;

    let contract = services
        .contracts
        .create_contract(CreateContract {
            administrator_id: administrator.id(),
            patient_id: patient.id(),
            contract_type: "half_month".into(),
            start_date: domain::contract::earliest_start(clock.now()),
            cost_value: 45_000,
            street: "Avenida Rivadavia".into(),
            number: 4520,
            coordinates: Coordinates::new(-34.6158, -58.4333)?,
        })
        .await?;
    let id = contract.id();

    services.contracts.activate_contract(id).await?;

    let deliveries = services.contracts.list_deliveries(id).await?;
    if let [first, second, third, ..] = deliveries.as_slice() {
        services.contracts.mark_delivered(first.id()).await?;
        services.contracts.cancel_delivery(second.id()).await?;
        services
            .contracts
            .update_delivery(
                third.id(),
                UpdateDelivery {
                    street: "Calle Corrientes".into(),
                    number: 1200,
                    latitude: -34.6037,
                    longitude: -58.3816,
                },
            )
            .await?;
    }

    let contract = services.contracts.complete_contract(id).await?;
    info!(%id, "Demo finished");

    Ok(DemoReport {
        contract: ContractResponse::from(contract),
        administrators: services.administrators.counts().await?,
        patients: services.patients.counts().await?,
        contracts: services.contracts.count_contracts().await?,
    })
}

fn demo_date(year: i32, month: u32, day: u32) -> AppResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| AppError::internal(format!("invalid date {year}-{month}-{day}")))
}
