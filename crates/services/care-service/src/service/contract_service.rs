//! Contract service - contract lifecycle and delivery upkeep.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{AdministratorRole, PatientRole};
use domain::{Clock, Contract, ContractStatus, Coordinates, CreateContract, Delivery, DeliveryStatus};

use crate::repository::{ContractRepository, PersonRepository};

/// New address for a single delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDelivery {
    pub street: String,
    pub number: i32,
    pub latitude: f64,
    pub longitude: f64,
}

/// Contract service trait for dependency injection.
#[async_trait]
pub trait ContractService: Send + Sync {
    /// Validate the input, check both parties exist, then store the contract
    async fn create_contract(&self, input: CreateContract) -> AppResult<Contract>;

    async fn get_contract(&self, id: Uuid) -> AppResult<Contract>;

    async fn list_contracts(&self) -> AppResult<Vec<Contract>>;

    async fn count_contracts(&self) -> AppResult<u64>;

    /// `Created -> Active`
    async fn activate_contract(&self, id: Uuid) -> AppResult<Contract>;

    /// `Active -> Finished`
    async fn complete_contract(&self, id: Uuid) -> AppResult<Contract>;

    async fn list_deliveries(&self, contract_id: Uuid) -> AppResult<Vec<Delivery>>;

    async fn update_delivery(&self, delivery_id: Uuid, update: UpdateDelivery) -> AppResult<Delivery>;

    async fn mark_delivered(&self, delivery_id: Uuid) -> AppResult<Delivery>;

    async fn cancel_delivery(&self, delivery_id: Uuid) -> AppResult<Delivery>;
}

/// Concrete implementation of ContractService using repositories.
pub struct ContractManager {
    contracts: Arc<dyn ContractRepository>,
    administrators: Arc<dyn PersonRepository<AdministratorRole>>,
    patients: Arc<dyn PersonRepository<PatientRole>>,
    clock: Arc<dyn Clock>,
}

impl ContractManager {
    pub fn new(
        contracts: Arc<dyn ContractRepository>,
        administrators: Arc<dyn PersonRepository<AdministratorRole>>,
        patients: Arc<dyn PersonRepository<PatientRole>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            contracts,
            administrators,
            patients,
            clock,
        }
    }

    async fn load(&self, id: Uuid) -> AppResult<Contract> {
        self.contracts.get_by_id(id).await?.ok_or_not_found("Contract")
    }

    async fn load_delivery(&self, delivery_id: Uuid) -> AppResult<Delivery> {
        self.contracts
            .get_delivery(delivery_id)
            .await?
            .ok_or_not_found("Delivery")
    }

    async fn transition(&self, id: Uuid, next: ContractStatus) -> AppResult<Contract> {
        let mut contract = self.load(id).await?;
        let from = contract.contract_status();

        if let Err(err) = contract.change_status_at(next, self.clock.now()) {
            warn!(%id, %from, to = %next, "Rejected contract transition");
            return Err(err.into());
        }

        let contract = self.contracts.change_status(id, next).await?;
        info!(%id, %from, to = %next, "Contract status changed");
        Ok(contract)
    }

    async fn resolve_delivery(&self, delivery_id: Uuid, next: DeliveryStatus) -> AppResult<Delivery> {
        let mut delivery = self.load_delivery(delivery_id).await?;
        delivery.change_status_at(next, self.clock.now())?;

        let delivery = self.contracts.update_delivery(delivery).await?;
        info!(%delivery_id, status = %next, "Delivery resolved");
        Ok(delivery)
    }
}

#[async_trait]
impl ContractService for ContractManager {
    #[instrument(skip_all, fields(contract_type = %input.contract_type))]
    async fn create_contract(&self, input: CreateContract) -> AppResult<Contract> {
        let contract = Contract::create_at(input, self.clock.now())?;

        if !self
            .administrators
            .exist_by_id(contract.administrator_id())
            .await?
        {
            return Err(AppError::not_found("Administrator"));
        }
        if !self.patients.exist_by_id(contract.patient_id()).await? {
            return Err(AppError::not_found("Patient"));
        }

        let contract = self.contracts.create(contract).await?;
        info!(
            id = %contract.id(),
            start = %contract.start_date(),
            end = %contract.end_date(),
            deliveries = contract.deliveries().len(),
            "Contract created"
        );
        Ok(contract)
    }

    async fn get_contract(&self, id: Uuid) -> AppResult<Contract> {
        debug!(%id, "Loading contract");
        self.load(id).await
    }

    async fn list_contracts(&self) -> AppResult<Vec<Contract>> {
        self.contracts.get_all().await
    }

    async fn count_contracts(&self) -> AppResult<u64> {
        self.contracts.count().await
    }

    async fn activate_contract(&self, id: Uuid) -> AppResult<Contract> {
        self.transition(id, ContractStatus::Active).await
    }

    async fn complete_contract(&self, id: Uuid) -> AppResult<Contract> {
        self.transition(id, ContractStatus::Finished).await
    }

    async fn list_deliveries(&self, contract_id: Uuid) -> AppResult<Vec<Delivery>> {
        if !self.contracts.exist_by_id(contract_id).await? {
            return Err(AppError::not_found("Contract"));
        }
        self.contracts.get_deliveries(contract_id).await
    }

    #[instrument(skip(self, update))]
    async fn update_delivery(&self, delivery_id: Uuid, update: UpdateDelivery) -> AppResult<Delivery> {
        let coordinates = Coordinates::new(update.latitude, update.longitude)?;
        let mut delivery = self.load_delivery(delivery_id).await?;
        delivery.update_at(&update.street, update.number, coordinates, self.clock.now())?;

        let delivery = self.contracts.update_delivery(delivery).await?;
        info!("Delivery address updated");
        Ok(delivery)
    }

    async fn mark_delivered(&self, delivery_id: Uuid) -> AppResult<Delivery> {
        self.resolve_delivery(delivery_id, DeliveryStatus::Delivered).await
    }

    async fn cancel_delivery(&self, delivery_id: Uuid) -> AppResult<Delivery> {
        self.resolve_delivery(delivery_id, DeliveryStatus::Cancelled).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use domain::{DomainError, FixedClock};
    use mockall::predicate::eq;

    use crate::repository::{MockContractRepository, MockPersonRepository};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap()
    }

    fn input() -> CreateContract {
        CreateContract {
            administrator_id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            contract_type: "half_month".into(),
            start_date: now().date_naive() + Duration::days(3),
            cost_value: 200,
            street: "Elm St".into(),
            number: 30,
            coordinates: Coordinates::new(-34.6, -58.4).unwrap(),
        }
    }

    fn manager(
        contracts: MockContractRepository,
        administrators: MockPersonRepository<AdministratorRole>,
        patients: MockPersonRepository<PatientRole>,
    ) -> ContractManager {
        ContractManager::new(
            Arc::new(contracts),
            Arc::new(administrators),
            Arc::new(patients),
            Arc::new(FixedClock::new(now())),
        )
    }

    fn people_exist(
        exists: bool,
    ) -> (
        MockPersonRepository<AdministratorRole>,
        MockPersonRepository<PatientRole>,
    ) {
        let mut administrators = MockPersonRepository::<AdministratorRole>::new();
        administrators
            .expect_exist_by_id()
            .returning(move |_| Ok(exists));
        let mut patients = MockPersonRepository::<PatientRole>::new();
        patients.expect_exist_by_id().returning(|_| Ok(true));
        (administrators, patients)
    }

    #[tokio::test]
    async fn test_create_contract_success() {
        let mut contracts = MockContractRepository::new();
        contracts.expect_create().times(1).returning(Ok);
        let (administrators, patients) = people_exist(true);

        let service = manager(contracts, administrators, patients);
        let contract = service.create_contract(input()).await.unwrap();

        assert_eq!(contract.deliveries().len(), 15);
        assert_eq!(contract.creation_date(), now());
        assert_eq!(contract.contract_status(), ContractStatus::Created);
    }

    #[tokio::test]
    async fn test_create_contract_validates_before_lookups() {
        let mut contracts = MockContractRepository::new();
        contracts.expect_create().never();
        let mut administrators = MockPersonRepository::<AdministratorRole>::new();
        administrators.expect_exist_by_id().never();
        let patients = MockPersonRepository::<PatientRole>::new();

        let service = manager(contracts, administrators, patients);
        let mut bad = input();
        bad.cost_value = -5;
        let err = service.create_contract(bad).await.unwrap_err();

        assert_eq!(err, AppError::Domain(DomainError::NonPositiveCost(-5)));
    }

    #[tokio::test]
    async fn test_create_contract_unknown_administrator() {
        let mut contracts = MockContractRepository::new();
        contracts.expect_create().never();
        let (administrators, patients) = people_exist(false);

        let service = manager(contracts, administrators, patients);
        let err = service.create_contract(input()).await.unwrap_err();

        assert_eq!(err, AppError::NotFound("Administrator".into()));
    }

    #[tokio::test]
    async fn test_activate_then_activate_again() {
        let contract = Contract::create_at(input(), now()).unwrap();
        let id = contract.id();
        let mut active = contract.clone();
        active.activate_at(now()).unwrap();
        let stored = active.clone();

        let mut contracts = MockContractRepository::new();
        let mut calls = 0;
        contracts.expect_get_by_id().with(eq(id)).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Ok(Some(contract.clone()))
            } else {
                Ok(Some(active.clone()))
            }
        });
        contracts
            .expect_change_status()
            .with(eq(id), eq(ContractStatus::Active))
            .times(1)
            .returning(move |_, _| Ok(stored.clone()));

        let service = manager(
            contracts,
            MockPersonRepository::new(),
            MockPersonRepository::new(),
        );

        assert!(service.activate_contract(id).await.is_ok());
        let err = service.activate_contract(id).await.unwrap_err();
        assert_eq!(
            err,
            AppError::Domain(DomainError::InvalidTransition {
                from: ContractStatus::Active,
                to: ContractStatus::Active,
            })
        );
    }

    #[tokio::test]
    async fn test_complete_before_activate() {
        let contract = Contract::create_at(input(), now()).unwrap();
        let id = contract.id();

        let mut contracts = MockContractRepository::new();
        contracts
            .expect_get_by_id()
            .returning(move |_| Ok(Some(contract.clone())));
        contracts.expect_change_status().never();

        let service = manager(
            contracts,
            MockPersonRepository::new(),
            MockPersonRepository::new(),
        );
        let err = service.complete_contract(id).await.unwrap_err();

        assert_eq!(
            err.domain(),
            Some(&DomainError::InvalidTransition {
                from: ContractStatus::Created,
                to: ContractStatus::Finished,
            })
        );
    }

    #[tokio::test]
    async fn test_update_delivery_rejects_bad_coordinates_without_lookup() {
        let mut contracts = MockContractRepository::new();
        contracts.expect_get_delivery().never();

        let service = manager(
            contracts,
            MockPersonRepository::new(),
            MockPersonRepository::new(),
        );
        let err = service
            .update_delivery(
                Uuid::new_v4(),
                UpdateDelivery {
                    street: "Oak Ave".into(),
                    number: 1,
                    latitude: 95.0,
                    longitude: 0.0,
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.domain(), Some(&DomainError::LatitudeOutOfBounds(95.0)));
    }

    #[tokio::test]
    async fn test_mark_delivered_persists_delivery() {
        let contract = Contract::create_at(input(), now()).unwrap();
        let delivery = contract.deliveries()[0].clone();
        let delivery_id = delivery.id();

        let mut contracts = MockContractRepository::new();
        contracts
            .expect_get_delivery()
            .with(eq(delivery_id))
            .returning(move |_| Ok(Some(delivery.clone())));
        contracts
            .expect_update_delivery()
            .withf(|d| d.status() == DeliveryStatus::Delivered)
            .times(1)
            .returning(Ok);

        let service = manager(
            contracts,
            MockPersonRepository::new(),
            MockPersonRepository::new(),
        );
        let delivered = service.mark_delivered(delivery_id).await.unwrap();

        assert_eq!(delivered.status(), DeliveryStatus::Delivered);
        assert_eq!(delivered.updated_at(), Some(now()));
    }

    #[tokio::test]
    async fn test_list_deliveries_of_unknown_contract() {
        let mut contracts = MockContractRepository::new();
        contracts.expect_exist_by_id().returning(|_| Ok(false));
        contracts.expect_get_deliveries().never();

        let service = manager(
            contracts,
            MockPersonRepository::new(),
            MockPersonRepository::new(),
        );
        let err = service.list_deliveries(Uuid::new_v4()).await.unwrap_err();

        assert_eq!(err, AppError::NotFound("Contract".into()));
    }
}
