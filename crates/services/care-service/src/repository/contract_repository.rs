//! Contract repository contract and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{Clock, Contract, ContractStatus, Delivery};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Contract repository trait for dependency injection.
///
/// Deliveries are only reachable through their contract; soft-deleted
/// contracts are excluded from every query.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ContractRepository: Send + Sync {
    /// List active contracts, oldest first
    async fn get_all(&self) -> AppResult<Vec<Contract>>;

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Contract>>;

    /// Insert a new contract with its deliveries
    async fn create(&self, contract: Contract) -> AppResult<Contract>;

    /// Move a stored contract to `status`, enforcing the status machine
    async fn change_status(&self, id: Uuid, status: ContractStatus) -> AppResult<Contract>;

    async fn exist_by_id(&self, id: Uuid) -> AppResult<bool>;

    async fn count(&self) -> AppResult<u64>;

    /// Deliveries of a contract in calendar order
    async fn get_deliveries(&self, contract_id: Uuid) -> AppResult<Vec<Delivery>>;

    async fn get_delivery(&self, delivery_id: Uuid) -> AppResult<Option<Delivery>>;

    /// Persist a changed delivery back into its contract
    async fn update_delivery(&self, delivery: Delivery) -> AppResult<Delivery>;
}

/// Process-local contract table.
pub struct InMemoryContractStore {
    contracts: RwLock<HashMap<Uuid, Contract>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryContractStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            contracts: RwLock::new(HashMap::new()),
            clock,
        }
    }
}

#[async_trait]
impl ContractRepository for InMemoryContractStore {
    async fn get_all(&self) -> AppResult<Vec<Contract>> {
        let contracts = self.contracts.read().await;
        let mut active: Vec<Contract> = contracts
            .values()
            .filter(|c| !c.is_deleted())
            .cloned()
            .collect();
        active.sort_by_key(|c| (c.creation_date(), c.id()));
        Ok(active)
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Contract>> {
        let contracts = self.contracts.read().await;
        Ok(contracts.get(&id).filter(|c| !c.is_deleted()).cloned())
    }

    async fn create(&self, mut contract: Contract) -> AppResult<Contract> {
        let mut contracts = self.contracts.write().await;
        if contracts.contains_key(&contract.id()) {
            return Err(AppError::conflict("Contract"));
        }

        contract.mark_persisted_at(self.clock.now());
        contracts.insert(contract.id(), contract.clone());
        Ok(contract)
    }

    async fn change_status(&self, id: Uuid, status: ContractStatus) -> AppResult<Contract> {
        let mut contracts = self.contracts.write().await;
        let contract = contracts
            .get_mut(&id)
            .filter(|c| !c.is_deleted())
            .ok_or_else(|| AppError::not_found("Contract"))?;

        contract.change_status_at(status, self.clock.now())?;
        Ok(contract.clone())
    }

    async fn exist_by_id(&self, id: Uuid) -> AppResult<bool> {
        let contracts = self.contracts.read().await;
        Ok(contracts.get(&id).is_some_and(|c| !c.is_deleted()))
    }

    async fn count(&self) -> AppResult<u64> {
        let contracts = self.contracts.read().await;
        Ok(contracts.values().filter(|c| !c.is_deleted()).count() as u64)
    }

    async fn get_deliveries(&self, contract_id: Uuid) -> AppResult<Vec<Delivery>> {
        let contracts = self.contracts.read().await;
        let contract = contracts
            .get(&contract_id)
            .filter(|c| !c.is_deleted())
            .ok_or_else(|| AppError::not_found("Contract"))?;

        Ok(contract.deliveries().to_vec())
    }

    async fn get_delivery(&self, delivery_id: Uuid) -> AppResult<Option<Delivery>> {
        let contracts = self.contracts.read().await;
        Ok(contracts
            .values()
            .filter(|c| !c.is_deleted())
            .find_map(|c| c.delivery(delivery_id))
            .cloned())
    }

    async fn update_delivery(&self, delivery: Delivery) -> AppResult<Delivery> {
        let mut contracts = self.contracts.write().await;
        let contract = contracts
            .get_mut(&delivery.contract_id())
            .filter(|c| !c.is_deleted())
            .ok_or_else(|| AppError::not_found("Contract"))?;

        contract.replace_delivery(delivery.clone())?;
        Ok(delivery)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use domain::{Coordinates, CreateContract, DeliveryStatus, DomainError, FixedClock};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap()
    }

    async fn stored_contract(store: &InMemoryContractStore) -> Contract {
        let contract = Contract::create_at(
            CreateContract {
                administrator_id: Uuid::new_v4(),
                patient_id: Uuid::new_v4(),
                contract_type: "half_month".into(),
                start_date: now().date_naive() + Duration::days(3),
                cost_value: 200,
                street: "Elm St".into(),
                number: 30,
                coordinates: Coordinates::new(-34.6, -58.4).unwrap(),
            },
            now(),
        )
        .unwrap();
        store.create(contract).await.unwrap()
    }

    #[tokio::test]
    async fn test_update_delivery_rejects_stale_copy() {
        let store = InMemoryContractStore::new(Arc::new(FixedClock::new(now())));
        let contract = stored_contract(&store).await;
        let delivery_id = contract.deliveries()[0].id();

        let mut first = store.get_delivery(delivery_id).await.unwrap().unwrap();
        let mut second = store.get_delivery(delivery_id).await.unwrap().unwrap();

        first.mark_delivered_at(now()).unwrap();
        store.update_delivery(first).await.unwrap();

        second.cancel_at(now()).unwrap();
        let err = store.update_delivery(second).await.unwrap_err();
        assert_eq!(
            err.domain(),
            Some(&DomainError::InvalidDeliveryTransition {
                from: DeliveryStatus::Delivered,
                to: DeliveryStatus::Cancelled,
            })
        );

        let stored = store.get_delivery(delivery_id).await.unwrap().unwrap();
        assert_eq!(stored.status(), DeliveryStatus::Delivered);
    }

    #[tokio::test]
    async fn test_change_status_follows_machine() {
        let store = InMemoryContractStore::new(Arc::new(FixedClock::new(now())));
        let contract = stored_contract(&store).await;

        let err = store
            .change_status(contract.id(), ContractStatus::Finished)
            .await
            .unwrap_err();
        assert!(matches!(
            err.domain(),
            Some(DomainError::InvalidTransition { .. })
        ));

        let active = store
            .change_status(contract.id(), ContractStatus::Active)
            .await
            .unwrap();
        assert!(active.is_active());
    }
}
