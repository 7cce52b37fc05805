//! Person repository contract and in-memory implementation with soft delete.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{Clock, Person, Role};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Repository of administrators or patients, depending on `R`.
///
/// Lookups exclude soft-deleted records, except `exist_by_email`, which
/// guards email uniqueness across deleted records too. `create` and
/// `update` refuse an email held by another record with `Conflict("Email")`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PersonRepository<R: Role>: Send + Sync {
    /// Insert a new person
    async fn create(&self, person: Person<R>) -> AppResult<Person<R>>;

    /// Replace an active person
    async fn update(&self, person: Person<R>) -> AppResult<Person<R>>;

    /// Soft delete by ID (sets deleted_at timestamp)
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Restore a soft-deleted person
    async fn restore(&self, id: Uuid) -> AppResult<Person<R>>;

    /// Find active person by ID
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Person<R>>>;

    /// Find active person by email address
    async fn get_by_email(&self, email: &str) -> AppResult<Option<Person<R>>>;

    async fn exist_by_id(&self, id: Uuid) -> AppResult<bool>;

    async fn exist_by_email(&self, email: &str) -> AppResult<bool>;

    async fn count_all(&self) -> AppResult<u64>;

    async fn count_active(&self) -> AppResult<u64>;

    async fn count_deleted(&self) -> AppResult<u64>;
}

/// Process-local person table.
pub struct InMemoryPersonStore<R: Role> {
    people: RwLock<HashMap<Uuid, Person<R>>>,
    clock: Arc<dyn Clock>,
}

impl<R: Role> InMemoryPersonStore<R> {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            people: RwLock::new(HashMap::new()),
            clock,
        }
    }
}

/// Whether any record other than `person`, deleted ones included, holds its
/// email.
fn email_taken<R: Role>(people: &HashMap<Uuid, Person<R>>, person: &Person<R>) -> bool {
    let email = person.email().as_str();
    people
        .values()
        .any(|p| p.id() != person.id() && p.email().as_str().eq_ignore_ascii_case(email))
}

#[async_trait]
impl<R: Role> PersonRepository<R> for InMemoryPersonStore<R> {
    async fn create(&self, mut person: Person<R>) -> AppResult<Person<R>> {
        let mut people = self.people.write().await;
        if people.contains_key(&person.id()) {
            return Err(AppError::conflict(R::KIND));
        }
        if email_taken(&people, &person) {
            return Err(AppError::conflict("Email"));
        }

        person.mark_persisted_at(self.clock.now());
        people.insert(person.id(), person.clone());
        Ok(person)
    }

    async fn update(&self, mut person: Person<R>) -> AppResult<Person<R>> {
        let mut people = self.people.write().await;
        match people.get(&person.id()) {
            Some(stored) if !stored.is_deleted() => {}
            _ => return Err(AppError::not_found(R::KIND)),
        }
        if email_taken(&people, &person) {
            return Err(AppError::conflict("Email"));
        }

        person.mark_persisted_at(self.clock.now());
        people.insert(person.id(), person.clone());
        Ok(person)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut people = self.people.write().await;
        let person = people
            .get_mut(&id)
            .filter(|p| !p.is_deleted())
            .ok_or_else(|| AppError::not_found(R::KIND))?;

        person.soft_delete_at(self.clock.now());
        Ok(())
    }

    async fn restore(&self, id: Uuid) -> AppResult<Person<R>> {
        let mut people = self.people.write().await;
        let person = people
            .get_mut(&id)
            .filter(|p| p.is_deleted())
            .ok_or_else(|| {
                AppError::validation(format!("{} is not deleted or does not exist", R::KIND))
            })?;

        person.restore_at(self.clock.now());
        Ok(person.clone())
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Person<R>>> {
        let people = self.people.read().await;
        Ok(people.get(&id).filter(|p| !p.is_deleted()).cloned())
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<Person<R>>> {
        let people = self.people.read().await;
        Ok(people
            .values()
            .find(|p| !p.is_deleted() && p.email().as_str().eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn exist_by_id(&self, id: Uuid) -> AppResult<bool> {
        let people = self.people.read().await;
        Ok(people.get(&id).is_some_and(|p| !p.is_deleted()))
    }

    async fn exist_by_email(&self, email: &str) -> AppResult<bool> {
        let people = self.people.read().await;
        Ok(people
            .values()
            .any(|p| p.email().as_str().eq_ignore_ascii_case(email)))
    }

    async fn count_all(&self) -> AppResult<u64> {
        Ok(self.people.read().await.len() as u64)
    }

    async fn count_active(&self) -> AppResult<u64> {
        let people = self.people.read().await;
        Ok(people.values().filter(|p| !p.is_deleted()).count() as u64)
    }

    async fn count_deleted(&self) -> AppResult<u64> {
        let people = self.people.read().await;
        Ok(people.values().filter(|p| p.is_deleted()).count() as u64)
    }
}
