//! Person service - registration and account upkeep for administrators and
//! patients.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{AdministratorRole, PatientRole};
use domain::{
    BirthDate, Clock, DomainResult, Email, Gender, NewPerson, Password, Person, Phone, Role,
    UpdatePerson, PASSWORD_HASH_COST,
};

use crate::repository::PersonRepository;

/// Raw registration input.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterPerson {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub gender: String,
    pub birth_date: NaiveDate,
    pub phone: Option<String>,
}

impl RegisterPerson {
    /// Build the value objects, stopping at the first invalid one.
    pub fn into_new_person(self, now: DateTime<Utc>) -> DomainResult<NewPerson> {
        Ok(NewPerson {
            email: Email::new(self.email)?,
            password: Password::new(self.password)?,
            gender: Gender::parse(&self.gender)?,
            birth_date: BirthDate::new_at(self.birth_date, now)?,
            phone: Phone::new(self.phone.as_deref())?,
            first_name: self.first_name,
            last_name: self.last_name,
        })
    }
}

/// Raw partial update. An empty `phone` removes the phone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePersonRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub phone: Option<String>,
}

impl UpdatePersonRequest {
    pub fn into_update(self, now: DateTime<Utc>) -> DomainResult<UpdatePerson> {
        Ok(UpdatePerson {
            email: self.email.map(Email::new).transpose()?,
            gender: self.gender.as_deref().map(Gender::parse).transpose()?,
            birth_date: self
                .birth_date
                .map(|date| BirthDate::new_at(date, now))
                .transpose()?,
            phone: self
                .phone
                .as_deref()
                .map(|phone| Phone::new(Some(phone)))
                .transpose()?,
            first_name: self.first_name,
            last_name: self.last_name,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PersonCounts {
    pub all: u64,
    pub active: u64,
    pub deleted: u64,
}

/// Person service trait for dependency injection.
#[async_trait]
pub trait PersonService<R: Role>: Send + Sync {
    /// Validate and register a new person; the email must be unused
    async fn register(&self, request: RegisterPerson) -> AppResult<Person<R>>;

    async fn get(&self, id: Uuid) -> AppResult<Person<R>>;

    async fn get_by_email(&self, email: &str) -> AppResult<Person<R>>;

    async fn update(&self, id: Uuid, request: UpdatePersonRequest) -> AppResult<Person<R>>;

    /// Soft delete
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn restore(&self, id: Uuid) -> AppResult<Person<R>>;

    /// Stamp the last login time
    async fn record_login(&self, id: Uuid) -> AppResult<Person<R>>;

    /// Validate and hash a new password
    async fn change_password(&self, id: Uuid, password: String) -> AppResult<Person<R>>;

    async fn counts(&self) -> AppResult<PersonCounts>;
}

/// Concrete implementation of PersonService using a repository.
pub struct PersonManager<R: Role> {
    repo: Arc<dyn PersonRepository<R>>,
    clock: Arc<dyn Clock>,
    hash_cost: u32,
}

pub type AdministratorManager = PersonManager<AdministratorRole>;
pub type PatientManager = PersonManager<PatientRole>;

impl<R: Role> PersonManager<R> {
    pub fn new(repo: Arc<dyn PersonRepository<R>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            clock,
            hash_cost: PASSWORD_HASH_COST,
        }
    }

    /// Override the bcrypt cost used for new passwords.
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    async fn load(&self, id: Uuid) -> AppResult<Person<R>> {
        self.repo.get_by_id(id).await?.ok_or_not_found(R::KIND)
    }
}

#[async_trait]
impl<R: Role> PersonService<R> for PersonManager<R> {
    #[instrument(skip_all, fields(kind = R::KIND))]
    async fn register(&self, request: RegisterPerson) -> AppResult<Person<R>> {
        let input = request.into_new_person(self.clock.now())?;
        let mut person = Person::<R>::create(input)?;

        if self.repo.exist_by_email(person.email().as_str()).await? {
            warn!(email = %person.email(), "Email already registered");
            return Err(AppError::conflict("Email"));
        }

        person.hash_password(self.hash_cost)?;
        let person = self.repo.create(person).await?;
        info!(id = %person.id(), "Person registered");
        Ok(person)
    }

    async fn get(&self, id: Uuid) -> AppResult<Person<R>> {
        debug!(kind = R::KIND, %id, "Loading person");
        self.load(id).await
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Person<R>> {
        self.repo
            .get_by_email(email)
            .await?
            .ok_or_not_found(R::KIND)
    }

    #[instrument(skip(self, request), fields(kind = R::KIND))]
    async fn update(&self, id: Uuid, request: UpdatePersonRequest) -> AppResult<Person<R>> {
        let now = self.clock.now();
        let update = request.into_update(now)?;
        let mut person = self.load(id).await?;

        if let Some(email) = &update.email {
            let changed = !email.as_str().eq_ignore_ascii_case(person.email().as_str());
            if changed && self.repo.exist_by_email(email.as_str()).await? {
                return Err(AppError::conflict("Email"));
            }
        }

        person.update_at(update, now)?;
        let person = self.repo.update(person).await?;
        info!("Person updated");
        Ok(person)
    }

    #[instrument(skip(self), fields(kind = R::KIND))]
    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repo.delete(id).await?;
        info!("Person soft deleted");
        Ok(())
    }

    #[instrument(skip(self), fields(kind = R::KIND))]
    async fn restore(&self, id: Uuid) -> AppResult<Person<R>> {
        let person = self.repo.restore(id).await?;
        info!("Person restored");
        Ok(person)
    }

    async fn record_login(&self, id: Uuid) -> AppResult<Person<R>> {
        let mut person = self.load(id).await?;
        person.logged_at(self.clock.now());
        self.repo.update(person).await
    }

    #[instrument(skip(self, password), fields(kind = R::KIND))]
    async fn change_password(&self, id: Uuid, password: String) -> AppResult<Person<R>> {
        let password = Password::new(password)?;
        let mut person = self.load(id).await?;
        person.change_password_at(password, self.hash_cost, self.clock.now())?;
        let person = self.repo.update(person).await?;
        info!("Password changed");
        Ok(person)
    }

    async fn counts(&self) -> AppResult<PersonCounts> {
        Ok(PersonCounts {
            all: self.repo.count_all().await?,
            active: self.repo.count_active().await?,
            deleted: self.repo.count_deleted().await?,
        })
    }
}
