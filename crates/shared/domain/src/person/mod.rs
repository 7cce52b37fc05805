//! Person aggregates: administrators and patients.
//!
//! Both share the same shape and rules, so they are one generic aggregate
//! `Person<R>` distinguished by a zero-sized role marker.

mod name;

use std::marker::PhantomData;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainResult;
use crate::timestamps::Timestamps;
use crate::value_objects::{BirthDate, Email, Gender, HashedPassword, Password, Phone};

pub use name::{is_alpha_name, validate_names};

/// Marker for the kind of person an aggregate represents.
pub trait Role: std::fmt::Debug + Clone + PartialEq + Send + Sync + 'static {
    const KIND: &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdministratorRole;

impl Role for AdministratorRole {
    const KIND: &'static str = "administrator";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatientRole;

impl Role for PatientRole {
    const KIND: &'static str = "patient";
}

pub type Administrator = Person<AdministratorRole>;
pub type Patient = Person<PatientRole>;

/// Password held by a person.
///
/// New accounts carry the validated plaintext until the persistence layer
/// hashes it; accounts loaded from storage carry the hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Plain(Password),
    Hashed(HashedPassword),
}

impl Credential {
    pub fn is_hashed(&self) -> bool {
        matches!(self, Credential::Hashed(_))
    }

    pub fn plain(&self) -> Option<&Password> {
        match self {
            Credential::Plain(password) => Some(password),
            Credential::Hashed(_) => None,
        }
    }

    pub fn hashed(&self) -> Option<&HashedPassword> {
        match self {
            Credential::Plain(_) => None,
            Credential::Hashed(hash) => Some(hash),
        }
    }
}

/// Factory input: raw names plus already validated value objects.
#[derive(Debug, Clone)]
pub struct NewPerson {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub password: Password,
    pub gender: Gender,
    pub birth_date: BirthDate,
    pub phone: Option<Phone>,
}

/// Partial profile update. `phone: Some(None)` removes the phone.
#[derive(Debug, Clone, Default)]
pub struct UpdatePerson {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<Email>,
    pub gender: Option<Gender>,
    pub birth_date: Option<BirthDate>,
    pub phone: Option<Option<Phone>>,
}

/// Person row as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub gender: String,
    pub birth_date: NaiveDate,
    pub phone: Option<String>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Person<R: Role> {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: Email,
    credential: Credential,
    gender: Gender,
    birth_date: BirthDate,
    phone: Option<Phone>,
    last_login: Option<DateTime<Utc>>,
    timestamps: Timestamps,
    role: PhantomData<R>,
}

impl<R: Role> Person<R> {
    /// Validate the names and build a new person with a fresh id.
    ///
    /// Timestamps stay empty until the record is persisted.
    pub fn create(input: NewPerson) -> DomainResult<Self> {
        validate_names(&input.first_name, &input.last_name)?;

        Ok(Self {
            id: Uuid::new_v4(),
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            credential: Credential::Plain(input.password),
            gender: input.gender,
            birth_date: input.birth_date,
            phone: input.phone,
            last_login: None,
            timestamps: Timestamps::default(),
            role: PhantomData,
        })
    }

    /// Rebuild a stored person, re-validating its contact data and hash.
    pub fn from_record(record: PersonRecord) -> DomainResult<Self> {
        let email = Email::new(record.email)?;
        let password = HashedPassword::new(record.password_hash)?;
        let gender = Gender::parse(&record.gender)?;
        let phone = Phone::new(record.phone.as_deref())?;

        Ok(Self {
            id: record.id,
            first_name: record.first_name,
            last_name: record.last_name,
            email,
            credential: Credential::Hashed(password),
            gender,
            birth_date: BirthDate::from_stored(record.birth_date),
            phone,
            last_login: record.last_login,
            timestamps: Timestamps::from_stored(
                record.created_at,
                record.updated_at,
                record.deleted_at,
            ),
            role: PhantomData,
        })
    }

    pub fn kind(&self) -> &'static str {
        R::KIND
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn birth_date(&self) -> BirthDate {
        self.birth_date
    }

    pub fn phone(&self) -> Option<&Phone> {
        self.phone.as_ref()
    }

    pub fn last_login(&self) -> Option<DateTime<Utc>> {
        self.last_login
    }

    pub fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }

    pub fn is_deleted(&self) -> bool {
        self.timestamps.is_deleted()
    }

    /// Apply a partial update. Names are validated as a pair, with the
    /// current value standing in for a name that is not being changed.
    pub fn update_at(&mut self, update: UpdatePerson, now: DateTime<Utc>) -> DomainResult<()> {
        let first_name = update.first_name.unwrap_or_else(|| self.first_name.clone());
        let last_name = update.last_name.unwrap_or_else(|| self.last_name.clone());
        validate_names(&first_name, &last_name)?;

        self.first_name = first_name;
        self.last_name = last_name;
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(gender) = update.gender {
            self.gender = gender;
        }
        if let Some(birth_date) = update.birth_date {
            self.birth_date = birth_date;
        }
        if let Some(phone) = update.phone {
            self.phone = phone;
        }
        self.timestamps.touch(now);
        Ok(())
    }

    /// Replace the password and hash it with bcrypt at `cost`.
    pub fn change_password_at(
        &mut self,
        password: Password,
        cost: u32,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.credential = Credential::Hashed(password.hash_with_cost(cost)?);
        self.timestamps.touch(now);
        Ok(())
    }

    /// Swap a plaintext credential for its bcrypt hash. A hashed credential
    /// is left untouched.
    pub fn hash_password(&mut self, cost: u32) -> DomainResult<()> {
        if let Credential::Plain(password) = &self.credential {
            self.credential = Credential::Hashed(password.hash_with_cost(cost)?);
        }
        Ok(())
    }

    /// Replace the credential with a hash produced elsewhere.
    pub fn store_password_hash(&mut self, hash: HashedPassword) {
        self.credential = Credential::Hashed(hash);
    }

    /// Whether `plain_text` matches the stored hash. Always false before
    /// the credential is hashed.
    pub fn verify_password(&self, plain_text: &str) -> bool {
        self.credential
            .hashed()
            .is_some_and(|hash| hash.verify(plain_text))
    }

    /// Record a successful login.
    pub fn logged(&mut self) {
        self.logged_at(Utc::now());
    }

    pub fn logged_at(&mut self, now: DateTime<Utc>) {
        self.last_login = Some(now);
    }

    pub fn mark_persisted_at(&mut self, now: DateTime<Utc>) {
        self.timestamps.mark_persisted(now);
    }

    pub fn soft_delete_at(&mut self, now: DateTime<Utc>) {
        self.timestamps.soft_delete(now);
    }

    pub fn restore_at(&mut self, now: DateTime<Utc>) {
        self.timestamps.restore(now);
    }
}

/// Person view (safe to return to clients, no credential).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonResponse {
    pub id: Uuid,
    pub kind: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub gender: Gender,
    pub birth_date: BirthDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<Phone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl<R: Role> From<&Person<R>> for PersonResponse {
    fn from(person: &Person<R>) -> Self {
        Self {
            id: person.id,
            kind: R::KIND.to_string(),
            first_name: person.first_name.clone(),
            last_name: person.last_name.clone(),
            email: person.email.clone(),
            gender: person.gender,
            birth_date: person.birth_date,
            phone: person.phone.clone(),
            last_login: person.last_login,
            deleted_at: person.timestamps.deleted_at(),
        }
    }
}
