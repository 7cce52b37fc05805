//! Audit timestamps held by every aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Creation, update and soft-delete times.
///
/// All three are empty on a freshly built aggregate; the persistence layer
/// fills `created_at`/`updated_at` on insert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    /// Soft delete timestamp (None = active, Some = deleted)
    deleted_at: Option<DateTime<Utc>>,
}

impl Timestamps {
    /// Rebuild timestamps read from storage.
    pub fn from_stored(
        created_at: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            created_at,
            updated_at,
            deleted_at,
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Record the first insert.
    pub fn mark_persisted(&mut self, at: DateTime<Utc>) {
        self.created_at.get_or_insert(at);
        self.updated_at = Some(at);
    }

    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }

    pub fn soft_delete(&mut self, at: DateTime<Utc>) {
        self.deleted_at = Some(at);
        self.updated_at = Some(at);
    }

    pub fn restore(&mut self, at: DateTime<Utc>) {
        self.deleted_at = None;
        self.updated_at = Some(at);
    }
}
