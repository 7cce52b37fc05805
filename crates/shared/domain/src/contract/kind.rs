//! Contract type and status codes.

use chrono::{Days, NaiveDate};

use crate::code_enum::code_enum;
use crate::constants::{HALF_MONTH_DAYS, MONTHLY_DAYS};
use crate::error::{DomainError, DomainResult};

code_enum! {
    /// Length of the service window.
    pub enum ContractType (error = DomainError::InvalidContractType) {
        HalfMonth => ("half_month", "HM"),
        Monthly => ("monthly", "M"),
    }
}

impl ContractType {
    /// Number of delivery days, start day included.
    pub fn duration_days(&self) -> i64 {
        match self {
            ContractType::HalfMonth => HALF_MONTH_DAYS,
            ContractType::Monthly => MONTHLY_DAYS,
        }
    }

    /// Last day of service for a contract starting on `start`.
    pub fn end_date(&self, start: NaiveDate) -> DomainResult<NaiveDate> {
        start
            .checked_add_days(Days::new(self.duration_days().unsigned_abs() - 1))
            .ok_or(DomainError::StartOutOfRange(start))
    }
}

code_enum! {
    /// Contract lifecycle: `Created -> Active -> Finished`.
    pub enum ContractStatus (error = DomainError::InvalidContractStatus) {
        Created => ("created", "C"),
        Active => ("active", "A"),
        Finished => ("finished", "F"),
    }
}

impl ContractStatus {
    /// Transitions only move one step forward.
    pub fn can_transition_to(&self, next: ContractStatus) -> bool {
        matches!(
            (self, next),
            (ContractStatus::Created, ContractStatus::Active)
                | (ContractStatus::Active, ContractStatus::Finished)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ContractStatus::Finished)
    }
}
