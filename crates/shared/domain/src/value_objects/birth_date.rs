//! Birth date value object.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::ADULT_AGE_YEARS;
use crate::error::{DomainError, DomainResult};

/// Birth date of an adult person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BirthDate(NaiveDate);

impl BirthDate {
    /// Validate a birth date against the current time.
    pub fn new(value: NaiveDate) -> DomainResult<Self> {
        Self::new_at(value, Utc::now())
    }

    /// Validate a birth date against `now`.
    ///
    /// Future dates fail first; then the person must have been born on or
    /// before the same day 18 years ago.
    pub fn new_at(value: NaiveDate, now: DateTime<Utc>) -> DomainResult<Self> {
        let today = now.date_naive();

        if value > today {
            return Err(DomainError::FutureDate(value));
        }
        if value > adult_threshold(today) {
            return Err(DomainError::UnderageDate(value));
        }

        Ok(Self(value))
    }

    /// Wrap a date read from storage without re-running the age rules.
    pub fn from_stored(value: NaiveDate) -> Self {
        Self(value)
    }

    pub fn value(&self) -> NaiveDate {
        self.0
    }

    /// Age in whole years at `now`.
    pub fn age_at(&self, now: DateTime<Utc>) -> u32 {
        let today = now.date_naive();
        let mut age = today.year() - self.0.year();
        if (today.month(), today.day()) < (self.0.month(), self.0.day()) {
            age -= 1;
        }
        age.max(0) as u32
    }
}

/// Latest birth date that still counts as an adult on `today`.
fn adult_threshold(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(Months::new(ADULT_AGE_YEARS * 12))
        .unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_adult_birth_date() {
        let birth = BirthDate::new_at(date(1990, 1, 1), now()).unwrap();
        assert_eq!(birth.value(), date(1990, 1, 1));
        assert_eq!(birth.age_at(now()), 34);
    }

    #[test]
    fn test_exactly_eighteen_today() {
        assert!(BirthDate::new_at(date(2006, 6, 15), now()).is_ok());
        assert_eq!(
            BirthDate::new_at(date(2006, 6, 16), now()),
            Err(DomainError::UnderageDate(date(2006, 6, 16)))
        );
    }

    #[test]
    fn test_future_date_wins_over_underage() {
        assert_eq!(
            BirthDate::new_at(date(2024, 6, 16), now()),
            Err(DomainError::FutureDate(date(2024, 6, 16)))
        );
    }

    #[test]
    fn test_today_is_underage_not_future() {
        assert_eq!(
            BirthDate::new_at(date(2024, 6, 15), now()),
            Err(DomainError::UnderageDate(date(2024, 6, 15)))
        );
    }

    #[test]
    fn test_leap_day_threshold() {
        let leap_now = Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap();
        // 2006 has no Feb 29, the threshold clamps to Feb 28
        assert!(BirthDate::new_at(date(2006, 2, 28), leap_now).is_ok());
        assert!(BirthDate::new_at(date(2006, 3, 1), leap_now).is_err());
    }

    proptest! {
        #[test]
        fn birth_date_classification(offset_days in -20_000i64..20_000) {
            let today = now().date_naive();
            let candidate = today + Duration::days(offset_days);
            let threshold = adult_threshold(today);
            let result = BirthDate::new_at(candidate, now());

            if candidate > today {
                prop_assert_eq!(result, Err(DomainError::FutureDate(candidate)));
            } else if candidate > threshold {
                prop_assert_eq!(result, Err(DomainError::UnderageDate(candidate)));
            } else {
                prop_assert!(result.is_ok());
            }
        }
    }
}
