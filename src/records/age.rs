use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Legal-adulthood boundary derived from a birthdate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgeContext {
    birthdate: NaiveDate,
    eighteenth_birthday: NaiveDate,
}

impl AgeContext {
    pub fn new(birthdate: NaiveDate) -> Self {
        Self {
            birthdate,
            eighteenth_birthday: eighteenth_birthday(birthdate),
        }
    }

    pub fn birthdate(&self) -> NaiveDate {
        self.birthdate
    }

    pub fn eighteenth_birthday(&self) -> NaiveDate {
        self.eighteenth_birthday
    }

    /// Inclusive: the eighteenth birthday itself counts as adult.
    pub fn is_adult_on(&self, date: NaiveDate) -> bool {
        date >= self.eighteenth_birthday
    }
}

/// Same month and day eighteen years on. A 29 February birthdate lands on
/// 1 March when the target year has no leap day.
pub fn eighteenth_birthday(birthdate: NaiveDate) -> NaiveDate {
    let year = birthdate.year() + 18;
    birthdate
        .with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
        .unwrap_or(NaiveDate::MAX)
}
