//! Shared traits and calendar-month utilities for sales primitives.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Exposes a stable identifier for entities kept in the record store.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Shifts a date by whole calendar months, clamping the day to the target
/// month's length (Jan 31 shifted by one month lands on Feb 28/29).
pub fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let mut year = date.year();
    let mut month = date.month() as i32 + months;
    let mut day = date.day();
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    day = day.min(days_in_month(year, month as u32));
    NaiveDate::from_ymd_opt(year, month as u32, day).unwrap()
}

/// Returns the number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    let last_current = first_next - Duration::days(1);
    last_current.day()
}

/// Calendar-month bucket key used for trends, receivables, and charts.
///
/// Serializes as the `YYYY-MM` label the reporting layer expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        debug_assert!((1..=12).contains(&month));
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Returns the key shifted by whole months (negative shifts go back).
    pub fn shift(self, months: i32) -> Self {
        let index = self.year * 12 + self.month as i32 - 1 + months;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn next(self) -> Self {
        self.shift(1)
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        let (year, month) = value
            .split_once('-')
            .ok_or_else(|| de::Error::custom("expected YYYY-MM month key"))?;
        let year = year.parse().map_err(de::Error::custom)?;
        let month: u32 = month.parse().map_err(de::Error::custom)?;
        if !(1..=12).contains(&month) {
            return Err(de::Error::custom("month key out of range"));
        }
        Ok(MonthKey { year, month })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn shift_month_clamps_to_target_month_length() {
        assert_eq!(shift_month(date(2024, 1, 31), 1), date(2024, 2, 29));
        assert_eq!(shift_month(date(2023, 1, 31), 1), date(2023, 2, 28));
        assert_eq!(shift_month(date(2024, 1, 31), 2), date(2024, 3, 31));
        assert_eq!(shift_month(date(2024, 11, 30), 3), date(2025, 2, 28));
        assert_eq!(shift_month(date(2024, 3, 15), -3), date(2023, 12, 15));
    }

    #[test]
    fn month_key_shifts_across_year_boundaries() {
        let december = MonthKey::new(2024, 12);
        assert_eq!(december.next(), MonthKey::new(2025, 1));
        assert_eq!(MonthKey::new(2024, 2).shift(-3), MonthKey::new(2023, 11));
        assert_eq!(MonthKey::from_date(date(2024, 6, 30)).to_string(), "2024-06");
    }

    #[test]
    fn month_key_serializes_as_label() {
        let key = MonthKey::new(2024, 3);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"2024-03\"");
        let back: MonthKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
