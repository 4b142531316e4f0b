//! Common types used throughout WorkBoard

use std::fmt;

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A value in `[0, 100]`, stored with two decimal places
///
/// Every constructor clamps, so an out-of-range percentage cannot exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Percentage(Decimal);

impl Percentage {
    pub const ZERO: Percentage = Percentage(Decimal::ZERO);
    pub const FULL: Percentage = Percentage(Decimal::ONE_HUNDRED);

    pub fn new(value: Decimal) -> Self {
        Percentage(value.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED).round_dp(2))
    }

    /// Non-finite input maps to zero.
    pub fn from_f64(value: f64) -> Self {
        Self::new(Decimal::from_f64(value).unwrap_or(Decimal::ZERO))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }

    /// Shift by `delta`, clamping the result
    pub fn adjust(self, delta: Decimal) -> Self {
        Self::new(self.0 + delta)
    }

    /// Arithmetic mean, or `None` for an empty input
    pub fn mean<I: IntoIterator<Item = Percentage>>(values: I) -> Option<Percentage> {
        let (sum, count) = values
            .into_iter()
            .fold((Decimal::ZERO, 0u32), |(sum, count), p| (sum + p.0, count + 1));
        if count == 0 {
            None
        } else {
            Some(Self::new(sum / Decimal::from(count)))
        }
    }
}

impl From<Decimal> for Percentage {
    fn from(value: Decimal) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Percentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Percentage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        rust_decimal::serde::float::deserialize(deserializer).map(Percentage::new)
    }
}

/// Date range of a project (start_date to deadline)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub deadline: NaiveDate,
}

impl DateRange {
    pub fn new(start_date: NaiveDate, deadline: NaiveDate) -> Self {
        Self {
            start_date,
            deadline,
        }
    }

    pub fn is_ordered(&self) -> bool {
        self.deadline >= self.start_date
    }

    pub fn duration_days(&self) -> i64 {
        (self.deadline - self.start_date).num_days()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.deadline
    }
}

/// End of the given day in UTC, used when a calendar date acts as a deadline
pub fn end_of_day(date: NaiveDate) -> chrono::DateTime<Utc> {
    let naive = date
        .and_hms_opt(23, 59, 59)
        .unwrap_or_else(|| date.and_time(chrono::NaiveTime::MIN));
    Utc.from_utc_datetime(&naive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percentage_clamps() {
        assert_eq!(Percentage::new(dec!(120)), Percentage::FULL);
        assert_eq!(Percentage::new(dec!(-3.5)), Percentage::ZERO);
        assert_eq!(Percentage::new(dec!(42.125)).value(), dec!(42.12));
    }

    #[test]
    fn test_percentage_adjust() {
        let p = Percentage::new(dec!(97));
        assert_eq!(p.adjust(dec!(5)), Percentage::FULL);
        assert_eq!(p.adjust(dec!(-10)).value(), dec!(87));
        assert_eq!(Percentage::ZERO.adjust(dec!(-10)), Percentage::ZERO);
    }

    #[test]
    fn test_percentage_mean() {
        let values = vec![Percentage::new(dec!(80)), Percentage::new(dec!(90))];
        assert_eq!(Percentage::mean(values).map(|p| p.value()), Some(dec!(85)));
        assert_eq!(Percentage::mean(Vec::new()), None);
    }

    #[test]
    fn test_percentage_serializes_as_number() {
        let json = serde_json::to_value(Percentage::new(dec!(87.5))).unwrap();
        assert_eq!(json, serde_json::json!(87.5));

        let parsed: Percentage = serde_json::from_value(serde_json::json!(150.0)).unwrap();
        assert_eq!(parsed, Percentage::FULL);
    }

    #[test]
    fn test_date_range() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let range = DateRange::new(start, end);
        assert!(range.is_ordered());
        assert_eq!(range.duration_days(), 30);
        assert!(!DateRange::new(end, start).is_ordered());
    }
}
