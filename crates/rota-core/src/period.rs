//! Calendar periods, a validated `(year, month)` pair.

use std::fmt;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::{Error, Result};

/// Earliest schedulable year.
pub const MIN_YEAR: i32 = 2020;
/// Latest schedulable year.
pub const MAX_YEAR: i32 = 2100;

const MONTH_NAMES: [&str; 12] = [
  "January",
  "February",
  "March",
  "April",
  "May",
  "June",
  "July",
  "August",
  "September",
  "October",
  "November",
  "December",
];

/// A calendar month inside the supported range.
///
/// Internally this is the first day of the month, so every accessor is
/// infallible once a `Period` exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
  first_day: NaiveDate,
}

impl Period {
  /// Validate `year` (2020–2100) and `month` (1–12).
  pub fn new(year: i32, month: u32) -> Result<Self> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
      return Err(Error::InvalidPeriod { year, month });
    }
    NaiveDate::from_ymd_opt(year, month, 1)
      .map(|first_day| Self { first_day })
      .ok_or(Error::InvalidPeriod { year, month })
  }

  /// The period a given date falls in.
  pub fn containing(date: NaiveDate) -> Result<Self> {
    Self::new(date.year(), date.month())
  }

  pub fn year(self) -> i32 { self.first_day.year() }

  pub fn month(self) -> u32 { self.first_day.month() }

  pub fn first_day(self) -> NaiveDate { self.first_day }

  pub fn last_day(self) -> NaiveDate {
    self.first_day + Days::new(u64::from(self.days_in_month() - 1))
  }

  pub fn days_in_month(self) -> u32 {
    match self.month() {
      1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
      4 | 6 | 9 | 11 => 30,
      _ if NaiveDate::from_ymd_opt(self.year(), 2, 29).is_some() => 29,
      _ => 28,
    }
  }

  /// The date for `day` in this month, clamped to `1..=days_in_month`.
  ///
  /// The 31st of a 30-day month is the 30th, never the 1st of the next.
  pub fn clamped_day(self, day: u32) -> NaiveDate {
    let day = day.clamp(1, self.days_in_month());
    self.first_day + Days::new(u64::from(day - 1))
  }

  pub fn contains(self, date: NaiveDate) -> bool {
    date >= self.first_day && date <= self.last_day()
  }

  /// Every date of the month, ascending.
  pub fn dates(self) -> impl Iterator<Item = NaiveDate> {
    self.first_day.iter_days().take(self.days_in_month() as usize)
  }

  /// The following month, or `None` past the supported range.
  pub fn next(self) -> Option<Self> {
    match self.month() {
      12 => Self::new(self.year() + 1, 1).ok(),
      m => Self::new(self.year(), m + 1).ok(),
    }
  }

  /// The preceding month, or `None` before the supported range.
  pub fn previous(self) -> Option<Self> {
    match self.month() {
      1 => Self::new(self.year() - 1, 12).ok(),
      m => Self::new(self.year(), m - 1).ok(),
    }
  }

  /// English month name, e.g. `"November"`.
  pub fn month_name(self) -> &'static str {
    MONTH_NAMES[self.month0()]
  }

  fn month0(self) -> usize { self.first_day.month0() as usize }
}

impl fmt::Display for Period {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:04}-{:02}", self.year(), self.month())
  }
}

impl Serialize for Period {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut st = serializer.serialize_struct("Period", 2)?;
    st.serialize_field("year", &self.year())?;
    st.serialize_field("month", &self.month())?;
    st.end()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn rejects_out_of_range_periods() {
    for (y, m) in [(2019, 5), (2101, 1), (2025, 0), (2025, 13)] {
      assert!(matches!(
        Period::new(y, m),
        Err(Error::InvalidPeriod { year, month }) if year == y && month == m
      ));
    }
    assert!(Period::new(2020, 1).is_ok());
    assert!(Period::new(2100, 12).is_ok());
  }

  #[test]
  fn month_lengths() {
    assert_eq!(Period::new(2025, 1).unwrap().days_in_month(), 31);
    assert_eq!(Period::new(2025, 4).unwrap().days_in_month(), 30);
    assert_eq!(Period::new(2025, 2).unwrap().days_in_month(), 28);
    assert_eq!(Period::new(2024, 2).unwrap().days_in_month(), 29);
    // 2100 is divisible by 100 but not 400.
    assert_eq!(Period::new(2100, 2).unwrap().days_in_month(), 28);
  }

  #[test]
  fn first_and_last_day() {
    let p = Period::new(2025, 11).unwrap();
    assert_eq!(p.first_day(), date(2025, 11, 1));
    assert_eq!(p.last_day(), date(2025, 11, 30));
    assert_eq!(p.dates().count(), 30);
    assert!(p.contains(date(2025, 11, 30)));
    assert!(!p.contains(date(2025, 12, 1)));
  }

  #[test]
  fn clamped_day_never_spills_into_next_month() {
    let april = Period::new(2025, 4).unwrap();
    assert_eq!(april.clamped_day(31), date(2025, 4, 30));
    assert_eq!(april.clamped_day(15), date(2025, 4, 15));

    let feb = Period::new(2025, 2).unwrap();
    assert_eq!(feb.clamped_day(31), date(2025, 2, 28));
  }

  #[test]
  fn navigation_wraps_years_and_stops_at_the_range() {
    let dec = Period::new(2025, 12).unwrap();
    assert_eq!(dec.next(), Some(Period::new(2026, 1).unwrap()));
    assert_eq!(dec.previous(), Some(Period::new(2025, 11).unwrap()));
    assert_eq!(Period::new(2100, 12).unwrap().next(), None);
    assert_eq!(Period::new(2020, 1).unwrap().previous(), None);
  }

  #[test]
  fn display_and_names() {
    let p = Period::new(2025, 3).unwrap();
    assert_eq!(p.to_string(), "2025-03");
    assert_eq!(p.month_name(), "March");
    assert_eq!(
      serde_json::to_value(p).unwrap(),
      serde_json::json!({ "year": 2025, "month": 3 })
    );
  }
}
