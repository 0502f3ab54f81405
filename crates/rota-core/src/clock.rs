//! Injectable time source.
//!
//! Services never call `Utc::now()` directly; "today" drives calendar flags,
//! the default period and date-window validation, so tests pin it.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;

  fn today(&self) -> NaiveDate { self.now().date_naive() }
}

/// Wall-clock time in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> { Utc::now() }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
  pub fn new(at: DateTime<Utc>) -> Self { Self(at) }

  /// Midnight UTC on `date`.
  pub fn on(date: NaiveDate) -> Self {
    Self(date.and_time(NaiveTime::MIN).and_utc())
  }
}

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Utc> { self.0 }
}
