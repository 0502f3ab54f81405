//! Error type for `rota-store-sqlite`.

use chrono::NaiveDate;
use rota_core::period::Period;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A column held a value no domain type accepts.
  #[error("invalid stored value: {0}")]
  Decode(String),

  // ── Uniqueness violations ───────────────────────────────────────────────
  #[error("a shift is already assigned on {0}")]
  ShiftConflict(NaiveDate),

  #[error("a concierge named {0:?} already exists")]
  DuplicateConciergeName(String),

  #[error("a snapshot for {0} already exists")]
  SnapshotAlreadyExists(Period),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for rota_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::ShiftConflict(date) => Self::ShiftConflict(date),
      Error::DuplicateConciergeName(name) => Self::DuplicateConciergeName(name),
      Error::SnapshotAlreadyExists(period) => {
        Self::SnapshotAlreadyExists(period)
      }
      other => Self::Store(Box::new(other)),
    }
  }
}

/// Whether `e` is SQLite rejecting a write for breaking a `UNIQUE`
/// constraint or index.
pub(crate) fn is_unique_violation(e: &tokio_rusqlite::Error) -> bool {
  matches!(
    e,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(err, _))
      if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}
