//! Error types for `rota-core`.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::period::Period;

#[derive(Debug, Error)]
pub enum Error {
  // ── Not found ───────────────────────────────────────────────────────────
  #[error("concierge not found: {0}")]
  ConciergeNotFound(Uuid),

  #[error("concierge not found: {0:?}")]
  ConciergeNameNotFound(String),

  #[error("shift assignment not found: {0}")]
  AssignmentNotFound(Uuid),

  #[error("no shift is assigned on {0}")]
  NoAssignmentOnDate(NaiveDate),

  #[error("snapshot not found: {0}")]
  SnapshotNotFound(Uuid),

  // ── Conflicts ───────────────────────────────────────────────────────────
  #[error("a shift is already assigned on {0}")]
  ShiftConflict(NaiveDate),

  #[error("a snapshot for {0} already exists")]
  SnapshotAlreadyExists(Period),

  #[error("a concierge named {0:?} already exists")]
  DuplicateConciergeName(String),

  // ── Validation ──────────────────────────────────────────────────────────
  #[error(
    "invalid period {year}-{month}: year must be between 2020 and 2100, month between 1 and 12"
  )]
  InvalidPeriod { year: i32, month: u32 },

  #[error("invalid input: {0}")]
  InvalidInput(String),

  #[error("concierge {0} still has active shift assignments")]
  ConciergeInUse(Uuid),

  #[error("snapshot payload is corrupt: {0}")]
  SnapshotCorrupt(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Coarse classification of [`Error`], stable enough for callers to branch
/// on (and for the HTTP layer to pick a status code from).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
  NotFound,
  Conflict,
  InvalidInput,
  InUse,
  SnapshotCorrupt,
  Storage,
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::ConciergeNotFound(_)
      | Self::ConciergeNameNotFound(_)
      | Self::AssignmentNotFound(_)
      | Self::NoAssignmentOnDate(_)
      | Self::SnapshotNotFound(_) => ErrorKind::NotFound,
      Self::ShiftConflict(_)
      | Self::SnapshotAlreadyExists(_)
      | Self::DuplicateConciergeName(_) => ErrorKind::Conflict,
      Self::InvalidPeriod { .. } | Self::InvalidInput(_) => {
        ErrorKind::InvalidInput
      }
      Self::ConciergeInUse(_) => ErrorKind::InUse,
      Self::SnapshotCorrupt(_) => ErrorKind::SnapshotCorrupt,
      Self::Serialization(_) | Self::Store(_) => ErrorKind::Storage,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
