//! The `ScheduleStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `rota-store-sqlite`).
//! The services in this crate depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
  concierge::{Concierge, ConciergeFilter, ConciergeUpdate, NewConcierge},
  period::Period,
  shift::{AssignmentRequest, ShiftAssignment},
  snapshot::{MonthSnapshot, NewSnapshot},
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Parameters for [`ScheduleStore::list_snapshots`]. Results are always
/// ordered by year then month, most recent first.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotQuery {
  pub year:   Option<i32>,
  pub limit:  Option<usize>,
  pub offset: usize,
}

/// One page of a listing plus the size of the whole listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
  pub items:  Vec<T>,
  pub total:  usize,
  pub offset: usize,
  pub limit:  usize,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Rota storage backend.
///
/// Rows are never physically deleted; every "delete" sets a tombstone flag
/// and every read except [`ScheduleStore::snapshot_for_period`] with
/// `include_deleted` skips tombstoned rows.
///
/// Backends must enforce three uniqueness rules atomically and report their
/// violation through `Self::Error` such that it converts into the matching
/// [`crate::Error`] variant:
///
/// - one non-deleted shift per date → [`crate::Error::ShiftConflict`]
/// - one non-deleted concierge per case-folded name →
///   [`crate::Error::DuplicateConciergeName`]
/// - one snapshot row per period → [`crate::Error::SnapshotAlreadyExists`]
pub trait ScheduleStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + Into<crate::Error> + 'static;

  // ── Concierges ────────────────────────────────────────────────────────

  fn insert_concierge(
    &self,
    input: NewConcierge,
  ) -> impl Future<Output = Result<Concierge, Self::Error>> + Send + '_;

  /// Returns `None` if the concierge does not exist or is deleted.
  fn update_concierge(
    &self,
    id: Uuid,
    update: ConciergeUpdate,
  ) -> impl Future<Output = Result<Option<Concierge>, Self::Error>> + Send + '_;

  fn set_concierge_active(
    &self,
    id: Uuid,
    active: bool,
  ) -> impl Future<Output = Result<Option<Concierge>, Self::Error>> + Send + '_;

  /// Returns `false` if there was no non-deleted row to tombstone.
  fn soft_delete_concierge(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn get_concierge(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Concierge>, Self::Error>> + Send + '_;

  /// Case-insensitive exact match.
  fn find_concierge_by_name(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Option<Concierge>, Self::Error>> + Send + '_;

  /// Ordered by name.
  fn list_concierges(
    &self,
    filter: ConciergeFilter,
  ) -> impl Future<Output = Result<Vec<Concierge>, Self::Error>> + Send + '_;

  // ── Shifts ────────────────────────────────────────────────────────────

  /// Persist a new assignment. The store assigns the id and timestamps.
  fn insert_shift(
    &self,
    request: AssignmentRequest,
  ) -> impl Future<Output = Result<ShiftAssignment, Self::Error>> + Send + '_;

  /// Overwrite date, concierge, type and notes of a non-deleted assignment.
  fn update_shift(
    &self,
    id: Uuid,
    request: AssignmentRequest,
  ) -> impl Future<Output = Result<Option<ShiftAssignment>, Self::Error>>
  + Send
  + '_;

  fn soft_delete_shift(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn get_shift(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ShiftAssignment>, Self::Error>>
  + Send
  + '_;

  fn shift_on(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Option<ShiftAssignment>, Self::Error>>
  + Send
  + '_;

  /// Inclusive on both ends, ordered by date ascending.
  fn shifts_in_range(
    &self,
    start: NaiveDate,
    end: NaiveDate,
  ) -> impl Future<Output = Result<Vec<ShiftAssignment>, Self::Error>> + Send + '_;

  /// Ordered by date ascending.
  fn shifts_for_concierge(
    &self,
    concierge_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ShiftAssignment>, Self::Error>> + Send + '_;

  /// Count a concierge's active shifts, optionally within an inclusive range.
  fn count_shifts_for_concierge(
    &self,
    concierge_id: Uuid,
    range: Option<(NaiveDate, NaiveDate)>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Snapshots ─────────────────────────────────────────────────────────

  fn insert_snapshot(
    &self,
    input: NewSnapshot,
  ) -> impl Future<Output = Result<MonthSnapshot, Self::Error>> + Send + '_;

  /// Clear the tombstone on row `id`, replacing its description and
  /// `taken_at`. The stored payload and count are kept.
  ///
  /// Only a tombstoned row is touched: `None` if the row is missing or was
  /// already live, so two racing reactivations admit exactly one.
  fn reactivate_snapshot(
    &self,
    id: Uuid,
    description: Option<String>,
    taken_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<Option<MonthSnapshot>, Self::Error>> + Send + '_;

  fn soft_delete_snapshot(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn get_snapshot(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<MonthSnapshot>, Self::Error>> + Send + '_;

  /// The row for `period`. With `include_deleted`, a tombstoned row is
  /// returned too (with [`MonthSnapshot::deleted`] set).
  fn snapshot_for_period(
    &self,
    period: Period,
    include_deleted: bool,
  ) -> impl Future<Output = Result<Option<MonthSnapshot>, Self::Error>> + Send + '_;

  fn list_snapshots(
    &self,
    query: SnapshotQuery,
  ) -> impl Future<Output = Result<Vec<MonthSnapshot>, Self::Error>> + Send + '_;

  fn count_snapshots(
    &self,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}

// ─── Error bridging ──────────────────────────────────────────────────────────

/// Converts a backend result into a core [`crate::Result`].
pub(crate) trait ErrInto<T> {
  fn err_into(self) -> crate::Result<T>;
}

impl<T, E: Into<crate::Error>> ErrInto<T> for Result<T, E> {
  fn err_into(self) -> crate::Result<T> { self.map_err(Into::into) }
}
