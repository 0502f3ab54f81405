//! The snapshot engine: capture, restore and duplicate a month's schedule.
//!
//! Restore and duplicate are two-phase and not atomic. Restore first clears
//! the month, then re-applies the captured entries through the scheduler's
//! bulk path; a failure in between can leave the month partly filled. The
//! returned reports say exactly what happened.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  calendar::CalendarProjector,
  clock::Clock,
  period::Period,
  scheduler::ShiftScheduler,
  shift::{AssignmentRequest, SkippedRequest},
  snapshot::{
    MAX_DESCRIPTION_LEN, MonthSnapshot, NewSnapshot, SnapshotDetail,
    SnapshotEntry, decode_entries, encode_entries,
  },
  store::{ErrInto as _, Page, ScheduleStore, SnapshotQuery},
};

// ─── Reports ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct RestoreReport {
  pub snapshot_id: Uuid,
  pub period:      Period,
  /// Active assignments soft-deleted before re-applying.
  pub cleared:     usize,
  /// Entry count recorded when the snapshot was taken.
  pub expected:    usize,
  pub restored:    usize,
  pub skipped:     Vec<SkippedRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DuplicateReport {
  pub source:        Period,
  pub target:        Period,
  pub source_shifts: usize,
  pub duplicated:    usize,
  pub skipped:       Vec<SkippedRequest>,
}

/// Map `entries` from `source` onto `target`, keeping the day of month but
/// clamping it to the target's length. Notes record where the shift came
/// from.
pub fn duplicate_requests(
  entries: &[SnapshotEntry],
  source: Period,
  target: Period,
) -> Vec<AssignmentRequest> {
  use chrono::Datelike as _;

  entries
    .iter()
    .map(|e| AssignmentRequest {
      date:         target.clamped_day(e.date.day()),
      concierge_id: e.concierge_id,
      shift_type:   e.shift_type,
      notes:        Some(format!("Duplicated from {source}")),
    })
    .collect()
}

fn normalize_description(
  description: Option<String>,
) -> Result<Option<String>> {
  let Some(description) = description else { return Ok(None) };
  let description = description.trim();
  if description.chars().count() > MAX_DESCRIPTION_LEN {
    return Err(Error::InvalidInput(format!(
      "description must not exceed {MAX_DESCRIPTION_LEN} characters"
    )));
  }
  Ok((!description.is_empty()).then(|| description.to_owned()))
}

// ─── Engine ──────────────────────────────────────────────────────────────────

pub struct SnapshotEngine<S> {
  store:     Arc<S>,
  scheduler: ShiftScheduler<S>,
  projector: CalendarProjector<S>,
  clock:     Arc<dyn Clock>,
}

impl<S> Clone for SnapshotEngine<S> {
  fn clone(&self) -> Self {
    Self {
      store:     self.store.clone(),
      scheduler: self.scheduler.clone(),
      projector: self.projector.clone(),
      clock:     self.clock.clone(),
    }
  }
}

impl<S: ScheduleStore> SnapshotEngine<S> {
  pub fn new(
    store: Arc<S>,
    scheduler: ShiftScheduler<S>,
    projector: CalendarProjector<S>,
    clock: Arc<dyn Clock>,
  ) -> Self {
    Self { store, scheduler, projector, clock }
  }

  // ── Writes ────────────────────────────────────────────────────────────

  /// Capture the month's active assignments.
  ///
  /// A previously deleted snapshot of the same month is brought back in
  /// place: its stored payload is kept, only the description and `taken_at`
  /// change.
  pub async fn create_snapshot(
    &self,
    year: i32,
    month: u32,
    description: Option<String>,
  ) -> Result<MonthSnapshot> {
    let period = Period::new(year, month)?;
    let description = normalize_description(description)?;

    let existing = self
      .store
      .snapshot_for_period(period, true)
      .await
      .err_into()?;

    if let Some(previous) = existing {
      if !previous.deleted {
        return Err(Error::SnapshotAlreadyExists(period));
      }
      let snapshot = self
        .store
        .reactivate_snapshot(previous.id, description, self.clock.now())
        .await
        .err_into()?
        .ok_or(Error::SnapshotAlreadyExists(period))?;
      info!(id = %snapshot.id, %period, total = snapshot.total_shifts, "reactivated snapshot");
      return Ok(snapshot);
    }

    let entries: Vec<SnapshotEntry> = self
      .projector
      .period_shifts(period)
      .await?
      .iter()
      .map(SnapshotEntry::from)
      .collect();
    let input = NewSnapshot {
      period,
      payload: encode_entries(&entries)?,
      description,
      total_shifts: entries.len(),
      taken_at: self.clock.now(),
    };
    let snapshot = self.store.insert_snapshot(input).await.err_into()?;
    info!(id = %snapshot.id, %period, total = snapshot.total_shifts, "created snapshot");
    Ok(snapshot)
  }

  /// Replace the snapshot's month with the captured assignments.
  ///
  /// The payload is decoded before anything is touched, so a corrupt
  /// snapshot leaves the month as it was.
  pub async fn restore_from_snapshot(&self, id: Uuid) -> Result<RestoreReport> {
    let snapshot = self.get(id).await?;
    let entries = decode_entries(&snapshot.payload)?;
    let period = snapshot.period;

    let cleared = self.scheduler.clear_period(period).await?;
    let requests = entries.into_iter().map(AssignmentRequest::from).collect();
    let outcome = self.scheduler.bulk_assign(requests).await?;

    let report = RestoreReport {
      snapshot_id: id,
      period,
      cleared,
      expected: snapshot.total_shifts,
      restored: outcome.assigned.len(),
      skipped: outcome.skipped,
    };
    if report.skipped.is_empty() {
      info!(%id, %period, cleared, restored = report.restored, "restored snapshot");
    } else {
      warn!(
        %id,
        %period,
        restored = report.restored,
        skipped = report.skipped.len(),
        "restored snapshot partially"
      );
    }
    Ok(report)
  }

  /// Copy the source month's assignments into the target month without
  /// clearing it first. Dates already taken in the target are skipped.
  pub async fn duplicate_schedule(
    &self,
    source_year: i32,
    source_month: u32,
    target_year: i32,
    target_month: u32,
  ) -> Result<DuplicateReport> {
    let source = Period::new(source_year, source_month)?;
    let target = Period::new(target_year, target_month)?;

    let entries: Vec<SnapshotEntry> = self
      .projector
      .period_shifts(source)
      .await?
      .iter()
      .map(SnapshotEntry::from)
      .collect();
    let requests = duplicate_requests(&entries, source, target);
    let outcome = self.scheduler.bulk_assign(requests).await?;

    info!(
      %source,
      %target,
      duplicated = outcome.assigned.len(),
      skipped = outcome.skipped.len(),
      "duplicated schedule"
    );
    Ok(DuplicateReport {
      source,
      target,
      source_shifts: entries.len(),
      duplicated: outcome.assigned.len(),
      skipped: outcome.skipped,
    })
  }

  pub async fn delete_history(&self, id: Uuid) -> Result<()> {
    if !self.store.soft_delete_snapshot(id).await.err_into()? {
      return Err(Error::SnapshotNotFound(id));
    }
    info!(%id, "deleted snapshot");
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  async fn get(&self, id: Uuid) -> Result<MonthSnapshot> {
    self
      .store
      .get_snapshot(id)
      .await
      .err_into()?
      .ok_or(Error::SnapshotNotFound(id))
  }

  pub async fn history_by_id(&self, id: Uuid) -> Result<MonthSnapshot> {
    self.get(id).await
  }

  /// The snapshot with its payload decoded, for viewing.
  pub async fn snapshot_entries(&self, id: Uuid) -> Result<SnapshotDetail> {
    let snapshot = self.get(id).await?;
    let entries = decode_entries(&snapshot.payload)?;
    Ok(SnapshotDetail { snapshot, entries })
  }

  pub async fn history_by_year_month(
    &self,
    year: i32,
    month: u32,
  ) -> Result<Option<MonthSnapshot>> {
    let period = Period::new(year, month)?;
    self.store.snapshot_for_period(period, false).await.err_into()
  }

  /// Snapshots of one year, latest month first.
  pub async fn history_by_year(&self, year: i32) -> Result<Vec<MonthSnapshot>> {
    self
      .list(SnapshotQuery { year: Some(year), ..Default::default() })
      .await
  }

  pub async fn all_history(&self) -> Result<Vec<MonthSnapshot>> {
    self.list(SnapshotQuery::default()).await
  }

  pub async fn history_page(
    &self,
    offset: usize,
    limit: usize,
  ) -> Result<Page<MonthSnapshot>> {
    let items = self
      .list(SnapshotQuery { year: None, limit: Some(limit), offset })
      .await?;
    let total = self.count_snapshots().await?;
    Ok(Page { items, total, offset, limit })
  }

  /// The `n` most recent snapshots by period.
  pub async fn latest_history(&self, n: usize) -> Result<Vec<MonthSnapshot>> {
    self
      .list(SnapshotQuery { year: None, limit: Some(n), offset: 0 })
      .await
  }

  pub async fn snapshot_exists(&self, year: i32, month: u32) -> Result<bool> {
    Ok(self.history_by_year_month(year, month).await?.is_some())
  }

  pub async fn count_snapshots(&self) -> Result<usize> {
    self.store.count_snapshots().await.err_into()
  }

  async fn list(&self, query: SnapshotQuery) -> Result<Vec<MonthSnapshot>> {
    let items = self.store.list_snapshots(query).await.err_into()?;
    debug!(?query, count = items.len(), "listed snapshots");
    Ok(items)
  }
}
