//! The shift scheduler: the only writer of shift assignment rows.
//!
//! Every write is checked in the same order: input validation, the date
//! conflict pre-check, then the concierge lookup. The pre-check only fails
//! fast; the store's uniqueness constraint is what actually keeps one active
//! assignment per date, and its violation surfaces as the same
//! [`Error::ShiftConflict`].

use std::sync::Arc;

use chrono::{Months, NaiveDate};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  clock::Clock,
  period::Period,
  shift::{
    AssignmentRequest, BulkAssignment, MAX_NOTES_LEN, ShiftAssignment,
    SkippedRequest,
  },
  store::{ErrInto as _, ScheduleStore},
};

/// How far from today, in either direction, a shift may be scheduled.
pub const DATE_WINDOW_YEARS: u32 = 10;

pub struct ShiftScheduler<S> {
  store: Arc<S>,
  clock: Arc<dyn Clock>,
}

impl<S> Clone for ShiftScheduler<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), clock: self.clock.clone() }
  }
}

/// Trim notes, drop them when blank, and enforce the length limit.
fn normalize_notes(notes: Option<String>) -> Result<Option<String>> {
  let Some(notes) = notes else { return Ok(None) };
  let notes = notes.trim();
  if notes.chars().count() > MAX_NOTES_LEN {
    return Err(Error::InvalidInput(format!(
      "notes must not exceed {MAX_NOTES_LEN} characters"
    )));
  }
  Ok((!notes.is_empty()).then(|| notes.to_owned()))
}

/// Reject dates more than [`DATE_WINDOW_YEARS`] before or after `today`.
fn check_date_window(date: NaiveDate, today: NaiveDate) -> Result<()> {
  let window = Months::new(DATE_WINDOW_YEARS * 12);
  let earliest = today.checked_sub_months(window).unwrap_or(NaiveDate::MIN);
  let latest = today.checked_add_months(window).unwrap_or(NaiveDate::MAX);
  if date < earliest || date > latest {
    return Err(Error::InvalidInput(format!(
      "date {date} is more than {DATE_WINDOW_YEARS} years from today"
    )));
  }
  Ok(())
}

impl<S: ScheduleStore> ShiftScheduler<S> {
  pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
    Self { store, clock }
  }

  fn validate(&self, request: AssignmentRequest) -> Result<AssignmentRequest> {
    check_date_window(request.date, self.clock.today())?;
    let notes = normalize_notes(request.notes)?;
    Ok(AssignmentRequest { notes, ..request })
  }

  async fn ensure_concierge(&self, id: Uuid) -> Result<()> {
    match self.store.get_concierge(id).await.err_into()? {
      Some(_) => Ok(()),
      None => Err(Error::ConciergeNotFound(id)),
    }
  }

  // ── Writes ────────────────────────────────────────────────────────────

  /// Assign a concierge to a date that has no active assignment.
  pub async fn assign(
    &self,
    request: AssignmentRequest,
  ) -> Result<ShiftAssignment> {
    let request = self.validate(request)?;
    if self.is_assigned(request.date).await? {
      return Err(Error::ShiftConflict(request.date));
    }
    self.ensure_concierge(request.concierge_id).await?;

    let shift = self.store.insert_shift(request).await.err_into()?;
    info!(
      id = %shift.id,
      date = %shift.date,
      concierge = %shift.concierge_name,
      "assigned shift"
    );
    Ok(shift)
  }

  /// Replace date, concierge, type and notes of an active assignment.
  pub async fn update(
    &self,
    id: Uuid,
    request: AssignmentRequest,
  ) -> Result<ShiftAssignment> {
    let current = self.get(id).await?;
    let request = self.validate(request)?;

    if request.date != current.date && self.is_assigned(request.date).await? {
      return Err(Error::ShiftConflict(request.date));
    }
    if request.concierge_id != current.concierge_id {
      self.ensure_concierge(request.concierge_id).await?;
    }

    let shift = self
      .store
      .update_shift(id, request)
      .await
      .err_into()?
      .ok_or(Error::AssignmentNotFound(id))?;
    info!(%id, date = %shift.date, concierge = %shift.concierge_name, "updated shift");
    Ok(shift)
  }

  pub async fn remove(&self, id: Uuid) -> Result<()> {
    if !self.store.soft_delete_shift(id).await.err_into()? {
      return Err(Error::AssignmentNotFound(id));
    }
    info!(%id, "removed shift");
    Ok(())
  }

  pub async fn remove_by_date(&self, date: NaiveDate) -> Result<()> {
    let shift = self
      .by_date(date)
      .await?
      .ok_or(Error::NoAssignmentOnDate(date))?;
    if !self.store.soft_delete_shift(shift.id).await.err_into()? {
      return Err(Error::NoAssignmentOnDate(date));
    }
    info!(id = %shift.id, %date, "removed shift");
    Ok(())
  }

  /// Attempt each request through [`Self::assign`], in order. A failing
  /// item is recorded in `skipped` and never stops the batch.
  pub async fn bulk_assign(
    &self,
    requests: Vec<AssignmentRequest>,
  ) -> Result<BulkAssignment> {
    let mut outcome = BulkAssignment::default();
    for (index, request) in requests.into_iter().enumerate() {
      let date = request.date;
      match self.assign(request).await {
        Ok(shift) => outcome.assigned.push(shift),
        Err(e) => {
          warn!(index, %date, error = %e, "skipped bulk assignment");
          outcome.skipped.push(SkippedRequest {
            index,
            date,
            kind: e.kind(),
            reason: e.to_string(),
          });
        }
      }
    }
    info!(
      assigned = outcome.assigned.len(),
      skipped = outcome.skipped.len(),
      "bulk assignment finished"
    );
    Ok(outcome)
  }

  /// Soft-delete every active assignment of a concierge.
  pub async fn remove_all_for_concierge(&self, concierge_id: Uuid) -> Result<usize> {
    let shifts = self.by_concierge(concierge_id).await?;
    let removed = self.remove_each(&shifts).await?;
    info!(%concierge_id, removed, "removed all shifts for concierge");
    Ok(removed)
  }

  /// Soft-delete every active assignment within `period`.
  pub async fn clear_period(&self, period: Period) -> Result<usize> {
    let shifts = self.in_range(period.first_day(), period.last_day()).await?;
    let removed = self.remove_each(&shifts).await?;
    info!(%period, removed, "cleared month");
    Ok(removed)
  }

  async fn remove_each(&self, shifts: &[ShiftAssignment]) -> Result<usize> {
    let mut removed = 0;
    for shift in shifts {
      if self.store.soft_delete_shift(shift.id).await.err_into()? {
        removed += 1;
      }
    }
    Ok(removed)
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  pub async fn get(&self, id: Uuid) -> Result<ShiftAssignment> {
    self
      .store
      .get_shift(id)
      .await
      .err_into()?
      .ok_or(Error::AssignmentNotFound(id))
  }

  pub async fn by_date(&self, date: NaiveDate) -> Result<Option<ShiftAssignment>> {
    self.store.shift_on(date).await.err_into()
  }

  pub async fn by_concierge(
    &self,
    concierge_id: Uuid,
  ) -> Result<Vec<ShiftAssignment>> {
    let shifts = self
      .store
      .shifts_for_concierge(concierge_id)
      .await
      .err_into()?;
    debug!(%concierge_id, count = shifts.len(), "loaded shifts for concierge");
    Ok(shifts)
  }

  /// Active assignments from `start` to `end` inclusive, date ascending.
  pub async fn in_range(
    &self,
    start: NaiveDate,
    end: NaiveDate,
  ) -> Result<Vec<ShiftAssignment>> {
    if start > end {
      return Err(Error::InvalidInput(format!(
        "start date {start} is after end date {end}"
      )));
    }
    let shifts = self.store.shifts_in_range(start, end).await.err_into()?;
    debug!(%start, %end, count = shifts.len(), "loaded shifts in range");
    Ok(shifts)
  }

  pub async fn is_assigned(&self, date: NaiveDate) -> Result<bool> {
    Ok(self.by_date(date).await?.is_some())
  }
}
