//! The concierge directory: the only writer of concierge rows.

use std::sync::Arc;

use chrono::{Datelike as _, Days, Months, NaiveDate};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
  Error, Result,
  clock::Clock,
  concierge::{
    ColorTag, Concierge, ConciergeFilter, ConciergeSummary, ConciergeUpdate,
    MAX_NAME_LEN, MIN_NAME_LEN, NewConcierge,
  },
  store::{ErrInto as _, ScheduleStore},
};

pub struct ConciergeDirectory<S> {
  store: Arc<S>,
  clock: Arc<dyn Clock>,
}

impl<S> Clone for ConciergeDirectory<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), clock: self.clock.clone() }
  }
}

/// Trim `name` and check its length.
fn normalize_name(name: &str) -> Result<String> {
  let name = name.trim();
  let len = name.chars().count();
  if name.is_empty() {
    return Err(Error::InvalidInput("concierge name is required".into()));
  }
  if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
    return Err(Error::InvalidInput(format!(
      "concierge name must be between {MIN_NAME_LEN} and {MAX_NAME_LEN} \
       characters"
    )));
  }
  Ok(name.to_owned())
}

/// First and last day of the calendar month containing `day`.
///
/// Independent of the schedulable period range.
fn month_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
  let first = day - Days::new(u64::from(day.day0()));
  let last = first
    .checked_add_months(Months::new(1))
    .and_then(|next| next.pred_opt())
    .unwrap_or(NaiveDate::MAX);
  (first, last)
}

impl<S: ScheduleStore> ConciergeDirectory<S> {
  pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
    Self { store, clock }
  }

  // ── Read surface ──────────────────────────────────────────────────────

  pub async fn exists(&self, id: Uuid) -> Result<bool> {
    Ok(self.find(id).await?.is_some())
  }

  pub async fn is_active(&self, id: Uuid) -> Result<bool> {
    Ok(self.find(id).await?.is_some_and(|c| c.active))
  }

  pub async fn display_name(&self, id: Uuid) -> Result<String> {
    Ok(self.get(id).await?.name)
  }

  pub async fn color_tag(&self, id: Uuid) -> Result<ColorTag> {
    Ok(self.get(id).await?.color)
  }

  /// The concierge, or `None` if unknown or deleted.
  pub async fn find(&self, id: Uuid) -> Result<Option<Concierge>> {
    self.store.get_concierge(id).await.err_into()
  }

  pub async fn get(&self, id: Uuid) -> Result<Concierge> {
    self.find(id).await?.ok_or(Error::ConciergeNotFound(id))
  }

  /// Case-insensitive exact match on the trimmed name.
  pub async fn get_by_name(&self, name: &str) -> Result<Concierge> {
    let name = name.trim().to_owned();
    self
      .store
      .find_concierge_by_name(name.clone())
      .await
      .err_into()?
      .ok_or(Error::ConciergeNameNotFound(name))
  }

  pub async fn list(&self, filter: ConciergeFilter) -> Result<Vec<Concierge>> {
    let list = self.store.list_concierges(filter).await.err_into()?;
    debug!(count = list.len(), ?filter, "listed concierges");
    Ok(list)
  }

  pub async fn list_active(&self) -> Result<Vec<Concierge>> {
    self
      .list(ConciergeFilter { active_only: true, color: None })
      .await
  }

  pub async fn list_all(&self) -> Result<Vec<Concierge>> {
    self.list(ConciergeFilter::default()).await
  }

  pub async fn list_by_color(&self, color: ColorTag) -> Result<Vec<Concierge>> {
    self
      .list(ConciergeFilter { active_only: false, color: Some(color) })
      .await
  }

  /// The concierge plus shift counts for the current month and overall.
  pub async fn summary(&self, id: Uuid) -> Result<ConciergeSummary> {
    let concierge = self.get(id).await?;
    let current_month_shifts = self
      .store
      .count_shifts_for_concierge(id, Some(month_bounds(self.clock.today())))
      .await
      .err_into()?;
    let total_shifts = self
      .store
      .count_shifts_for_concierge(id, None)
      .await
      .err_into()?;
    Ok(ConciergeSummary { concierge, current_month_shifts, total_shifts })
  }

  // ── Management ────────────────────────────────────────────────────────

  pub async fn create(&self, input: NewConcierge) -> Result<Concierge> {
    let name = normalize_name(&input.name)?;
    self.ensure_name_free(&name).await?;

    let concierge = self
      .store
      .insert_concierge(NewConcierge { name, ..input })
      .await
      .err_into()?;
    info!(id = %concierge.id, name = %concierge.name, "created concierge");
    Ok(concierge)
  }

  pub async fn update(
    &self,
    id: Uuid,
    update: ConciergeUpdate,
  ) -> Result<Concierge> {
    let current = self.get(id).await?;
    let name = normalize_name(&update.name)?;
    if !current.name.eq_ignore_ascii_case(&name) {
      self.ensure_name_free(&name).await?;
    }

    let concierge = self
      .store
      .update_concierge(id, ConciergeUpdate { name, color: update.color })
      .await
      .err_into()?
      .ok_or(Error::ConciergeNotFound(id))?;
    info!(%id, name = %concierge.name, "updated concierge");
    Ok(concierge)
  }

  pub async fn activate(&self, id: Uuid) -> Result<Concierge> {
    self.set_active(id, true).await
  }

  pub async fn deactivate(&self, id: Uuid) -> Result<Concierge> {
    self.set_active(id, false).await
  }

  async fn set_active(&self, id: Uuid, active: bool) -> Result<Concierge> {
    let concierge = self
      .store
      .set_concierge_active(id, active)
      .await
      .err_into()?
      .ok_or(Error::ConciergeNotFound(id))?;
    info!(%id, active, "changed concierge status");
    Ok(concierge)
  }

  /// Soft-delete a concierge that has no active shift assignments.
  pub async fn delete(&self, id: Uuid) -> Result<()> {
    self.get(id).await?;
    let shifts = self
      .store
      .count_shifts_for_concierge(id, None)
      .await
      .err_into()?;
    if shifts > 0 {
      return Err(Error::ConciergeInUse(id));
    }
    if !self.store.soft_delete_concierge(id).await.err_into()? {
      return Err(Error::ConciergeNotFound(id));
    }
    info!(%id, "deleted concierge");
    Ok(())
  }

  async fn ensure_name_free(&self, name: &str) -> Result<()> {
    let taken = self
      .store
      .find_concierge_by_name(name.to_owned())
      .await
      .err_into()?;
    match taken {
      Some(_) => Err(Error::DuplicateConciergeName(name.to_owned())),
      None => Ok(()),
    }
  }
}
