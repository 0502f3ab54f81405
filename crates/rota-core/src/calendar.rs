//! The calendar projector: turns raw assignments into month views.

use std::{
  collections::{BTreeMap, BTreeSet},
  sync::Arc,
};

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::Serialize;
use tracing::debug;

use crate::{
  Result,
  clock::Clock,
  concierge::Concierge,
  directory::ConciergeDirectory,
  period::Period,
  scheduler::ShiftScheduler,
  shift::ShiftAssignment,
  stats::MonthStatistics,
  store::ScheduleStore,
};

/// Six full weeks, Monday first.
pub const GRID_DAYS: usize = 42;

// ─── Views ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct MonthSchedule {
  pub period:            Period,
  pub month_name:        &'static str,
  pub first_day:         NaiveDate,
  pub last_day:          NaiveDate,
  pub total_days:        u32,
  pub daily_assignments: BTreeMap<NaiveDate, ShiftAssignment>,
  /// Active concierges, for pickers.
  pub concierges:        Vec<Concierge>,
  pub assigned_days:     usize,
  pub unassigned_days:   usize,
  /// ISO weekday of the first day, 1 = Monday … 7 = Sunday.
  pub starting_weekday:  u32,
}

/// One cell of the month grid.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarDay {
  pub date:          NaiveDate,
  pub day:           u32,
  /// ISO weekday, 1 = Monday … 7 = Sunday.
  pub weekday:       u32,
  pub weekday_label: &'static str,
  pub is_today:      bool,
  pub is_weekend:    bool,
  /// `false` for the leading and trailing days of adjacent months.
  pub in_month:      bool,
  pub assignment:    Option<ShiftAssignment>,
}

pub fn weekday_label(weekday: Weekday) -> &'static str {
  match weekday {
    Weekday::Mon => "MON",
    Weekday::Tue => "TUE",
    Weekday::Wed => "WED",
    Weekday::Thu => "THU",
    Weekday::Fri => "FRI",
    Weekday::Sat => "SAT",
    Weekday::Sun => "SUN",
  }
}

/// The 42 dates shown for `period`, starting on the Monday on or before the
/// first of the month.
pub fn grid_dates(period: Period) -> Vec<NaiveDate> {
  let first = period.first_day();
  let lead = u64::from(first.weekday().num_days_from_monday());
  (first - Days::new(lead)).iter_days().take(GRID_DAYS).collect()
}

// ─── Projector ───────────────────────────────────────────────────────────────

pub struct CalendarProjector<S> {
  scheduler: ShiftScheduler<S>,
  directory: ConciergeDirectory<S>,
  clock:     Arc<dyn Clock>,
}

impl<S> Clone for CalendarProjector<S> {
  fn clone(&self) -> Self {
    Self {
      scheduler: self.scheduler.clone(),
      directory: self.directory.clone(),
      clock:     self.clock.clone(),
    }
  }
}

impl<S: ScheduleStore> CalendarProjector<S> {
  pub fn new(
    scheduler: ShiftScheduler<S>,
    directory: ConciergeDirectory<S>,
    clock: Arc<dyn Clock>,
  ) -> Self {
    Self { scheduler, directory, clock }
  }

  /// Active assignments within the month, date ascending.
  pub async fn month_shifts(
    &self,
    year: i32,
    month: u32,
  ) -> Result<Vec<ShiftAssignment>> {
    let period = Period::new(year, month)?;
    self.period_shifts(period).await
  }

  pub async fn period_shifts(
    &self,
    period: Period,
  ) -> Result<Vec<ShiftAssignment>> {
    self
      .scheduler
      .in_range(period.first_day(), period.last_day())
      .await
  }

  pub async fn month_schedule(
    &self,
    year: i32,
    month: u32,
  ) -> Result<MonthSchedule> {
    let period = Period::new(year, month)?;
    let daily_assignments: BTreeMap<_, _> = self
      .period_shifts(period)
      .await?
      .into_iter()
      .map(|s| (s.date, s))
      .collect();
    let concierges = self.directory.list_active().await?;

    let total_days = period.days_in_month();
    let assigned_days = daily_assignments.len();
    debug!(%period, assigned_days, "built month schedule");
    Ok(MonthSchedule {
      period,
      month_name: period.month_name(),
      first_day: period.first_day(),
      last_day: period.last_day(),
      total_days,
      daily_assignments,
      concierges,
      assigned_days,
      unassigned_days: (total_days as usize).saturating_sub(assigned_days),
      starting_weekday: period.first_day().weekday().number_from_monday(),
    })
  }

  /// The 42-day grid. Leading and trailing days carry their own
  /// assignments.
  pub async fn calendar_grid(
    &self,
    year: i32,
    month: u32,
  ) -> Result<Vec<CalendarDay>> {
    let period = Period::new(year, month)?;
    let dates = grid_dates(period);
    let (start, end) = (dates[0], dates[GRID_DAYS - 1]);

    let mut shifts: BTreeMap<_, _> = self
      .scheduler
      .in_range(start, end)
      .await?
      .into_iter()
      .map(|s| (s.date, s))
      .collect();
    let today = self.clock.today();

    Ok(
      dates
        .into_iter()
        .map(|date| {
          let weekday = date.weekday();
          CalendarDay {
            date,
            day: date.day(),
            weekday: weekday.number_from_monday(),
            weekday_label: weekday_label(weekday),
            is_today: date == today,
            is_weekend: matches!(weekday, Weekday::Sat | Weekday::Sun),
            in_month: period.contains(date),
            assignment: shifts.remove(&date),
          }
        })
        .collect(),
    )
  }

  /// Dates of the month with no active assignment, ascending.
  pub async fn unassigned_dates(
    &self,
    year: i32,
    month: u32,
  ) -> Result<Vec<NaiveDate>> {
    let period = Period::new(year, month)?;
    let assigned: BTreeSet<_> = self
      .period_shifts(period)
      .await?
      .into_iter()
      .map(|s| s.date)
      .collect();
    Ok(period.dates().filter(|d| !assigned.contains(d)).collect())
  }

  /// Shift counts for the month keyed by concierge name.
  pub async fn shift_count_by_concierge(
    &self,
    year: i32,
    month: u32,
  ) -> Result<BTreeMap<String, usize>> {
    let mut counts = BTreeMap::new();
    for shift in self.month_shifts(year, month).await? {
      *counts.entry(shift.concierge_name).or_insert(0) += 1;
    }
    Ok(counts)
  }

  pub async fn count_assigned_days(&self, year: i32, month: u32) -> Result<usize> {
    Ok(self.month_shifts(year, month).await?.len())
  }

  pub async fn count_unassigned_days(
    &self,
    year: i32,
    month: u32,
  ) -> Result<usize> {
    Ok(self.unassigned_dates(year, month).await?.len())
  }

  pub async fn is_month_fully_assigned(
    &self,
    year: i32,
    month: u32,
  ) -> Result<bool> {
    Ok(self.unassigned_dates(year, month).await?.is_empty())
  }

  pub async fn statistics(&self, year: i32, month: u32) -> Result<MonthStatistics> {
    let period = Period::new(year, month)?;
    let counts = self.shift_count_by_concierge(year, month).await?;
    let active = self.directory.list_active().await?.len();
    Ok(MonthStatistics::compute(period, counts, active))
  }
}
