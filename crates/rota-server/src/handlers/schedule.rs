//! Read-only month views under `/schedule/{year}/{month}`.

use std::collections::BTreeMap;

use axum::{
  Json,
  extract::{Path, State},
};
use chrono::NaiveDate;
use rota_core::{
  calendar::{CalendarDay, MonthSchedule},
  stats::MonthStatistics,
  store::ScheduleStore,
};
use serde::Serialize;

use crate::{AppState, error::ApiError};

/// `GET /schedule/{year}/{month}`
pub async fn month<S: ScheduleStore>(
  State(state): State<AppState<S>>,
  Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<MonthSchedule>, ApiError> {
  Ok(Json(state.projector.month_schedule(year, month).await?))
}

/// `GET /schedule/{year}/{month}/calendar`: always 42 days, Monday first.
pub async fn calendar<S: ScheduleStore>(
  State(state): State<AppState<S>>,
  Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<Vec<CalendarDay>>, ApiError> {
  Ok(Json(state.projector.calendar_grid(year, month).await?))
}

/// `GET /schedule/{year}/{month}/unassigned`
pub async fn unassigned<S: ScheduleStore>(
  State(state): State<AppState<S>>,
  Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<Vec<NaiveDate>>, ApiError> {
  Ok(Json(state.projector.unassigned_dates(year, month).await?))
}

/// `GET /schedule/{year}/{month}/statistics`
pub async fn statistics<S: ScheduleStore>(
  State(state): State<AppState<S>>,
  Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<MonthStatistics>, ApiError> {
  Ok(Json(state.projector.statistics(year, month).await?))
}

/// Counts only, for lightweight month badges.
#[derive(Debug, Serialize)]
pub struct MonthCounts {
  pub by_concierge:   BTreeMap<String, usize>,
  pub assigned:       usize,
  pub unassigned:     usize,
  pub fully_assigned: bool,
}

/// `GET /schedule/{year}/{month}/counts`
pub async fn counts<S: ScheduleStore>(
  State(state): State<AppState<S>>,
  Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<MonthCounts>, ApiError> {
  let projector = &state.projector;
  Ok(Json(MonthCounts {
    by_concierge:   projector.shift_count_by_concierge(year, month).await?,
    assigned:       projector.count_assigned_days(year, month).await?,
    unassigned:     projector.count_unassigned_days(year, month).await?,
    fully_assigned: projector.is_month_fully_assigned(year, month).await?,
  }))
}
