//! Handlers for `/history` endpoints (month snapshots).
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/history` | `?offset=&limit=`; limit defaults to `history_page_size` |
//! | `POST`   | `/history` | Body: `{"year":…,"month":…,"description":…}`, all optional |
//! | `GET`    | `/history/latest` | `?n=` (default 5) |
//! | `GET`    | `/history/year/{year}` | |
//! | `GET`    | `/history/period/{year}/{month}` | 404 if none |
//! | `GET`    | `/history/{id}` | Snapshot with decoded entries |
//! | `DELETE` | `/history/{id}` | |
//! | `POST`   | `/history/{id}/restore` | Replaces the month; returns a report |
//! | `POST`   | `/history/duplicate` | Copies one month into another |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Datelike as _;
use rota_core::{
  history::{DuplicateReport, RestoreReport},
  snapshot::{MonthSnapshot, SnapshotDetail},
  store::{Page, ScheduleStore},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::Admin, error::ApiError};

const DEFAULT_LATEST: usize = 5;

// ─── Listing ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PageParams {
  #[serde(default)]
  pub offset: usize,
  pub limit:  Option<usize>,
}

/// `GET /history[?offset=<n>&limit=<n>]`
pub async fn page<S: ScheduleStore>(
  State(state): State<AppState<S>>,
  Query(params): Query<PageParams>,
) -> Result<Json<Page<MonthSnapshot>>, ApiError> {
  let limit = params.limit.unwrap_or(state.config.history_page_size);
  Ok(Json(state.engine.history_page(params.offset, limit).await?))
}

#[derive(Debug, Deserialize)]
pub struct LatestParams {
  pub n: Option<usize>,
}

/// `GET /history/latest[?n=<n>]`
pub async fn latest<S: ScheduleStore>(
  State(state): State<AppState<S>>,
  Query(params): Query<LatestParams>,
) -> Result<Json<Vec<MonthSnapshot>>, ApiError> {
  let n = params.n.unwrap_or(DEFAULT_LATEST);
  Ok(Json(state.engine.latest_history(n).await?))
}

/// `GET /history/year/{year}`
pub async fn by_year<S: ScheduleStore>(
  State(state): State<AppState<S>>,
  Path(year): Path<i32>,
) -> Result<Json<Vec<MonthSnapshot>>, ApiError> {
  Ok(Json(state.engine.history_by_year(year).await?))
}

/// `GET /history/period/{year}/{month}`
pub async fn by_period<S: ScheduleStore>(
  State(state): State<AppState<S>>,
  Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<MonthSnapshot>, ApiError> {
  state
    .engine
    .history_by_year_month(year, month)
    .await?
    .map(Json)
    .ok_or_else(|| {
      ApiError::NotFound(format!("no snapshot for {year:04}-{month:02}"))
    })
}

/// `GET /history/{id}`
pub async fn get_one<S: ScheduleStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<SnapshotDetail>, ApiError> {
  Ok(Json(state.engine.snapshot_entries(id).await?))
}

// ─── Writes ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct CreateBody {
  pub year:        Option<i32>,
  pub month:       Option<u32>,
  pub description: Option<String>,
}

/// `POST /history`. Missing year or month default to today's.
pub async fn create<S: ScheduleStore>(
  _: Admin,
  State(state): State<AppState<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let today = state.clock.today();
  let snapshot = state
    .engine
    .create_snapshot(
      body.year.unwrap_or(today.year()),
      body.month.unwrap_or(today.month()),
      body.description,
    )
    .await?;
  Ok((StatusCode::CREATED, Json(snapshot)))
}

/// `DELETE /history/{id}`
pub async fn delete<S: ScheduleStore>(
  _: Admin,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  state.engine.delete_history(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /history/{id}/restore`
pub async fn restore<S: ScheduleStore>(
  _: Admin,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<RestoreReport>, ApiError> {
  Ok(Json(state.engine.restore_from_snapshot(id).await?))
}

#[derive(Debug, Deserialize)]
pub struct DuplicateBody {
  pub source_year:  i32,
  pub source_month: u32,
  pub target_year:  i32,
  pub target_month: u32,
}

/// `POST /history/duplicate`
pub async fn duplicate<S: ScheduleStore>(
  _: Admin,
  State(state): State<AppState<S>>,
  Json(body): Json<DuplicateBody>,
) -> Result<Json<DuplicateReport>, ApiError> {
  let report = state
    .engine
    .duplicate_schedule(
      body.source_year,
      body.source_month,
      body.target_year,
      body.target_month,
    )
    .await?;
  Ok(Json(report))
}
