//! Handlers for `/shifts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/shifts` | `?start=…&end=…` or `?concierge_id=…` |
//! | `POST`   | `/shifts` | Body: `{"date":"2025-11-15","concierge_id":…,"notes":…}` |
//! | `POST`   | `/shifts/bulk` | Body: array of assignment requests |
//! | `GET`    | `/shifts/{id}` | |
//! | `PUT`    | `/shifts/{id}` | Same body as `POST /shifts` |
//! | `DELETE` | `/shifts/{id}` | |
//! | `GET`    | `/shifts/date/{date}` | 404 if the date is free |
//! | `DELETE` | `/shifts/date/{date}` | |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use rota_core::{
  Error,
  shift::{AssignmentRequest, BulkAssignment, ShiftAssignment},
  store::ScheduleStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::Admin, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub start:        Option<NaiveDate>,
  pub end:          Option<NaiveDate>,
  pub concierge_id: Option<Uuid>,
}

/// `GET /shifts?start=<date>&end=<date>` or `GET /shifts?concierge_id=<id>`
pub async fn list<S: ScheduleStore>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<ShiftAssignment>>, ApiError> {
  let shifts = match params {
    ListParams { concierge_id: Some(id), .. } => {
      state.scheduler.by_concierge(id).await?
    }
    ListParams { start: Some(start), end: Some(end), .. } => {
      state.scheduler.in_range(start, end).await?
    }
    _ => {
      return Err(ApiError::BadRequest(
        "pass either start and end, or concierge_id".into(),
      ));
    }
  };
  Ok(Json(shifts))
}

// ─── Writes ───────────────────────────────────────────────────────────────────

/// `POST /shifts`
pub async fn assign<S: ScheduleStore>(
  _: Admin,
  State(state): State<AppState<S>>,
  Json(body): Json<AssignmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
  let shift = state.scheduler.assign(body).await?;
  Ok((StatusCode::CREATED, Json(shift)))
}

/// `POST /shifts/bulk`: never fails per item; see `skipped` in the body.
pub async fn bulk<S: ScheduleStore>(
  _: Admin,
  State(state): State<AppState<S>>,
  Json(body): Json<Vec<AssignmentRequest>>,
) -> Result<Json<BulkAssignment>, ApiError> {
  Ok(Json(state.scheduler.bulk_assign(body).await?))
}

/// `PUT /shifts/{id}`
pub async fn update<S: ScheduleStore>(
  _: Admin,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<AssignmentRequest>,
) -> Result<Json<ShiftAssignment>, ApiError> {
  Ok(Json(state.scheduler.update(id, body).await?))
}

/// `DELETE /shifts/{id}`
pub async fn remove<S: ScheduleStore>(
  _: Admin,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  state.scheduler.remove(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /shifts/date/{date}`
pub async fn remove_by_date<S: ScheduleStore>(
  _: Admin,
  State(state): State<AppState<S>>,
  Path(date): Path<NaiveDate>,
) -> Result<StatusCode, ApiError> {
  state.scheduler.remove_by_date(date).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Reads ────────────────────────────────────────────────────────────────────

/// `GET /shifts/{id}`
pub async fn get_one<S: ScheduleStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<ShiftAssignment>, ApiError> {
  Ok(Json(state.scheduler.get(id).await?))
}

/// `GET /shifts/date/{date}`
pub async fn by_date<S: ScheduleStore>(
  State(state): State<AppState<S>>,
  Path(date): Path<NaiveDate>,
) -> Result<Json<ShiftAssignment>, ApiError> {
  let shift = state
    .scheduler
    .by_date(date)
    .await?
    .ok_or(Error::NoAssignmentOnDate(date))?;
  Ok(Json(shift))
}
