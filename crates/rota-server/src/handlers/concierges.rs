//! Handlers for `/concierges` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/concierges` | Optional `?active_only=true&color=<color>` |
//! | `POST`   | `/concierges` | Body: `{"name":"Alice","color":"blue"}` |
//! | `GET`    | `/concierges/{id}` | With current-month and total shift counts |
//! | `PUT`    | `/concierges/{id}` | Body: `{"name":…,"color":…}` |
//! | `DELETE` | `/concierges/{id}` | `?retire=true` first removes their shifts |
//! | `POST`   | `/concierges/{id}/activate`, `/deactivate` | |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use rota_core::{
  concierge::{
    ColorTag, Concierge, ConciergeFilter, ConciergeSummary, ConciergeUpdate,
    NewConcierge,
  },
  store::ScheduleStore,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, auth::Admin, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  #[serde(default)]
  pub active_only: bool,
  pub color:       Option<ColorTag>,
}

/// `GET /concierges[?active_only=true][&color=<color>]`
pub async fn list<S: ScheduleStore>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Concierge>>, ApiError> {
  let filter = ConciergeFilter {
    active_only: params.active_only,
    color:       params.color,
  };
  Ok(Json(state.directory.list(filter).await?))
}

// ─── Create / update ──────────────────────────────────────────────────────────

/// `POST /concierges`
pub async fn create<S: ScheduleStore>(
  _: Admin,
  State(state): State<AppState<S>>,
  Json(body): Json<NewConcierge>,
) -> Result<impl IntoResponse, ApiError> {
  let concierge = state.directory.create(body).await?;
  Ok((StatusCode::CREATED, Json(concierge)))
}

/// `PUT /concierges/{id}`
pub async fn update<S: ScheduleStore>(
  _: Admin,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ConciergeUpdate>,
) -> Result<Json<Concierge>, ApiError> {
  Ok(Json(state.directory.update(id, body).await?))
}

/// `POST /concierges/{id}/activate`
pub async fn activate<S: ScheduleStore>(
  _: Admin,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Concierge>, ApiError> {
  Ok(Json(state.directory.activate(id).await?))
}

/// `POST /concierges/{id}/deactivate`
pub async fn deactivate<S: ScheduleStore>(
  _: Admin,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Concierge>, ApiError> {
  Ok(Json(state.directory.deactivate(id).await?))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /concierges/{id}`
pub async fn get_one<S: ScheduleStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<ConciergeSummary>, ApiError> {
  Ok(Json(state.directory.summary(id).await?))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
  #[serde(default)]
  pub retire: bool,
}

/// `DELETE /concierges/{id}[?retire=true]`
pub async fn delete<S: ScheduleStore>(
  _: Admin,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Query(params): Query<DeleteParams>,
) -> Result<StatusCode, ApiError> {
  if params.retire {
    state.directory.get(id).await?;
    let removed = state.scheduler.remove_all_for_concierge(id).await?;
    info!(%id, removed, "retiring concierge");
  }
  state.directory.delete(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
