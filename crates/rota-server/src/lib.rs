//! JSON HTTP API for Rota.
//!
//! Exposes an axum [`Router`] over the core services, backed by any
//! [`ScheduleStore`]. Reads are public; every mutating route requires the
//! admin's Basic credentials (see [`auth::Admin`]).

pub mod auth;
pub mod error;
pub mod handlers;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use rota_core::{
  calendar::CalendarProjector, clock::Clock, directory::ConciergeDirectory,
  history::SnapshotEngine, scheduler::ShiftScheduler, store::ScheduleStore,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::AuthConfig;
use handlers::{concierges, history, schedule, shifts};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `rota.toml` and `ROTA_*`
/// environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  pub store_path:          PathBuf,
  pub admin_username:      String,
  pub admin_password_hash: String,
  /// Default page size for `GET /history`.
  #[serde(default = "default_history_page_size")]
  pub history_page_size:   usize,
}

fn default_history_page_size() -> usize { 12 }

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub directory: ConciergeDirectory<S>,
  pub scheduler: ShiftScheduler<S>,
  pub projector: CalendarProjector<S>,
  pub engine:    SnapshotEngine<S>,
  pub clock:     Arc<dyn Clock>,
  pub config:    Arc<ServerConfig>,
  pub auth:      Arc<AuthConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      directory: self.directory.clone(),
      scheduler: self.scheduler.clone(),
      projector: self.projector.clone(),
      engine:    self.engine.clone(),
      clock:     self.clock.clone(),
      config:    self.config.clone(),
      auth:      self.auth.clone(),
    }
  }
}

impl<S: ScheduleStore> AppState<S> {
  /// Wire every service to `store` and `clock`.
  pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, config: ServerConfig) -> Self {
    let directory = ConciergeDirectory::new(store.clone(), clock.clone());
    let scheduler = ShiftScheduler::new(store.clone(), clock.clone());
    let projector =
      CalendarProjector::new(scheduler.clone(), directory.clone(), clock.clone());
    let engine = SnapshotEngine::new(
      store,
      scheduler.clone(),
      projector.clone(),
      clock.clone(),
    );
    let auth = AuthConfig {
      username:      config.admin_username.clone(),
      password_hash: config.admin_password_hash.clone(),
    };

    Self {
      directory,
      scheduler,
      projector,
      engine,
      clock,
      config: Arc::new(config),
      auth: Arc::new(auth),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ScheduleStore + 'static,
{
  Router::new()
    // Concierges
    .route(
      "/concierges",
      get(concierges::list::<S>).post(concierges::create::<S>),
    )
    .route(
      "/concierges/{id}",
      get(concierges::get_one::<S>)
        .put(concierges::update::<S>)
        .delete(concierges::delete::<S>),
    )
    .route("/concierges/{id}/activate", post(concierges::activate::<S>))
    .route("/concierges/{id}/deactivate", post(concierges::deactivate::<S>))
    // Shifts
    .route("/shifts", get(shifts::list::<S>).post(shifts::assign::<S>))
    .route("/shifts/bulk", post(shifts::bulk::<S>))
    .route(
      "/shifts/date/{date}",
      get(shifts::by_date::<S>).delete(shifts::remove_by_date::<S>),
    )
    .route(
      "/shifts/{id}",
      get(shifts::get_one::<S>)
        .put(shifts::update::<S>)
        .delete(shifts::remove::<S>),
    )
    // Month views
    .route("/schedule/{year}/{month}", get(schedule::month::<S>))
    .route("/schedule/{year}/{month}/calendar", get(schedule::calendar::<S>))
    .route(
      "/schedule/{year}/{month}/unassigned",
      get(schedule::unassigned::<S>),
    )
    .route(
      "/schedule/{year}/{month}/statistics",
      get(schedule::statistics::<S>),
    )
    .route("/schedule/{year}/{month}/counts", get(schedule::counts::<S>))
    // History
    .route("/history", get(history::page::<S>).post(history::create::<S>))
    .route("/history/latest", get(history::latest::<S>))
    .route("/history/duplicate", post(history::duplicate::<S>))
    .route("/history/year/{year}", get(history::by_year::<S>))
    .route("/history/period/{year}/{month}", get(history::by_period::<S>))
    .route(
      "/history/{id}",
      get(history::get_one::<S>).delete(history::delete::<S>),
    )
    .route("/history/{id}/restore", post(history::restore::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
