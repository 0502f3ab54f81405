//! Integration tests for `SqliteStore` and the core services running on top
//! of it, against an in-memory database.

mod calendar;
mod history;
mod store;

use std::sync::Arc;

use chrono::NaiveDate;
use rota_core::{
  calendar::CalendarProjector,
  clock::{Clock, FixedClock},
  concierge::{ColorTag, Concierge, NewConcierge},
  directory::ConciergeDirectory,
  history::SnapshotEngine,
  scheduler::ShiftScheduler,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Every service wired to one in-memory store, with "today" pinned to
/// 2025-11-20.
struct Fixture {
  store:     Arc<SqliteStore>,
  directory: ConciergeDirectory<SqliteStore>,
  scheduler: ShiftScheduler<SqliteStore>,
  projector: CalendarProjector<SqliteStore>,
  engine:    SnapshotEngine<SqliteStore>,
}

impl Fixture {
  async fn new() -> Self { Self::on(date(2025, 11, 20)).await }

  /// Same wiring with "today" pinned to `today`.
  async fn on(today: NaiveDate) -> Self {
    let store = Arc::new(store().await);
    let clock: Arc<dyn Clock> = Arc::new(FixedClock::on(today));

    let directory = ConciergeDirectory::new(store.clone(), clock.clone());
    let scheduler = ShiftScheduler::new(store.clone(), clock.clone());
    let projector = CalendarProjector::new(
      scheduler.clone(),
      directory.clone(),
      clock.clone(),
    );
    let engine = SnapshotEngine::new(
      store.clone(),
      scheduler.clone(),
      projector.clone(),
      clock,
    );
    Self { store, directory, scheduler, projector, engine }
  }

  async fn concierge(&self, name: &str, color: ColorTag) -> Concierge {
    self
      .directory
      .create(NewConcierge::new(name, color))
      .await
      .unwrap()
  }
}
