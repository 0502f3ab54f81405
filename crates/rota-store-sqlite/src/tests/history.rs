use rota_core::{
  Error, ErrorKind,
  concierge::ColorTag,
  period::Period,
  shift::AssignmentRequest,
  snapshot::NewSnapshot,
  store::ScheduleStore,
};
use uuid::Uuid;

use super::{Fixture, date};

#[tokio::test]
async fn restore_round_trip_after_clearing() {
  let f = Fixture::new().await;
  let alice = f.concierge("Alice", ColorTag::Blue).await;
  let bob = f.concierge("Bob", ColorTag::Red).await;
  f.scheduler
    .assign(AssignmentRequest::new(date(2025, 11, 1), alice.id).with_notes("early"))
    .await
    .unwrap();
  f.scheduler
    .assign(AssignmentRequest::new(date(2025, 11, 2), bob.id))
    .await
    .unwrap();

  let snapshot = f
    .engine
    .create_snapshot(2025, 11, Some("before rework".into()))
    .await
    .unwrap();
  assert_eq!(snapshot.total_shifts, 2);
  assert_eq!(snapshot.description.as_deref(), Some("before rework"));

  // Rework the month: clear it and put someone else on the 3rd.
  f.scheduler.clear_period(Period::new(2025, 11).unwrap()).await.unwrap();
  f.scheduler
    .assign(AssignmentRequest::new(date(2025, 11, 3), bob.id))
    .await
    .unwrap();

  let report = f.engine.restore_from_snapshot(snapshot.id).await.unwrap();
  assert_eq!(report.cleared, 1);
  assert_eq!(report.expected, 2);
  assert_eq!(report.restored, 2);
  assert!(report.skipped.is_empty());

  let restored: Vec<_> = f
    .projector
    .month_shifts(2025, 11)
    .await
    .unwrap()
    .into_iter()
    .map(|s| (s.date, s.concierge_id, s.notes))
    .collect();
  assert_eq!(restored, [
    (date(2025, 11, 1), alice.id, Some("early".to_owned())),
    (date(2025, 11, 2), bob.id, None),
  ]);
}

#[tokio::test]
async fn restore_reports_entries_that_no_longer_apply() {
  let f = Fixture::new().await;
  let alice = f.concierge("Alice", ColorTag::Blue).await;
  let bob = f.concierge("Bob", ColorTag::Red).await;
  f.scheduler
    .assign(AssignmentRequest::new(date(2025, 11, 1), alice.id))
    .await
    .unwrap();
  f.scheduler
    .assign(AssignmentRequest::new(date(2025, 11, 2), bob.id))
    .await
    .unwrap();
  let snapshot = f.engine.create_snapshot(2025, 11, None).await.unwrap();

  f.scheduler.remove_all_for_concierge(bob.id).await.unwrap();
  f.directory.delete(bob.id).await.unwrap();

  let report = f.engine.restore_from_snapshot(snapshot.id).await.unwrap();
  assert_eq!(report.restored, 1);
  assert_eq!(report.skipped.len(), 1);
  assert_eq!(report.skipped[0].date, date(2025, 11, 2));
  assert_eq!(report.skipped[0].kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn corrupt_snapshot_is_rejected_before_clearing() {
  let f = Fixture::new().await;
  let alice = f.concierge("Alice", ColorTag::Blue).await;
  f.scheduler
    .assign(AssignmentRequest::new(date(2025, 11, 9), alice.id))
    .await
    .unwrap();

  let period = Period::new(2025, 11).unwrap();
  let broken = f
    .store
    .insert_snapshot(NewSnapshot {
      period,
      payload: "{not json".into(),
      description: None,
      total_shifts: 1,
      taken_at: chrono::Utc::now(),
    })
    .await
    .unwrap();

  let err = f.engine.restore_from_snapshot(broken.id).await.unwrap_err();
  assert!(matches!(err, Error::SnapshotCorrupt(_)));
  assert_eq!(err.kind(), ErrorKind::SnapshotCorrupt);
  assert_eq!(f.projector.count_assigned_days(2025, 11).await.unwrap(), 1);

  assert!(matches!(
    f.engine.snapshot_entries(broken.id).await,
    Err(Error::SnapshotCorrupt(_))
  ));
}

#[tokio::test]
async fn create_delete_create_reuses_the_row() {
  let f = Fixture::new().await;
  let alice = f.concierge("Alice", ColorTag::Blue).await;
  f.scheduler
    .assign(AssignmentRequest::new(date(2025, 11, 4), alice.id))
    .await
    .unwrap();

  let first = f.engine.create_snapshot(2025, 11, Some("v1".into())).await.unwrap();
  assert_eq!(first.total_shifts, 1);
  assert!(matches!(
    f.engine.create_snapshot(2025, 11, None).await,
    Err(Error::SnapshotAlreadyExists(_))
  ));

  f.engine.delete_history(first.id).await.unwrap();
  assert!(!f.engine.snapshot_exists(2025, 11).await.unwrap());
  assert!(matches!(
    f.engine.delete_history(first.id).await,
    Err(Error::SnapshotNotFound(_))
  ));

  // The live month moves on; the revived snapshot must not follow it.
  f.scheduler
    .assign(AssignmentRequest::new(date(2025, 11, 5), alice.id))
    .await
    .unwrap();
  let second = f.engine.create_snapshot(2025, 11, Some("v2".into())).await.unwrap();
  assert_eq!(second.id, first.id);
  assert_eq!(second.description.as_deref(), Some("v2"));
  assert_eq!(second.total_shifts, 1);
  assert_eq!(second.payload, first.payload);

  let detail = f.engine.snapshot_entries(second.id).await.unwrap();
  assert_eq!(detail.entries.len(), 1);
  assert_eq!(detail.entries[0].date, date(2025, 11, 4));
  assert_eq!(f.engine.count_snapshots().await.unwrap(), 1);
}

#[tokio::test]
async fn concurrent_reactivations_admit_exactly_one() {
  let f = Fixture::new().await;
  let first = f.engine.create_snapshot(2025, 11, Some("v1".into())).await.unwrap();
  f.engine.delete_history(first.id).await.unwrap();

  let (a, b) = tokio::join!(
    f.engine.create_snapshot(2025, 11, Some("a".into())),
    f.engine.create_snapshot(2025, 11, Some("b".into())),
  );
  let outcomes = [a, b];
  assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
  assert!(
    outcomes
      .iter()
      .any(|r| matches!(r, Err(Error::SnapshotAlreadyExists(_))))
  );

  let winner = outcomes
    .iter()
    .find_map(|r| r.as_ref().ok())
    .unwrap();
  let stored = f.engine.history_by_id(first.id).await.unwrap();
  assert_eq!(stored.description, winner.description);
  assert_eq!(f.engine.count_snapshots().await.unwrap(), 1);
}

#[tokio::test]
async fn duplicate_clamps_and_skips_taken_dates() {
  let f = Fixture::new().await;
  let alice = f.concierge("Alice", ColorTag::Blue).await;
  let bob = f.concierge("Bob", ColorTag::Red).await;
  for day in [15, 30, 31] {
    f.scheduler
      .assign(AssignmentRequest::new(date(2026, 1, day), alice.id))
      .await
      .unwrap();
  }
  // Already taken in the target; must survive untouched.
  f.scheduler
    .assign(AssignmentRequest::new(date(2026, 2, 15), bob.id))
    .await
    .unwrap();

  let report = f.engine.duplicate_schedule(2026, 1, 2026, 2).await.unwrap();
  assert_eq!(report.source_shifts, 3);
  // 30th lands on the 28th; the 31st then collides with it.
  assert_eq!(report.duplicated, 1);
  assert_eq!(report.skipped.len(), 2);
  assert!(report.skipped.iter().all(|s| s.kind == ErrorKind::Conflict));

  let feb = f.projector.month_shifts(2026, 2).await.unwrap();
  assert_eq!(feb.len(), 2);
  assert_eq!(feb[0].concierge_id, bob.id);
  assert_eq!(feb[1].date, date(2026, 2, 28));
  assert_eq!(feb[1].notes.as_deref(), Some("Duplicated from 2026-01"));

  assert!(matches!(
    f.engine.duplicate_schedule(2026, 1, 2026, 13).await,
    Err(Error::InvalidPeriod { .. })
  ));
}

#[tokio::test]
async fn history_listings() {
  let f = Fixture::new().await;
  for (y, m) in [(2025, 9), (2025, 11), (2024, 12), (2025, 10)] {
    f.engine.create_snapshot(y, m, None).await.unwrap();
  }

  let all: Vec<_> = f
    .engine
    .all_history()
    .await
    .unwrap()
    .into_iter()
    .map(|s| s.period.to_string())
    .collect();
  assert_eq!(all, ["2025-11", "2025-10", "2025-09", "2024-12"]);

  let latest = f.engine.latest_history(2).await.unwrap();
  assert_eq!(latest.len(), 2);
  assert_eq!(latest[0].period, Period::new(2025, 11).unwrap());

  let in_2025 = f.engine.history_by_year(2025).await.unwrap();
  assert_eq!(in_2025.len(), 3);

  let page = f.engine.history_page(2, 10).await.unwrap();
  assert_eq!(page.total, 4);
  assert_eq!(page.items.len(), 2);
  assert_eq!(page.items[0].period, Period::new(2025, 9).unwrap());

  let oct = f.engine.history_by_year_month(2025, 10).await.unwrap().unwrap();
  assert_eq!(f.engine.history_by_id(oct.id).await.unwrap().id, oct.id);
  assert!(f.engine.history_by_year_month(2025, 1).await.unwrap().is_none());
  assert!(matches!(
    f.engine.history_by_id(Uuid::new_v4()).await,
    Err(Error::SnapshotNotFound(_))
  ));
}
