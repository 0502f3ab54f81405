//! The store's own guarantees, exercised directly through the trait.

use chrono::Utc;
use rota_core::{
  concierge::{ColorTag, ConciergeFilter, ConciergeUpdate, NewConcierge},
  period::Period,
  shift::AssignmentRequest,
  snapshot::NewSnapshot,
  store::{ScheduleStore, SnapshotQuery},
};
use uuid::Uuid;

use super::{date, store};
use crate::Error;

fn snapshot_input(year: i32, month: u32) -> NewSnapshot {
  NewSnapshot {
    period:       Period::new(year, month).unwrap(),
    payload:      r#"{"version":1,"entries":[]}"#.into(),
    description:  None,
    total_shifts: 0,
    taken_at:     Utc::now(),
  }
}

// ─── Concierges ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_concierge() {
  let s = store().await;
  let alice = s
    .insert_concierge(NewConcierge::new("Alice", ColorTag::Blue))
    .await
    .unwrap();

  let fetched = s.get_concierge(alice.id).await.unwrap().unwrap();
  assert_eq!(fetched.name, "Alice");
  assert_eq!(fetched.color, ColorTag::Blue);
  assert!(fetched.active);

  let by_name = s.find_concierge_by_name("aLiCe".into()).await.unwrap();
  assert_eq!(by_name.map(|c| c.id), Some(alice.id));
}

#[tokio::test]
async fn concierge_names_are_unique_ignoring_case() {
  let s = store().await;
  s.insert_concierge(NewConcierge::new("Alice", ColorTag::Blue))
    .await
    .unwrap();

  let err = s
    .insert_concierge(NewConcierge::new("ALICE", ColorTag::Red))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateConciergeName(ref n) if n == "ALICE"));
  assert!(matches!(
    rota_core::Error::from(err),
    rota_core::Error::DuplicateConciergeName(_)
  ));
}

#[tokio::test]
async fn deleted_concierge_frees_its_name() {
  let s = store().await;
  let alice = s
    .insert_concierge(NewConcierge::new("Alice", ColorTag::Blue))
    .await
    .unwrap();

  assert!(s.soft_delete_concierge(alice.id).await.unwrap());
  assert!(!s.soft_delete_concierge(alice.id).await.unwrap());
  assert!(s.get_concierge(alice.id).await.unwrap().is_none());

  let again = s
    .insert_concierge(NewConcierge::new("Alice", ColorTag::Green))
    .await
    .unwrap();
  assert_ne!(again.id, alice.id);
}

#[tokio::test]
async fn rename_onto_taken_name_is_rejected() {
  let s = store().await;
  s.insert_concierge(NewConcierge::new("Alice", ColorTag::Blue))
    .await
    .unwrap();
  let bob = s
    .insert_concierge(NewConcierge::new("Bob", ColorTag::Red))
    .await
    .unwrap();

  let err = s
    .update_concierge(bob.id, ConciergeUpdate {
      name:  "alice".into(),
      color: ColorTag::Red,
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateConciergeName(_)));

  let missing = s
    .update_concierge(Uuid::new_v4(), ConciergeUpdate {
      name:  "Carol".into(),
      color: ColorTag::Teal,
    })
    .await
    .unwrap();
  assert!(missing.is_none());
}

#[tokio::test]
async fn list_concierges_filters_and_orders_by_name() {
  let s = store().await;
  for (name, color) in [
    ("Carol", ColorTag::Blue),
    ("Alice", ColorTag::Blue),
    ("Bob", ColorTag::Red),
  ] {
    s.insert_concierge(NewConcierge::new(name, color))
      .await
      .unwrap();
  }
  let carol = s.find_concierge_by_name("Carol".into()).await.unwrap().unwrap();
  s.set_concierge_active(carol.id, false).await.unwrap();

  let names = |list: Vec<rota_core::concierge::Concierge>| {
    list.into_iter().map(|c| c.name).collect::<Vec<_>>()
  };

  let all = s.list_concierges(ConciergeFilter::default()).await.unwrap();
  assert_eq!(names(all), ["Alice", "Bob", "Carol"]);

  let active = s
    .list_concierges(ConciergeFilter { active_only: true, color: None })
    .await
    .unwrap();
  assert_eq!(names(active), ["Alice", "Bob"]);

  let blue = s
    .list_concierges(ConciergeFilter {
      active_only: false,
      color:       Some(ColorTag::Blue),
    })
    .await
    .unwrap();
  assert_eq!(names(blue), ["Alice", "Carol"]);
}

// ─── Shifts ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn one_live_shift_per_date() {
  let s = store().await;
  let alice = s
    .insert_concierge(NewConcierge::new("Alice", ColorTag::Blue))
    .await
    .unwrap();
  let day = date(2025, 11, 15);

  let first = s
    .insert_shift(AssignmentRequest::new(day, alice.id))
    .await
    .unwrap();
  assert_eq!(first.concierge_name, "Alice");
  assert_eq!(first.concierge_color, ColorTag::Blue);

  let err = s
    .insert_shift(AssignmentRequest::new(day, alice.id))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::ShiftConflict(d) if d == day));

  // Once the first row is tombstoned the date is free again.
  assert!(s.soft_delete_shift(first.id).await.unwrap());
  let second = s
    .insert_shift(AssignmentRequest::new(day, alice.id))
    .await
    .unwrap();
  assert_eq!(s.shift_on(day).await.unwrap().map(|x| x.id), Some(second.id));
}

#[tokio::test]
async fn moving_a_shift_onto_a_taken_date_conflicts() {
  let s = store().await;
  let alice = s
    .insert_concierge(NewConcierge::new("Alice", ColorTag::Blue))
    .await
    .unwrap();
  s.insert_shift(AssignmentRequest::new(date(2025, 11, 1), alice.id))
    .await
    .unwrap();
  let second = s
    .insert_shift(AssignmentRequest::new(date(2025, 11, 2), alice.id))
    .await
    .unwrap();

  let err = s
    .update_shift(
      second.id,
      AssignmentRequest::new(date(2025, 11, 1), alice.id),
    )
    .await
    .unwrap_err();
  assert!(matches!(
    rota_core::Error::from(err),
    rota_core::Error::ShiftConflict(_)
  ));

  let unchanged = s.get_shift(second.id).await.unwrap().unwrap();
  assert_eq!(unchanged.date, date(2025, 11, 2));
}

#[tokio::test]
async fn range_queries_are_inclusive_and_ordered() {
  let s = store().await;
  let alice = s
    .insert_concierge(NewConcierge::new("Alice", ColorTag::Blue))
    .await
    .unwrap();
  for day in [20, 5, 30, 1] {
    s.insert_shift(AssignmentRequest::new(date(2025, 11, day), alice.id))
      .await
      .unwrap();
  }
  s.insert_shift(AssignmentRequest::new(date(2025, 12, 1), alice.id))
    .await
    .unwrap();

  let nov: Vec<_> = s
    .shifts_in_range(date(2025, 11, 1), date(2025, 11, 30))
    .await
    .unwrap()
    .into_iter()
    .map(|x| x.date)
    .collect();
  assert_eq!(nov, [
    date(2025, 11, 1),
    date(2025, 11, 5),
    date(2025, 11, 20),
    date(2025, 11, 30),
  ]);

  let total = s.count_shifts_for_concierge(alice.id, None).await.unwrap();
  assert_eq!(total, 5);
  let in_dec = s
    .count_shifts_for_concierge(
      alice.id,
      Some((date(2025, 12, 1), date(2025, 12, 31))),
    )
    .await
    .unwrap();
  assert_eq!(in_dec, 1);
}

// ─── Snapshots ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn one_snapshot_row_per_period() {
  let s = store().await;
  let first = s.insert_snapshot(snapshot_input(2025, 11)).await.unwrap();

  let err = s.insert_snapshot(snapshot_input(2025, 11)).await.unwrap_err();
  assert!(matches!(err, Error::SnapshotAlreadyExists(_)));

  // Even a tombstoned row keeps the period taken.
  assert!(s.soft_delete_snapshot(first.id).await.unwrap());
  let err = s.insert_snapshot(snapshot_input(2025, 11)).await.unwrap_err();
  assert!(matches!(err, Error::SnapshotAlreadyExists(_)));

  let period = Period::new(2025, 11).unwrap();
  assert!(s.snapshot_for_period(period, false).await.unwrap().is_none());
  let hidden = s.snapshot_for_period(period, true).await.unwrap().unwrap();
  assert!(hidden.deleted);

  let revived = s
    .reactivate_snapshot(hidden.id, Some("again".into()), Utc::now())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(revived.id, first.id);
  assert!(!revived.deleted);
  assert_eq!(revived.description.as_deref(), Some("again"));
  assert_eq!(revived.payload, first.payload);

  // A live row is left alone.
  assert!(
    s.reactivate_snapshot(hidden.id, None, Utc::now())
      .await
      .unwrap()
      .is_none()
  );
  assert!(
    s.reactivate_snapshot(Uuid::new_v4(), None, Utc::now())
      .await
      .unwrap()
      .is_none()
  );
  let live = s.get_snapshot(first.id).await.unwrap().unwrap();
  assert_eq!(live.description.as_deref(), Some("again"));
}

#[tokio::test]
async fn snapshots_list_latest_first() {
  let s = store().await;
  for (y, m) in [(2024, 12), (2025, 3), (2025, 11), (2025, 1)] {
    s.insert_snapshot(snapshot_input(y, m)).await.unwrap();
  }

  let periods = |list: Vec<rota_core::snapshot::MonthSnapshot>| {
    list.into_iter().map(|x| x.period.to_string()).collect::<Vec<_>>()
  };

  let all = s.list_snapshots(SnapshotQuery::default()).await.unwrap();
  assert_eq!(periods(all), ["2025-11", "2025-03", "2025-01", "2024-12"]);

  let page = s
    .list_snapshots(SnapshotQuery { year: None, limit: Some(2), offset: 1 })
    .await
    .unwrap();
  assert_eq!(periods(page), ["2025-03", "2025-01"]);

  let only_2025 = s
    .list_snapshots(SnapshotQuery { year: Some(2025), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(only_2025.len(), 3);
  assert_eq!(s.count_snapshots().await.unwrap(), 4);
}
