use chrono::Weekday;
use rota_core::{Error, concierge::ColorTag, shift::AssignmentRequest};

use super::{Fixture, date};

#[tokio::test]
async fn alice_and_bob_in_november() {
  let f = Fixture::new().await;
  let alice = f.concierge("Alice", ColorTag::Blue).await;
  let bob = f.concierge("Bob", ColorTag::Red).await;
  let day = date(2025, 11, 15);

  f.scheduler
    .assign(AssignmentRequest::new(day, alice.id))
    .await
    .unwrap();
  let err = f
    .scheduler
    .assign(AssignmentRequest::new(day, bob.id))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::ShiftConflict(_)));

  let unassigned = f.projector.unassigned_dates(2025, 11).await.unwrap();
  assert_eq!(unassigned.len(), 29);
  assert!(!unassigned.contains(&day));

  let counts = f.projector.shift_count_by_concierge(2025, 11).await.unwrap();
  assert_eq!(counts.len(), 1);
  assert_eq!(counts.get("Alice"), Some(&1));

  assert_eq!(f.projector.count_assigned_days(2025, 11).await.unwrap(), 1);
  assert_eq!(f.projector.count_unassigned_days(2025, 11).await.unwrap(), 29);
  assert!(!f.projector.is_month_fully_assigned(2025, 11).await.unwrap());
}

#[tokio::test]
async fn month_schedule_view() {
  let f = Fixture::new().await;
  let alice = f.concierge("Alice", ColorTag::Blue).await;
  let retired = f.concierge("Zed", ColorTag::Red).await;
  f.directory.deactivate(retired.id).await.unwrap();
  for day in [3, 1] {
    f.scheduler
      .assign(AssignmentRequest::new(date(2025, 11, day), alice.id))
      .await
      .unwrap();
  }
  // Outside the month; must not leak in.
  f.scheduler
    .assign(AssignmentRequest::new(date(2025, 12, 1), alice.id))
    .await
    .unwrap();

  let schedule = f.projector.month_schedule(2025, 11).await.unwrap();
  assert_eq!(schedule.month_name, "November");
  assert_eq!(schedule.total_days, 30);
  assert_eq!(schedule.first_day, date(2025, 11, 1));
  assert_eq!(schedule.last_day, date(2025, 11, 30));
  assert_eq!(schedule.assigned_days, 2);
  assert_eq!(schedule.unassigned_days, 28);
  // 2025-11-01 is a Saturday.
  assert_eq!(schedule.starting_weekday, 6);
  assert_eq!(
    schedule.daily_assignments.keys().copied().collect::<Vec<_>>(),
    [date(2025, 11, 1), date(2025, 11, 3)]
  );
  assert_eq!(schedule.concierges.len(), 1);

  assert!(matches!(
    f.projector.month_schedule(2019, 12).await,
    Err(Error::InvalidPeriod { .. })
  ));
  assert!(matches!(
    f.projector.month_schedule(2025, 13).await,
    Err(Error::InvalidPeriod { .. })
  ));
}

#[tokio::test]
async fn grid_carries_neighbouring_assignments() {
  let f = Fixture::new().await;
  let alice = f.concierge("Alice", ColorTag::Blue).await;
  for day in [
    date(2025, 10, 27),
    date(2025, 10, 28),
    date(2025, 11, 20),
    date(2025, 12, 7),
  ] {
    f.scheduler
      .assign(AssignmentRequest::new(day, alice.id))
      .await
      .unwrap();
  }

  let grid = f.projector.calendar_grid(2025, 11).await.unwrap();
  assert_eq!(grid.len(), 42);
  assert_eq!(grid[0].date, date(2025, 10, 27));
  assert_eq!(grid[0].weekday, Weekday::Mon.number_from_monday());
  assert_eq!(grid[0].weekday_label, "MON");
  assert!(!grid[0].in_month);
  // Both ends of the grid are inside the fetched range.
  assert!(grid[0].assignment.is_some());

  let oct_28 = &grid[1];
  assert!(!oct_28.in_month);
  assert!(oct_28.assignment.is_some());

  let today: Vec<_> = grid.iter().filter(|d| d.is_today).collect();
  assert_eq!(today.len(), 1);
  assert_eq!(today[0].date, date(2025, 11, 20));
  assert_eq!(today[0].day, 20);
  assert!(today[0].assignment.is_some());

  let last = &grid[41];
  assert_eq!(last.date, date(2025, 12, 7));
  assert!(last.is_weekend);
  assert!(last.assignment.is_some());

  assert_eq!(grid.iter().filter(|d| d.in_month).count(), 30);
  assert_eq!(grid.iter().filter(|d| d.assignment.is_some()).count(), 4);
}

#[tokio::test]
async fn fully_assigned_month() {
  let f = Fixture::new().await;
  let alice = f.concierge("Alice", ColorTag::Blue).await;
  let requests = (1..=28)
    .map(|d| AssignmentRequest::new(date(2026, 2, d), alice.id))
    .collect();
  let outcome = f.scheduler.bulk_assign(requests).await.unwrap();
  assert!(outcome.is_complete());

  assert!(f.projector.is_month_fully_assigned(2026, 2).await.unwrap());
  assert!(f.projector.unassigned_dates(2026, 2).await.unwrap().is_empty());
}

#[tokio::test]
async fn statistics_for_a_month() {
  let f = Fixture::new().await;
  let alice = f.concierge("Alice", ColorTag::Blue).await;
  let bob = f.concierge("Bob", ColorTag::Red).await;
  f.concierge("Carol", ColorTag::Green).await;
  for (day, who) in [(1, alice.id), (2, bob.id), (3, bob.id), (4, alice.id)] {
    f.scheduler
      .assign(AssignmentRequest::new(date(2025, 11, day), who))
      .await
      .unwrap();
  }

  let stats = f.projector.statistics(2025, 11).await.unwrap();
  assert_eq!(stats.total_shifts, 4);
  assert_eq!(stats.active_concierges, 3);
  assert!((stats.average_per_concierge - 4.0 / 3.0).abs() < f64::EPSILON);
  // Alice and Bob tie on 2; the earlier name wins both ways.
  assert_eq!(stats.most_active.unwrap().name, "Alice");
  assert_eq!(stats.least_active.unwrap().name, "Alice");
}
