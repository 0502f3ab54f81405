//! Aggregate statistics for one month.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::period::Period;

/// A concierge's name with their shift count for the month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
  pub name:   String,
  pub shifts: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthStatistics {
  pub period:                Period,
  pub month_name:            &'static str,
  /// Shift counts keyed by concierge name, ordered by name.
  pub shifts_by_concierge:   BTreeMap<String, usize>,
  pub total_shifts:          usize,
  pub active_concierges:     usize,
  /// `total_shifts / active_concierges`, or 0 with no active concierges.
  pub average_per_concierge: f64,
  pub most_active:           Option<Standing>,
  pub least_active:          Option<Standing>,
  pub previous:              Option<Period>,
  pub next:                  Option<Period>,
}

impl MonthStatistics {
  /// Derive the statistics from per-concierge counts.
  ///
  /// Ties for most or least active go to the name that sorts first.
  pub fn compute(
    period: Period,
    shifts_by_concierge: BTreeMap<String, usize>,
    active_concierges: usize,
  ) -> Self {
    let total_shifts = shifts_by_concierge.values().sum();
    let average_per_concierge = if active_concierges == 0 {
      0.0
    } else {
      total_shifts as f64 / active_concierges as f64
    };

    Self {
      period,
      month_name: period.month_name(),
      most_active: pick(&shifts_by_concierge, |count, best| count > best),
      least_active: pick(&shifts_by_concierge, |count, best| count < best),
      shifts_by_concierge,
      total_shifts,
      active_concierges,
      average_per_concierge,
      previous: period.previous(),
      next: period.next(),
    }
  }
}

/// Walk `counts` in name order, replacing the running pick only when `beats`
/// holds strictly.
fn pick(
  counts: &BTreeMap<String, usize>,
  beats: impl Fn(usize, usize) -> bool,
) -> Option<Standing> {
  let mut best: Option<(&String, usize)> = None;
  for (name, &count) in counts {
    match best {
      Some((_, current)) if !beats(count, current) => {}
      _ => best = Some((name, count)),
    }
  }
  best.map(|(name, shifts)| Standing { name: name.clone(), shifts })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn counts(pairs: &[(&str, usize)]) -> BTreeMap<String, usize> {
    pairs.iter().map(|(n, c)| ((*n).to_owned(), *c)).collect()
  }

  fn nov() -> Period { Period::new(2025, 11).unwrap() }

  #[test]
  fn extremes_and_average() {
    let stats = MonthStatistics::compute(
      nov(),
      counts(&[("Alice", 10), ("Bob", 4), ("Carol", 16)]),
      4,
    );
    assert_eq!(stats.total_shifts, 30);
    assert_eq!(stats.average_per_concierge, 7.5);
    assert_eq!(stats.most_active.unwrap().name, "Carol");
    assert_eq!(
      stats.least_active,
      Some(Standing { name: "Bob".into(), shifts: 4 })
    );
    assert_eq!(stats.previous, Period::new(2025, 10).ok());
    assert_eq!(stats.next, Period::new(2025, 12).ok());
  }

  #[test]
  fn ties_go_to_the_first_name() {
    let stats = MonthStatistics::compute(
      nov(),
      counts(&[("Dana", 5), ("Bob", 5), ("Alice", 2), ("Carol", 2)]),
      4,
    );
    assert_eq!(stats.most_active.unwrap().name, "Bob");
    assert_eq!(stats.least_active.unwrap().name, "Alice");
  }

  #[test]
  fn empty_month() {
    let stats = MonthStatistics::compute(nov(), BTreeMap::new(), 0);
    assert_eq!(stats.total_shifts, 0);
    assert_eq!(stats.average_per_concierge, 0.0);
    assert!(stats.most_active.is_none());
    assert!(stats.least_active.is_none());
  }
}
