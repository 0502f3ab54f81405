//! Shift assignments: one concierge on one calendar day.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ErrorKind, concierge::ColorTag};

/// Longest accepted notes field, in characters.
pub const MAX_NOTES_LEN: usize = 500;

/// The kind of shift. Every shift currently covers the whole day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftType {
  #[default]
  FullDay,
}

impl ShiftType {
  /// The discriminant stored in the `shift_type` column.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::FullDay => "full_day",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "full_day" => Some(Self::FullDay),
      _ => None,
    }
  }

  pub fn duration(self) -> &'static str {
    match self {
      Self::FullDay => "24 Hours",
    }
  }

  pub fn description(self) -> &'static str {
    match self {
      Self::FullDay => "Full Day Shift",
    }
  }
}

/// An active (non-deleted) assignment, enriched with its concierge's display
/// fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShiftAssignment {
  pub id:              Uuid,
  pub date:            NaiveDate,
  pub concierge_id:    Uuid,
  pub concierge_name:  String,
  pub concierge_color: ColorTag,
  pub shift_type:      ShiftType,
  pub notes:           Option<String>,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
}

/// Input to [`crate::scheduler::ShiftScheduler::assign`] and
/// [`crate::scheduler::ShiftScheduler::update`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRequest {
  pub date:         NaiveDate,
  pub concierge_id: Uuid,
  #[serde(default)]
  pub shift_type:   ShiftType,
  #[serde(default)]
  pub notes:        Option<String>,
}

impl AssignmentRequest {
  pub fn new(date: NaiveDate, concierge_id: Uuid) -> Self {
    Self {
      date,
      concierge_id,
      shift_type: ShiftType::default(),
      notes: None,
    }
  }

  pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
    self.notes = Some(notes.into());
    self
  }
}

// ─── Bulk results ────────────────────────────────────────────────────────────

/// A bulk item that was not written, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedRequest {
  /// Position in the submitted batch.
  pub index:  usize,
  pub date:   NaiveDate,
  pub kind:   ErrorKind,
  pub reason: String,
}

/// Outcome of [`crate::scheduler::ShiftScheduler::bulk_assign`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkAssignment {
  /// Successfully written assignments, in input order.
  pub assigned: Vec<ShiftAssignment>,
  pub skipped:  Vec<SkippedRequest>,
}

impl BulkAssignment {
  pub fn is_complete(&self) -> bool { self.skipped.is_empty() }
}
