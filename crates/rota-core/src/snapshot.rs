//! Month snapshots and their serialized payload.
//!
//! A snapshot's payload is a versioned JSON document:
//!
//! ```json
//! { "version": 1,
//!   "entries": [{ "date": "2025-11-15", "concierge_id": "…",
//!                 "shift_type": "full_day", "notes": null }] }
//! ```
//!
//! Only the fields needed to re-assign a shift are kept; display data is
//! looked up again on restore.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  period::Period,
  shift::{AssignmentRequest, ShiftAssignment, ShiftType},
};

/// Current payload format version.
pub const PAYLOAD_VERSION: u32 = 1;

/// Longest accepted snapshot description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 500;

// ─── Payload ─────────────────────────────────────────────────────────────────

/// One assignment as captured in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
  pub date:         NaiveDate,
  pub concierge_id: Uuid,
  pub shift_type:   ShiftType,
  pub notes:        Option<String>,
}

impl From<&ShiftAssignment> for SnapshotEntry {
  fn from(s: &ShiftAssignment) -> Self {
    Self {
      date:         s.date,
      concierge_id: s.concierge_id,
      shift_type:   s.shift_type,
      notes:        s.notes.clone(),
    }
  }
}

impl From<SnapshotEntry> for AssignmentRequest {
  fn from(e: SnapshotEntry) -> Self {
    Self {
      date:         e.date,
      concierge_id: e.concierge_id,
      shift_type:   e.shift_type,
      notes:        e.notes,
    }
  }
}

#[derive(Serialize, Deserialize)]
struct Payload {
  version: u32,
  entries: Vec<SnapshotEntry>,
}

/// Serialise entries into the payload column text.
pub fn encode_entries(entries: &[SnapshotEntry]) -> Result<String> {
  let payload = Payload {
    version: PAYLOAD_VERSION,
    entries: entries.to_vec(),
  };
  Ok(serde_json::to_string(&payload)?)
}

/// Parse payload text back into entries.
///
/// Anything that is not a version-1 payload is [`Error::SnapshotCorrupt`].
pub fn decode_entries(payload: &str) -> Result<Vec<SnapshotEntry>> {
  let doc: Payload = serde_json::from_str(payload)
    .map_err(|e| Error::SnapshotCorrupt(e.to_string()))?;
  if doc.version != PAYLOAD_VERSION {
    return Err(Error::SnapshotCorrupt(format!(
      "unsupported payload version {}",
      doc.version
    )));
  }
  Ok(doc.entries)
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// A stored snapshot row.
#[derive(Debug, Clone, Serialize)]
pub struct MonthSnapshot {
  pub id:           Uuid,
  pub period:       Period,
  pub description:  Option<String>,
  /// Number of entries in the payload when it was taken.
  pub total_shifts: usize,
  /// When the snapshot was taken; refreshed on reactivation.
  pub taken_at:     DateTime<Utc>,
  /// Raw payload text; see [`decode_entries`].
  #[serde(skip)]
  pub payload:      String,
  /// Only ever `true` on rows read with `include_deleted`.
  #[serde(skip)]
  pub deleted:      bool,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

/// Input to [`crate::store::ScheduleStore::insert_snapshot`].
#[derive(Debug, Clone)]
pub struct NewSnapshot {
  pub period:       Period,
  pub payload:      String,
  pub description:  Option<String>,
  pub total_shifts: usize,
  pub taken_at:     DateTime<Utc>,
}

/// A snapshot together with its decoded entries, for viewing.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotDetail {
  #[serde(flatten)]
  pub snapshot: MonthSnapshot,
  pub entries:  Vec<SnapshotEntry>,
}
