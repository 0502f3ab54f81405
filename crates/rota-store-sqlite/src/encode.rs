//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, dates as `YYYY-MM-DD` (so they
//! sort lexically), UUIDs as hyphenated lowercase strings and enums by their
//! lowercase names.

use std::str::FromStr as _;

use chrono::{DateTime, NaiveDate, Utc};
use rota_core::{
  concierge::{ColorTag, Concierge},
  period::Period,
  shift::{ShiftAssignment, ShiftType},
  snapshot::MonthSnapshot,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(date: NaiveDate) -> String {
  date.format("%Y-%m-%d").to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

pub fn encode_color(color: ColorTag) -> String { color.to_string() }

pub fn decode_color(s: &str) -> Result<ColorTag> {
  ColorTag::from_str(s)
    .map_err(|_| Error::Decode(format!("unknown color: {s:?}")))
}

pub fn decode_shift_type(s: &str) -> Result<ShiftType> {
  ShiftType::parse(s)
    .ok_or_else(|| Error::Decode(format!("unknown shift type: {s:?}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const CONCIERGE_COLUMNS: &str =
  "concierge_id, name, color, active, created_at, updated_at";

/// Raw values read directly from a `concierges` row.
pub struct RawConcierge {
  pub concierge_id: String,
  pub name:         String,
  pub color:        String,
  pub active:       bool,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawConcierge {
  /// Map a row selected with [`CONCIERGE_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      concierge_id: row.get(0)?,
      name:         row.get(1)?,
      color:        row.get(2)?,
      active:       row.get(3)?,
      created_at:   row.get(4)?,
      updated_at:   row.get(5)?,
    })
  }

  pub fn into_concierge(self) -> Result<Concierge> {
    Ok(Concierge {
      id:         decode_uuid(&self.concierge_id)?,
      name:       self.name,
      color:      decode_color(&self.color)?,
      active:     self.active,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Live shifts joined with their concierge's display fields.
pub const SHIFT_SELECT: &str = "
  SELECT s.shift_id, s.shift_date, s.concierge_id, c.name, c.color,
         s.shift_type, s.notes, s.created_at, s.updated_at
  FROM shift_assignments s
  JOIN concierges c ON c.concierge_id = s.concierge_id
  WHERE s.deleted = 0";

/// Raw values read from a [`SHIFT_SELECT`] row.
pub struct RawShift {
  pub shift_id:        String,
  pub shift_date:      String,
  pub concierge_id:    String,
  pub concierge_name:  String,
  pub concierge_color: String,
  pub shift_type:      String,
  pub notes:           Option<String>,
  pub created_at:      String,
  pub updated_at:      String,
}

impl RawShift {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      shift_id:        row.get(0)?,
      shift_date:      row.get(1)?,
      concierge_id:    row.get(2)?,
      concierge_name:  row.get(3)?,
      concierge_color: row.get(4)?,
      shift_type:      row.get(5)?,
      notes:           row.get(6)?,
      created_at:      row.get(7)?,
      updated_at:      row.get(8)?,
    })
  }

  pub fn into_shift(self) -> Result<ShiftAssignment> {
    Ok(ShiftAssignment {
      id:              decode_uuid(&self.shift_id)?,
      date:            decode_date(&self.shift_date)?,
      concierge_id:    decode_uuid(&self.concierge_id)?,
      concierge_name:  self.concierge_name,
      concierge_color: decode_color(&self.concierge_color)?,
      shift_type:      decode_shift_type(&self.shift_type)?,
      notes:           self.notes,
      created_at:      decode_dt(&self.created_at)?,
      updated_at:      decode_dt(&self.updated_at)?,
    })
  }
}

pub const SNAPSHOT_COLUMNS: &str = "snapshot_id, year_value, month_value, \
                                    payload, description, total_shifts, \
                                    taken_at, deleted, created_at, updated_at";

/// Raw values read directly from a `month_snapshots` row.
pub struct RawSnapshot {
  pub snapshot_id:  String,
  pub year_value:   i32,
  pub month_value:  u32,
  pub payload:      String,
  pub description:  Option<String>,
  pub total_shifts: i64,
  pub taken_at:     String,
  pub deleted:      bool,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawSnapshot {
  /// Map a row selected with [`SNAPSHOT_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      snapshot_id:  row.get(0)?,
      year_value:   row.get(1)?,
      month_value:  row.get(2)?,
      payload:      row.get(3)?,
      description:  row.get(4)?,
      total_shifts: row.get(5)?,
      taken_at:     row.get(6)?,
      deleted:      row.get(7)?,
      created_at:   row.get(8)?,
      updated_at:   row.get(9)?,
    })
  }

  pub fn into_snapshot(self) -> Result<MonthSnapshot> {
    let period = Period::new(self.year_value, self.month_value)
      .map_err(|e| Error::Decode(e.to_string()))?;
    let total_shifts = usize::try_from(self.total_shifts)
      .map_err(|e| Error::Decode(format!("total_shifts: {e}")))?;
    Ok(MonthSnapshot {
      id: decode_uuid(&self.snapshot_id)?,
      period,
      description: self.description,
      total_shifts,
      taken_at: decode_dt(&self.taken_at)?,
      payload: self.payload,
      deleted: self.deleted,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
