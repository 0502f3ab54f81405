//! Concierges: the staff members shifts are assigned to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator as _};
use uuid::Uuid;

/// Shortest accepted display name, after trimming.
pub const MIN_NAME_LEN: usize = 2;
/// Longest accepted display name, after trimming.
pub const MAX_NAME_LEN: usize = 100;

// ─── Color ───────────────────────────────────────────────────────────────────

/// Calendar color for a concierge. Purely presentational.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ColorTag {
  Blue,
  Purple,
  Green,
  Red,
  Orange,
  Yellow,
  Pink,
  Teal,
  Indigo,
  Cyan,
}

impl ColorTag {
  pub fn hex_code(self) -> &'static str {
    match self {
      Self::Blue => "#3498db",
      Self::Purple => "#9b59b6",
      Self::Green => "#2ecc71",
      Self::Red => "#e74c3c",
      Self::Orange => "#e67e22",
      Self::Yellow => "#f39c12",
      Self::Pink => "#e91e63",
      Self::Teal => "#1abc9c",
      Self::Indigo => "#6610f2",
      Self::Cyan => "#17a2b8",
    }
  }

  pub fn display_name(self) -> &'static str {
    match self {
      Self::Blue => "Blue",
      Self::Purple => "Purple",
      Self::Green => "Green",
      Self::Red => "Red",
      Self::Orange => "Orange",
      Self::Yellow => "Yellow",
      Self::Pink => "Pink",
      Self::Teal => "Teal",
      Self::Indigo => "Indigo",
      Self::Cyan => "Cyan",
    }
  }

  /// Reverse lookup by hex code, case-insensitive.
  pub fn from_hex_code(hex: &str) -> Option<Self> {
    Self::iter().find(|c| c.hex_code().eq_ignore_ascii_case(hex))
  }
}

// ─── Concierge ───────────────────────────────────────────────────────────────

/// A non-deleted concierge as seen by the rest of the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concierge {
  pub id:         Uuid,
  /// Unique among non-deleted concierges, compared case-insensitively.
  pub name:       String,
  pub color:      ColorTag,
  /// Inactive concierges keep their history but are hidden from pickers.
  pub active:     bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Input to [`crate::directory::ConciergeDirectory::create`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewConcierge {
  pub name:   String,
  pub color:  ColorTag,
  #[serde(default = "default_active")]
  pub active: bool,
}

impl NewConcierge {
  pub fn new(name: impl Into<String>, color: ColorTag) -> Self {
    Self { name: name.into(), color, active: true }
  }
}

fn default_active() -> bool { true }

/// Replacement name and color for an existing concierge.
#[derive(Debug, Clone, Deserialize)]
pub struct ConciergeUpdate {
  pub name:  String,
  pub color: ColorTag,
}

/// Parameters for [`crate::store::ScheduleStore::list_concierges`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ConciergeFilter {
  pub active_only: bool,
  pub color:       Option<ColorTag>,
}

/// A concierge enriched with shift counts.
#[derive(Debug, Clone, Serialize)]
pub struct ConciergeSummary {
  #[serde(flatten)]
  pub concierge:            Concierge,
  /// Active shifts in the month containing the clock's today.
  pub current_month_shifts: usize,
  pub total_shifts:         usize,
}

#[cfg(test)]
mod tests {
  use std::str::FromStr as _;

  use super::*;

  #[test]
  fn color_string_forms_agree() {
    for color in ColorTag::iter() {
      let text = color.to_string();
      assert_eq!(ColorTag::from_str(&text).unwrap(), color);
      let json = serde_json::to_value(color).unwrap();
      assert_eq!(json, serde_json::Value::String(text));
    }
    assert_eq!(ColorTag::iter().count(), 10);
  }

  #[test]
  fn color_parse_is_case_insensitive() {
    assert_eq!(ColorTag::from_str("TEAL").unwrap(), ColorTag::Teal);
    assert!(ColorTag::from_str("magenta").is_err());
  }

  #[test]
  fn hex_lookup() {
    assert_eq!(ColorTag::from_hex_code("#3498DB"), Some(ColorTag::Blue));
    assert_eq!(ColorTag::from_hex_code("#000000"), None);
  }
}
