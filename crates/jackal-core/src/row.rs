//! Raw spreadsheet rows and the header names used to read them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ─── Row ─────────────────────────────────────────────────────────────────────

/// One data row of a sheet, keyed by the header of each column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
  cells: BTreeMap<String, String>,
}

impl Row {
  pub fn new() -> Self { Self::default() }

  /// Set the cell under `column`, replacing any previous value.
  pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
    self.cells.insert(column.into(), value.into());
  }

  /// The trimmed cell under `column`. Blank cells read as absent.
  pub fn field(&self, column: &str) -> Option<&str> {
    self
      .cells
      .get(column)
      .map(|v| v.trim())
      .filter(|v| !v.is_empty())
  }

  pub fn is_blank(&self) -> bool {
    self.cells.values().all(|v| v.trim().is_empty())
  }
}

impl<K, V> FromIterator<(K, V)> for Row
where
  K: Into<String>,
  V: Into<String>,
{
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self {
      cells: iter
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect(),
    }
  }
}

// ─── Column names ────────────────────────────────────────────────────────────

/// Header names for both sheets. Defaults match the production spreadsheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Columns {
  pub roster: RosterColumns,
  pub status: StatusColumns,
}

/// Header names on the roster sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterColumns {
  pub identifier: String,
  pub rank:       String,
  pub name:       String,
  /// The PES code column.
  pub category:   String,
}

impl Default for RosterColumns {
  fn default() -> Self {
    Self {
      identifier: "SYN NO".into(),
      rank:       "RANK".into(),
      name:       "NAME".into(),
      category:   "PES".into(),
    }
  }
}

/// Header names on the form-responses sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusColumns {
  pub identifier: String,
  pub label:      String,
  pub start:      String,
  pub end:        String,
}

impl Default for StatusColumns {
  fn default() -> Self {
    Self {
      identifier: "SYN NO".into(),
      label:      "Medical Status".into(),
      start:      "Start Date".into(),
      end:        "End Date".into(),
    }
  }
}
