//! Personnel records, status entries, and the views composed from them.
//!
//! Nothing here is stored by this crate. Records and entries are rebuilt from
//! the source rows on every query, and a [`ResolvedStatus`] only exists for
//! the duration of the reply that carries it.

use std::fmt;

use chrono::NaiveDate;

use crate::{
  MalformedRow,
  row::{RosterColumns, Row, StatusColumns},
};

/// Date format used by the status form, e.g. `07/01/2024`.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Canonical form of an identifier for comparisons.
pub fn normalize_identifier(raw: &str) -> String { raw.trim().to_uppercase() }

// ─── Roster ──────────────────────────────────────────────────────────────────

/// One person on the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonnelRecord {
  /// The SYN NO, as written on the roster.
  pub identifier: String,
  pub rank:       String,
  pub name:       String,
  /// The PES code.
  pub category:   String,
}

impl PersonnelRecord {
  /// Read a roster row. Rows without an identifier yield `None`; other
  /// blank cells become empty strings.
  pub fn from_row(row: &Row, columns: &RosterColumns) -> Option<Self> {
    let text = |column: &str| row.field(column).unwrap_or_default().to_owned();
    Some(Self {
      identifier: row.field(&columns.identifier)?.to_owned(),
      rank:       text(&columns.rank),
      name:       text(&columns.name),
      category:   text(&columns.category),
    })
  }

  /// `wanted` must already be normalized.
  pub fn has_identifier(&self, wanted: &str) -> bool {
    normalize_identifier(&self.identifier) == wanted
  }

  /// `wanted` must already be normalized.
  pub fn in_category(&self, wanted: &str) -> bool {
    normalize_identifier(&self.category) == wanted
  }
}

// ─── Status log ──────────────────────────────────────────────────────────────

/// One submission from the status form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
  pub identifier: String,
  pub label:      String,
  pub start:      NaiveDate,
  pub end:        NaiveDate,
}

impl StatusEntry {
  pub fn from_row(
    row: &Row,
    columns: &StatusColumns,
  ) -> Result<Self, MalformedRow> {
    let required = |column: &str| {
      row
        .field(column)
        .ok_or_else(|| MalformedRow::MissingField(column.to_owned()))
    };
    Ok(Self {
      identifier: required(&columns.identifier)?.to_owned(),
      label:      required(&columns.label)?.to_owned(),
      start:      parse_date(&columns.start, required(&columns.start)?)?,
      end:        parse_date(&columns.end, required(&columns.end)?)?,
    })
  }

  /// Whether `day` falls inside `[start, end]`, both ends inclusive.
  pub fn is_active_on(&self, day: NaiveDate) -> bool {
    self.start <= day && day <= self.end
  }
}

fn parse_date(column: &str, value: &str) -> Result<NaiveDate, MalformedRow> {
  NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|reason| {
    MalformedRow::InvalidDate {
      column: column.to_owned(),
      value: value.to_owned(),
      reason,
    }
  })
}

/// The status entry that applies today, stripped of its identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStatus {
  pub label: String,
  pub start: NaiveDate,
  pub end:   NaiveDate,
}

impl From<StatusEntry> for ResolvedStatus {
  fn from(entry: StatusEntry) -> Self {
    Self {
      label: entry.label,
      start: entry.start,
      end:   entry.end,
    }
  }
}

impl fmt::Display for ResolvedStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "STATUS: {} ({} - {})",
      self.label,
      self.start.format(DATE_FORMAT),
      self.end.format(DATE_FORMAT),
    )
  }
}

// ─── View ────────────────────────────────────────────────────────────────────

/// A roster record joined with its status as of the query date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonnelView {
  pub record: PersonnelRecord,
  pub status: Option<ResolvedStatus>,
}

impl fmt::Display for PersonnelView {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let PersonnelRecord {
      rank,
      name,
      category,
      ..
    } = &self.record;
    write!(f, "{rank} {name}\nPES: {category}")?;
    if let Some(status) = &self.status {
      write!(f, "\n{status}")?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn status_row(start: &str, end: &str) -> Row {
    [
      ("SYN NO", "A123"),
      ("Medical Status", "MC"),
      ("Start Date", start),
      ("End Date", end),
    ]
    .into_iter()
    .collect()
  }

  #[test]
  fn record_without_identifier_is_skipped() {
    let row: Row = [("RANK", "CPL"), ("NAME", "Tan")].into_iter().collect();
    assert!(PersonnelRecord::from_row(&row, &RosterColumns::default()).is_none());
  }

  #[test]
  fn record_tolerates_blank_fields() {
    let row: Row = [("SYN NO", "a123"), ("NAME", "Tan")].into_iter().collect();
    let record = PersonnelRecord::from_row(&row, &RosterColumns::default()).unwrap();
    assert_eq!(record.identifier, "a123");
    assert_eq!(record.rank, "");
    assert_eq!(record.category, "");
    assert!(record.has_identifier("A123"));
  }

  #[test]
  fn entry_parses_unpadded_dates() {
    let entry =
      StatusEntry::from_row(&status_row("5/1/2024", "15/01/2024"), &StatusColumns::default())
        .unwrap();
    assert_eq!(entry.start, date(2024, 1, 5));
    assert_eq!(entry.end, date(2024, 1, 15));
  }

  #[test]
  fn entry_rejects_iso_dates() {
    let err =
      StatusEntry::from_row(&status_row("2024-01-05", "15/01/2024"), &StatusColumns::default())
        .unwrap_err();
    assert!(
      matches!(&err, MalformedRow::InvalidDate { column, .. } if column == "Start Date"),
      "{err:?}"
    );
  }

  #[test]
  fn entry_requires_a_label() {
    let mut row = status_row("01/01/2024", "02/01/2024");
    row.insert("Medical Status", " ");
    assert_eq!(
      StatusEntry::from_row(&row, &StatusColumns::default()),
      Err(MalformedRow::MissingField("Medical Status".into()))
    );
  }

  #[test]
  fn interval_is_inclusive_at_both_ends() {
    let entry =
      StatusEntry::from_row(&status_row("01/01/2024", "10/01/2024"), &StatusColumns::default())
        .unwrap();
    assert!(entry.is_active_on(date(2024, 1, 1)));
    assert!(entry.is_active_on(date(2024, 1, 10)));
    assert!(!entry.is_active_on(date(2023, 12, 31)));
    assert!(!entry.is_active_on(date(2024, 1, 11)));
  }

  #[test]
  fn view_renders_status_line_only_when_present() {
    let record = PersonnelRecord {
      identifier: "A123".into(),
      rank:       "CPL".into(),
      name:       "Tan".into(),
      category:   "B2".into(),
    };
    let bare = PersonnelView { record: record.clone(), status: None };
    assert_eq!(bare.to_string(), "CPL Tan\nPES: B2");

    let with_status = PersonnelView {
      record,
      status: Some(ResolvedStatus {
        label: "LD".into(),
        start: date(2024, 1, 5),
        end:   date(2024, 1, 15),
      }),
    };
    assert_eq!(
      with_status.to_string(),
      "CPL Tan\nPES: B2\nSTATUS: LD (05/01/2024 - 15/01/2024)"
    );
  }
}
