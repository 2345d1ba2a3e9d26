//! Record matching over the roster.

use tracing::warn;

use crate::{
  record::{PersonnelRecord, normalize_identifier},
  row::{RosterColumns, Row},
};

/// Every readable roster record, in sheet order. Rows without an identifier
/// are logged and skipped.
pub fn records<'a>(
  roster: &'a [Row],
  columns: &'a RosterColumns,
) -> impl Iterator<Item = PersonnelRecord> + 'a {
  roster.iter().enumerate().filter_map(move |(position, row)| {
    let record = PersonnelRecord::from_row(row, columns);
    if record.is_none() {
      warn!(position, column = %columns.identifier, "skipping roster row without identifier");
    }
    record
  })
}

/// The first record whose identifier matches, ignoring case. Later duplicates
/// are never consulted.
pub fn find_by_identifier(
  roster: &[Row],
  columns: &RosterColumns,
  identifier: &str,
) -> Option<PersonnelRecord> {
  let wanted = normalize_identifier(identifier);
  records(roster, columns).find(|r| r.has_identifier(&wanted))
}

/// All records in the given category, ignoring case, in sheet order.
pub fn filter_by_category(
  roster: &[Row],
  columns: &RosterColumns,
  category: &str,
) -> Vec<PersonnelRecord> {
  let wanted = normalize_identifier(category);
  records(roster, columns)
    .filter(|r| r.in_category(&wanted))
    .collect()
}
