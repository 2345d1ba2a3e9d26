//! Interval resolution over the status log.

use chrono::NaiveDate;
use tracing::warn;

use crate::{
  record::{ResolvedStatus, StatusEntry, normalize_identifier},
  row::{Row, StatusColumns},
};

/// Find the status that applies to `identifier` on `today`.
///
/// The log is scanned newest submission first and the first entry whose
/// interval contains `today` wins, so a later submission overrides an earlier
/// overlapping one without the earlier one being withdrawn. Entries that fail
/// to parse are logged and skipped.
pub fn resolve_status(
  identifier: &str,
  log: &[Row],
  columns: &StatusColumns,
  today: NaiveDate,
) -> Option<ResolvedStatus> {
  let wanted = normalize_identifier(identifier);

  log
    .iter()
    .enumerate()
    .rev()
    .filter(|(_, row)| {
      row
        .field(&columns.identifier)
        .is_some_and(|id| normalize_identifier(id) == wanted)
    })
    .find_map(|(position, row)| match StatusEntry::from_row(row, columns) {
      Ok(entry) => entry.is_active_on(today).then(|| entry.into()),
      Err(error) => {
        warn!(identifier = %wanted, position, %error, "skipping malformed status entry");
        None
      }
    })
}
