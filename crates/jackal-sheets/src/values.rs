//! Decoding of the `values` response into header-keyed rows.
//!
//! The first row of a range is the header. The API omits trailing empty
//! cells, so later rows may be shorter than the header; missing cells are
//! simply absent from the resulting [`Row`].

use std::collections::HashSet;

use jackal_core::Row;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Body of `GET /v4/spreadsheets/{id}/values/{range}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ValueRange {
  /// Absent entirely when the range holds no data.
  #[serde(default)]
  pub values: Vec<Vec<Value>>,
}

/// Turn a raw grid into rows keyed by the first row's headers. Blank rows and
/// cells under blank headers are dropped. When a header repeats, only its
/// first column is read.
pub(crate) fn rows_from_values(values: Vec<Vec<Value>>) -> Vec<Row> {
  let mut grid = values.into_iter();
  let Some(header) = grid.next() else {
    return Vec::new();
  };
  let mut seen = HashSet::new();
  let header: Vec<String> = header
    .iter()
    .enumerate()
    .map(|(column, cell)| {
      let name = cell_text(cell).trim().to_owned();
      if name.is_empty() || seen.insert(name.clone()) {
        name
      } else {
        warn!(header = %name, column, "duplicate column header; using the first");
        String::new()
      }
    })
    .collect();

  grid
    .map(|cells| {
      header
        .iter()
        .zip(cells.iter())
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, cell)| (name.clone(), cell_text(cell)))
        .collect::<Row>()
    })
    .filter(|row| !row.is_blank())
    .collect()
}

fn cell_text(cell: &Value) -> String {
  match cell {
    Value::String(s) => s.clone(),
    Value::Null => String::new(),
    other => other.to_string(),
  }
}
