//! Error types for `jackal-core`.

use thiserror::Error;

use crate::source::Dataset;

/// A failure that ends a single query. "No match" and "no active status" are
/// not errors; they are ordinary [`Reply`](crate::Reply) values.
#[derive(Debug, Error)]
pub enum Error {
  #[error("{dataset} unavailable: {source}")]
  Unavailable {
    dataset: Dataset,
    #[source]
    source:  Box<dyn std::error::Error + Send + Sync>,
  },
}

/// Why a single row could not be turned into a domain value. Rows that fail
/// this way are skipped by the scan that encountered them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRow {
  #[error("missing value for column {0:?}")]
  MissingField(String),

  #[error("invalid date {value:?} in column {column:?}: {reason}")]
  InvalidDate {
    column: String,
    value:  String,
    reason: chrono::ParseError,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
