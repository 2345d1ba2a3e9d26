//! The `PersonnelSource` trait and an in-memory implementation.
//!
//! The trait is implemented by backends (e.g. `jackal-sheets`). The query
//! engine depends on this abstraction only, and receives the source as an
//! argument on each call.

use std::{convert::Infallible, fmt, future::Future};

use crate::row::Row;

/// Which of the two tables a read was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
  Roster,
  StatusLog,
}

impl fmt::Display for Dataset {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Roster => "roster",
      Self::StatusLog => "status log",
    })
  }
}

/// Read-only access to the roster and the status log.
///
/// Each method returns every row of its table in stored order. Implementations
/// must not cache across calls; the external sheet is the source of truth.
pub trait PersonnelSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All roster rows, in sheet order.
  fn roster(
    &self,
  ) -> impl Future<Output = Result<Vec<Row>, Self::Error>> + Send + '_;

  /// All status submissions, oldest first.
  fn status_log(
    &self,
  ) -> impl Future<Output = Result<Vec<Row>, Self::Error>> + Send + '_;
}

// ─── In-memory source ────────────────────────────────────────────────────────

/// A fixed pair of tables held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
  pub roster:     Vec<Row>,
  pub status_log: Vec<Row>,
}

impl MemorySource {
  pub fn new(roster: Vec<Row>, status_log: Vec<Row>) -> Self {
    Self { roster, status_log }
  }
}

impl PersonnelSource for MemorySource {
  type Error = Infallible;

  fn roster(
    &self,
  ) -> impl Future<Output = Result<Vec<Row>, Self::Error>> + Send + '_ {
    std::future::ready(Ok(self.roster.clone()))
  }

  fn status_log(
    &self,
  ) -> impl Future<Output = Result<Vec<Row>, Self::Error>> + Send + '_ {
    std::future::ready(Ok(self.status_log.clone()))
  }
}
