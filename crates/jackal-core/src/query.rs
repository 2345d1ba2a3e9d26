//! The query engine: joins roster matches with resolved statuses.

use chrono::NaiveDate;
use tracing::{debug, error};

use crate::{
  Error, Result,
  matcher,
  record::{PersonnelRecord, PersonnelView, normalize_identifier},
  resolve::resolve_status,
  row::{Columns, Row},
  source::{Dataset, PersonnelSource},
};

// ─── Reply ───────────────────────────────────────────────────────────────────

/// The outcome of a query that managed to read its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
  /// A single-person lookup hit.
  Person { view: PersonnelView },
  /// A single-person lookup miss.
  NotFound,
  /// One view per matching record, in roster order. Never empty.
  Group { views: Vec<PersonnelView> },
  /// A group query that matched nobody. `category` is `None` for list-all.
  NoPersonnel { category: Option<String> },
}

impl Reply {
  /// The reply as separate text blocks, one per person.
  pub fn blocks(&self) -> Vec<String> {
    match self {
      Self::Person { view } => vec![view.to_string()],
      Self::NotFound => vec!["SYN NO not found.".to_owned()],
      Self::Group { views } => views.iter().map(ToString::to_string).collect(),
      Self::NoPersonnel { category: Some(_) } => {
        vec!["No personnel found with this PES status.".to_owned()]
      }
      Self::NoPersonnel { category: None } => {
        vec!["No personnel found.".to_owned()]
      }
    }
  }

  /// The full reply text, blocks separated by a blank line.
  pub fn render(&self) -> String { self.blocks().join("\n\n") }
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// Answers the three query shapes against any [`PersonnelSource`].
///
/// The engine holds configuration only. Each call reads the roster, and the
/// status log when some record needs a status, exactly once.
#[derive(Debug, Clone, Default)]
pub struct QueryEngine {
  columns: Columns,
}

impl QueryEngine {
  pub fn new(columns: Columns) -> Self { Self { columns } }

  /// Look up one person by SYN NO.
  pub async fn lookup<S: PersonnelSource>(
    &self,
    source: &S,
    identifier: &str,
    today: NaiveDate,
  ) -> Result<Reply> {
    let roster = read_roster(source).await?;
    let Some(record) =
      matcher::find_by_identifier(&roster, &self.columns.roster, identifier)
    else {
      debug!(identifier, "no roster match");
      return Ok(Reply::NotFound);
    };

    let log = read_status_log(source).await?;
    Ok(Reply::Person {
      view: self.view(record, &log, today),
    })
  }

  /// Everyone whose PES code matches `category`.
  pub async fn by_category<S: PersonnelSource>(
    &self,
    source: &S,
    category: &str,
    today: NaiveDate,
  ) -> Result<Reply> {
    let roster = read_roster(source).await?;
    let records =
      matcher::filter_by_category(&roster, &self.columns.roster, category);
    self
      .group(source, records, Some(normalize_identifier(category)), today)
      .await
  }

  /// Everyone on the roster.
  pub async fn list_all<S: PersonnelSource>(
    &self,
    source: &S,
    today: NaiveDate,
  ) -> Result<Reply> {
    let roster = read_roster(source).await?;
    let records =
      matcher::records(&roster, &self.columns.roster).collect::<Vec<_>>();
    self.group(source, records, None, today).await
  }

  async fn group<S: PersonnelSource>(
    &self,
    source: &S,
    records: Vec<PersonnelRecord>,
    category: Option<String>,
    today: NaiveDate,
  ) -> Result<Reply> {
    if records.is_empty() {
      return Ok(Reply::NoPersonnel { category });
    }

    let log = read_status_log(source).await?;
    let views = records
      .into_iter()
      .map(|record| self.view(record, &log, today))
      .collect();
    Ok(Reply::Group { views })
  }

  fn view(
    &self,
    record: PersonnelRecord,
    log: &[Row],
    today: NaiveDate,
  ) -> PersonnelView {
    let status =
      resolve_status(&record.identifier, log, &self.columns.status, today);
    PersonnelView { record, status }
  }
}

// ─── Source reads ────────────────────────────────────────────────────────────

async fn read_roster<S: PersonnelSource>(source: &S) -> Result<Vec<Row>> {
  source
    .roster()
    .await
    .map_err(|e| unavailable(Dataset::Roster, e))
}

async fn read_status_log<S: PersonnelSource>(source: &S) -> Result<Vec<Row>> {
  source
    .status_log()
    .await
    .map_err(|e| unavailable(Dataset::StatusLog, e))
}

fn unavailable<E>(dataset: Dataset, source: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  error!(%dataset, error = %source, "data source read failed");
  Error::Unavailable {
    dataset,
    source: Box::new(source),
  }
}
