//! [`SheetsSource`] — the Google Sheets implementation of
//! [`PersonnelSource`].

use std::time::Duration;

use jackal_core::{PersonnelSource, Row};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::{
  Error, Result,
  auth::Credentials,
  values::{ValueRange, rows_from_values},
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Where the two tables live and how to authenticate.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetsConfig {
  pub spreadsheet_id:      String,
  /// Sent as the `key` query parameter. Enough for link-shared sheets.
  #[serde(default)]
  pub api_key:             Option<String>,
  /// Sent as a bearer token as-is. Google tokens expire after an hour, so
  /// prefer `service_account_key` for a long-running bot.
  #[serde(default)]
  pub access_token:        Option<String>,
  /// A service account key: the path to its JSON file, or the JSON itself.
  /// Takes precedence over `access_token`.
  #[serde(default)]
  pub service_account_key: Option<String>,
  #[serde(default = "default_roster_range")]
  pub roster_range:        String,
  #[serde(default = "default_status_range")]
  pub status_range:        String,
  #[serde(default = "default_base_url")]
  pub base_url:            String,
  /// Upper bound on a single range read.
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs:        u64,
}

impl SheetsConfig {
  /// A config with every optional field at its default.
  pub fn new(spreadsheet_id: impl Into<String>) -> Self {
    Self {
      spreadsheet_id:      spreadsheet_id.into(),
      api_key:             None,
      access_token:        None,
      service_account_key: None,
      roster_range:        default_roster_range(),
      status_range:        default_status_range(),
      base_url:            default_base_url(),
      timeout_secs:        default_timeout_secs(),
    }
  }
}

fn default_roster_range() -> String { "Sheet1".into() }
fn default_status_range() -> String { "Form responses 1".into() }
fn default_base_url() -> String { "https://sheets.googleapis.com".into() }
fn default_timeout_secs() -> u64 { 15 }

// ─── Source ───────────────────────────────────────────────────────────────────

/// Reads the roster and status log from one spreadsheet on every call.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct SheetsSource {
  client:      Client,
  credentials: Credentials,
  config:      SheetsConfig,
}

impl SheetsSource {
  /// Validate the config and load any service account key. No request is
  /// made until the first read.
  pub async fn new(config: SheetsConfig) -> Result<Self> {
    Url::parse(&config.base_url)
      .map_err(|_| Error::BaseUrl(config.base_url.clone()))?;
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;
    let credentials = Credentials::from_config(&config).await?;
    Ok(Self {
      client,
      credentials,
      config,
    })
  }

  fn range_url(&self, range: &str) -> Result<Url> {
    let mut url = Url::parse(&self.config.base_url)
      .map_err(|_| Error::BaseUrl(self.config.base_url.clone()))?;
    url
      .path_segments_mut()
      .map_err(|_| Error::BaseUrl(self.config.base_url.clone()))?
      .pop_if_empty()
      .extend([
        "v4",
        "spreadsheets",
        self.config.spreadsheet_id.as_str(),
        "values",
        range,
      ]);
    Ok(url)
  }

  /// `GET /v4/spreadsheets/{id}/values/{range}`
  async fn fetch(&self, range: &str) -> Result<Vec<Row>> {
    let mut request = self
      .client
      .get(self.range_url(range)?)
      .query(&[("majorDimension", "ROWS")]);
    if let Some(key) = &self.config.api_key {
      request = request.query(&[("key", key)]);
    }
    if let Some(token) = self.credentials.bearer().await? {
      request = request.bearer_auth(token);
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(Error::Status {
        status:  status.as_u16(),
        message: api_message(&body),
      });
    }

    let body: ValueRange = response.json().await?;
    let rows = rows_from_values(body.values);
    debug!(range, rows = rows.len(), "fetched sheet range");
    Ok(rows)
  }
}

impl PersonnelSource for SheetsSource {
  type Error = Error;

  async fn roster(&self) -> Result<Vec<Row>> {
    self.fetch(&self.config.roster_range).await
  }

  async fn status_log(&self) -> Result<Vec<Row>> {
    self.fetch(&self.config.status_range).await
  }
}

/// The `error.message` field of a Google API error body, or the raw body.
fn api_message(body: &str) -> String {
  #[derive(Deserialize)]
  struct Envelope {
    error: Detail,
  }
  #[derive(Deserialize)]
  struct Detail {
    message: String,
  }

  match serde_json::from_str::<Envelope>(body) {
    Ok(envelope) => envelope.error.message,
    Err(_) => body.chars().take(200).collect(),
  }
}
