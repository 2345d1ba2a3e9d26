//! Telegram command surface and health endpoint for Jackal.
//!
//! [`dispatch::Dispatcher`] turns a parsed [`command::Command`] into reply
//! text using the core query engine; [`poller::Poller`] feeds it updates from
//! the Telegram Bot API. The health check is a plain axum [`Router`].

pub mod command;
pub mod dispatch;
pub mod error;
pub mod poller;
pub mod telegram;

pub use error::Error;

use axum::{Router, routing::get};
use chrono::{FixedOffset, Local, NaiveDate, Utc};
use jackal_core::Columns;
use jackal_sheets::SheetsConfig;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime configuration, deserialised from `config.toml` and `JACKAL_*`
/// environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
  #[serde(default)]
  pub server:           ServerConfig,
  /// Required by `serve`; `query` runs without it.
  #[serde(default)]
  pub telegram:         Option<TelegramConfig>,
  pub sheets:           SheetsConfig,
  #[serde(default)]
  pub columns:          Columns,
  /// Link handed out by `/update`.
  #[serde(default)]
  pub update_form_url:  Option<String>,
  /// Pin "today" to this offset from UTC instead of the host's local zone.
  #[serde(default)]
  pub utc_offset_hours: Option<i32>,
}

/// Bind address of the health-check endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host: String,
  pub port: u16,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host: "0.0.0.0".into(),
      port: 8080,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
  pub token:             String,
  #[serde(default = "default_api_url")]
  pub api_url:           String,
  /// Long-poll duration passed to `getUpdates`.
  #[serde(default = "default_poll_timeout_secs")]
  pub poll_timeout_secs: u64,
  /// The bot's `@username`, without the `@`. Fetched with `getMe` when
  /// unset.
  #[serde(default)]
  pub username:          Option<String>,
}

fn default_api_url() -> String { "https://api.telegram.org".into() }
fn default_poll_timeout_secs() -> u64 { 30 }

// ─── Calendar ─────────────────────────────────────────────────────────────────

/// Source of the date that statuses are resolved against.
#[derive(Debug, Clone, Copy, Default)]
pub struct Calendar {
  offset: Option<FixedOffset>,
}

impl Calendar {
  /// Follow the host's local time zone.
  pub fn local() -> Self { Self::default() }

  /// Follow a fixed UTC offset. `None` if the offset is out of range.
  pub fn with_offset_hours(hours: i32) -> Option<Self> {
    FixedOffset::east_opt(hours.checked_mul(3600)?).map(|offset| Self {
      offset: Some(offset),
    })
  }

  pub fn today(&self) -> NaiveDate {
    match self.offset {
      Some(offset) => Utc::now().with_timezone(&offset).date_naive(),
      None => Local::now().date_naive(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

pub const HEALTH_TEXT: &str = "Jackal Bot is running.";

/// Build the health-check router.
pub fn router() -> Router {
  Router::new()
    .route("/", get(health))
    .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str { HEALTH_TEXT }

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use tower::ServiceExt as _;

  use super::*;

  #[tokio::test]
  async fn health_check_returns_200() {
    let req = Request::builder().uri("/").body(Body::empty()).unwrap();
    let resp = router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(std::str::from_utf8(&bytes).unwrap(), HEALTH_TEXT);
  }

  #[tokio::test]
  async fn unknown_path_returns_404() {
    let req = Request::builder().uri("/nope").body(Body::empty()).unwrap();
    let resp = router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[test]
  fn calendar_rejects_out_of_range_offsets() {
    assert!(Calendar::with_offset_hours(8).is_some());
    assert!(Calendar::with_offset_hours(-11).is_some());
    assert!(Calendar::with_offset_hours(25).is_none());
    assert!(Calendar::with_offset_hours(i32::MAX).is_none());
  }

  #[test]
  fn config_fills_defaults() {
    let cfg: BotConfig = serde_json::from_value(serde_json::json!({
      "sheets":   { "spreadsheet_id": "abc" },
      "telegram": { "token": "t" },
    }))
    .unwrap();
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.sheets.status_range, "Form responses 1");
    assert_eq!(cfg.columns.roster.category, "PES");
    let telegram = cfg.telegram.unwrap();
    assert_eq!(telegram.api_url, "https://api.telegram.org");
    assert_eq!(telegram.poll_timeout_secs, 30);
    assert!(telegram.username.is_none());
    assert!(cfg.update_form_url.is_none());
  }
}
