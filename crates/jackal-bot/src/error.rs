//! Error type for the Telegram transport.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[source] reqwest::Error),

  #[error("telegram {method} failed: {description}")]
  Api {
    method:      &'static str,
    description: String,
  },
}

impl From<reqwest::Error> for Error {
  /// Request URLs embed the bot token, so they are stripped before the error
  /// can reach a log line.
  fn from(e: reqwest::Error) -> Self { Error::Http(e.without_url()) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
