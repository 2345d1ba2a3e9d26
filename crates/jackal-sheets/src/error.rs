//! Error type for `jackal-sheets`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid base url {0:?}")]
  BaseUrl(String),

  #[error("http error: {0}")]
  Http(#[source] reqwest::Error),

  /// The service account key could not be read, parsed or loaded.
  #[error("invalid service account key: {0}")]
  ServiceAccountKey(#[source] std::io::Error),

  #[error("failed to obtain an access token: {0}")]
  Token(#[from] yup_oauth2::Error),

  #[error("token endpoint returned no access token")]
  EmptyToken,

  /// The API answered with a non-success status.
  #[error("sheets api returned {status}: {message}")]
  Status { status: u16, message: String },
}

impl From<reqwest::Error> for Error {
  /// The API key travels in the query string; keep it out of error text.
  fn from(e: reqwest::Error) -> Self { Error::Http(e.without_url()) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
