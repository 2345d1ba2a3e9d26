//! Bearer credentials for private sheets.
//!
//! A service account key is exchanged for short-lived access tokens by
//! `yup-oauth2`, which caches each token and fetches a new one shortly before
//! it expires. A fixed `access_token` is sent as-is.

use std::{path::Path, sync::Arc};

use yup_oauth2::{ServiceAccountAuthenticator, authenticator::DefaultAuthenticator};

use crate::{Error, Result, SheetsConfig};

/// Read-only access to spreadsheet values.
const SCOPES: &[&str] = &["https://www.googleapis.com/auth/spreadsheets.readonly"];

#[derive(Clone)]
pub(crate) enum Credentials {
  /// No bearer header. An API key alone, or a public sheet.
  Anonymous,
  Static(String),
  ServiceAccount(Arc<DefaultAuthenticator>),
}

impl Credentials {
  pub(crate) async fn from_config(config: &SheetsConfig) -> Result<Self> {
    if let Some(key) = &config.service_account_key {
      let key = if key.trim_start().starts_with('{') {
        yup_oauth2::parse_service_account_key(key)
      } else {
        yup_oauth2::read_service_account_key(Path::new(key)).await
      }
      .map_err(Error::ServiceAccountKey)?;

      let authenticator = ServiceAccountAuthenticator::builder(key)
        .build()
        .await
        .map_err(Error::ServiceAccountKey)?;
      return Ok(Self::ServiceAccount(Arc::new(authenticator)));
    }

    Ok(match &config.access_token {
      Some(token) => Self::Static(token.clone()),
      None => Self::Anonymous,
    })
  }

  /// The token to send with the next request, if any.
  pub(crate) async fn bearer(&self) -> Result<Option<String>> {
    match self {
      Self::Anonymous => Ok(None),
      Self::Static(token) => Ok(Some(token.clone())),
      Self::ServiceAccount(authenticator) => {
        let token = authenticator.token(SCOPES).await?;
        let token = token.token().ok_or(Error::EmptyToken)?;
        Ok(Some(token.to_owned()))
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn plain_configs_need_no_token_exchange() {
    let config = SheetsConfig::new("sheet-1");
    let credentials = Credentials::from_config(&config).await.unwrap();
    assert_eq!(credentials.bearer().await.unwrap(), None);

    let config = SheetsConfig {
      access_token: Some("t0ken".into()),
      ..SheetsConfig::new("sheet-1")
    };
    let credentials = Credentials::from_config(&config).await.unwrap();
    assert_eq!(credentials.bearer().await.unwrap().as_deref(), Some("t0ken"));
  }

  #[tokio::test]
  async fn unreadable_service_account_keys_are_rejected() {
    for key in [
      r#"{ "type": "service_account" }"#,
      "/nonexistent/jackal/service-account.json",
    ] {
      let config = SheetsConfig {
        service_account_key: Some(key.into()),
        ..SheetsConfig::new("sheet-1")
      };
      let result = Credentials::from_config(&config).await;
      assert!(
        matches!(result, Err(Error::ServiceAccountKey(_))),
        "{key} was accepted"
      );
    }
  }
}
