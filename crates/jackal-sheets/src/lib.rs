//! Google Sheets backend for the Jackal personnel source.
//!
//! Reads whole ranges through the Sheets v4 `values` endpoint, authenticated
//! with an API key, a fixed access token, or a service account whose tokens
//! are refreshed as they expire.

mod auth;
mod source;
mod values;

pub mod error;

pub use error::{Error, Result};
pub use source::{SheetsConfig, SheetsSource};
