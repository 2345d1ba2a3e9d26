//! Core types and query logic for the Jackal personnel-status bot.
//!
//! This crate is free of HTTP and spreadsheet dependencies. The roster and the
//! status log are read through the [`source::PersonnelSource`] trait, which is
//! passed into every query rather than held as process-wide state.

pub mod error;
pub mod matcher;
pub mod query;
pub mod record;
pub mod resolve;
pub mod row;
pub mod source;

pub use error::{Error, MalformedRow, Result};
pub use query::{QueryEngine, Reply};
pub use row::{Columns, Row};
pub use source::{Dataset, MemorySource, PersonnelSource};
