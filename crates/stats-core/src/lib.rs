//! Shared domain types for the gaming statistics workspace.
//!
//! Platform identifiers, normalized price and genre values, best-effort date
//! parsing, the error type, CLI settings and display formatting helpers.

pub mod dates;
pub mod error;
pub mod formatting;
pub mod genre;
pub mod models;
pub mod settings;

pub use error::{Result, StatsError};
