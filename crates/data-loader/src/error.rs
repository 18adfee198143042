//! Error types for the data-loader crate.
//!
//! Every failure while reading the movie source is fatal to startup, so the
//! variants carry enough context (locator, line, missing columns) to be
//! printed as-is by the shell.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while fetching, parsing or assembling a catalog
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// The source could not be reached or read
    #[error("Failed to read data source {locator}: {reason}")]
    DataSource { locator: String, reason: String },

    /// Fetching the source took longer than the configured timeout
    #[error("Timed out after {timeout:?} while reading data source {locator}")]
    Timeout { locator: String, timeout: Duration },

    /// One or more required columns are absent from the header
    #[error("Missing required columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    /// A CSV record could not be decoded
    #[error("Parse error at line {line}: {reason}")]
    Parse { line: u64, reason: String },

    /// Catalog-level consistency check failed
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl DataLoadError {
    /// True for the failures that mean "the source itself is unusable",
    /// as opposed to a schema mismatch.
    pub fn is_data_source(&self) -> bool {
        matches!(
            self,
            DataLoadError::DataSource { .. }
                | DataLoadError::Timeout { .. }
                | DataLoadError::Parse { .. }
        )
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
