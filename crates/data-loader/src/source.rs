//! Locating and fetching the raw movie table.
//!
//! A locator is either a filesystem path or an `http(s)://` URL. Fetching is
//! the only step of startup that touches the outside world, so it is the
//! only one bounded by a timeout.

use crate::error::{DataLoadError, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Where the movie table comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Path(PathBuf),
    Url(String),
}

impl DataSource {
    /// Classify a locator string. Anything that is not an HTTP(S) URL is a path.
    pub fn parse(locator: &str) -> Self {
        let trimmed = locator.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(trimmed.to_string())
        } else {
            DataSource::Path(PathBuf::from(trimmed))
        }
    }

    /// Read the whole source into memory, failing once `timeout` elapses.
    pub async fn fetch(&self, timeout: Duration) -> Result<Vec<u8>> {
        info!("Fetching movie table from {}", self);
        let bytes = match self {
            DataSource::Path(path) => {
                match tokio::time::timeout(timeout, tokio::fs::read(path)).await {
                    Ok(read) => read.map_err(|e| self.unreachable(e))?,
                    Err(_) => return Err(self.timed_out(timeout)),
                }
            }
            DataSource::Url(url) => {
                let client = reqwest::Client::builder()
                    .timeout(timeout)
                    .build()
                    .map_err(|e| self.unreachable(e))?;
                let response = client
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| self.classify_http(e, timeout))?
                    .error_for_status()
                    .map_err(|e| self.unreachable(e))?;
                response
                    .bytes()
                    .await
                    .map_err(|e| self.classify_http(e, timeout))?
                    .to_vec()
            }
        };
        debug!("Fetched {} bytes from {}", bytes.len(), self);
        Ok(bytes)
    }

    fn unreachable(&self, reason: impl fmt::Display) -> DataLoadError {
        DataLoadError::DataSource {
            locator: self.to_string(),
            reason: reason.to_string(),
        }
    }

    fn timed_out(&self, timeout: Duration) -> DataLoadError {
        DataLoadError::Timeout {
            locator: self.to_string(),
            timeout,
        }
    }

    fn classify_http(&self, error: reqwest::Error, timeout: Duration) -> DataLoadError {
        if error.is_timeout() {
            self.timed_out(timeout)
        } else {
            self.unreachable(error)
        }
    }
}

impl FromStr for DataSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(DataSource::parse(s))
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Path(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}
