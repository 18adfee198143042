//! Engine configuration, read from `CINEMATCH_*` environment variables.

use crate::error::EngineError;
use data_loader::{LoadOptions, MAX_CATALOG_SIZE};
use features::FeatureConfig;
use serde::{Deserialize, Serialize};
use sources::DEFAULT_MATCH_THRESHOLD;
use std::time::Duration;

/// Prefix of every environment variable the engine reads
pub const ENV_PREFIX: &str = "CINEMATCH_";

/// Engine configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Path or URL of the movie metadata CSV
    #[serde(default = "default_data_source")]
    pub data_source: String,

    /// Row cap for the catalog (never above 5000)
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,

    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Requested k for k-means
    #[serde(default = "default_n_clusters")]
    pub n_clusters: usize,

    /// TF-IDF vocabulary cap
    #[serde(default = "default_max_features")]
    pub max_features: usize,

    #[serde(default = "default_kmeans_seed")]
    pub kmeans_seed: u64,

    /// Minimum fuzzy ratio for a title to match
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f64,

    /// Seed for surprise picks; OS entropy when unset
    #[serde(default)]
    pub surprise_seed: Option<u64>,
}

fn default_data_source() -> String {
    "https://strmovies.blob.core.windows.net/datasets-movies/movies_metadata.csv".to_string()
}

fn default_max_rows() -> usize {
    MAX_CATALOG_SIZE
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_n_clusters() -> usize {
    20
}

fn default_max_features() -> usize {
    5000
}

fn default_kmeans_seed() -> u64 {
    42
}

fn default_match_threshold() -> f64 {
    DEFAULT_MATCH_THRESHOLD
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_source: default_data_source(),
            max_rows: default_max_rows(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            n_clusters: default_n_clusters(),
            max_features: default_max_features(),
            kmeans_seed: default_kmeans_seed(),
            match_threshold: default_match_threshold(),
            surprise_seed: None,
        }
    }
}

impl EngineConfig {
    /// Load configuration from the environment, reading `.env` first if present
    pub fn from_env() -> Result<Self, EngineError> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from explicit `(key, value)` pairs using the
    /// `CINEMATCH_` prefix.
    pub fn from_vars<I>(vars: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed(ENV_PREFIX).from_iter::<_, Self>(vars)?)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            max_rows: self.max_rows,
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
        }
    }

    pub fn feature_config(&self) -> FeatureConfig {
        FeatureConfig {
            max_features: self.max_features,
            n_clusters: self.n_clusters,
            seed: self.kmeans_seed,
            ..FeatureConfig::default()
        }
    }
}
