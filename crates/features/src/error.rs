//! Error types for the features crate.

use thiserror::Error;

/// Errors raised while building text features
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeatureError {
    /// Vectorization is undefined on zero documents
    #[error("Cannot build features: the catalog is empty")]
    EmptyCorpus,

    /// A configuration value makes the build impossible
    #[error("Invalid feature configuration: {0}")]
    InvalidConfig(String),

    /// The clustering backend rejected the data or parameters
    #[error("Clustering failed: {0}")]
    Clustering(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, FeatureError>;
