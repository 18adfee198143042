//! Error types for the engine crate.
//!
//! [`EngineError`] is fatal to startup. [`QueryError`] is the outcome of a
//! single query; its `Display` text is what the user sees.

use data_loader::DataLoadError;
use features::FeatureError;
use thiserror::Error;

/// Errors raised while building or loading the engine
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    DataLoad(#[from] DataLoadError),

    #[error(transparent)]
    Features(#[from] FeatureError),

    /// Environment configuration could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(#[from] envy::Error),

    /// The background build task panicked or was cancelled
    #[error("Engine build task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Coarse startup failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupErrorKind {
    /// Source unreachable, timed out or unreadable
    DataSource,
    /// Required columns missing
    Schema,
    /// Nothing left to vectorize
    EmptyCorpus,
    Config,
    Internal,
}

impl EngineError {
    pub fn kind(&self) -> StartupErrorKind {
        match self {
            EngineError::DataLoad(DataLoadError::Schema { .. }) => StartupErrorKind::Schema,
            EngineError::DataLoad(e) if e.is_data_source() => StartupErrorKind::DataSource,
            EngineError::DataLoad(_) => StartupErrorKind::Internal,
            EngineError::Features(FeatureError::EmptyCorpus) => StartupErrorKind::EmptyCorpus,
            EngineError::Features(FeatureError::InvalidConfig(_)) | EngineError::Config(_) => {
                StartupErrorKind::Config
            }
            EngineError::Features(FeatureError::Clustering(_)) | EngineError::Task(_) => {
                StartupErrorKind::Internal
            }
        }
    }
}

/// Errors returned by recommendation queries
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Movie '{query}' not found.")]
    TitleNotFound { query: String },

    #[error("No movies found for genre '{genre}'.")]
    GenreNotFound { genre: String },

    #[error("No movies found with keyword '{keyword}'.")]
    KeywordNotFound { keyword: String },

    #[error("alpha must be within [0, 1], got {0}")]
    InvalidAlpha(f32),

    #[error("Filter pipeline failed: {0}")]
    Pipeline(String),

    #[error("The recommendation engine has not loaded a catalog yet.")]
    NotInitialized,
}

impl QueryError {
    /// True for the expected "nothing matched" outcomes.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            QueryError::TitleNotFound { .. }
                | QueryError::GenreNotFound { .. }
                | QueryError::KeywordNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_messages() {
        let err = QueryError::TitleNotFound {
            query: "Zzyzx".to_string(),
        };
        assert_eq!(err.to_string(), "Movie 'Zzyzx' not found.");
        assert!(err.is_not_found());

        let err = QueryError::GenreNotFound {
            genre: "Horror".to_string(),
        };
        assert_eq!(err.to_string(), "No movies found for genre 'Horror'.");

        let err = QueryError::KeywordNotFound {
            keyword: "dream".to_string(),
        };
        assert_eq!(err.to_string(), "No movies found with keyword 'dream'.");
        assert!(!QueryError::InvalidAlpha(2.0).is_not_found());
        assert!(!QueryError::NotInitialized.is_not_found());
    }

    #[test]
    fn test_startup_kinds() {
        let schema = EngineError::from(DataLoadError::Schema {
            missing: vec!["overview".to_string()],
        });
        assert_eq!(schema.kind(), StartupErrorKind::Schema);
        assert_eq!(schema.to_string(), "Missing required columns: overview");

        let source = EngineError::from(DataLoadError::DataSource {
            locator: "nowhere.csv".to_string(),
            reason: "not found".to_string(),
        });
        assert_eq!(source.kind(), StartupErrorKind::DataSource);

        assert_eq!(
            EngineError::from(FeatureError::EmptyCorpus).kind(),
            StartupErrorKind::EmptyCorpus
        );
        assert_eq!(
            EngineError::from(FeatureError::Clustering("bad rows".to_string())).kind(),
            StartupErrorKind::Internal
        );
    }
}
