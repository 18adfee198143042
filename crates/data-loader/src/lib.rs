//! # Data Loader Crate
//!
//! This crate turns a tabular movie-metadata source (CSV file or URL) into
//! an in-memory [`Catalog`].
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Movie, MovieRow, Catalog)
//! - **parser**: Parse CSV bytes into cleaned rows
//! - **source**: Resolve a locator and fetch it with a timeout
//! - **catalog**: Glue the above into `Catalog::load`
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{Catalog, DataSource, LoadOptions};
//!
//! let source = DataSource::parse("data/movies_metadata.csv");
//! let catalog = Catalog::load(&source, &LoadOptions::default()).await?;
//!
//! let movie = catalog.get(0).unwrap();
//! println!("{} ({})", movie.title, movie.genres);
//! ```

// Public modules
pub mod catalog;
pub mod error;
pub mod parser;
pub mod source;
pub mod types;

// Re-export commonly used types for convenience
pub use catalog::LoadOptions;
pub use error::{DataLoadError, Result};
pub use parser::{ParseStats, ParsedTable};
pub use source::DataSource;
pub use types::{
    // Type aliases
    ClusterId,
    MovieIndex,
    // Core types
    Catalog,
    Movie,
    MovieRow,
    // Constants
    MAX_CATALOG_SIZE,
    REQUIRED_COLUMNS,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_creation() {
        let catalog = Catalog::new();
        assert!(catalog.is_empty());
        assert!(catalog.get(0).is_none());
    }

    #[test]
    fn test_schema_error_message_names_columns() {
        let err = DataLoadError::Schema {
            missing: vec!["overview".to_string(), "popularity".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Missing required columns: overview, popularity"
        );
        assert!(!err.is_data_source());
    }
}
