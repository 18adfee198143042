//! # Features Crate
//!
//! Derives content features from a [`data_loader::Catalog`]:
//!
//! - **tokenize** / **stop_words**: lower-case word tokens, English stop words removed
//! - **tfidf**: vocabulary-capped TF-IDF vectors (sparse, L2-normalized)
//! - **kmeans**: seeded k-means clustering of those vectors
//! - **similarity**: packed, symmetric cosine similarity matrix
//! - **builder**: `FeatureBuilder` running the whole pipeline once at startup
//!
//! ## Example Usage
//!
//! ```ignore
//! use features::{FeatureBuilder, FeatureConfig};
//!
//! let features = FeatureBuilder::new(FeatureConfig::default()).build(&catalog)?;
//! let sim = features.similarity.get(0, 1);
//! let cluster = features.clusters.cluster_of(0);
//! ```

pub mod builder;
pub mod error;
pub mod kmeans;
pub mod similarity;
pub mod stop_words;
pub mod tfidf;
pub mod tokenize;

// Re-export main types
pub use builder::{ClusterAssignment, FeatureBuilder, FeatureConfig, MovieFeatures};
pub use error::{FeatureError, Result};
pub use kmeans::{KMeans, KMeansFit};
pub use similarity::SimilarityMatrix;
pub use tfidf::{SparseVector, TfidfModel, TfidfVectorizer};
pub use tokenize::Tokenizer;
