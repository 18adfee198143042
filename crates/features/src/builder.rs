//! The feature-building pipeline: vectorize, then cluster and compare.

use crate::error::{FeatureError, Result};
use crate::kmeans::KMeans;
use crate::similarity::SimilarityMatrix;
use crate::tfidf::TfidfVectorizer;
use data_loader::{Catalog, ClusterId, MovieIndex};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Parameters of the feature build
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Vocabulary cap for the vectorizer
    pub max_features: usize,
    /// Requested number of clusters (capped at the catalog size)
    pub n_clusters: usize,
    /// Seed for the k-means++ initialization RNG
    pub seed: u64,
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            max_features: 5000,
            n_clusters: 20,
            seed: 42,
            max_iterations: 300,
            tolerance: 1e-4,
        }
    }
}

/// Movie index -> cluster id, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterAssignment {
    labels: Vec<ClusterId>,
    k: usize,
}

impl ClusterAssignment {
    pub fn new(labels: Vec<ClusterId>, k: usize) -> Self {
        Self { labels, k }
    }

    pub fn cluster_of(&self, index: MovieIndex) -> Option<ClusterId> {
        self.labels.get(index).copied()
    }

    /// Number of clusters
    pub fn k(&self) -> usize {
        self.k
    }

    pub fn labels(&self) -> &[ClusterId] {
        &self.labels
    }

    pub fn same_cluster(&self, a: MovieIndex, b: MovieIndex) -> bool {
        match (self.cluster_of(a), self.cluster_of(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

}

/// Everything derived from the catalog text.
#[derive(Debug, Clone)]
pub struct MovieFeatures {
    pub similarity: SimilarityMatrix,
    pub clusters: ClusterAssignment,
    /// Size of the fitted vocabulary
    pub vocabulary_size: usize,
}

/// Builds [`MovieFeatures`] for a catalog.
#[derive(Debug, Clone, Default)]
pub struct FeatureBuilder {
    config: FeatureConfig,
}

impl FeatureBuilder {
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }

    /// Vectorize every movie's `combined_text`, then run clustering and the
    /// similarity computation in parallel.
    #[instrument(skip(self, catalog), fields(movies = catalog.len()))]
    pub fn build(&self, catalog: &Catalog) -> Result<MovieFeatures> {
        if catalog.is_empty() {
            return Err(FeatureError::EmptyCorpus);
        }
        if self.config.n_clusters == 0 {
            return Err(FeatureError::InvalidConfig(
                "n_clusters must be at least 1".to_string(),
            ));
        }
        if self.config.max_features == 0 {
            return Err(FeatureError::InvalidConfig(
                "max_features must be at least 1".to_string(),
            ));
        }

        let start = Instant::now();
        let documents = catalog.documents();
        let (model, vectors) =
            TfidfVectorizer::new(self.config.max_features).fit_transform(&documents);
        let dim = model.dimension();
        info!(
            "TF-IDF: {} documents, {} terms in {:.2?}",
            vectors.len(),
            dim,
            start.elapsed()
        );
        debug!(
            "First terms: {:?}; {} non-zero weights",
            &model.terms()[..dim.min(10)],
            vectors.iter().map(|v| v.nnz()).sum::<usize>()
        );
        let blank = vectors.iter().filter(|v| v.is_zero()).count();
        if blank > 0 {
            warn!(
                "{} movies have no vocabulary terms; their similarities are all 0",
                blank
            );
        }

        let kmeans = KMeans::new(self.config.n_clusters, self.config.seed)
            .with_max_iterations(self.config.max_iterations)
            .with_tolerance(self.config.tolerance);

        // Run clustering and similarity in parallel
        let (fit, similarity) = rayon::join(
            || kmeans.fit(&vectors, dim),
            || SimilarityMatrix::from_vectors(&vectors, dim),
        );
        let fit = fit?;

        info!(
            "Features built in {:.2?}: {} clusters, {}x{} similarity matrix",
            start.elapsed(),
            fit.k,
            similarity.len(),
            similarity.len()
        );

        Ok(MovieFeatures {
            similarity,
            clusters: ClusterAssignment::new(fit.labels, fit.k),
            vocabulary_size: dim,
        })
    }
}
