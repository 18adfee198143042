//! Similarity Source - content similarity blended with cluster membership
//!
//! ## Algorithm
//! For an anchor movie `a` and every other movie `i`:
//!
//! ```text
//! score(i) = alpha * cosine(a, i) + (1 - alpha) * [cluster(i) == cluster(a)]
//! ```
//!
//! The anchor itself is never a candidate. Candidates are ranked by score,
//! descending, with ties broken by catalog index.

use crate::types::{Candidate, CandidateMetadata, CandidateSource};
use data_loader::{Catalog, MovieIndex};
use features::MovieFeatures;
use tracing::{debug, instrument};

/// Default weight of content similarity against the cluster bonus
pub const DEFAULT_ALPHA: f32 = 0.6;

/// Generates candidates similar to an anchor movie
#[derive(Debug, Clone, Copy)]
pub struct SimilaritySource<'a> {
    catalog: &'a Catalog,
    features: &'a MovieFeatures,
    alpha: f32,
}

impl<'a> SimilaritySource<'a> {
    /// Create a new similarity source over a catalog and its features
    pub fn new(catalog: &'a Catalog, features: &'a MovieFeatures) -> Self {
        Self {
            catalog,
            features,
            alpha: DEFAULT_ALPHA,
        }
    }

    /// Configure the similarity weight (default: 0.6)
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Score every movie except `anchor` and return the best `limit`.
    #[instrument(skip(self), fields(alpha = self.alpha))]
    pub fn get_candidates(&self, anchor: MovieIndex, limit: usize) -> Vec<Candidate> {
        let n = self.catalog.len().min(self.features.similarity.len());
        if anchor >= n {
            return Vec::new();
        }
        let clusters = &self.features.clusters;

        let mut candidates: Vec<Candidate> = self
            .features
            .similarity
            .row(anchor)
            .take(n)
            .filter(|&(i, _)| i != anchor)
            .map(|(i, cosine)| {
                let same_cluster = clusters.same_cluster(anchor, i);
                let bonus = if same_cluster { 1.0 } else { 0.0 };
                let score = self.alpha * cosine + (1.0 - self.alpha) * bonus;
                Candidate {
                    index: i,
                    source: CandidateSource::Similarity,
                    base_score: score,
                    metadata: CandidateMetadata {
                        cosine: Some(cosine),
                        same_cluster: Some(same_cluster),
                    },
                }
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.base_score
                .total_cmp(&a.base_score)
                .then_with(|| a.index.cmp(&b.index))
        });
        candidates.truncate(limit);

        debug!(
            "Generated {} similarity candidates for movie {}",
            candidates.len(),
            anchor
        );
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::MovieRow;
    use features::{ClusterAssignment, SimilarityMatrix, SparseVector};

    /// Four movies: 0 and 1 share text, 0 and 2 share a cluster.
    fn setup() -> (Catalog, MovieFeatures) {
        let rows = (0..4).map(|i| MovieRow::new(format!("M{i}"), "G", "O", 0.0, 0.0));
        let catalog = Catalog::from_rows(rows);
        let vectors = vec![
            SparseVector::from_pairs(vec![(0, 1.0)]),
            SparseVector::from_pairs(vec![(0, 1.0), (1, 1.0)]),
            SparseVector::from_pairs(vec![(2, 1.0)]),
            SparseVector::from_pairs(vec![(3, 1.0)]),
        ];
        let features = MovieFeatures {
            similarity: SimilarityMatrix::from_vectors(&vectors, 4),
            clusters: ClusterAssignment::new(vec![0, 1, 0, 1], 2),
            vocabulary_size: 4,
        };
        (catalog, features)
    }

    #[test]
    fn test_anchor_is_excluded() {
        let (catalog, features) = setup();
        let candidates = SimilaritySource::new(&catalog, &features).get_candidates(0, 10);
        assert_eq!(candidates.len(), 3);
        assert!(candidates.iter().all(|c| c.index != 0));
    }

    #[test]
    fn test_scores_blend_cosine_and_cluster() {
        let (catalog, features) = setup();
        let candidates = SimilaritySource::new(&catalog, &features).get_candidates(0, 10);
        // movie 1: 0.6 * 0.707, movie 2: 0.4 (cluster bonus), movie 3: 0
        assert_eq!(candidates[0].index, 1);
        assert!((candidates[0].base_score - 0.6 / 2f32.sqrt()).abs() < 1e-6);
        assert_eq!(candidates[1].index, 2);
        assert!((candidates[1].base_score - 0.4).abs() < 1e-6);
        assert_eq!(candidates[1].metadata.same_cluster, Some(true));
        assert_eq!(candidates[2].index, 3);
    }

    #[test]
    fn test_alpha_one_ignores_clusters() {
        let (catalog, features) = setup();
        let candidates = SimilaritySource::new(&catalog, &features)
            .with_alpha(1.0)
            .get_candidates(0, 10);
        assert_eq!(candidates[0].index, 1);
        // movies 2 and 3 tie at 0 and fall back to index order
        assert_eq!(candidates[1].index, 2);
        assert_eq!(candidates[2].index, 3);
        assert_eq!(candidates[1].base_score, 0.0);
    }

    #[test]
    fn test_limit_and_out_of_range_anchor() {
        let (catalog, features) = setup();
        let source = SimilaritySource::new(&catalog, &features);
        assert_eq!(source.get_candidates(0, 1).len(), 1);
        assert!(source.get_candidates(99, 10).is_empty());
    }
}
