//! # Sources Crate
//!
//! Candidate generation for movie recommendations.
//!
//! ## Components
//!
//! ### Similarity Source
//! Content-based: "movies like this one"
//! - Blends TF-IDF cosine similarity with a same-cluster bonus
//! - Never returns the anchor movie
//!
//! ### Catalog Source
//! Every movie in the catalog, ready for the filter pipeline
//!
//! ### Title matching and random picks
//! - `find_best_title`: fuzzy resolution of a typed title to a catalog index
//! - `pick_random`: seeded uniform choice for surprise picks
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{find_best_title, SimilaritySource, DEFAULT_MATCH_THRESHOLD};
//!
//! let anchor = find_best_title("Inseption", &catalog, DEFAULT_MATCH_THRESHOLD)
//!     .ok_or("not found")?;
//! let candidates = SimilaritySource::new(&catalog, &features)
//!     .with_alpha(0.6)
//!     .get_candidates(anchor, 10);
//! ```

// Public modules
pub mod catalog;
pub mod similarity;
pub mod surprise;
pub mod title_match;
pub mod types;

// Re-export commonly used types
pub use catalog::CatalogSource;
pub use similarity::{DEFAULT_ALPHA, SimilaritySource};
pub use surprise::pick_random;
pub use title_match::{
    DEFAULT_MATCH_THRESHOLD, SequenceMatcher, TitleMatch, TitleMatcher, find_best_title,
    find_best_title_with,
};
pub use types::{Candidate, CandidateMetadata, CandidateSource};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_creation() {
        let candidate = Candidate::new(1, CandidateSource::Similarity, 0.85);
        assert_eq!(candidate.index, 1);
        assert_eq!(candidate.source, CandidateSource::Similarity);
        assert_eq!(candidate.base_score, 0.85);
        assert_eq!(candidate.metadata, CandidateMetadata::default());
    }
}
