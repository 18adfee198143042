//! Candidate types shared by every source and by the filter pipeline.

use data_loader::MovieIndex;
use serde::{Deserialize, Serialize};

/// Which source produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandidateSource {
    /// Hybrid content similarity + cluster membership around an anchor movie
    Similarity,
    /// Plain scan of the whole catalog
    Catalog,
}

/// Extra signals kept for explanations
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateMetadata {
    /// Cosine similarity to the anchor movie
    pub cosine: Option<f32>,
    /// Whether the candidate shares the anchor's cluster
    pub same_cluster: Option<bool>,
}

/// A movie proposed for recommendation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub index: MovieIndex,
    pub source: CandidateSource,
    /// Source-specific score, higher is better
    pub base_score: f32,
    pub metadata: CandidateMetadata,
}

impl Candidate {
    pub fn new(index: MovieIndex, source: CandidateSource, base_score: f32) -> Self {
        Self {
            index,
            source,
            base_score,
            metadata: CandidateMetadata::default(),
        }
    }
}
