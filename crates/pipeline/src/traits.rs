//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to candidate sets.

use anyhow::Result;
use data_loader::Catalog;
use sources::Candidate;

/// Core trait for filtering candidates.
///
/// All filters must implement this trait to be used in the FilterPipeline.
/// Filters take ownership of the candidates and must preserve the order of
/// the ones they keep.
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of candidates.
    ///
    /// # Arguments
    /// * `candidates` - The candidates to filter (takes ownership)
    /// * `catalog` - The catalog the candidate indices point into
    fn apply(&self, candidates: Vec<Candidate>, catalog: &Catalog) -> Result<Vec<Candidate>>;
}
