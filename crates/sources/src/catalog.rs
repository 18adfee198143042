//! Catalog Source - every movie as a candidate
//!
//! Feeds the filter pipeline for genre, keyword and surprise queries. The
//! base score is the vote average so downstream ranking can reuse it.

use crate::types::{Candidate, CandidateSource};
use data_loader::Catalog;
use tracing::debug;

/// Yields one candidate per catalog movie, in index order
#[derive(Debug, Clone, Copy)]
pub struct CatalogSource<'a> {
    catalog: &'a Catalog,
}

impl<'a> CatalogSource<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn get_candidates(&self) -> Vec<Candidate> {
        let candidates: Vec<Candidate> = self
            .catalog
            .movies()
            .iter()
            .map(|m| Candidate::new(m.index, CandidateSource::Catalog, m.vote_average as f32))
            .collect();
        debug!("Generated {} catalog candidates", candidates.len());
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::MovieRow;

    #[test]
    fn test_every_movie_in_order() {
        let catalog = Catalog::from_rows([
            MovieRow::new("A", "G", "O", 1.0, 7.5),
            MovieRow::new("B", "G", "O", 2.0, 6.0),
        ]);
        let candidates = CatalogSource::new(&catalog).get_candidates();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[1].index, 1);
        assert_eq!(candidates[0].base_score, 7.5);
        assert_eq!(candidates[0].source, CandidateSource::Catalog);
    }
}
