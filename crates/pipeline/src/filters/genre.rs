//! Filter to keep only movies whose genres mention a given genre.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::Catalog;
use rayon::prelude::*;
use sources::Candidate;

/// Keeps candidates whose genres field contains the genre, ignoring case.
///
/// ## Algorithm
/// 1. Lower-case the requested genre once at construction
/// 2. For each candidate, look up the movie and substring-test its genres
/// 3. Drop candidates whose index is not in the catalog
///
/// An empty genre matches every movie.
#[derive(Debug, Clone)]
pub struct GenreFilter {
    genre: String,
}

impl GenreFilter {
    pub fn new(genre: impl AsRef<str>) -> Self {
        Self {
            genre: genre.as_ref().to_lowercase(),
        }
    }

    /// The lower-cased genre this filter matches
    pub fn genre(&self) -> &str {
        &self.genre
    }
}

impl Filter for GenreFilter {
    fn name(&self) -> &str {
        "GenreFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, catalog: &Catalog) -> Result<Vec<Candidate>> {
        let filtered: Vec<Candidate> = candidates
            .into_par_iter()
            .filter(|candidate| {
                catalog
                    .get(candidate.index)
                    .is_some_and(|movie| movie.genres_contain(&self.genre))
            })
            .collect();
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::MovieRow;
    use sources::CatalogSource;

    fn create_test_catalog() -> Catalog {
        Catalog::from_rows([
            MovieRow::new(
                "Die Hard",
                "Action, Thriller",
                "A cop in a tower",
                30.0,
                8.0,
            ),
            MovieRow::new("Amelie", "Comedy, Romance", "A shy waitress", 12.0, 7.9),
            MovieRow::new(
                "Heat",
                "Action, Crime, Drama",
                "A detective hunts a thief",
                20.0,
                7.9,
            ),
        ])
    }

    #[test]
    fn test_genre_filter_is_case_insensitive() {
        let catalog = create_test_catalog();
        let candidates = CatalogSource::new(&catalog).get_candidates();

        let filtered = GenreFilter::new("ACTION").apply(candidates, &catalog).unwrap();

        let indices: Vec<_> = filtered.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn test_genre_filter_matches_substrings() {
        let catalog = create_test_catalog();
        let candidates = CatalogSource::new(&catalog).get_candidates();

        let filtered = GenreFilter::new("rom").apply(candidates, &catalog).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].index, 1);
    }

    #[test]
    fn test_unknown_indices_are_dropped() {
        let catalog = create_test_catalog();
        let candidates = vec![Candidate::new(42, sources::CandidateSource::Catalog, 1.0)];

        let filtered = GenreFilter::new("").apply(candidates, &catalog).unwrap();
        assert!(filtered.is_empty());
    }
}
