//! Filter to keep only movies whose overview mentions a keyword.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::Catalog;
use rayon::prelude::*;
use sources::Candidate;

/// Keeps candidates whose overview contains the keyword, ignoring case.
///
/// Matching is a plain substring test, so "dream" also matches "dreams".
#[derive(Debug, Clone)]
pub struct KeywordFilter {
    keyword: String,
}

impl KeywordFilter {
    pub fn new(keyword: impl AsRef<str>) -> Self {
        Self {
            keyword: keyword.as_ref().to_lowercase(),
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }
}

impl Filter for KeywordFilter {
    fn name(&self) -> &str {
        "KeywordFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, catalog: &Catalog) -> Result<Vec<Candidate>> {
        let filtered: Vec<Candidate> = candidates
            .into_par_iter()
            .filter(|candidate| {
                catalog
                    .get(candidate.index)
                    .is_some_and(|movie| movie.overview_contains(&self.keyword))
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

    #[test]
    fn test_keyword_filter() {
        let catalog = Catalog::from_rows([
            MovieRow::new(
                "Inception",
                "Sci-Fi",
                "A thief who steals secrets through Dreams",
                29.0,
                8.3,
            ),
            MovieRow::new(
                "Interstellar",
                "Sci-Fi",
                "Explorers travel through a wormhole",
                32.0,
                8.4,
            ),
        ]);
        let candidates = CatalogSource::new(&catalog).get_candidates();

        let filtered = KeywordFilter::new("dream").apply(candidates, &catalog).unwrap();

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].index, 0);
    }

    #[test]
    fn test_keyword_ignores_title_and_genres() {
        let catalog = Catalog::from_rows([MovieRow::new(
            "Dreamgirls",
            "Dream Music",
            "Three singers",
            5.0,
            6.5,
        )]);
        let candidates = CatalogSource::new(&catalog).get_candidates();

        let filtered = KeywordFilter::new("dream").apply(candidates, &catalog).unwrap();
        assert!(filtered.is_empty());
    }
}
