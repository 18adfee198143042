//! Core domain types for the movie catalog.
//!
//! A [`Catalog`] is an ordered, capped list of [`Movie`] records whose
//! `index` field always equals the record's position. Nothing outside this
//! module can push a movie without going through [`Catalog::push`], which is
//! what keeps the indices dense.

use crate::error::{DataLoadError, Result};
use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// Positional identifier of a movie inside a loaded catalog (0-based, dense)
pub type MovieIndex = usize;

/// Identifier of a topical cluster assigned by the feature builder
pub type ClusterId = u32;

/// Hard upper bound on the number of movies a catalog may hold
pub const MAX_CATALOG_SIZE: usize = 5000;

/// Columns every source must provide, in catalog field order
pub const REQUIRED_COLUMNS: [&str; 5] =
    ["title", "genres", "overview", "popularity", "vote_average"];

// =============================================================================
// Movie-related Types
// =============================================================================

/// A cleaned source row, before it is placed in a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRow {
    pub title: String,
    pub genres: String,
    pub overview: String,
    pub popularity: f64,
    pub vote_average: f64,
}

impl MovieRow {
    pub fn new(
        title: impl Into<String>,
        genres: impl Into<String>,
        overview: impl Into<String>,
        popularity: f64,
        vote_average: f64,
    ) -> Self {
        Self {
            title: title.into(),
            genres: genres.into(),
            overview: overview.into(),
            popularity,
            vote_average,
        }
    }
}

/// A movie in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Position in the catalog
    pub index: MovieIndex,
    pub title: String,
    /// Free-form genre text, possibly naming several genres
    pub genres: String,
    /// Plot synopsis
    pub overview: String,
    pub popularity: f64,
    /// Average vote on a 0-10 scale
    pub vote_average: f64,
    /// Title, genres and overview joined by spaces, lower-cased
    pub combined_text: String,
    /// Set once features have been attached to the catalog
    pub cluster_id: Option<ClusterId>,
}

impl Movie {
    fn from_row(index: MovieIndex, row: MovieRow) -> Self {
        let combined_text = combine_text(&row.title, &row.genres, &row.overview);
        Self {
            index,
            title: row.title,
            genres: row.genres,
            overview: row.overview,
            popularity: row.popularity,
            vote_average: row.vote_average,
            combined_text,
            cluster_id: None,
        }
    }

    /// Case-insensitive substring test against the genres field.
    ///
    /// `needle_lower` must already be lower-cased.
    pub fn genres_contain(&self, needle_lower: &str) -> bool {
        self.genres.to_lowercase().contains(needle_lower)
    }

    /// Case-insensitive substring test against the overview.
    pub fn overview_contains(&self, needle_lower: &str) -> bool {
        self.overview.to_lowercase().contains(needle_lower)
    }
}

/// Build the text the vectorizer sees for a movie.
pub fn combine_text(title: &str, genres: &str, overview: &str) -> String {
    format!("{} {} {}", title, genres, overview).to_lowercase()
}

// =============================================================================
// Catalog - The In-Memory Movie Table
// =============================================================================

/// Ordered, capped collection of movies.
///
/// Invariants:
/// - `movies[i].index == i` for every `i`
/// - `len() <= MAX_CATALOG_SIZE`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    movies: Vec<Movie>,
}

impl Catalog {
    /// Creates a new, empty Catalog
    pub fn new() -> Self {
        Self { movies: Vec::new() }
    }

    /// Build a catalog from rows in order, silently stopping at the cap.
    pub fn from_rows(rows: impl IntoIterator<Item = MovieRow>) -> Self {
        let mut catalog = Self::new();
        for row in rows {
            if catalog.push(row).is_none() {
                break;
            }
        }
        catalog
    }

    /// Append a movie, returning its index, or `None` once the catalog is full.
    pub fn push(&mut self, row: MovieRow) -> Option<MovieIndex> {
        if self.movies.len() >= MAX_CATALOG_SIZE {
            return None;
        }
        let index = self.movies.len();
        self.movies.push(Movie::from_row(index, row));
        Some(index)
    }

    pub fn get(&self, index: MovieIndex) -> Option<&Movie> {
        self.movies.get(index)
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// The vectorizer input, one document per movie in index order.
    pub fn documents(&self) -> Vec<&str> {
        self.movies.iter().map(|m| m.combined_text.as_str()).collect()
    }

    /// Record each movie's cluster id. `labels` must be indexed by movie index.
    pub fn assign_clusters(&mut self, labels: &[ClusterId]) -> Result<()> {
        if labels.len() != self.movies.len() {
            return Err(DataLoadError::Validation(format!(
                "expected {} cluster labels, got {}",
                self.movies.len(),
                labels.len()
            )));
        }
        for (movie, &label) in self.movies.iter_mut().zip(labels) {
            movie.cluster_id = Some(label);
        }
        Ok(())
    }

    /// Check the dense-index invariant.
    pub fn validate(&self) -> Result<()> {
        if self.movies.len() > MAX_CATALOG_SIZE {
            return Err(DataLoadError::Validation(format!(
                "catalog holds {} movies, limit is {}",
                self.movies.len(),
                MAX_CATALOG_SIZE
            )));
        }
        match self.movies.iter().enumerate().find(|(i, m)| m.index != *i) {
            Some((position, movie)) => Err(DataLoadError::Validation(format!(
                "movie at position {} carries index {}",
                position, movie.index
            ))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(title: &str) -> MovieRow {
        MovieRow::new(title, "Drama", "Some plot", 1.0, 5.0)
    }

    #[test]
    fn test_push_assigns_dense_indices() {
        let mut catalog = Catalog::new();
        assert_eq!(catalog.push(row("A")), Some(0));
        assert_eq!(catalog.push(row("B")), Some(1));
        assert_eq!(catalog.get(1).unwrap().title, "B");
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn test_catalog_is_capped() {
        let catalog = Catalog::from_rows((0..MAX_CATALOG_SIZE + 10).map(|i| row(&format!("M{i}"))));
        assert_eq!(catalog.len(), MAX_CATALOG_SIZE);
        assert_eq!(catalog.movies().last().unwrap().index, MAX_CATALOG_SIZE - 1);
    }

    #[test]
    fn test_combined_text_is_lowercase_and_space_joined() {
        let catalog = Catalog::from_rows([MovieRow::new("Heat", "Crime", "A Heist.", 0.0, 0.0)]);
        assert_eq!(catalog.get(0).unwrap().combined_text, "heat crime a heist.");
    }

    #[test]
    fn test_assign_clusters_checks_length() {
        let mut catalog = Catalog::from_rows([row("A"), row("B")]);
        assert!(catalog.assign_clusters(&[0]).is_err());
        catalog.assign_clusters(&[3, 1]).unwrap();
        assert_eq!(catalog.get(0).unwrap().cluster_id, Some(3));
    }

    #[test]
    fn test_case_insensitive_field_matching() {
        let catalog = Catalog::from_rows([MovieRow::new(
            "X",
            "Science Fiction",
            "Dreams within DREAMS",
            0.0,
            0.0,
        )]);
        let movie = catalog.get(0).unwrap();
        assert!(movie.genres_contain("fiction"));
        assert!(movie.overview_contains("dreams"));
        assert!(!movie.overview_contains("horror"));
    }
}
