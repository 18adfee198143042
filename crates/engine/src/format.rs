//! Rendering of query results as display lines and JSON.

use data_loader::{Movie, MovieIndex};
use serde::Serialize;
use sources::Candidate;
use std::fmt;

/// Which fields a result line shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    /// `"{title} ⭐{vote}/10"`
    TitleOnly,
    /// `"{title} ({genres}) ⭐{vote}/10"`
    WithGenres,
}

/// One recommended movie
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub index: MovieIndex,
    pub title: String,
    pub genres: String,
    pub vote_average: f64,
    pub popularity: f64,
    /// Hybrid score, present for similarity results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cosine: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_cluster: Option<bool>,
    #[serde(skip)]
    pub style: LineStyle,
}

impl Recommendation {
    pub fn new(movie: &Movie, style: LineStyle) -> Self {
        Self {
            index: movie.index,
            title: movie.title.clone(),
            genres: movie.genres.clone(),
            vote_average: movie.vote_average,
            popularity: movie.popularity,
            score: None,
            cosine: None,
            same_cluster: None,
            style,
        }
    }

    /// Build from a similarity candidate, keeping its score breakdown.
    pub fn from_candidate(candidate: &Candidate, movie: &Movie, style: LineStyle) -> Self {
        Self {
            score: Some(candidate.base_score),
            cosine: candidate.metadata.cosine,
            same_cluster: candidate.metadata.same_cluster,
            ..Self::new(movie, style)
        }
    }

    /// Score breakdown, if this came from the similarity source
    pub fn explanation(&self) -> Option<String> {
        let score = self.score?;
        let cosine = self.cosine.unwrap_or(0.0);
        let cluster = if self.same_cluster == Some(true) {
            "same cluster"
        } else {
            "other cluster"
        };
        Some(format!("score {score:.3} (cosine {cosine:.3}, {cluster})"))
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rating = format_rating(self.vote_average);
        match self.style {
            LineStyle::TitleOnly => write!(f, "{} ⭐{}/10", self.title, rating),
            LineStyle::WithGenres => {
                write!(f, "{} ({}) ⭐{}/10", self.title, self.genres, rating)
            }
        }
    }
}

/// Ordered query results; displays as one line per movie.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RecommendationList {
    items: Vec<Recommendation>,
}

impl RecommendationList {
    pub fn new(items: Vec<Recommendation>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Recommendation> {
        self.items.iter()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.items.iter().map(|r| r.title.as_str()).collect()
    }
}

impl fmt::Display for RecommendationList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a RecommendationList {
    type Item = &'a Recommendation;
    type IntoIter = std::slice::Iter<'a, Recommendation>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// A single random movie
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SurprisePick(pub Recommendation);

impl fmt::Display for SurprisePick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let movie = &self.0;
        write!(
            f,
            "🎬 Surprise Pick: {} ({}) ⭐{}/10",
            movie.title,
            movie.genres,
            format_rating(movie.vote_average)
        )
    }
}

/// Rating text: whole numbers keep one decimal (`7.0`), everything else
/// uses the shortest representation (`6.5`, `8.25`).
pub fn format_rating(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
