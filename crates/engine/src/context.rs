//! # Engine Context
//!
//! An immutable snapshot of everything a query needs: the catalog (with
//! cluster ids attached) and its derived features. All four query
//! operations are pure reads against it.
//!
//! ## Query flow
//! 1. Generate candidates (`SimilaritySource` or `CatalogSource`)
//! 2. Apply filters (`GenreFilter`, `KeywordFilter`)
//! 3. Rank and truncate, or pick one at random
//! 4. Format into display lines

use std::time::Instant;

use rand::Rng;
use tracing::{debug, info};

use data_loader::{Catalog, MovieIndex};
use features::{FeatureBuilder, FeatureConfig, MovieFeatures};
use pipeline::filters::{GenreFilter, KeywordFilter};
use pipeline::{FilterPipeline, rank_by_rating};
use sources::{
    Candidate, CatalogSource, DEFAULT_MATCH_THRESHOLD, SimilaritySource, find_best_title,
    pick_random,
};

use crate::error::{EngineError, QueryError};
use crate::format::{LineStyle, Recommendation, RecommendationList, SurprisePick};

/// Default number of results per query
pub const DEFAULT_TOP_N: usize = 10;

/// Movies eligible for a surprise pick. Building one never touches an RNG,
/// and a pool returned by [`EngineContext::surprise_pool`] is never empty.
#[derive(Debug, Clone)]
pub struct SurprisePool {
    genre: Option<String>,
    candidates: Vec<Candidate>,
}

impl SurprisePool {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Draw one movie uniformly at random.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<MovieIndex> {
        pick_random(&self.candidates, rng).map(|c| c.index)
    }

    fn not_found(&self) -> QueryError {
        QueryError::GenreNotFound {
            genre: self.genre.clone().unwrap_or_default(),
        }
    }
}

/// Catalog plus features, built once and shared read-only
#[derive(Debug, Clone)]
pub struct EngineContext {
    catalog: Catalog,
    features: MovieFeatures,
    match_threshold: f64,
}

impl EngineContext {
    /// Build features for `catalog` and attach each movie's cluster id.
    pub fn build(mut catalog: Catalog, config: &FeatureConfig) -> Result<Self, EngineError> {
        let start = Instant::now();
        let features = FeatureBuilder::new(*config).build(&catalog)?;
        catalog.assign_clusters(features.clusters.labels())?;
        info!(
            "Engine context ready: {} movies, {} clusters, {} terms in {:.2?}",
            catalog.len(),
            features.clusters.k(),
            features.vocabulary_size,
            start.elapsed()
        );
        Ok(Self {
            catalog,
            features,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
        })
    }

    /// Configure the fuzzy title threshold (default: 0.5)
    pub fn with_match_threshold(mut self, threshold: f64) -> Self {
        self.match_threshold = threshold;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn features(&self) -> &MovieFeatures {
        &self.features
    }

    /// Movies similar to the best fuzzy match for `query_title`.
    ///
    /// Each other movie scores `alpha * cosine + (1 - alpha) * same_cluster`.
    /// The matched movie itself is never returned.
    pub fn hybrid_recommend(
        &self,
        query_title: &str,
        top_n: usize,
        alpha: f32,
    ) -> Result<RecommendationList, QueryError> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(QueryError::InvalidAlpha(alpha));
        }
        let anchor = find_best_title(query_title, &self.catalog, self.match_threshold)
            .ok_or_else(|| QueryError::TitleNotFound {
                query: query_title.to_string(),
            })?;
        debug!(
            "Resolved {:?} to {:?}",
            query_title,
            self.catalog.get(anchor).map(|m| &m.title)
        );

        let candidates = SimilaritySource::new(&self.catalog, &self.features)
            .with_alpha(alpha)
            .get_candidates(anchor, top_n);
        Ok(self.to_list(&candidates, LineStyle::WithGenres, true))
    }

    /// Best-rated movies whose genres mention `genre` (case-insensitive).
    pub fn recommend_by_genre(
        &self,
        genre: &str,
        top_n: usize,
    ) -> Result<RecommendationList, QueryError> {
        let pipeline = FilterPipeline::new().add_filter(GenreFilter::new(genre));
        let matches = self.filter_catalog(pipeline)?;
        if matches.is_empty() {
            return Err(QueryError::GenreNotFound {
                genre: genre.to_string(),
            });
        }
        let ranked = rank_by_rating(matches, &self.catalog, top_n);
        Ok(self.to_list(&ranked, LineStyle::TitleOnly, false))
    }

    /// Best-rated movies whose overview mentions `keyword` (case-insensitive).
    pub fn recommend_by_keyword(
        &self,
        keyword: &str,
        top_n: usize,
    ) -> Result<RecommendationList, QueryError> {
        let pipeline = FilterPipeline::new().add_filter(KeywordFilter::new(keyword));
        let matches = self.filter_catalog(pipeline)?;
        if matches.is_empty() {
            return Err(QueryError::KeywordNotFound {
                keyword: keyword.to_string(),
            });
        }
        let ranked = rank_by_rating(matches, &self.catalog, top_n);
        Ok(self.to_list(&ranked, LineStyle::WithGenres, false))
    }

    /// One uniformly random movie, optionally restricted to a genre.
    /// A blank genre means no restriction.
    pub fn surprise_me<R: Rng + ?Sized>(
        &self,
        genre: Option<&str>,
        rng: &mut R,
    ) -> Result<SurprisePick, QueryError> {
        let pool = self.surprise_pool(genre)?;
        let drawn = pool.draw(rng);
        self.surprise_pick(&pool, drawn)
    }

    /// The movies [`EngineContext::surprise_me`] draws from. Fails with
    /// `GenreNotFound` when nothing matches.
    pub fn surprise_pool(&self, genre: Option<&str>) -> Result<SurprisePool, QueryError> {
        let genre = genre.map(str::trim).filter(|g| !g.is_empty());
        let mut pipeline = FilterPipeline::new();
        if let Some(g) = genre {
            pipeline = pipeline.add_filter(GenreFilter::new(g));
        }
        let pool = SurprisePool {
            genre: genre.map(str::to_string),
            candidates: self.filter_catalog(pipeline)?,
        };
        if pool.is_empty() {
            return Err(pool.not_found());
        }
        debug!("Surprise pool holds {} movies", pool.len());
        Ok(pool)
    }

    /// Format the movie drawn from `pool`.
    pub(crate) fn surprise_pick(
        &self,
        pool: &SurprisePool,
        drawn: Option<MovieIndex>,
    ) -> Result<SurprisePick, QueryError> {
        let movie = drawn
            .and_then(|index| self.catalog.get(index))
            .ok_or_else(|| pool.not_found())?;
        Ok(
            SurprisePick(Recommendation::new(movie, LineStyle::WithGenres)),
        )
    }

    fn filter_catalog(&self, pipeline: FilterPipeline) -> Result<Vec<Candidate>, QueryError> {
        pipeline
            .apply(
                CatalogSource::new(&self.catalog).get_candidates(),
                &self.catalog,
            )
            .map_err(|e| QueryError::Pipeline(format!("{e:#}")))
    }

    fn to_list(
        &self,
        candidates: &[Candidate],
        style: LineStyle,
        keep_scores: bool,
    ) -> RecommendationList {
        let items = candidates
            .iter()
            .filter_map(|c| {
                let movie = self.catalog.get(c.index)?;
                Some(if keep_scores {
                    Recommendation::from_candidate(c, movie, style)
                } else {
                    Recommendation::new(movie, style)
                })
            })
            .collect();
        RecommendationList::new(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::MovieRow;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn build_test_context() -> EngineContext {
        let catalog = Catalog::from_rows([
            MovieRow::new(
                "Inception",
                "Action, Science Fiction",
                "A thief steals secrets through dreams",
                29.1,
                8.3,
            ),
            MovieRow::new(
                "Interstellar",
                "Adventure, Drama, Science Fiction",
                "Explorers cross a wormhole",
                32.2,
                8.4,
            ),
            MovieRow::new(
                "Heat",
                "Action, Crime",
                "A detective hunts a thief",
                17.9,
                7.9,
            ),
        ]);
        let config = FeatureConfig {
            n_clusters: 2,
            ..FeatureConfig::default()
        };
        EngineContext::build(catalog, &config).unwrap()
    }

    #[test]
    fn test_build_attaches_clusters() {
        let ctx = build_test_context();
        let movies = ctx.catalog().movies();
        assert!(movies.iter().all(|m| m.cluster_id.is_some()));
        assert_eq!(ctx.features().similarity.len(), 3);
    }

    #[test]
    fn test_invalid_alpha() {
        let ctx = build_test_context();
        assert_eq!(
            ctx.hybrid_recommend("Heat", 5, 1.5),
            Err(QueryError::InvalidAlpha(1.5))
        );
        assert!(matches!(
            ctx.hybrid_recommend("Heat", 5, f32::NAN),
            Err(QueryError::InvalidAlpha(_))
        ));
    }

    #[test]
    fn test_hybrid_keeps_score_breakdown() {
        let ctx = build_test_context();
        let list = ctx.hybrid_recommend("heat", 5, 0.6).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.iter().all(|r| r.title != "Heat" && r.score.is_some()));
    }

    #[test]
    fn test_genre_ranking_and_style() {
        let ctx = build_test_context();
        let list = ctx.recommend_by_genre("action", 10).unwrap();
        assert_eq!(list.to_string(), "Inception ⭐8.3/10\nHeat ⭐7.9/10");
    }

    #[test]
    fn test_top_n_zero_still_checks_matches() {
        let ctx = build_test_context();
        assert!(ctx.recommend_by_genre("Action", 0).unwrap().is_empty());
        assert!(ctx.recommend_by_genre("Western", 0).is_err());
    }

    #[test]
    fn test_blank_surprise_genre_means_any() {
        let ctx = build_test_context();
        let mut rng = StdRng::seed_from_u64(3);
        assert!(ctx.surprise_me(Some("  "), &mut rng).is_ok());
        let err = ctx.surprise_me(Some("Western"), &mut rng).unwrap_err();
        assert_eq!(err.to_string(), "No movies found for genre 'Western'.");
    }

    #[test]
    fn test_surprise_pool_is_built_without_rng() {
        let ctx = build_test_context();
        assert_eq!(ctx.surprise_pool(None).unwrap().len(), 3);
        assert_eq!(ctx.surprise_pool(Some("crime")).unwrap().len(), 1);
        assert_eq!(
            ctx.surprise_pool(Some("Western")).unwrap_err(),
            QueryError::GenreNotFound {
                genre: "Western".to_string()
            }
        );

        let pool = ctx.surprise_pool(Some("crime")).unwrap();
        let drawn = pool.draw(&mut StdRng::seed_from_u64(9));
        assert_eq!(drawn, Some(2));
        assert_eq!(ctx.surprise_pick(&pool, drawn).unwrap().0.title, "Heat");
    }
}
