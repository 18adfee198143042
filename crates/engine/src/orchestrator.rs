//! # Recommendation Engine
//!
//! Owns the current [`EngineContext`] and serves queries against it:
//! 1. `load` fetches the source (bounded by the configured timeout)
//! 2. Parsing and the feature build run on the blocking pool
//! 3. The finished context is published with a single pointer swap
//!
//! Queries clone the current `Arc<EngineContext>` under a short read lock,
//! so a reload never disturbs queries already in flight. A failed load keeps
//! whatever context was there before.

use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use data_loader::{Catalog, DataSource};

use crate::config::EngineConfig;
use crate::context::EngineContext;
use crate::error::{EngineError, QueryError};
use crate::format::{RecommendationList, SurprisePick};

/// Shared, cloneable handle to the recommender
#[derive(Clone)]
pub struct RecommendationEngine {
    config: Arc<EngineConfig>,
    context: Arc<RwLock<Option<Arc<EngineContext>>>>,
    rng: Arc<Mutex<StdRng>>,
}

impl RecommendationEngine {
    /// Create an engine with no catalog loaded. Queries fail with
    /// [`QueryError::NotInitialized`] until [`RecommendationEngine::load`]
    /// succeeds.
    pub fn new(config: EngineConfig) -> Self {
        let rng = match config.surprise_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            config: Arc::new(config),
            context: Arc::new(RwLock::new(None)),
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Create an engine around an already built context
    pub fn from_context(config: EngineConfig, context: EngineContext) -> Self {
        let engine = Self::new(config);
        engine.publish(context);
        engine
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Load the configured data source
    pub async fn load_default(&self) -> Result<Arc<EngineContext>, EngineError> {
        let source = DataSource::parse(&self.config.data_source);
        self.load(&source).await
    }

    /// Fetch, parse and build a new context, then make it current.
    pub async fn load(&self, source: &DataSource) -> Result<Arc<EngineContext>, EngineError> {
        let start_time = Instant::now();
        let options = self.config.load_options();
        let feature_config = self.config.feature_config();
        let match_threshold = self.config.match_threshold;

        let bytes = match source.fetch(options.fetch_timeout).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to fetch {}: {}", source, e);
                return Err(e.into());
            }
        };
        info!(
            "Fetched {} bytes from {} in {:.2?}",
            bytes.len(),
            source,
            start_time.elapsed()
        );

        // Parsing and the feature build are CPU-bound
        let built = tokio::task::spawn_blocking(move || -> Result<EngineContext, EngineError> {
            let catalog = Catalog::from_csv_reader(bytes.as_slice(), &options)?;
            let context = EngineContext::build(catalog, &feature_config)?;
            Ok(context.with_match_threshold(match_threshold))
        })
        .await?;

        let context = match built {
            Ok(context) => self.publish(context),
            Err(e) => {
                warn!(
                    "Engine load from {} failed after {:.2?}: {}",
                    source,
                    start_time.elapsed(),
                    e
                );
                return Err(e);
            }
        };
        info!(
            "Engine loaded {} movies from {} in {:.2?}",
            context.catalog().len(),
            source,
            start_time.elapsed()
        );
        Ok(context)
    }

    /// Whether a context has been loaded
    pub fn is_ready(&self) -> bool {
        self.read_slot().is_some()
    }

    /// The current context snapshot
    pub fn context(&self) -> Result<Arc<EngineContext>, QueryError> {
        self.read_slot().ok_or(QueryError::NotInitialized)
    }

    pub fn hybrid_recommend(
        &self,
        query_title: &str,
        top_n: usize,
        alpha: f32,
    ) -> Result<RecommendationList, QueryError> {
        self.context()?.hybrid_recommend(query_title, top_n, alpha)
    }

    pub fn recommend_by_genre(
        &self,
        genre: &str,
        top_n: usize,
    ) -> Result<RecommendationList, QueryError> {
        self.context()?.recommend_by_genre(genre, top_n)
    }

    pub fn recommend_by_keyword(
        &self,
        keyword: &str,
        top_n: usize,
    ) -> Result<RecommendationList, QueryError> {
        self.context()?.recommend_by_keyword(keyword, top_n)
    }

    /// Random pick using the engine's seeded RNG. The genre filter runs
    /// before the RNG lock is taken; the lock covers only the draw.
    pub fn surprise_me(&self, genre: Option<&str>) -> Result<SurprisePick, QueryError> {
        let context = self.context()?;
        let pool = context.surprise_pool(genre)?;
        let drawn = pool.draw(
            &mut *self.rng.lock().unwrap_or_else(PoisonError::into_inner),
        );
        context.surprise_pick(&pool, drawn)
    }

    fn read_slot(&self) -> Option<Arc<EngineContext>> {
        self.context.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn publish(&self, context: EngineContext) -> Arc<EngineContext> {
        let context = Arc::new(context);
        *self.context.write().unwrap_or_else(PoisonError::into_inner) = Some(context.clone());
        context
    }
}
