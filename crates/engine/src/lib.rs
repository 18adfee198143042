//! Engine crate for the Cinematch movie recommender.
//!
//! This crate composes the loader, feature builder, candidate sources and
//! filter pipeline into the four recommendation queries:
//! - `hybrid_recommend`: movies like a (fuzzily matched) title
//! - `recommend_by_genre`: best rated movies of a genre
//! - `recommend_by_keyword`: best rated movies whose plot mentions a word
//! - `surprise_me`: one random movie, optionally of a genre

pub mod config;
pub mod context;
pub mod error;
pub mod format;
pub mod orchestrator;

pub use config::EngineConfig;
pub use context::{DEFAULT_TOP_N, EngineContext, SurprisePool};
pub use error::{EngineError, QueryError, StartupErrorKind};
pub use format::{LineStyle, Recommendation, RecommendationList, SurprisePick, format_rating};
pub use orchestrator::RecommendationEngine;
pub use sources::DEFAULT_ALPHA;
