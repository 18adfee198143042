//! Pipeline for filtering and ranking movie candidates.
//!
//! This crate provides:
//! - Filter trait and implementations for candidate filtering
//! - FilterPipeline for composing filters
//! - Rating-based ranking for attribute queries
//!
//! ## Architecture
//! The pipeline processes candidates in stages:
//! 1. A source (`sources` crate) proposes candidates
//! 2. Filters remove candidates that do not match the query (genre, keyword)
//! 3. Survivors are ranked and truncated
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{rank_by_rating, FilterPipeline};
//! use pipeline::filters::*;
//!
//! let pipeline = FilterPipeline::new()
//!     .add_filter(GenreFilter::new("Action"));
//!
//! let filtered = pipeline.apply(CatalogSource::new(&catalog).get_candidates(), &catalog)?;
//! let top = rank_by_rating(filtered, &catalog, 10);
//! ```

pub mod filter_pipeline;
pub mod filters;
pub mod ranking;
pub mod traits;

// Re-export main types
pub use filter_pipeline::FilterPipeline;
pub use ranking::rank_by_rating;
pub use traits::Filter;
