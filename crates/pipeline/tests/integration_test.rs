//! Integration tests for the pipeline.
//!
//! These tests verify that sources, filters and ranking work together
//! in a realistic scenario.

use data_loader::{Catalog, MovieRow};
use features::{FeatureBuilder, FeatureConfig};
use pipeline::filters::*;
use pipeline::{FilterPipeline, rank_by_rating};
use sources::{CatalogSource, SimilaritySource};

fn create_test_catalog() -> Catalog {
    Catalog::from_rows([
        MovieRow::new(
            "Inception",
            "Action, Science Fiction",
            "A thief who steals corporate secrets through dream-sharing technology",
            29.1,
            8.3,
        ),
        MovieRow::new(
            "Interstellar",
            "Adventure, Drama, Science Fiction",
            "Explorers travel through a wormhole in space",
            32.2,
            8.4,
        ),
        MovieRow::new(
            "The Dark Knight",
            "Drama, Action, Crime",
            "Batman faces the Joker in Gotham",
            30.0,
            8.5,
        ),
        MovieRow::new(
            "Heat",
            "Action, Crime, Drama",
            "A detective hunts a master thief in Los Angeles",
            17.9,
            7.9,
        ),
        MovieRow::new(
            "Amelie",
            "Comedy, Romance",
            "A shy waitress decides to change the lives of others",
            12.0,
            7.9,
        ),
    ])
}

#[test]
fn test_genre_query_end_to_end() {
    let catalog = create_test_catalog();
    let pipeline = FilterPipeline::new().add_filter(GenreFilter::new("action"));

    let filtered = pipeline
        .apply(CatalogSource::new(&catalog).get_candidates(), &catalog)
        .unwrap();
    let ranked = rank_by_rating(filtered, &catalog, 10);

    let titles: Vec<&str> = ranked
        .iter()
        .map(|c| catalog.get(c.index).unwrap().title.as_str())
        .collect();
    assert_eq!(titles, vec!["The Dark Knight", "Inception", "Heat"]);
}

#[test]
fn test_genre_query_no_match() {
    let catalog = create_test_catalog();
    let pipeline = FilterPipeline::new().add_filter(GenreFilter::new("Horror"));

    let filtered = pipeline
        .apply(CatalogSource::new(&catalog).get_candidates(), &catalog)
        .unwrap();
    assert!(filtered.is_empty());
}

#[test]
fn test_keyword_query_end_to_end() {
    let catalog = create_test_catalog();
    let pipeline = FilterPipeline::new().add_filter(KeywordFilter::new("thief"));

    let filtered = pipeline
        .apply(CatalogSource::new(&catalog).get_candidates(), &catalog)
        .unwrap();
    let ranked = rank_by_rating(filtered, &catalog, 10);

    let indices: Vec<_> = ranked.iter().map(|c| c.index).collect();
    assert_eq!(indices, vec![0, 3]);
}

#[test]
fn test_similarity_candidates_can_be_filtered() {
    let catalog = create_test_catalog();
    let config = FeatureConfig {
        n_clusters: 2,
        ..FeatureConfig::default()
    };
    let features = FeatureBuilder::new(config).build(&catalog).unwrap();

    let candidates = SimilaritySource::new(&catalog, &features).get_candidates(0, 10);
    assert_eq!(candidates.len(), 4);

    let filtered = FilterPipeline::new()
        .add_filter(GenreFilter::new("crime"))
        .apply(candidates, &catalog)
        .unwrap();

    let mut indices: Vec<_> = filtered.iter().map(|c| c.index).collect();
    indices.sort_unstable();
    assert_eq!(indices, vec![2, 3]);
}
