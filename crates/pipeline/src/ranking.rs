//! Ordering for attribute queries (genre, keyword).
//!
//! ## Algorithm
//! Sort by `vote_average` descending, then `popularity` descending, then
//! catalog index ascending, and keep the first `limit`.

use data_loader::Catalog;
use sources::Candidate;
use std::cmp::Ordering;

/// Rank candidates by rating, most popular first among equal ratings.
///
/// Candidates whose index is not in the catalog sort last.
pub fn rank_by_rating(
    mut candidates: Vec<Candidate>,
    catalog: &Catalog,
    limit: usize,
) -> Vec<Candidate> {
    candidates.sort_by(|a, b| compare_by_rating(a, b, catalog));
    candidates.truncate(limit);
    candidates
}

fn compare_by_rating(a: &Candidate, b: &Candidate, catalog: &Catalog) -> Ordering {
    match (catalog.get(a.index), catalog.get(b.index)) {
        (Some(x), Some(y)) => y
            .vote_average
            .total_cmp(&x.vote_average)
            .then_with(|| y.popularity.total_cmp(&x.popularity))
            .then_with(|| a.index.cmp(&b.index)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.index.cmp(&b.index),
    }
}
