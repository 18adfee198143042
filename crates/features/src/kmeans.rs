//! Seeded k-means over TF-IDF vectors, backed by `linfa-clustering`.
//!
//! The sparse vectors are densified into an `Array2<f32>` (one row per
//! movie) and handed to linfa's k-means++ / Lloyd implementation. The RNG
//! is a `Xoshiro256Plus` seeded from the configured seed, so a given
//! catalog always yields the same labels.
//!
//! `k` is capped at the number of distinct points: a one-movie catalog (or
//! one where every text vectorizes identically) yields a single cluster
//! instead of an error.

use crate::error::{FeatureError, Result};
use crate::tfidf::SparseVector;
use data_loader::ClusterId;
use linfa::DatasetBase;
use linfa::traits::{Fit, Predict};
use linfa_clustering::KMeans as LinfaKMeans;
use ndarray::Array2;
use rand_xoshiro::Xoshiro256Plus;
use rand_xoshiro::rand_core::SeedableRng;
use tracing::debug;

/// k-means parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeans {
    k: usize,
    seed: u64,
    max_iterations: u64,
    tolerance: f32,
}

/// Result of [`KMeans::fit`]
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    /// Cluster of each point, indexed like the input
    pub labels: Vec<ClusterId>,
    /// Number of clusters actually used
    pub k: usize,
    /// Sum of squared distances to the assigned centroid
    pub inertia: f64,
}

impl KMeans {
    pub fn new(k: usize, seed: u64) -> Self {
        Self {
            k,
            seed,
            max_iterations: 300,
            tolerance: 1e-4,
        }
    }

    /// Configure the iteration cap (default: 300)
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1) as u64;
        self
    }

    /// Configure the convergence tolerance (default: 1e-4)
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance as f32;
        self
    }

    /// Cluster `points`, all of dimension `dim`.
    pub fn fit(&self, points: &[SparseVector], dim: usize) -> Result<KMeansFit> {
        let n = points.len();
        let k = self.k.min(distinct_up_to(points, self.k));
        if k <= 1 || dim == 0 {
            return Ok(KMeansFit {
                labels: vec![0; n],
                k: usize::from(n > 0),
                inertia: 0.0,
            });
        }

        let records = densify(points, dim);
        let dataset = DatasetBase::from(records);
        let model = LinfaKMeans::params_with_rng(k, Xoshiro256Plus::seed_from_u64(self.seed))
            .max_n_iterations(self.max_iterations)
            .tolerance(self.tolerance)
            .fit(&dataset)
            .map_err(|e| FeatureError::Clustering(e.to_string()))?;

        let labels: Vec<ClusterId> = model
            .predict(dataset.records())
            .iter()
            .map(|&label| label as ClusterId)
            .collect();
        let inertia = f64::from(model.inertia());

        debug!(
            "k-means fitted {} points (k = {}, inertia = {:.4})",
            n,
            k,
            inertia
        );
        Ok(KMeansFit { labels, k, inertia })
    }
}

/// Number of pairwise-distinct points, counting no further than `limit`.
///
/// k-means++ needs at least `k` distinct rows to pick `k` distinct seeds.
fn distinct_up_to(points: &[SparseVector], limit: usize) -> usize {
    let mut distinct: Vec<&SparseVector> = Vec::new();
    for point in points {
        if distinct.len() >= limit {
            break;
        }
        if !distinct.contains(&point) {
            distinct.push(point);
        }
    }
    distinct.len()
}

fn densify(points: &[SparseVector], dim: usize) -> Array2<f32> {
    let mut records = Array2::zeros((points.len(), dim));
    for (row, point) in points.iter().enumerate() {
        for (col, value) in point.iter() {
            records[[row, col as usize]] = value;
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(pairs: &[(u32, f32)]) -> SparseVector {
        SparseVector::from_pairs(pairs.to_vec())
    }

    fn two_groups() -> Vec<SparseVector> {
        vec![
            point(&[(0, 1.0)]),
            point(&[(0, 0.9), (1, 0.1)]),
            point(&[(0, 0.95), (1, 0.05)]),
            point(&[(2, 1.0)]),
            point(&[(2, 0.9), (3, 0.1)]),
            point(&[(2, 0.92), (3, 0.08)]),
        ]
    }

    #[test]
    fn test_separates_obvious_groups() {
        let fit = KMeans::new(2, 42).fit(&two_groups(), 4).unwrap();
        assert_eq!(fit.k, 2);
        assert_eq!(fit.labels[0], fit.labels[1]);
        assert_eq!(fit.labels[0], fit.labels[2]);
        assert_eq!(fit.labels[3], fit.labels[4]);
        assert_eq!(fit.labels[3], fit.labels[5]);
        assert_ne!(fit.labels[0], fit.labels[3]);
    }

    #[test]
    fn test_same_seed_same_labels() {
        let points = two_groups();
        let a = KMeans::new(3, 7).fit(&points, 4).unwrap();
        let b = KMeans::new(3, 7).fit(&points, 4).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_k_is_capped_by_point_count() {
        let points = vec![point(&[(0, 1.0)])];
        let fit = KMeans::new(20, 42).fit(&points, 1).unwrap();
        assert_eq!(fit.k, 1);
        assert_eq!(fit.labels, vec![0]);

        let fit = KMeans::new(20, 42).fit(&two_groups(), 4).unwrap();
        assert_eq!(fit.k, 6);
        assert!(fit.labels.iter().all(|&l| (l as usize) < 6));
    }

    #[test]
    fn test_identical_points_form_one_cluster() {
        let points = vec![point(&[(0, 1.0)]); 5];
        let fit = KMeans::new(3, 1).fit(&points, 1).unwrap();
        assert_eq!(fit.k, 1);
        assert_eq!(fit.labels, vec![0; 5]);
        assert!(fit.inertia.abs() < 1e-9);
    }

    #[test]
    fn test_duplicates_cap_k_at_distinct_count() {
        let mut points = vec![point(&[(0, 1.0)]); 4];
        points.push(point(&[(1, 1.0)]));
        let fit = KMeans::new(4, 42).fit(&points, 2).unwrap();
        assert_eq!(fit.k, 2);
        assert_eq!(fit.labels[0], fit.labels[3]);
        assert_ne!(fit.labels[0], fit.labels[4]);
    }

    #[test]
    fn test_empty_input() {
        let fit = KMeans::new(5, 0).fit(&[], 3).unwrap();
        assert!(fit.labels.is_empty());
        assert_eq!(fit.k, 0);
    }
}
