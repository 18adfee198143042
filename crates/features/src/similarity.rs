//! Pairwise cosine similarity.
//!
//! The matrix is stored as a packed upper triangle (diagonal included), so
//! `get(i, j)` and `get(j, i)` read the same cell and symmetry cannot drift.

use crate::tfidf::SparseVector;
use data_loader::MovieIndex;
use rayon::prelude::*;
use tracing::debug;

/// Symmetric `n x n` cosine similarity matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    n: usize,
    packed: Vec<f32>,
}

impl SimilarityMatrix {
    /// Compute cosine similarity between every pair of `vectors`.
    ///
    /// Uses an inverted index (term -> postings) so each row only touches
    /// documents that share at least one term with it.
    pub fn from_vectors(vectors: &[SparseVector], dim: usize) -> Self {
        let n = vectors.len();

        let mut postings: Vec<Vec<(u32, f32)>> = vec![Vec::new(); dim];
        for (doc, vector) in vectors.iter().enumerate() {
            for (term, weight) in vector.iter() {
                postings[term as usize].push((doc as u32, weight));
            }
        }
        let norms: Vec<f32> = vectors.iter().map(SparseVector::norm).collect();

        let rows: Vec<Vec<f32>> = (0..n)
            .into_par_iter()
            .map(|i| {
                let mut acc = vec![0.0f32; n - i];
                for (term, weight) in vectors[i].iter() {
                    let list = &postings[term as usize];
                    let start = list.partition_point(|&(doc, _)| (doc as usize) < i);
                    for &(doc, other) in &list[start..] {
                        acc[doc as usize - i] += weight * other;
                    }
                }
                for (offset, value) in acc.iter_mut().enumerate() {
                    let denom = norms[i] * norms[i + offset];
                    *value = if denom > 0.0 {
                        (*value / denom).clamp(-1.0, 1.0)
                    } else {
                        0.0
                    };
                }
                acc
            })
            .collect();

        let packed: Vec<f32> = rows.into_iter().flatten().collect();
        debug!(
            "Computed {}x{} similarity matrix ({} stored cells)",
            n,
            n,
            packed.len()
        );
        Self { n, packed }
    }

    /// Side length of the matrix
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Similarity of `i` and `j`. Panics if either index is out of range.
    pub fn get(&self, i: MovieIndex, j: MovieIndex) -> f32 {
        assert!(i < self.n && j < self.n, "similarity index out of range");
        let (row, col) = if i <= j { (i, j) } else { (j, i) };
        self.packed[row_offset(self.n, row) + (col - row)]
    }

    /// All similarities of `i`, in index order, self included.
    pub fn row(&self, i: MovieIndex) -> impl Iterator<Item = (MovieIndex, f32)> + '_ {
        (0..self.n).map(move |j| (j, self.get(i, j)))
    }
}

/// Start of row `row` in the packed upper triangle.
fn row_offset(n: usize, row: usize) -> usize {
    row * n - row * row.saturating_sub(1) / 2
}
