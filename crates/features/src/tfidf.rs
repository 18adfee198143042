//! TF-IDF vectorization.
//!
//! ## Algorithm
//! 1. Tokenize every document (in parallel) and count terms
//! 2. Keep the `max_features` terms with the highest corpus frequency
//! 3. Weight raw counts by smoothed idf: `ln((1 + n) / (1 + df)) + 1`
//! 4. L2-normalize each document vector

use crate::tokenize::Tokenizer;
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Sparse vector with strictly increasing indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    indices: Vec<u32>,
    values: Vec<f32>,
}

impl SparseVector {
    /// Build from `(index, value)` pairs in any order. Duplicate indices are summed.
    pub fn from_pairs(mut pairs: Vec<(u32, f32)>) -> Self {
        pairs.sort_unstable_by_key(|&(i, _)| i);
        let mut indices: Vec<u32> = Vec::with_capacity(pairs.len());
        let mut values: Vec<f32> = Vec::with_capacity(pairs.len());
        for (i, v) in pairs {
            if indices.last() == Some(&i) {
                if let Some(last) = values.last_mut() {
                    *last += v;
                }
            } else {
                indices.push(i);
                values.push(v);
            }
        }
        Self { indices, values }
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f32)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }

    pub fn norm(&self) -> f32 {
        self.values.iter().map(|v| v * v).sum::<f32>().sqrt()
    }

    fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for v in &mut self.values {
                *v /= norm;
            }
        }
    }
}

/// Fitted vocabulary and idf weights.
#[derive(Debug, Clone, Default)]
pub struct TfidfModel {
    /// Terms in column order (alphabetical)
    terms: Vec<String>,
    lookup: HashMap<String, u32>,
    idf: Vec<f32>,
}

impl TfidfModel {
    /// Shared dimensionality of every vector produced by this model
    pub fn dimension(&self) -> usize {
        self.terms.len()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }


}

/// Fits a vocabulary and produces one TF-IDF vector per document.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    tokenizer: Tokenizer,
    max_features: usize,
}

impl TfidfVectorizer {
    /// Create a vectorizer using the English stop-word list.
    pub fn new(max_features: usize) -> Self {
        Self {
            tokenizer: Tokenizer::english(),
            max_features,
        }
    }

    /// Fit on `documents` and return the model with one vector per document.
    pub fn fit_transform(&self, documents: &[&str]) -> (TfidfModel, Vec<SparseVector>) {
        // Per-document term counts
        let doc_counts: Vec<HashMap<String, u32>> = documents
            .par_iter()
            .map(|doc| {
                let mut counts = HashMap::new();
                for token in self.tokenizer.tokenize(doc) {
                    *counts.entry(token).or_insert(0) += 1;
                }
                counts
            })
            .collect();

        // Corpus frequency and document frequency per term
        let mut corpus: HashMap<&str, (u64, u32)> = HashMap::new();
        for counts in &doc_counts {
            for (term, &count) in counts {
                let entry = corpus.entry(term.as_str()).or_insert((0, 0));
                entry.0 += u64::from(count);
                entry.1 += 1;
            }
        }

        let mut ranked: Vec<(&str, u64, u32)> =
            corpus.into_iter().map(|(t, (tf, df))| (t, tf, df)).collect();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(self.max_features);
        ranked.sort_unstable_by(|a, b| a.0.cmp(b.0));

        if ranked.is_empty() {
            warn!("Vocabulary is empty; every document vector will be zero");
        }

        let n = documents.len() as f32;
        let terms: Vec<String> = ranked.iter().map(|(t, _, _)| t.to_string()).collect();
        let idf: Vec<f32> = ranked
            .iter()
            .map(|&(_, _, df)| ((1.0 + n) / (1.0 + df as f32)).ln() + 1.0)
            .collect();
        let lookup: HashMap<String, u32> = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i as u32))
            .collect();
        let model = TfidfModel { terms, lookup, idf };

        let vectors: Vec<SparseVector> = doc_counts
            .par_iter()
            .map(|counts| {
                let pairs = counts
                    .iter()
                    .filter_map(|(term, &count)| {
                        model
                            .lookup
                            .get(term)
                            .map(|&i| (i, count as f32 * model.idf[i as usize]))
                    })
                    .collect();
                let mut vector = SparseVector::from_pairs(pairs);
                vector.normalize();
                vector
            })
            .collect();

        debug!(
            "Vectorized {} documents over {} terms",
            vectors.len(),
            model.dimension()
        );
        (model, vectors)
    }
}
