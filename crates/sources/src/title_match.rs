//! Fuzzy title resolution.
//!
//! The default [`SequenceMatcher`] scores two strings with the
//! Ratcliff/Obershelp ratio `2 * M / (len(a) + len(b))`, where `M` is the
//! number of characters in the recursively found longest common blocks.
//! Scoring is case-sensitive, like `difflib`, so an exact title always beats
//! a differently-cased one. Among equal ratios the case-folded ratio decides.
//! Cheap upper bounds are checked first so most of a 5000-title catalog is
//! rejected without running the full match.

use data_loader::{Catalog, MovieIndex};
use std::collections::HashMap;
use tracing::debug;

/// Minimum ratio for a title to count as a match
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.5;

/// A similarity ratio in `[0, 1]` between a query and a catalog title.
pub trait TitleMatcher: Send + Sync {
    /// Returns the name of this matcher (for logging/debugging)
    fn name(&self) -> &str;

    /// Similarity of `query` and `candidate`, `1.0` meaning identical.
    fn ratio(&self, query: &str, candidate: &str) -> f64;

    /// An upper bound on [`TitleMatcher::ratio`]. Matchers that can compute
    /// one cheaply should override this; the default is the exact ratio.
    fn upper_bound(&self, query: &str, candidate: &str) -> f64 {
        self.ratio(query, candidate)
    }

    /// Secondary score consulted only when two candidates tie on
    /// [`TitleMatcher::ratio`]. Higher wins; the default never breaks a tie.
    fn tie_break(&self, _query: &str, _candidate: &str) -> f64 {
        0.0
    }
}

/// The best title found for a query
#[derive(Debug, Clone, PartialEq)]
pub struct TitleMatch {
    pub index: MovieIndex,
    pub ratio: f64,
}

/// Ratcliff/Obershelp sequence matcher over characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceMatcher {
    case_sensitive: bool,
}

impl SequenceMatcher {
    /// Case-sensitive matcher, scoring exactly like `difflib`
    pub fn new() -> Self {
        Self { case_sensitive: true }
    }

    pub fn case_insensitive() -> Self {
        Self { case_sensitive: false }
    }

    fn chars(&self, s: &str) -> Vec<char> {
        if self.case_sensitive {
            s.chars().collect()
        } else {
            s.to_lowercase().chars().collect()
        }
    }
}

impl Default for SequenceMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl TitleMatcher for SequenceMatcher {
    fn name(&self) -> &str {
        "SequenceMatcher"
    }

    fn ratio(&self, query: &str, candidate: &str) -> f64 {
        let a = self.chars(candidate);
        let b = self.chars(query);
        ratio_from(matching_characters(&a, &b), a.len() + b.len())
    }

    /// Length bound first, then the multiset-intersection bound.
    fn upper_bound(&self, query: &str, candidate: &str) -> f64 {
        let a = self.chars(candidate);
        let b = self.chars(query);
        let total = a.len() + b.len();
        let length_bound = ratio_from(a.len().min(b.len()), total);
        if length_bound == 0.0 {
            return length_bound;
        }

        let mut available: HashMap<char, usize> = HashMap::new();
        for c in &b {
            *available.entry(*c).or_insert(0) += 1;
        }
        let mut shared = 0;
        for c in &a {
            if let Some(count) = available.get_mut(c)
                && *count > 0
            {
                *count -= 1;
                shared += 1;
            }
        }
        ratio_from(shared, total).min(length_bound)
    }

    /// The case-folded ratio: "the heat" ties "the hoot" and "The Heat"
    /// case-sensitively, but only the latter is the same title.
    fn tie_break(&self, query: &str, candidate: &str) -> f64 {
        if self.case_sensitive {
            Self::case_insensitive().ratio(query, candidate)
        } else {
            0.0
        }
    }
}

fn ratio_from(matches: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        2.0 * matches as f64 / total as f64
    }
}

/// Total size of the matching blocks of `a` and `b`.
fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, c) in b.iter().enumerate() {
        b2j.entry(*c).or_default().push(j);
    }

    let mut total = 0;
    let mut queue = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, size) = longest_match(a, &b2j, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        total += size;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            queue.push((i + size, ahi, j + size, bhi));
        }
    }
    total
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]`, earliest in `a`
/// (then in `b`) on ties. Returns `(start_a, start_b, length)`.
fn longest_match(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // j2len[j] = length of the match ending at a[i-1], b[j]
    let mut j2len: HashMap<usize, usize> = HashMap::new();
    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b2j.get(c) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = j
                    .checked_sub(1)
                    .and_then(|prev| j2len.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next.insert(j, k);
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            }
        }
        j2len = next;
    }
    (best_i, best_j, best_size)
}

/// Resolve `query` to the catalog index of the closest title with the
/// default matcher. Ties go to the lowest index.
pub fn find_best_title(query: &str, catalog: &Catalog, threshold: f64) -> Option<MovieIndex> {
    find_best_title_with(&SequenceMatcher::new(), query, catalog, threshold).map(|m| m.index)
}

/// Like [`find_best_title`] with an explicit matcher, returning the ratio too.
pub fn find_best_title_with(
    matcher: &dyn TitleMatcher,
    query: &str,
    catalog: &Catalog,
    threshold: f64,
) -> Option<TitleMatch> {
    let mut best: Option<(TitleMatch, f64)> = None;
    for movie in catalog.movies() {
        let bound = matcher.upper_bound(query, &movie.title);
        let hopeless = match &best {
            Some((b, _)) => bound < b.ratio,
            None => bound < threshold,
        };
        if hopeless {
            continue;
        }
        let ratio = matcher.ratio(query, &movie.title);
        let tie = match &best {
            Some((b, _)) if ratio < b.ratio => continue,
            None if ratio < threshold => continue,
            Some((b, tie)) if ratio == b.ratio => {
                // An equal secondary score keeps the lower index
                let score = matcher.tie_break(query, &movie.title);
                if score <= *tie {
                    continue;
                }
                score
            }
            _ => matcher.tie_break(query, &movie.title),
        };
        best = Some((
            TitleMatch {
                index: movie.index,
                ratio,
            },
            tie,
        ));
    }
    let best = best.map(|(m, _)| m);

    debug!(
        "Resolved {:?} with {}: {:?}",
        query,
        matcher.name(),
        best.as_ref().map(|b| (b.index, b.ratio))
    );
    best
}
