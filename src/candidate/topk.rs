//! Candidate ordering and Top-K tracking.

use std::cmp::Ordering;

/// Scored window offset in source coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// X offset (column) of the window's top-left corner.
    pub x: usize,
    /// Y offset (row) of the window's top-left corner.
    pub y: usize,
    /// Window score.
    pub score: f64,
}

/// Descending score, then row-major scan order.
pub(crate) fn candidate_cmp_desc(a: &Candidate, b: &Candidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.y.cmp(&b.y))
        .then_with(|| a.x.cmp(&b.x))
}

/// Sorts candidates by descending score with deterministic tie-breaking.
pub(crate) fn sort_candidates_desc(candidates: &mut [Candidate]) {
    candidates.sort_by(candidate_cmp_desc);
}

/// Keeps the better of two optional candidates.
///
/// Equal scores resolve to the earlier offset in scan order, which is what a
/// sequential strict-greater-than scan selects.
pub(crate) fn better(a: Option<Candidate>, b: Option<Candidate>) -> Option<Candidate> {
    match (a, b) {
        (Some(a), Some(b)) => {
            if candidate_cmp_desc(&a, &b) == Ordering::Greater {
                Some(b)
            } else {
                Some(a)
            }
        }
        (a, None) => a,
        (None, b) => b,
    }
}

/// Upper bound on the slots reserved up front; `k` itself may be arbitrarily
/// large.
const PREALLOC_LIMIT: usize = 1024;

/// Top-K container with O(k) insertion cost.
pub struct TopK {
    k: usize,
    items: Vec<Candidate>,
}

impl TopK {
    /// Creates a new Top-K collector.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            items: Vec::with_capacity(k.min(PREALLOC_LIMIT)),
        }
    }

    /// Pushes a candidate, evicting the worst one if at capacity.
    pub fn push(&mut self, candidate: Candidate) {
        if self.k == 0 {
            return;
        }
        if self.items.len() < self.k {
            self.items.push(candidate);
            return;
        }

        let mut worst_idx = 0usize;
        for (idx, item) in self.items.iter().enumerate().skip(1) {
            if candidate_cmp_desc(item, &self.items[worst_idx]) == Ordering::Greater {
                worst_idx = idx;
            }
        }

        if candidate_cmp_desc(&candidate, &self.items[worst_idx]) == Ordering::Less {
            self.items[worst_idx] = candidate;
        }
    }

    /// Returns candidates sorted by descending score.
    pub fn into_sorted_desc(mut self) -> Vec<Candidate> {
        sort_candidates_desc(&mut self.items);
        self.items
    }
}
