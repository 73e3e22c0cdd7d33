//! Non-maximum suppression for candidates.

use crate::candidate::topk::{sort_candidates_desc, Candidate};

/// Applies 2D non-maximum suppression using Chebyshev distance.
///
/// Candidates are sorted by descending score and kept if they are farther
/// than `radius` in Chebyshev distance from all previously kept candidates.
pub fn nms_2d(candidates: &mut [Candidate], radius: usize) -> Vec<Candidate> {
    sort_candidates_desc(candidates);

    let mut kept: Vec<Candidate> = Vec::new();
    'outer: for candidate in candidates.iter().copied() {
        for kept_candidate in kept.iter() {
            let dx = candidate.x.abs_diff(kept_candidate.x);
            let dy = candidate.y.abs_diff(kept_candidate.y);
            if dx.max(dy) <= radius {
                continue 'outer;
            }
        }
        kept.push(candidate);
    }

    kept
}
