//! Dense scan over the offset grid.
//!
//! Rows are visited top to bottom and offsets left to right. Every helper
//! here is built on [`visit_row`], so the sequential scan, the score map and
//! the candidate collection see exactly the same scores.

use crate::candidate::topk::{better, Candidate};
use crate::kernel::{Kernel, ScanParams};
use crate::pattern::PatternPlan;
use crate::raster::{RasterView, Sample};
use crate::search::EdgePolicy;

/// Range of top-left offsets visited by a scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OffsetGrid {
    /// Number of x offsets, starting at 0.
    pub cols: usize,
    /// Number of y offsets, starting at 0.
    pub rows: usize,
}

impl OffsetGrid {
    /// Computes the offset range for a pattern that fits in the source.
    ///
    /// With [`EdgePolicy::Exclusive`] the last legal column and row are left
    /// out, so a pattern as wide as the source yields no offsets at all.
    pub fn new(source_width: usize, source_height: usize, plan: &PatternPlan, edge: EdgePolicy) -> Self {
        let span_x = source_width.saturating_sub(plan.width());
        let span_y = source_height.saturating_sub(plan.height());
        match edge {
            EdgePolicy::Exclusive => Self {
                cols: span_x,
                rows: span_y,
            },
            EdgePolicy::Inclusive => Self {
                cols: span_x + 1,
                rows: span_y + 1,
            },
        }
    }

    /// Returns the number of offsets in the grid.
    pub fn len(&self) -> usize {
        self.cols * self.rows
    }

    /// Returns true when no offset is evaluated.
    pub fn is_empty(&self) -> bool {
        self.cols == 0 || self.rows == 0
    }
}

/// Aggregated outcome of a best-of scan.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct ScanSummary {
    pub best: Option<Candidate>,
    pub evaluated: usize,
    pub skipped: usize,
}

impl ScanSummary {
    /// Every offset of the grid skipped without scoring.
    pub fn all_skipped(grid: OffsetGrid) -> Self {
        Self {
            best: None,
            evaluated: grid.len(),
            skipped: grid.len(),
        }
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            best: better(self.best, other.best),
            evaluated: self.evaluated + other.evaluated,
            skipped: self.skipped + other.skipped,
        }
    }
}

/// Scores every offset of row `y` and hands `(x, score)` to `visit`.
pub(crate) fn visit_row<K, T, F>(
    source: RasterView<'_, T>,
    plan: &PatternPlan,
    y: usize,
    cols: usize,
    params: ScanParams,
    mut visit: F,
) where
    K: Kernel,
    T: Sample,
    F: FnMut(usize, Option<f64>),
{
    for x in 0..cols {
        visit(x, K::score_at(source, plan, x, y, params));
    }
}

/// Best-of scan over a single row.
pub(crate) fn scan_row_best<K: Kernel, T: Sample>(
    source: RasterView<'_, T>,
    plan: &PatternPlan,
    y: usize,
    cols: usize,
    params: ScanParams,
) -> ScanSummary {
    let mut summary = ScanSummary::default();
    let mut best_score = params.min_score;
    visit_row::<K, T, _>(source, plan, y, cols, params, |x, score| {
        summary.evaluated += 1;
        match score {
            None => summary.skipped += 1,
            Some(score) if score > best_score => {
                best_score = score;
                summary.best = Some(Candidate { x, y, score });
            }
            Some(_) => {}
        }
    });
    summary
}

/// Sequential best-of scan over the whole grid.
pub(crate) fn scan_best<K: Kernel, T: Sample>(
    source: RasterView<'_, T>,
    plan: &PatternPlan,
    grid: OffsetGrid,
    params: ScanParams,
) -> ScanSummary {
    if plan.stats().is_degenerate(params.min_spread) {
        return ScanSummary::all_skipped(grid);
    }
    (0..grid.rows).fold(ScanSummary::default(), |acc, y| {
        acc.merge(scan_row_best::<K, T>(source, plan, y, grid.cols, params))
    })
}

/// Writes the scores of row `y` into `out`; skipped offsets hold
/// `f64::NEG_INFINITY`.
pub(crate) fn fill_score_row<K: Kernel, T: Sample>(
    source: RasterView<'_, T>,
    plan: &PatternPlan,
    y: usize,
    params: ScanParams,
    out: &mut [f64],
) {
    let cols = out.len();
    visit_row::<K, T, _>(source, plan, y, cols, params, |x, score| {
        out[x] = score.unwrap_or(f64::NEG_INFINITY);
    });
}

/// Sequential dense score map in row-major order.
pub(crate) fn score_rows<K: Kernel, T: Sample>(
    source: RasterView<'_, T>,
    plan: &PatternPlan,
    grid: OffsetGrid,
    params: ScanParams,
) -> Vec<f64> {
    let mut scores = vec![f64::NEG_INFINITY; grid.len()];
    if grid.is_empty() {
        return scores;
    }
    for (y, row) in scores.chunks_mut(grid.cols).enumerate() {
        fill_score_row::<K, T>(source, plan, y, params, row);
    }
    scores
}

/// Candidates of row `y` whose score beats `params.min_score`.
pub(crate) fn row_candidates<K: Kernel, T: Sample>(
    source: RasterView<'_, T>,
    plan: &PatternPlan,
    y: usize,
    cols: usize,
    params: ScanParams,
) -> Vec<Candidate> {
    let mut out = Vec::new();
    visit_row::<K, T, _>(source, plan, y, cols, params, |x, score| {
        if let Some(score) = score.filter(|s| *s > params.min_score) {
            out.push(Candidate { x, y, score });
        }
    });
    out
}

/// Sequential candidate collection over the whole grid.
pub(crate) fn collect_candidates<K: Kernel, T: Sample>(
    source: RasterView<'_, T>,
    plan: &PatternPlan,
    grid: OffsetGrid,
    params: ScanParams,
) -> Vec<Candidate> {
    let mut out = Vec::new();
    for y in 0..grid.rows {
        out.extend(row_candidates::<K, T>(source, plan, y, grid.cols, params));
    }
    out
}
