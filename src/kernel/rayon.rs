//! Rayon-parallel scans (feature-gated).
//!
//! Work is split over y-coordinates (rows); each task scores every x offset
//! of its row with the same row helpers the sequential scan uses. Partial
//! results are merged in row order, so the outcome is identical to the
//! sequential scan.

use crate::candidate::topk::Candidate;
use crate::kernel::{Kernel, ScanParams};
use crate::pattern::PatternPlan;
use crate::raster::{RasterView, Sample};
use crate::search::scan::{
    fill_score_row, row_candidates, scan_row_best, OffsetGrid, ScanSummary,
};
use rayon::prelude::*;

/// Row-parallel best-of scan.
pub(crate) fn scan_best_par<K: Kernel, T: Sample>(
    source: RasterView<'_, T>,
    plan: &PatternPlan,
    grid: OffsetGrid,
    params: ScanParams,
) -> ScanSummary {
    if plan.stats().is_degenerate(params.min_spread) {
        return ScanSummary::all_skipped(grid);
    }

    let row_results: Vec<ScanSummary> = (0..grid.rows)
        .into_par_iter()
        .map(|y| scan_row_best::<K, T>(source, plan, y, grid.cols, params))
        .collect();

    row_results
        .into_iter()
        .fold(ScanSummary::default(), ScanSummary::merge)
}

/// Row-parallel dense score map in row-major order.
pub(crate) fn score_rows_par<K: Kernel, T: Sample>(
    source: RasterView<'_, T>,
    plan: &PatternPlan,
    grid: OffsetGrid,
    params: ScanParams,
) -> Vec<f64> {
    let mut scores = vec![f64::NEG_INFINITY; grid.len()];
    if grid.is_empty() {
        return scores;
    }
    scores
        .par_chunks_mut(grid.cols)
        .enumerate()
        .for_each(|(y, row)| fill_score_row::<K, T>(source, plan, y, params, row));
    scores
}

/// Row-parallel candidate collection.
pub(crate) fn collect_candidates_par<K: Kernel, T: Sample>(
    source: RasterView<'_, T>,
    plan: &PatternPlan,
    grid: OffsetGrid,
    params: ScanParams,
) -> Vec<Candidate> {
    let row_results: Vec<Vec<Candidate>> = (0..grid.rows)
        .into_par_iter()
        .map(|y| row_candidates::<K, T>(source, plan, y, grid.cols, params))
        .collect();

    row_results.into_iter().flatten().collect()
}
