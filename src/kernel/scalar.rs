//! Scalar kernels for score evaluation.

use crate::kernel::{Kernel, ScanParams};
use crate::pattern::PatternPlan;
use crate::raster::{RasterView, Sample};
use crate::stats::WindowStats;

/// Literal reference accumulation:
/// `sum(((w - mean_w) * p - mean_p) * (1 / (spread_w * spread_p)))`.
///
/// The pattern mean is subtracted after the product and the normalisation is
/// applied per term. The result is not bounded to `[-1, 1]`.
pub struct ReferenceKernel;

/// Normalized cross-correlation:
/// `sum((w - mean_w) * (p - mean_p)) / (spread_w * spread_p * n)`.
pub struct NccKernel;

fn window_stats<T: Sample>(
    window: RasterView<'_, T>,
    plan: &PatternPlan,
    params: ScanParams,
) -> Option<WindowStats> {
    if window.width() != plan.width() || window.height() != plan.height() {
        return None;
    }
    if plan.stats().is_degenerate(params.min_spread) {
        return None;
    }
    let stats = WindowStats::compute(window, plan.spread_mode());
    if stats.is_degenerate(params.min_spread) {
        return None;
    }
    Some(stats)
}

fn finite(score: f64) -> Option<f64> {
    score.is_finite().then_some(score)
}

impl Kernel for ReferenceKernel {
    fn score_window<T: Sample>(
        window: RasterView<'_, T>,
        plan: &PatternPlan,
        params: ScanParams,
    ) -> Option<f64> {
        let stats = window_stats(window, plan, params)?;
        let inv = 1.0 / (stats.spread * plan.spread());
        let pattern_mean = plan.mean();
        let samples = plan.samples();
        let width = plan.width();

        let mut score = 0.0f64;
        for (ty, row) in window.rows().enumerate() {
            let base = ty * width;
            for (tx, &value) in row.iter().enumerate() {
                score += ((value.to_f64() - stats.mean) * samples[base + tx] - pattern_mean) * inv;
            }
        }
        finite(score)
    }
}

impl Kernel for NccKernel {
    fn score_window<T: Sample>(
        window: RasterView<'_, T>,
        plan: &PatternPlan,
        params: ScanParams,
    ) -> Option<f64> {
        let stats = window_stats(window, plan, params)?;
        let zero_mean = plan.zero_mean();
        let width = plan.width();

        let mut dot = 0.0f64;
        for (ty, row) in window.rows().enumerate() {
            let base = ty * width;
            for (tx, &value) in row.iter().enumerate() {
                dot += (value.to_f64() - stats.mean) * zero_mean[base + tx];
            }
        }
        let denom = stats.spread * plan.spread() * plan.len() as f64;
        finite(dot / denom)
    }
}
