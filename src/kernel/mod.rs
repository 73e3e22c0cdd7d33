//! Score kernels.
//!
//! A kernel turns one window of the source plus the pattern plan into a
//! score. Kernels return `None` for windows that must not take part in the
//! selection: a spread at or below `min_spread` on either side, or a
//! non-finite score.

use crate::pattern::PatternPlan;
use crate::raster::{RasterView, Sample};

/// Scan configuration for kernel evaluations.
#[derive(Clone, Copy, Debug)]
pub struct ScanParams {
    /// Scores must be strictly greater than this to be selected.
    pub min_score: f64,
    /// Spreads at or below this value are treated as zero.
    pub min_spread: f64,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            min_score: 0.0,
            min_spread: 0.0,
        }
    }
}

/// Kernel trait for window scoring.
pub trait Kernel {
    /// Scores a window that has exactly the pattern's dimensions.
    fn score_window<T: Sample>(
        window: RasterView<'_, T>,
        plan: &PatternPlan,
        params: ScanParams,
    ) -> Option<f64>;

    /// Scores the window whose top-left corner is `(x, y)`.
    fn score_at<T: Sample>(
        source: RasterView<'_, T>,
        plan: &PatternPlan,
        x: usize,
        y: usize,
        params: ScanParams,
    ) -> Option<f64> {
        let window = source.roi(x, y, plan.width(), plan.height()).ok()?;
        Self::score_window(window, plan, params)
    }
}

pub mod scalar;

#[cfg(feature = "rayon")]
pub mod rayon;
