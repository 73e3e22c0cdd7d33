//! Pattern plan precomputation.

use crate::raster::{RasterView, Sample};
use crate::stats::{SpreadMode, WindowStats};
use crate::util::{MatchError, Result};

/// Precomputed pattern statistics and sample buffers.
///
/// The plan is built once per pattern and shared read-only by every window
/// evaluation.
#[derive(Clone, Debug)]
pub struct PatternPlan {
    width: usize,
    height: usize,
    stats: WindowStats,
    spread_mode: SpreadMode,
    samples: Vec<f64>,
    zero_mean: Vec<f64>,
}

impl PatternPlan {
    /// Builds a plan from a pattern view.
    ///
    /// A zero spread is accepted here; the scan treats such a pattern as
    /// degenerate and skips every window.
    pub fn from_view<T: Sample>(pattern: RasterView<'_, T>, spread_mode: SpreadMode) -> Result<Self> {
        let width = pattern.width();
        let height = pattern.height();
        if pattern.is_empty() {
            return Err(MatchError::EmptyRaster { width, height });
        }

        let stats = WindowStats::compute(pattern, spread_mode);
        let mut samples = Vec::with_capacity(pattern.len());
        for row in pattern.rows() {
            samples.extend(row.iter().map(|v| v.to_f64()));
        }
        let zero_mean = samples.iter().map(|v| v - stats.mean).collect();

        Ok(Self {
            width,
            height,
            stats,
            spread_mode,
            samples,
            zero_mean,
        })
    }

    /// Returns the plan with its spread recomputed under `spread_mode`.
    pub fn with_spread_mode(mut self, spread_mode: SpreadMode) -> Self {
        let view = RasterView::from_slice(&self.samples, self.width, self.height);
        if let Ok(view) = view {
            self.stats = WindowStats::compute(view, spread_mode);
            self.spread_mode = spread_mode;
        }
        self
    }

    /// Returns the pattern width in samples.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the pattern height in samples.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of samples in the pattern.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; empty patterns are rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the mean of the pattern.
    pub fn mean(&self) -> f64 {
        self.stats.mean
    }

    /// Returns the spread of the pattern.
    pub fn spread(&self) -> f64 {
        self.stats.spread
    }

    /// Returns the pattern statistics.
    pub fn stats(&self) -> WindowStats {
        self.stats
    }

    /// Returns the spread mode the plan was built with.
    pub fn spread_mode(&self) -> SpreadMode {
        self.spread_mode
    }

    /// Returns the pattern samples in row-major order.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Returns the zero-mean pattern buffer in row-major order.
    pub fn zero_mean(&self) -> &[f64] {
        &self.zero_mean
    }
}
