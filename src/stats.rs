//! Window statistics: mean and spread.
//!
//! `mean` divides by the total sample count. `spread` has two modes:
//!
//! - [`SpreadMode::Reference`] accumulates `sqrt(mean - s)` over the samples
//!   strictly below the mean (samples at or above the mean contribute
//!   nothing) and returns `sqrt(sum / (n - 1))`. This is not a standard
//!   deviation; it is kept for parity with existing match scores.
//! - [`SpreadMode::Corrected`] is the sample standard deviation
//!   `sqrt(sum((mean - s)^2) / (n - 1))`.
//!
//! Both modes return `0` for a single-sample raster.

use crate::raster::{RasterView, Sample};

/// Dispersion statistic used for pattern and window spread.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpreadMode {
    /// Asymmetric square-root rule, compatible with reference scores.
    #[default]
    Reference,
    /// Sample standard deviation.
    Corrected,
}

/// Mean and spread of a single window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowStats {
    /// Arithmetic mean of the samples.
    pub mean: f64,
    /// Dispersion of the samples around `mean`.
    pub spread: f64,
}

impl WindowStats {
    /// Computes mean and spread of `raster`.
    pub fn compute<T: Sample>(raster: RasterView<'_, T>, mode: SpreadMode) -> Self {
        let mean = mean(raster);
        let spread = spread(mean, raster, mode);
        Self { mean, spread }
    }

    /// Returns true when the spread cannot be used as a divisor.
    pub fn is_degenerate(&self, min_spread: f64) -> bool {
        !(self.spread.is_finite() && self.spread > min_spread)
    }
}

/// Arithmetic mean of all samples. Returns `0` for an empty raster.
pub fn mean<T: Sample>(raster: RasterView<'_, T>) -> f64 {
    let count = raster.len();
    if count == 0 {
        return 0.0;
    }
    let mut sum = 0.0f64;
    for row in raster.rows() {
        for &value in row {
            sum += value.to_f64();
        }
    }
    sum / count as f64
}

/// Spread of the samples around `mean`, see the module docs for the modes.
pub fn spread<T: Sample>(mean: f64, raster: RasterView<'_, T>, mode: SpreadMode) -> f64 {
    let count = raster.len();
    if count <= 1 {
        return 0.0;
    }
    let mut sum = 0.0f64;
    for row in raster.rows() {
        for &value in row {
            let d = mean - value.to_f64();
            match mode {
                SpreadMode::Reference => {
                    if d > 0.0 {
                        sum += d.sqrt();
                    }
                }
                SpreadMode::Corrected => sum += d * d,
            }
        }
    }
    (sum / (count - 1) as f64).sqrt()
}
