//! Exhaustive template search.
//!
//! [`Matcher`] slides a pattern over every offset of the offset grid, scores
//! each window with the configured [`ScoreFormula`] and keeps the best one.
//! The scan module holds the row-level building blocks shared by the
//! sequential and the parallel paths.

pub mod scan;

use crate::candidate::nms::nms_2d;
use crate::candidate::topk::{Candidate, TopK};
use crate::kernel::scalar::{NccKernel, ReferenceKernel};
use crate::kernel::{Kernel, ScanParams};
use crate::pattern::PatternPlan;
use crate::raster::{Raster, RasterView, Sample};
use crate::stats::SpreadMode;
use crate::trace::{scan_outcome, scan_span};
use crate::util::{MatchError, Result};
use scan::{OffsetGrid, ScanSummary};

#[cfg(feature = "rayon")]
use crate::kernel::rayon::{collect_candidates_par, scan_best_par, score_rows_par};

/// Score formula used to compare a window with the pattern.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScoreFormula {
    /// Literal reference accumulation, see [`ReferenceKernel`].
    #[default]
    Reference,
    /// Normalized cross-correlation, see [`NccKernel`].
    Ncc,
}

/// Which top-left offsets take part in the scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EdgePolicy {
    /// `0 <= x < W - w`, `0 <= y < H - h`: the last legal column and row are
    /// never evaluated. Matches reference results.
    #[default]
    Exclusive,
    /// `0 <= x <= W - w`, `0 <= y <= H - h`: every placement that fits.
    Inclusive,
}

/// Configuration for [`Matcher`].
#[derive(Clone, Debug, PartialEq)]
pub struct MatchConfig {
    /// Score formula.
    pub formula: ScoreFormula,
    /// Spread statistic used for pattern and windows.
    pub spread: SpreadMode,
    /// Offset range policy.
    pub edge: EdgePolicy,
    /// Initial best score; a window is selected only when its score is
    /// strictly greater.
    pub min_score: f64,
    /// Spreads at or below this value are treated as zero and the window is
    /// skipped.
    pub min_spread: f64,
    /// Scan rows in parallel (requires the `rayon` feature, ignored otherwise).
    pub parallel: bool,
    /// Copy the winning window into the result.
    pub copy_window: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            formula: ScoreFormula::Reference,
            spread: SpreadMode::Reference,
            edge: EdgePolicy::Exclusive,
            min_score: 0.0,
            min_spread: 0.0,
            parallel: false,
            copy_window: true,
        }
    }
}

impl MatchConfig {
    fn scan_params(&self) -> ScanParams {
        ScanParams {
            min_score: self.min_score,
            min_spread: self.min_spread,
        }
    }
}

/// Outcome of a best-match search.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchResult<T> {
    /// True when some window scored above the threshold.
    pub found: bool,
    /// X offset of the best window; meaningful only when `found`.
    pub x: usize,
    /// Y offset of the best window; meaningful only when `found`.
    pub y: usize,
    /// Best score, or the threshold when nothing was found.
    pub score: f64,
    /// Copy of the best window when `found` and window copying is enabled.
    pub window: Option<Raster<T>>,
    /// Number of offsets visited.
    pub evaluated: usize,
    /// Number of visited offsets rejected for zero spread or a non-finite
    /// score.
    pub skipped: usize,
}

impl<T> MatchResult<T> {
    /// Returns the best offset, if any.
    pub fn offset(&self) -> Option<(usize, usize)> {
        self.found.then_some((self.x, self.y))
    }

    /// Returns the best offset and score as a candidate, if any.
    pub fn candidate(&self) -> Option<Candidate> {
        self.found.then_some(Candidate {
            x: self.x,
            y: self.y,
            score: self.score,
        })
    }
}

/// Dense grid of scores, one per evaluated offset.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreMap {
    width: usize,
    height: usize,
    scores: Vec<f64>,
}

impl ScoreMap {
    /// Number of x offsets.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of y offsets.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Scores in row-major order; skipped windows hold `f64::NEG_INFINITY`.
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Returns the score at offset `(x, y)` if it was evaluated.
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.scores.get(y * self.width + x).copied()
    }

    /// Returns the first maximal finite score in scan order.
    pub fn best(&self) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        for (idx, &score) in self.scores.iter().enumerate() {
            if !score.is_finite() {
                continue;
            }
            if best.map_or(true, |b| score > b.score) {
                best = Some(Candidate {
                    x: idx % self.width,
                    y: idx / self.width,
                    score,
                });
            }
        }
        best
    }
}

/// Exhaustive template matcher.
///
/// Holds only the pattern plan and the configuration; every call is
/// independent.
#[derive(Clone, Debug)]
pub struct Matcher {
    plan: PatternPlan,
    cfg: MatchConfig,
}

impl Matcher {
    /// Creates a matcher for `pattern` with the default configuration.
    pub fn new<P: Sample>(pattern: RasterView<'_, P>) -> Result<Self> {
        let cfg = MatchConfig::default();
        let plan = PatternPlan::from_view(pattern, cfg.spread)?;
        Ok(Self { plan, cfg })
    }

    /// Replaces the configuration, recomputing the pattern spread if the
    /// spread mode changed.
    pub fn with_config(mut self, cfg: MatchConfig) -> Self {
        if cfg.spread != self.plan.spread_mode() {
            self.plan = self.plan.with_spread_mode(cfg.spread);
        }
        self.cfg = cfg;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Returns the pattern plan.
    pub fn plan(&self) -> &PatternPlan {
        &self.plan
    }

    /// Finds the best-scoring window of `source`.
    pub fn match_source<T: Sample>(&self, source: RasterView<'_, T>) -> Result<MatchResult<T>> {
        let grid = self.offset_grid(source)?;
        let _span = scan_span!("match_source", grid).entered();

        let summary = match self.cfg.formula {
            ScoreFormula::Reference => self.scan_best_with::<ReferenceKernel, T>(source, grid),
            ScoreFormula::Ncc => self.scan_best_with::<NccKernel, T>(source, grid),
        };

        scan_outcome!(
            "best-of scan finished",
            evaluated = summary.evaluated,
            skipped = summary.skipped,
            found = summary.best.is_some()
        );

        let Some(best) = summary.best else {
            return Ok(MatchResult {
                found: false,
                x: 0,
                y: 0,
                score: self.cfg.min_score,
                window: None,
                evaluated: summary.evaluated,
                skipped: summary.skipped,
            });
        };

        let window = if self.cfg.copy_window {
            Some(
                source
                    .roi(best.x, best.y, self.plan.width(), self.plan.height())?
                    .to_raster(),
            )
        } else {
            None
        };

        Ok(MatchResult {
            found: true,
            x: best.x,
            y: best.y,
            score: best.score,
            window,
            evaluated: summary.evaluated,
            skipped: summary.skipped,
        })
    }

    /// Scores every offset of the grid.
    pub fn score_map<T: Sample>(&self, source: RasterView<'_, T>) -> Result<ScoreMap> {
        let grid = self.offset_grid(source)?;
        let _span = scan_span!("score_map", grid).entered();

        let scores = match self.cfg.formula {
            ScoreFormula::Reference => self.score_rows_with::<ReferenceKernel, T>(source, grid),
            ScoreFormula::Ncc => self.score_rows_with::<NccKernel, T>(source, grid),
        };
        Ok(ScoreMap {
            width: grid.cols,
            height: grid.rows,
            scores,
        })
    }

    /// Returns up to `k` candidates above the threshold, best first.
    ///
    /// With `nms_radius > 0`, candidates within that Chebyshev distance of a
    /// better candidate are dropped before truncating to `k`.
    pub fn match_topk<T: Sample>(
        &self,
        source: RasterView<'_, T>,
        k: usize,
        nms_radius: usize,
    ) -> Result<Vec<Candidate>> {
        let grid = self.offset_grid(source)?;
        if k == 0 || self.plan.stats().is_degenerate(self.cfg.min_spread) {
            return Ok(Vec::new());
        }
        let _span = scan_span!("match_topk", grid, k = k, nms_radius = nms_radius).entered();

        let mut candidates = match self.cfg.formula {
            ScoreFormula::Reference => self.collect_with::<ReferenceKernel, T>(source, grid),
            ScoreFormula::Ncc => self.collect_with::<NccKernel, T>(source, grid),
        };

        let out = if nms_radius == 0 {
            let mut topk = TopK::new(k);
            for candidate in candidates {
                topk.push(candidate);
            }
            topk.into_sorted_desc()
        } else {
            let mut kept = nms_2d(&mut candidates, nms_radius);
            kept.truncate(k);
            kept
        };

        scan_outcome!("top-k collected", count = out.len());
        Ok(out)
    }

    /// Scores the single window at `(x, y)`.
    ///
    /// Any offset where the pattern fits is accepted, regardless of the edge
    /// policy. Returns `None` when the window does not fit or is degenerate.
    pub fn score_at<T: Sample>(&self, source: RasterView<'_, T>, x: usize, y: usize) -> Option<f64> {
        let params = self.cfg.scan_params();
        match self.cfg.formula {
            ScoreFormula::Reference => {
                <ReferenceKernel as Kernel>::score_at(source, &self.plan, x, y, params)
            }
            ScoreFormula::Ncc => <NccKernel as Kernel>::score_at(source, &self.plan, x, y, params),
        }
    }

    fn offset_grid<T>(&self, source: RasterView<'_, T>) -> Result<OffsetGrid> {
        if source.is_empty() {
            return Err(MatchError::EmptyRaster {
                width: source.width(),
                height: source.height(),
            });
        }
        if self.plan.width() > source.width() || self.plan.height() > source.height() {
            return Err(MatchError::InvalidDimensions {
                pattern_width: self.plan.width(),
                pattern_height: self.plan.height(),
                source_width: source.width(),
                source_height: source.height(),
            });
        }
        Ok(OffsetGrid::new(
            source.width(),
            source.height(),
            &self.plan,
            self.cfg.edge,
        ))
    }

    fn scan_best_with<K: Kernel, T: Sample>(
        &self,
        source: RasterView<'_, T>,
        grid: OffsetGrid,
    ) -> ScanSummary {
        let params = self.cfg.scan_params();
        #[cfg(feature = "rayon")]
        if self.cfg.parallel {
            return scan_best_par::<K, T>(source, &self.plan, grid, params);
        }
        scan::scan_best::<K, T>(source, &self.plan, grid, params)
    }

    fn score_rows_with<K: Kernel, T: Sample>(
        &self,
        source: RasterView<'_, T>,
        grid: OffsetGrid,
    ) -> Vec<f64> {
        let params = self.cfg.scan_params();
        #[cfg(feature = "rayon")]
        if self.cfg.parallel {
            return score_rows_par::<K, T>(source, &self.plan, grid, params);
        }
        scan::score_rows::<K, T>(source, &self.plan, grid, params)
    }

    fn collect_with<K: Kernel, T: Sample>(
        &self,
        source: RasterView<'_, T>,
        grid: OffsetGrid,
    ) -> Vec<Candidate> {
        let params = self.cfg.scan_params();
        #[cfg(feature = "rayon")]
        if self.cfg.parallel {
            return collect_candidates_par::<K, T>(source, &self.plan, grid, params);
        }
        scan::collect_candidates::<K, T>(source, &self.plan, grid, params)
    }
}

/// Matches `pattern` against `source` with the default configuration.
pub fn match_pattern<T: Sample, P: Sample>(
    source: RasterView<'_, T>,
    pattern: RasterView<'_, P>,
) -> Result<MatchResult<T>> {
    match_pattern_with(source, pattern, MatchConfig::default())
}

/// Matches `pattern` against `source` with an explicit configuration.
pub fn match_pattern_with<T: Sample, P: Sample>(
    source: RasterView<'_, T>,
    pattern: RasterView<'_, P>,
    cfg: MatchConfig,
) -> Result<MatchResult<T>> {
    if source.is_empty() {
        return Err(MatchError::EmptyRaster {
            width: source.width(),
            height: source.height(),
        });
    }
    Matcher::new(pattern)?.with_config(cfg).match_source(source)
}
