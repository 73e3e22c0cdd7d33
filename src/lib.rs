//! rastermatch is a brute-force template matcher for single-channel rasters.
//!
//! A [`Matcher`] slides a pattern over every offset of a source raster,
//! computes a mean/spread-normalized correlation score per window and
//! reports the best window. Scoring follows the reference formula by default;
//! a textbook normalized cross-correlation and a standard-deviation spread
//! are available through [`MatchConfig`]. Rows can be scanned in parallel
//! with the `rayon` feature.

mod candidate;
pub mod kernel;
pub mod lowlevel;
pub mod pattern;
pub mod raster;
pub mod search;
pub mod stats;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use raster::io;

pub use candidate::topk::Candidate;
pub use pattern::PatternPlan;
pub use raster::{Raster, RasterView, Sample};
pub use search::scan::OffsetGrid;
pub use search::{
    match_pattern, match_pattern_with, EdgePolicy, MatchConfig, MatchResult, Matcher, ScoreFormula,
    ScoreMap,
};
pub use stats::{SpreadMode, WindowStats};
pub use util::{MatchError, Result};
