//! Error types for rastermatch.

use thiserror::Error;

/// Result alias for rastermatch operations.
pub type Result<T> = std::result::Result<T, MatchError>;

/// Errors that can occur when building rasters or running a match.
///
/// Numeric degeneracy inside the search (zero spread, non-finite scores) is
/// never reported here; such windows are skipped instead.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum MatchError {
    /// The source or the pattern has zero width or zero height.
    #[error("empty raster: {width}x{height}")]
    EmptyRaster { width: usize, height: usize },
    /// The pattern is larger than the source in at least one dimension.
    #[error(
        "pattern {pattern_width}x{pattern_height} does not fit in source {source_width}x{source_height}"
    )]
    InvalidDimensions {
        pattern_width: usize,
        pattern_height: usize,
        source_width: usize,
        source_height: usize,
    },
    /// The sample buffer length does not match the raster layout.
    #[error("buffer size mismatch: needed {needed}, got {got}")]
    BufferSizeMismatch { needed: usize, got: usize },
    /// The row stride is smaller than the raster width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// A requested window lies outside its parent raster.
    #[error(
        "window ({x}, {y}) {width}x{height} out of bounds for raster {raster_width}x{raster_height}"
    )]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        raster_width: usize,
        raster_height: usize,
    },
    /// Decoding or encoding an image failed.
    #[cfg(feature = "image-io")]
    #[error("image io: {reason}")]
    ImageIo { reason: String },
}
