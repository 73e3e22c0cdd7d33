//! Rasters and raster views.
//!
//! `RasterView` is a borrowed 2D view into a 1D buffer with an explicit stride.
//! The stride counts elements between the starts of consecutive rows, so a
//! stride larger than the width represents padded rows. Windows are zero-copy
//! views into the same backing slice and retain the original stride.
//!
//! `Raster` owns a contiguous row-major buffer (`index = x + y * width`).
//!
//! Zero-width or zero-height rasters are valid values with an empty buffer;
//! the matcher is the one that rejects them.

use crate::util::{MatchError, Result};

#[cfg(feature = "image-io")]
pub mod io;

/// Numeric sample type stored in a raster.
///
/// All statistics and scores are computed in `f64`, so any sample type only
/// has to widen losslessly (or nearly so) into it.
pub trait Sample: Copy + Send + Sync + 'static {
    /// Widens the sample to `f64`.
    fn to_f64(self) -> f64;
}

macro_rules! impl_sample {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Sample for $ty {
                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_sample!(u8, i8, u16, i16, u32, i32, f32, f64);

/// Borrowed 2D raster view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct RasterView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> RasterView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> Result<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> Result<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(MatchError::BufferSizeMismatch {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the raster width in samples.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the raster height in samples.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the number of samples covered by the view (`width * height`).
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Returns true when the view has zero width or zero height.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }

    /// Iterates over the rows of the view, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &'a [T]> + '_ {
        (0..self.height).filter_map(move |y| self.row(y))
    }

    /// Returns a zero-copy window view into the same backing buffer.
    pub fn roi(&self, x: usize, y: usize, width: usize, height: usize) -> Result<RasterView<'a, T>> {
        let out_of_bounds = MatchError::RoiOutOfBounds {
            x,
            y,
            width,
            height,
            raster_width: self.width,
            raster_height: self.height,
        };
        if width == 0 || height == 0 {
            return Err(MatchError::EmptyRaster { width, height });
        }

        let end_x = x.checked_add(width).ok_or_else(|| out_of_bounds.clone())?;
        let end_y = y.checked_add(height).ok_or_else(|| out_of_bounds.clone())?;
        if end_x > self.width || end_y > self.height {
            return Err(out_of_bounds);
        }

        let start = y
            .checked_mul(self.stride)
            .and_then(|v| v.checked_add(x))
            .ok_or(out_of_bounds)?;
        let data = self
            .data
            .get(start..)
            .ok_or(MatchError::BufferSizeMismatch {
                needed: start.saturating_add(1),
                got: self.data.len(),
            })?;

        RasterView::new(data, width, height, self.stride)
    }
}

impl<T: Copy> RasterView<'_, T> {
    /// Copies the viewed samples into a contiguous owned raster.
    pub fn to_raster(&self) -> Raster<T> {
        let mut data = Vec::with_capacity(self.len());
        for row in self.rows() {
            data.extend_from_slice(row);
        }
        Raster {
            data,
            width: self.width,
            height: self.height,
        }
    }
}

/// Owned contiguous raster in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
}

impl<T> Raster<T> {
    /// Creates a raster from a row-major buffer of exactly `width * height`
    /// samples.
    pub fn new(data: Vec<T>, width: usize, height: usize) -> Result<Self> {
        let needed = width
            .checked_mul(height)
            .ok_or(MatchError::BufferSizeMismatch {
                needed: usize::MAX,
                got: data.len(),
            })?;
        if data.len() != needed {
            return Err(MatchError::BufferSizeMismatch {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the raster width in samples.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the raster height in samples.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns true when the raster has zero width or zero height.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns the row-major sample buffer.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Consumes the raster and returns its sample buffer.
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Returns the sample at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x)
    }

    /// Returns a borrowed view of the raster.
    pub fn view(&self) -> RasterView<'_, T> {
        RasterView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }
}

impl<T: Copy> Raster<T> {
    /// Builds a raster from equally long rows.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        let mut data = Vec::with_capacity(width * height);
        for row in rows {
            let row = row.as_ref();
            if row.len() != width {
                return Err(MatchError::BufferSizeMismatch {
                    needed: width,
                    got: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Self::new(data, width, height)
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> Result<usize> {
    if width == 0 || height == 0 {
        return Ok(0);
    }
    if stride < width {
        return Err(MatchError::InvalidStride { width, stride });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(MatchError::BufferSizeMismatch {
            needed: usize::MAX,
            got: 0,
        })
}
