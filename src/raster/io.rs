//! Conversions between rasters and `image` crate buffers.
//!
//! Available when the `image-io` feature is enabled. The matcher itself never
//! reads or writes files; these helpers are for hosts such as the CLI.

use crate::raster::{Raster, RasterView};
use crate::util::{MatchError, Result};
use std::path::Path;

/// Creates a borrowed view from a grayscale image buffer.
pub fn view_from_gray_image(img: &image::GrayImage) -> Result<RasterView<'_, u8>> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    RasterView::from_slice(img.as_raw(), width, height)
}

/// Creates an owned raster from a grayscale image buffer.
pub fn raster_from_gray_image(img: &image::GrayImage) -> Result<Raster<u8>> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    Raster::new(img.as_raw().clone(), width, height)
}

/// Creates an 8-bit luma raster from a dynamic image.
pub fn raster_from_dynamic_image(img: &image::DynamicImage) -> Result<Raster<u8>> {
    raster_from_gray_image(&img.to_luma8())
}

/// Converts an 8-bit raster back into a grayscale image buffer.
pub fn gray_image_from_raster(raster: &Raster<u8>) -> Result<image::GrayImage> {
    let too_large = || MatchError::ImageIo {
        reason: format!("raster {}x{} too large", raster.width(), raster.height()),
    };
    let width = u32::try_from(raster.width()).map_err(|_| too_large())?;
    let height = u32::try_from(raster.height()).map_err(|_| too_large())?;
    image::GrayImage::from_raw(width, height, raster.data().to_vec()).ok_or_else(too_large)
}

/// Loads an image from disk and converts it to an 8-bit luma raster.
pub fn load_gray_raster<P: AsRef<Path>>(path: P) -> Result<Raster<u8>> {
    let img = image::open(path).map_err(|err| MatchError::ImageIo {
        reason: err.to_string(),
    })?;
    raster_from_dynamic_image(&img)
}

/// Saves an 8-bit raster as an image; the format follows the file extension.
pub fn save_gray_raster<P: AsRef<Path>>(raster: &Raster<u8>, path: P) -> Result<()> {
    gray_image_from_raster(raster)?
        .save(path)
        .map_err(|err| MatchError::ImageIo {
            reason: err.to_string(),
        })
}
