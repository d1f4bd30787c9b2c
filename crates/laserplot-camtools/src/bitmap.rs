//! Raster ingestion
//!
//! Loads an image, shrinks it to fit the configured maximum size (aspect
//! ratio kept), converts it to grayscale and binarizes it into a
//! [`PixelGrid`] of [`MARK`]/[`SKIP`] values ready for the raster emitter.

use crate::error::{CamToolError, CamToolResult};
use crate::raster::{PixelGrid, MARK, SKIP};
use image::imageops::{self, BiLevel};
use image::{DynamicImage, GrayImage};
use laserplot_core::DitherMethod;
use std::path::Path;

/// How a source image is prepared for scanning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BitmapOptions {
    /// Largest width in pixels; larger images are downscaled
    pub max_width: u32,
    /// Largest height in pixels
    pub max_height: u32,
    pub dither: DitherMethod,
    /// Cut-off for [`DitherMethod::Threshold`]; values below it mark
    pub threshold: u8,
}

impl Default for BitmapOptions {
    fn default() -> Self {
        Self {
            max_width: 75,
            max_height: 75,
            dither: DitherMethod::FloydSteinberg,
            threshold: 128,
        }
    }
}

/// Load an image file and prepare it for scanning
pub fn load_pixel_grid<P: AsRef<Path>>(path: P, options: &BitmapOptions) -> CamToolResult<PixelGrid> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|e| {
        CamToolError::LoadError(format!("Failed to load image {}: {}", path.display(), e))
    })?;
    pixel_grid_from_image(img, options)
}

/// Prepare an already decoded image for scanning
pub fn pixel_grid_from_image(img: DynamicImage, options: &BitmapOptions) -> CamToolResult<PixelGrid> {
    if options.max_width == 0 || options.max_height == 0 {
        return Err(CamToolError::InvalidParameters(format!(
            "maximum image size must be non-zero, got {}x{}",
            options.max_width, options.max_height
        )));
    }

    let img = if img.width() > options.max_width || img.height() > options.max_height {
        let scaled = img.thumbnail(options.max_width, options.max_height);
        tracing::debug!(
            "Downscaled image from {}x{} to {}x{}",
            img.width(),
            img.height(),
            scaled.width(),
            scaled.height()
        );
        scaled
    } else {
        img
    };

    let mut gray = img.to_luma8();
    match options.dither {
        DitherMethod::Threshold => apply_threshold(&mut gray, options.threshold),
        DitherMethod::FloydSteinberg => imageops::dither(&mut gray, &BiLevel),
        DitherMethod::None => {}
    }

    let (width, height) = gray.dimensions();
    PixelGrid::new(width as usize, height as usize, gray.into_raw())
        .map_err(|e| CamToolError::ImageError(e.to_string()))
}

fn apply_threshold(image: &mut GrayImage, threshold: u8) {
    for pixel in image.pixels_mut() {
        pixel.0[0] = if pixel.0[0] < threshold { MARK } else { SKIP };
    }
}
