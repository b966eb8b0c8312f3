//! Image preprocessing: grayscale → median denoise → adaptive threshold.
//!
//! Tesseract reads clean black-on-white text far more reliably than raw
//! photos or scans. The three fixed steps here remove impulse noise and
//! binarise against the *local* background, which survives shadows and
//! uneven lighting that defeat a single global threshold.

use crate::error::ExtractError;
use image::{DynamicImage, GrayImage, ImageReader, Luma};
use imageproc::filter::median_filter;
use std::path::Path;
use tracing::debug;

/// Median filter radius: a 3×3 neighbourhood.
pub const MEDIAN_RADIUS: u32 = 1;

/// Adaptive threshold radius: a 5×5 neighbourhood.
pub const THRESHOLD_BLOCK_RADIUS: u32 = 2;

/// Constant subtracted from the local mean before comparing.
pub const THRESHOLD_OFFSET: i32 = 4;

/// Load an image from `path` and preprocess it for recognition.
pub fn preprocess_path(path: &Path) -> Result<GrayImage, ExtractError> {
    let img = load_image(path)?;
    debug!(
        "Loaded {} → {}x{} px",
        path.display(),
        img.width(),
        img.height()
    );
    Ok(preprocess(&img))
}

/// Decode an image, sniffing the format from its content.
///
/// A `.jpg` that is really a PNG still decodes; the extension only decides
/// which pipeline branch the driver takes.
pub fn load_image(path: &Path) -> Result<DynamicImage, ExtractError> {
    let decode_err = |detail: String| ExtractError::ImageDecode {
        path: path.to_path_buf(),
        detail,
    };

    ImageReader::open(path)
        .map_err(|e| decode_err(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| decode_err(e.to_string()))?
        .decode()
        .map_err(|e| decode_err(e.to_string()))
}

/// Convert to 8-bit grayscale with BT.601 weights (0.299 R + 0.587 G + 0.114 B).
///
/// Uses the 14-bit fixed-point coefficients common to OpenCV-style
/// converters. Any alpha channel is discarded.
pub fn to_gray(img: &DynamicImage) -> GrayImage {
    const R: u32 = 4899;
    const G: u32 = 9617;
    const B: u32 = 1868;
    const SHIFT: u32 = 14;

    let rgb = img.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let luma = (r as u32 * R + g as u32 * G + b as u32 * B + (1 << (SHIFT - 1))) >> SHIFT;
        Luma([luma as u8])
    })
}

/// Grayscale, 3×3 median, then adaptive mean threshold (5×5, offset 4).
///
/// The output only contains the values 0 and 255.
pub fn preprocess(img: &DynamicImage) -> GrayImage {
    let gray = to_gray(img);
    let denoised = median_filter(&gray, MEDIAN_RADIUS, MEDIAN_RADIUS);
    adaptive_mean_threshold(&denoised, THRESHOLD_BLOCK_RADIUS, THRESHOLD_OFFSET)
}

/// Binarise `image` against the mean of each pixel's neighbourhood.
///
/// A pixel becomes white (255) when `pixel - round(mean) > -offset`, black
/// (0) otherwise. The window is `(2 * block_radius + 1)²` pixels; pixels
/// outside the image repeat the nearest edge pixel.
pub fn adaptive_mean_threshold(image: &GrayImage, block_radius: u32, offset: i32) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut out = GrayImage::new(width, height);
    if width == 0 || height == 0 {
        return out;
    }

    let r = block_radius as i64;
    let area = ((2 * r + 1) * (2 * r + 1)) as u32;
    let max_x = width as i64 - 1;
    let max_y = height as i64 - 1;

    for y in 0..height {
        for x in 0..width {
            let mut sum = 0u32;
            for dy in -r..=r {
                let sy = (y as i64 + dy).clamp(0, max_y) as u32;
                for dx in -r..=r {
                    let sx = (x as i64 + dx).clamp(0, max_x) as u32;
                    sum += image.get_pixel(sx, sy)[0] as u32;
                }
            }
            // Odd window area, so the rounded mean never ties.
            let mean = ((sum + area / 2) / area) as i32;
            let src = image.get_pixel(x, y)[0] as i32;
            let value = if src - mean > -offset { 255 } else { 0 };
            out.put_pixel(x, y, Luma([value]));
        }
    }

    out
}
