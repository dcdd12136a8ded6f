use image::{DynamicImage, GrayImage, ImageBuffer, Luma, RgbImage};
use imageproc::contrast::otsu_level;
use imageproc::filter::gaussian_blur_f32;
use std::io::Cursor;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Failed to load image: {0}")]
    Load(#[from] image::ImageError),
    #[error("Failed to encode processed image: {0}")]
    Encode(String),
}

/// Decode raw image bytes (JPEG / PNG / WEBP / …).
pub fn decode(data: &[u8]) -> Result<DynamicImage, PreprocessError> {
    Ok(image::load_from_memory(data)?)
}

/// Grayscale + Gaussian blur + Otsu threshold.
///
/// Pixels strictly brighter than the Otsu level become 255, the rest 0.
/// A non-positive `blur_sigma` skips the blur.
pub fn binarize(img: &DynamicImage, blur_sigma: f32) -> GrayImage {
    let gray = img.to_luma8();
    let smoothed = if blur_sigma > 0.0 {
        gaussian_blur_f32(&gray, blur_sigma)
    } else {
        gray
    };

    let level = otsu_level(&smoothed);
    debug!(level, "Otsu threshold computed");

    ImageBuffer::from_fn(smoothed.width(), smoothed.height(), |x, y| {
        if smoothed.get_pixel(x, y)[0] > level {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

/// Encode an RGB image as PNG, for engines that take encoded bytes.
pub fn encode_as_png(img: &RgbImage) -> Result<Vec<u8>, PreprocessError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| PreprocessError::Encode(e.to_string()))?;
    Ok(buf)
}
