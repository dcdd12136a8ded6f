use image::{DynamicImage, Rgb, RgbImage};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};
use tracing::debug;

use crate::geometry::{distance, CornerSet, GeometryError};

/// The receipt warped to a flat, top-down view.
pub type RectifiedImage = RgbImage;

/// Output size for a corner set: the longer of each pair of opposite edges,
/// truncated to whole pixels.
pub fn target_size(corners: &CornerSet) -> Result<(u32, u32), GeometryError> {
    let CornerSet { top_left: tl, top_right: tr, bottom_right: br, bottom_left: bl } = *corners;

    let width = (distance(tr, tl) as i64).max(distance(br, bl) as i64);
    let height = (distance(tl, bl) as i64).max(distance(tr, br) as i64);

    if width <= 0 || height <= 0 {
        return Err(GeometryError::DegenerateQuadrilateral { width, height });
    }
    Ok((width as u32, height as u32))
}

/// Warp the receipt to a top-down view.
///
/// The corners map onto `(0,0)`, `(w-1,0)`, `(w-1,h-1)` and `(0,h-1)` of a
/// `w x h` image; pixels falling outside the photograph come out black.
pub fn rectify(image: &DynamicImage, corners: &CornerSet) -> Result<RectifiedImage, GeometryError> {
    let (width, height) = target_size(corners)?;
    let (w, h) = ((width - 1) as f32, (height - 1) as f32);
    let dest = [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)];

    let projection = Projection::from_control_points(corners.to_control_points(), dest).ok_or(
        GeometryError::DegenerateQuadrilateral { width: width as i64, height: height as i64 },
    )?;

    let source = image.to_rgb8();
    let mut output = RgbImage::new(width, height);
    warp_into(&source, &projection, Interpolation::Bilinear, Rgb([0, 0, 0]), &mut output);

    debug!(width, height, "Receipt rectified");
    Ok(output)
}
