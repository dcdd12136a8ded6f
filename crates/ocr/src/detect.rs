use image::{DynamicImage, GrayImage};
use imageproc::contours::find_contours;
use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::geometry::{
    approximate_polygon, closed_arc_length, order_points, polygon_area, CornerSet, GeometryError,
    Point,
};
use crate::preprocess;

/// Locate the receipt's four corners in a photograph.
///
/// The receipt is taken to be the largest bright region after Otsu
/// binarization; its border must simplify to a quadrilateral.
pub fn detect(image: &DynamicImage, config: &PipelineConfig) -> Result<CornerSet, GeometryError> {
    let binary = preprocess::binarize(image, config.blur_sigma);
    detect_in_binary(&binary, config.approx_epsilon_ratio)
}

/// Contour search on an already binarized image (non-zero = foreground).
pub fn detect_in_binary(binary: &GrayImage, epsilon_ratio: f64) -> Result<CornerSet, GeometryError> {
    let contours: Vec<Vec<Point>> = find_contours::<i32>(binary)
        .into_iter()
        .map(|c| c.points.into_iter().map(Point::from).collect())
        .collect();
    debug!(count = contours.len(), "Contours extracted");

    let largest = largest_contour(&contours).ok_or(GeometryError::NoContourFound)?;
    quadrilateral_from_contour(largest, epsilon_ratio)
}

/// The contour enclosing the most area; the first one wins a tie.
fn largest_contour(contours: &[Vec<Point>]) -> Option<&[Point]> {
    let mut best: Option<(&[Point], f64)> = None;
    for contour in contours {
        let area = polygon_area(contour);
        if best.map_or(true, |(_, a)| area > a) {
            best = Some((contour.as_slice(), area));
        }
    }
    if let Some((_, area)) = best {
        debug!(area, "Largest contour selected");
    }
    best.map(|(c, _)| c)
}

/// Simplify a closed contour and order its corners, failing unless exactly
/// four vertices survive.
pub fn quadrilateral_from_contour(
    contour: &[Point],
    epsilon_ratio: f64,
) -> Result<CornerSet, GeometryError> {
    let epsilon = epsilon_ratio * closed_arc_length(contour);
    let polygon = approximate_polygon(contour, epsilon);

    let quad: [Point; 4] = match polygon.as_slice() {
        [a, b, c, d] => [*a, *b, *c, *d],
        _ => {
            warn!(vertices = polygon.len(), "Largest contour is not a quadrilateral");
            return Err(GeometryError::NonQuadrilateralContour { vertices: polygon.len() });
        }
    };

    let corners = order_points(quad);
    debug!(?corners, "Receipt corners ordered");
    Ok(corners)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma, Rgb, RgbImage};

    fn black(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
    }

    /// Dark table with a light paper rectangle spanning `[x0, x1) x [y0, y1)`.
    fn paper_on_table(width: u32, height: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> DynamicImage {
        let img: RgbImage = ImageBuffer::from_fn(width, height, |x, y| {
            if (x0..x1).contains(&x) && (y0..y1).contains(&y) {
                Rgb([235, 232, 225])
            } else {
                Rgb([40, 35, 30])
            }
        });
        DynamicImage::ImageRgb8(img)
    }

    fn close(a: Point, b: Point, tol: f32) -> bool {
        (a.x - b.x).abs() <= tol && (a.y - b.y).abs() <= tol
    }

    #[test]
    fn black_image_has_no_contour() {
        let err = detect(&black(64, 48), &PipelineConfig::default()).unwrap_err();
        assert_eq!(err, GeometryError::NoContourFound);
    }

    #[test]
    fn finds_paper_corners() {
        let img = paper_on_table(400, 300, 60, 40, 300, 260);
        let c = detect(&img, &PipelineConfig::default()).unwrap();
        assert!(close(c.top_left, Point::new(60.0, 40.0), 4.0), "{c:?}");
        assert!(close(c.top_right, Point::new(299.0, 40.0), 4.0), "{c:?}");
        assert!(close(c.bottom_right, Point::new(299.0, 259.0), 4.0), "{c:?}");
        assert!(close(c.bottom_left, Point::new(60.0, 259.0), 4.0), "{c:?}");
    }

    #[test]
    fn exact_corners_on_clean_binary() {
        let bin: GrayImage = ImageBuffer::from_fn(200, 200, |x, y| {
            let inside = (37..137).contains(&x) && (21..121).contains(&y);
            Luma([if inside { 255 } else { 0 }])
        });
        let c = detect_in_binary(&bin, 0.02).unwrap();
        assert_eq!(c.top_left, Point::new(37.0, 21.0));
        assert_eq!(c.top_right, Point::new(136.0, 21.0));
        assert_eq!(c.bottom_right, Point::new(136.0, 120.0));
        assert_eq!(c.bottom_left, Point::new(37.0, 120.0));
    }

    #[test]
    fn disc_is_not_a_quadrilateral() {
        let bin: GrayImage = ImageBuffer::from_fn(200, 200, |x, y| {
            let (dx, dy) = (x as f32 - 100.0, y as f32 - 100.0);
            Luma([if dx * dx + dy * dy <= 70.0 * 70.0 { 255 } else { 0 }])
        });
        let err = detect_in_binary(&bin, 0.02).unwrap_err();
        assert!(
            matches!(err, GeometryError::NonQuadrilateralContour { vertices } if vertices != 4),
            "{err:?}"
        );
    }

    #[test]
    fn triangle_contour_is_rejected() {
        let mut contour = Vec::new();
        for i in 0..60 {
            contour.push(Point::new(i as f32, 0.0));
        }
        for i in 0..60 {
            contour.push(Point::new(60.0 - i as f32, i as f32));
        }
        let err = quadrilateral_from_contour(&contour, 0.02).unwrap_err();
        assert_eq!(err, GeometryError::NonQuadrilateralContour { vertices: 3 });
    }

    #[test]
    fn largest_contour_prefers_first_on_tie() {
        let a = vec![Point::new(0.0, 0.0), Point::new(2.0, 0.0), Point::new(2.0, 2.0), Point::new(0.0, 2.0)];
        let b = vec![Point::new(5.0, 5.0), Point::new(7.0, 5.0), Point::new(7.0, 7.0), Point::new(5.0, 7.0)];
        let contours = vec![a.clone(), b];
        assert_eq!(largest_contour(&contours), Some(a.as_slice()));
        assert_eq!(largest_contour(&[]), None);
    }
}
