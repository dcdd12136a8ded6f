//! Plane geometry for receipt boundary detection: points, the ordered
//! corner set, and the polygon measures used to pick and simplify contours.

use imageproc::point::Point as PixelPoint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a photograph could not be turned into a top-down receipt image.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("No contours found: the image has no visible boundary")]
    NoContourFound,
    #[error("Receipt contour not detected: largest contour simplifies to {vertices} vertices, expected 4")]
    NonQuadrilateralContour { vertices: usize },
    #[error("Degenerate quadrilateral: rectified size would be {width}x{height}")]
    DegenerateQuadrilateral { width: i64, height: i64 },
}

/// A 2D point in image coordinates (x to the right, y down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn as_tuple(self) -> (f32, f32) {
        (self.x, self.y)
    }
}

impl From<PixelPoint<i32>> for Point {
    fn from(p: PixelPoint<i32>) -> Self {
        Self::new(p.x as f32, p.y as f32)
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f32 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// The four corners of the receipt, in clockwise order from the top left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CornerSet {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
}

impl CornerSet {
    /// Corners as `[tl, tr, br, bl]` tuples, the layout projective solvers take.
    pub fn to_control_points(&self) -> [(f32, f32); 4] {
        [
            self.top_left.as_tuple(),
            self.top_right.as_tuple(),
            self.bottom_right.as_tuple(),
            self.bottom_left.as_tuple(),
        ]
    }
}

fn coord_sum(p: &Point) -> f32 {
    p.x + p.y
}

fn coord_diff(p: &Point) -> f32 {
    p.y - p.x
}

/// Index in `candidates` with the smallest (or largest) key. Ties keep the
/// earliest candidate.
fn extreme(points: &[Point; 4], candidates: &[usize], key: fn(&Point) -> f32, largest: bool) -> usize {
    let mut best = candidates[0];
    for &i in &candidates[1..] {
        let (k, b) = (key(&points[i]), key(&points[best]));
        if (largest && k > b) || (!largest && k < b) {
            best = i;
        }
    }
    best
}

/// Order four corner points regardless of the order they were found in.
///
/// Top-left has the smallest `x + y`, bottom-right the largest. Top-right has
/// the smallest `y - x`, bottom-left the largest. When ties make two roles
/// pick the same point (a quadrilateral turned 45°), roles are assigned in
/// that order from the points not yet taken, so the result always uses each
/// input point exactly once.
pub fn order_points(points: [Point; 4]) -> CornerSet {
    let all = [0, 1, 2, 3];
    let tl = extreme(&points, &all, coord_sum, false);
    let br = extreme(&points, &all, coord_sum, true);
    let tr = extreme(&points, &all, coord_diff, false);
    let bl = extreme(&points, &all, coord_diff, true);

    let mut picked = [tl, tr, br, bl];
    picked.sort_unstable();
    let (tl, tr, br, bl) = if picked == all {
        (tl, tr, br, bl)
    } else {
        let mut rest = all.to_vec();
        let mut take = |key: fn(&Point) -> f32, largest: bool| {
            let i = extreme(&points, &rest, key, largest);
            rest.retain(|&r| r != i);
            i
        };
        let tl = take(coord_sum, false);
        let br = take(coord_sum, true);
        let tr = take(coord_diff, false);
        let bl = take(coord_diff, true);
        (tl, tr, br, bl)
    };

    CornerSet {
        top_left: points[tl],
        top_right: points[tr],
        bottom_right: points[br],
        bottom_left: points[bl],
    }
}

/// Area enclosed by a closed polygon (shoelace formula). Zero for fewer than
/// three points.
pub fn polygon_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let n = points.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let (a, b) = (points[i], points[(i + 1) % n]);
            a.x as f64 * b.y as f64 - b.x as f64 * a.y as f64
        })
        .sum();
    twice.abs() / 2.0
}

/// Perimeter of a closed polygon, including the edge back to the start.
pub fn closed_arc_length(points: &[Point]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let n = points.len();
    (0..n)
        .map(|i| distance(points[i], points[(i + 1) % n]) as f64)
        .sum()
}

/// Perpendicular distance from `p` to the line through `a` and `b`.
fn line_distance(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = ((b.x - a.x) as f64, (b.y - a.y) as f64);
    let len = dx.hypot(dy);
    if len == 0.0 {
        return distance(p, a) as f64;
    }
    ((p.x - a.x) as f64 * dy - (p.y - a.y) as f64 * dx).abs() / len
}

/// Douglas-Peucker on an open chain; both endpoints are always kept.
fn simplify_chain(points: &[Point], epsilon: f64) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let last = points.len() - 1;
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[last] = true;

    let mut stack = vec![(0, last)];
    while let Some((start, end)) = stack.pop() {
        if end - start <= 1 {
            continue;
        }
        let mut max_dist = 0.0;
        let mut max_index = start;
        for i in (start + 1)..end {
            let d = line_distance(points[i], points[start], points[end]);
            if d > max_dist {
                max_dist = d;
                max_index = i;
            }
        }
        if max_dist > epsilon {
            keep[max_index] = true;
            stack.push((start, max_index));
            stack.push((max_index, end));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

/// Simplify a closed contour to a polygon whose edges stay within `epsilon`
/// of the contour.
///
/// The contour is cut at its first point and at the point farthest from it,
/// and each half is simplified as an open chain.
pub fn approximate_polygon(contour: &[Point], epsilon: f64) -> Vec<Point> {
    let mut points = contour;
    if points.len() > 1 && points.first() == points.last() {
        points = &points[..points.len() - 1];
    }
    if points.len() < 3 {
        return points.to_vec();
    }

    let origin = points[0];
    let (far, far_dist) = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, distance(origin, *p)))
        .fold((0, 0.0f32), |best, cur| if cur.1 > best.1 { cur } else { best });
    if far_dist == 0.0 {
        return vec![origin];
    }

    let first_half = simplify_chain(&points[..=far], epsilon);
    let mut second: Vec<Point> = points[far..].to_vec();
    second.push(origin);
    let second_half = simplify_chain(&second, epsilon);

    // Each half ends where the other starts.
    let mut polygon = first_half[..first_half.len() - 1].to_vec();
    polygon.extend_from_slice(&second_half[..second_half.len() - 1]);

    // The cut point is always kept; drop it when it lies on an edge.
    let n = polygon.len();
    if n > 3 && line_distance(polygon[0], polygon[n - 1], polygon[1]) <= epsilon {
        polygon.remove(0);
    }
    polygon
}
