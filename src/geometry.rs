//! Integer plane geometry: points, edit transforms and hit testing

use std::ops::{Add, Sub};

/// A pixel-space point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Point from floating coordinates, rounded to the nearest pixel
    #[inline]
    pub fn from_f64(x: f64, y: f64) -> Self {
        Self::new(x.round() as i32, y.round() as i32)
    }
}

impl Add for Point {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point {
    type Output = Self;
    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

// ============================================================================
// Edit transforms
// ============================================================================

/// One in-place edit applied to every point of an object
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform2D {
    Translate { dx: i32, dy: i32 },
    /// Angle in degrees; positive turns clockwise on a y-down raster
    Rotate { pivot: Point, degrees: f64 },
    Scale { pivot: Point, sx: f64, sy: f64 },
    /// Horizontal shear: x grows by `factor` per row below the pivot
    Shear { pivot: Point, factor: f64 },
    /// Reflection across the line through `a` and `b`
    Mirror { a: Point, b: Point },
}

impl Transform2D {
    pub fn apply(&self, p: Point) -> Point {
        match *self {
            Transform2D::Translate { dx, dy } => Point::new(p.x + dx, p.y + dy),
            Transform2D::Rotate { pivot, degrees } => {
                let (sin, cos) = degrees.to_radians().sin_cos();
                let dx = f64::from(p.x - pivot.x);
                let dy = f64::from(p.y - pivot.y);
                Point::from_f64(
                    f64::from(pivot.x) + dx * cos - dy * sin,
                    f64::from(pivot.y) + dx * sin + dy * cos,
                )
            },
            Transform2D::Scale { pivot, sx, sy } => Point::from_f64(
                f64::from(pivot.x) + f64::from(p.x - pivot.x) * sx,
                f64::from(pivot.y) + f64::from(p.y - pivot.y) * sy,
            ),
            Transform2D::Shear { pivot, factor } => Point::new(
                p.x + (f64::from(p.y - pivot.y) * factor).round() as i32,
                p.y,
            ),
            Transform2D::Mirror { a, b } => reflect_across(p, a, b),
        }
    }
}

/// Reflect `p` across the line through `a` and `b`. A degenerate line leaves `p` alone.
pub fn reflect_across(p: Point, a: Point, b: Point) -> Point {
    let la = f64::from(b.y - a.y);
    let lb = f64::from(a.x - b.x);
    let norm = la * la + lb * lb;
    if norm == 0.0 {
        return p;
    }
    let lc = -(la * f64::from(a.x) + lb * f64::from(a.y));
    let d = (la * f64::from(p.x) + lb * f64::from(p.y) + lc) / norm;
    Point::from_f64(f64::from(p.x) - 2.0 * la * d, f64::from(p.y) - 2.0 * lb * d)
}

/// Axis-aligned rectangle spanned by two opposite corners, in drawing order
pub fn rectangle_from_corners(a: Point, b: Point) -> [Point; 4] {
    [a, Point::new(b.x, a.y), b, Point::new(a.x, b.y)]
}

// ============================================================================
// Hit testing
// ============================================================================

/// Check if a point is inside a polygon using ray casting
pub fn point_in_polygon(p: Point, vertices: &[Point]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }

    let px = f64::from(p.x);
    let py = f64::from(p.y);
    let mut inside = false;
    let mut j = n - 1;

    for i in 0..n {
        let (xi, yi) = (f64::from(vertices[i].x), f64::from(vertices[i].y));
        let (xj, yj) = (f64::from(vertices[j].x), f64::from(vertices[j].y));

        if (yi > py) != (yj > py) {
            let x_intersect = (xj - xi) * (py - yi) / (yj - yi) + xi;
            if px < x_intersect {
                inside = !inside;
            }
        }
        j = i;
    }

    inside
}

/// Distance from `p` to the segment `a`-`b`
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ex = f64::from(b.x - a.x);
    let ey = f64::from(b.y - a.y);
    let len_sq = ex * ex + ey * ey;
    if len_sq == 0.0 {
        return p.distance_to(&a);
    }
    let t = ((f64::from(p.x - a.x) * ex + f64::from(p.y - a.y) * ey) / len_sq).clamp(0.0, 1.0);
    let cx = f64::from(a.x) + ex * t;
    let cy = f64::from(a.y) + ey * t;
    ((f64::from(p.x) - cx).powi(2) + (f64::from(p.y) - cy).powi(2)).sqrt()
}

/// Index of the point nearest to `target`; the first one wins ties
pub fn nearest_index(points: impl IntoIterator<Item = Point>, target: Point) -> Option<usize> {
    points
        .into_iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, p)| {
            let d = p.distance_to(&target);
            match best {
                Some((_, best_d)) if best_d <= d => best,
                _ => Some((i, d)),
            }
        })
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_quarter_turn() {
        let t = Transform2D::Rotate {
            pivot: Point::new(10, 10),
            degrees: 90.0,
        };
        assert_eq!(t.apply(Point::new(20, 10)), Point::new(10, 20));
        assert_eq!(t.apply(Point::new(10, 10)), Point::new(10, 10));
    }

    #[test]
    fn test_scale_about_pivot() {
        let t = Transform2D::Scale {
            pivot: Point::new(5, 5),
            sx: 2.0,
            sy: 0.5,
        };
        assert_eq!(t.apply(Point::new(7, 9)), Point::new(9, 7));
    }

    #[test]
    fn test_shear_keeps_pivot_row() {
        let t = Transform2D::Shear {
            pivot: Point::new(0, 10),
            factor: 0.5,
        };
        assert_eq!(t.apply(Point::new(4, 10)), Point::new(4, 10));
        assert_eq!(t.apply(Point::new(4, 14)), Point::new(6, 14));
    }

    #[test]
    fn test_mirror_across_vertical_line() {
        let p = reflect_across(Point::new(3, 7), Point::new(5, 0), Point::new(5, 10));
        assert_eq!(p, Point::new(7, 7));
    }

    #[test]
    fn test_mirror_degenerate_axis_is_identity() {
        let a = Point::new(1, 1);
        assert_eq!(reflect_across(Point::new(4, 2), a, a), Point::new(4, 2));
    }

    #[test]
    fn test_rectangle_from_corners() {
        let r = rectangle_from_corners(Point::new(0, 0), Point::new(4, 3));
        assert_eq!(
            r,
            [
                Point::new(0, 0),
                Point::new(4, 0),
                Point::new(4, 3),
                Point::new(0, 3)
            ]
        );
    }

    #[test]
    fn test_point_in_polygon() {
        let square = [
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(10, 10),
            Point::new(0, 10),
        ];
        assert!(point_in_polygon(Point::new(5, 5), &square));
        assert!(!point_in_polygon(Point::new(15, 5), &square));
    }

    #[test]
    fn test_nearest_index_prefers_first_on_tie() {
        let pts = [Point::new(0, 0), Point::new(2, 0), Point::new(10, 0)];
        assert_eq!(nearest_index(pts, Point::new(1, 0)), Some(0));
        assert_eq!(nearest_index(pts, Point::new(9, 0)), Some(2));
        assert_eq!(nearest_index([], Point::new(0, 0)), None);
    }
}
