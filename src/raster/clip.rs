//! Cyrus–Beck line clipping and Sutherland–Hodgman polygon clipping
//! against the raster rectangle `[0, width-1] x [0, height-1]`.

use crate::geometry::Point;

/// Rectangular clip region matching a raster of `width` x `height` pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    fn x_max(&self) -> i32 {
        self.width as i32 - 1
    }

    #[inline]
    fn y_max(&self) -> i32 {
        self.height as i32 - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.x <= self.x_max() && p.y >= 0 && p.y <= self.y_max()
    }

    /// Corners walked so that `(edge.y, -edge.x)` points into the viewport
    fn corners(&self) -> [Point; 4] {
        let (w, h) = (self.x_max(), self.y_max());
        [
            Point::new(0, 0),
            Point::new(0, h),
            Point::new(w, h),
            Point::new(w, 0),
        ]
    }
}

/// Clip the segment `a`-`b` to the viewport.
///
/// Segments lying fully inside come back untouched. Segments whose endpoints
/// are both beyond the same boundary are rejected without any arithmetic.
/// Everything else goes through Cyrus–Beck: the entering parameter `t_min`
/// and leaving parameter `t_max` are narrowed edge by edge and the visible
/// part is `a + (b - a) * t` for `t` in `[t_min, t_max]`.
pub fn clip_line(a: Point, b: Point, viewport: Viewport) -> Option<(Point, Point)> {
    if viewport.is_empty() {
        return None;
    }
    if viewport.contains(a) && viewport.contains(b) {
        return Some((a, b));
    }

    let (x_max, y_max) = (viewport.x_max(), viewport.y_max());
    if (a.x < 0 && b.x < 0)
        || (a.x > x_max && b.x > x_max)
        || (a.y < 0 && b.y < 0)
        || (a.y > y_max && b.y > y_max)
    {
        return None;
    }

    let dx = f64::from(b.x - a.x);
    let dy = f64::from(b.y - a.y);
    let mut t_min = 0.0_f64;
    let mut t_max = 1.0_f64;

    let corners = viewport.corners();
    for i in 0..4 {
        let e0 = corners[i];
        let edge = corners[(i + 1) % 4] - e0;
        let (nx, ny) = (f64::from(edge.y), -f64::from(edge.x));
        let wx = f64::from(a.x - e0.x);
        let wy = f64::from(a.y - e0.y);

        let dn = dx * nx + dy * ny;
        let wn = wx * nx + wy * ny;
        if dn == 0.0 {
            // Parallel to this edge: either wholly inside its half-plane or gone
            if wn < 0.0 {
                return None;
            }
            continue;
        }

        let t = -wn / dn;
        if dn > 0.0 {
            t_min = t_min.max(t);
        } else {
            t_max = t_max.min(t);
        }
    }

    if t_min >= t_max {
        return None;
    }

    let at = |t: f64| Point::from_f64(f64::from(a.x) + dx * t, f64::from(a.y) + dy * t);
    Some((at(t_min), at(t_max)))
}

/// Clip a closed polygon to the viewport.
///
/// Four passes, each keeping the part with `x >= x_min`, after which the
/// frame is turned by `(x, y) -> (y, -x)`. The thresholds `0, 0, -x_max,
/// -y_max` therefore clip left, top, right and bottom in turn and the fourth
/// turn restores the original frame. Returns an empty vector when nothing
/// survives.
pub fn clip_polygon(points: &[Point], viewport: Viewport) -> Vec<Point> {
    if points.is_empty() || viewport.is_empty() {
        return Vec::new();
    }

    let limits = [0, 0, -viewport.x_max(), -viewport.y_max()];
    let mut current = points.to_vec();

    for x_min in limits {
        let mut kept = Vec::with_capacity(current.len() + 4);
        let mut s = match current.last() {
            Some(&p) => p,
            None => return Vec::new(),
        };

        for &v in &current {
            if v.x >= x_min {
                if s.x < x_min {
                    push_distinct(&mut kept, intersect_vertical(s, v, x_min));
                }
                push_distinct(&mut kept, v);
            } else if s.x >= x_min {
                push_distinct(&mut kept, intersect_vertical(s, v, x_min));
            }
            s = v;
        }

        if kept.len() > 1 && kept.first() == kept.last() {
            kept.pop();
        }
        if kept.is_empty() {
            return Vec::new();
        }

        current = kept.into_iter().map(|p| Point::new(p.y, -p.x)).collect();
    }

    current
}

/// True when a clipped polygon must not be rasterized: fewer than three
/// vertices, or all of them on a single row or column
pub fn is_degenerate(points: &[Point]) -> bool {
    match points.first() {
        Some(first) if points.len() >= 3 => {
            points.iter().all(|p| p.x == first.x) || points.iter().all(|p| p.y == first.y)
        },
        _ => true,
    }
}

#[inline]
fn push_distinct(points: &mut Vec<Point>, p: Point) {
    if points.last() != Some(&p) {
        points.push(p);
    }
}

/// Crossing of segment `s`-`v` with the line `x = x_min`; y is truncated
#[inline]
fn intersect_vertical(s: Point, v: Point, x_min: i32) -> Point {
    let slope = f64::from(v.y - s.y) / f64::from(v.x - s.x);
    let y = f64::from(s.y) + f64::from(x_min - s.x) * slope;
    Point::new(x_min, y as i32)
}
