//! Polygon interiors: edge-table scanline fill and recursive triangle fill

use super::{clip_polygon, draw_line_unclipped, is_degenerate, PixelTarget};
use crate::context::{FillAlgorithm, LineAlgorithm};
use crate::display::Color;
use crate::geometry::Point;

/// Vertex colors used for nearest/barycentric triangle shading in 2D scenes
pub const DEFAULT_VERTEX_COLORS: [Color; 3] = [Color::RED, Color::BLUE, Color::GREEN];

/// Slope stored for vertical edges. Dividing by it yields (almost) zero, so
/// the x-intercept of a vertical edge stays at its start x.
const VERTICAL_SLOPE: f64 = f64::MIN;

// ============================================================================
// Triangle shading
// ============================================================================

/// Per-pixel color rule for a filled triangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriangleShading {
    Flat(Color),
    /// Color of whichever vertex is closest to the pixel
    Nearest([Color; 3]),
    /// Area-weighted blend of the vertex colors
    Barycentric([Color; 3]),
}

impl TriangleShading {
    /// Color at pixel `p` of the triangle `tri` (original vertex order)
    pub fn color_at(&self, tri: &[Point; 3], p: Point) -> Color {
        match self {
            TriangleShading::Flat(color) => *color,
            TriangleShading::Nearest(colors) => colors[nearest_vertex(tri, p)],
            TriangleShading::Barycentric(colors) => {
                Color::blend3(colors, barycentric_weights(tri, p))
            },
        }
    }
}

/// Index of the vertex closest to `p`; ties go to the lower index
pub fn nearest_vertex(tri: &[Point; 3], p: Point) -> usize {
    let mut best = 0;
    let mut best_d = tri[0].distance_to(&p);
    for (i, v) in tri.iter().enumerate().skip(1) {
        let d = v.distance_to(&p);
        if d < best_d {
            best = i;
            best_d = d;
        }
    }
    best
}

#[inline]
fn cross(a: Point, b: Point, c: Point) -> f64 {
    f64::from(b.x - a.x) * f64::from(c.y - a.y) - f64::from(b.y - a.y) * f64::from(c.x - a.x)
}

/// Barycentric weights of `p` from unsigned sub-triangle areas.
///
/// Weights are clamped to `[0, 1]` and renormalized, so pixels that fall a
/// little outside the triangle after truncation still get a valid blend.
pub fn barycentric_weights(tri: &[Point; 3], p: Point) -> [f64; 3] {
    let total = cross(tri[0], tri[1], tri[2]).abs();
    if total == 0.0 {
        return [1.0, 0.0, 0.0];
    }

    let l0 = cross(p, tri[1], tri[2]).abs() / total;
    let l1 = cross(p, tri[0], tri[2]).abs() / total;
    let l2 = 1.0 - l0 - l1;

    let clamped = [l0.clamp(0.0, 1.0), l1.clamp(0.0, 1.0), l2.clamp(0.0, 1.0)];
    let sum: f64 = clamped.iter().sum();
    if sum == 0.0 {
        return [1.0, 0.0, 0.0];
    }
    clamped.map(|l| l / sum)
}

// ============================================================================
// Scanline fill
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct ScanEdge {
    start: Point,
    slope: f64,
    /// Scanlines left after the current one
    remaining: i32,
}

impl ScanEdge {
    #[inline]
    fn x_at(&self, y: i32) -> i32 {
        (f64::from(y - self.start.y) / self.slope) as i32 + self.start.x
    }

    #[inline]
    fn exact_x_at(&self, y: i32) -> f64 {
        f64::from(y - self.start.y) / self.slope + f64::from(self.start.x)
    }
}

/// Even-odd scanline fill of an arbitrary simple polygon.
///
/// Horizontal edges are dropped and every other edge is oriented top to
/// bottom and shortened by one pixel at its lower end, so shared vertices
/// are counted once. Edges are bucketed by start row; each scanline merges
/// its bucket into the active list, sorts by x-intercept, fills between
/// pairs and retires finished edges.
pub fn fill_scanline<T: PixelTarget + ?Sized>(target: &mut T, points: &[Point], color: Color) {
    let n = points.len();
    if n < 3 {
        return;
    }

    let mut edges = Vec::with_capacity(n);
    for i in 0..n {
        let mut start = points[i];
        let mut end = points[(i + 1) % n];
        if start.y == end.y {
            continue;
        }
        if start.y > end.y {
            std::mem::swap(&mut start, &mut end);
        }
        end.y -= 1;

        let slope = if end.x == start.x {
            VERTICAL_SLOPE
        } else {
            f64::from(end.y - start.y) / f64::from(end.x - start.x)
        };
        if slope == 0.0 {
            continue;
        }
        edges.push(ScanEdge {
            start,
            slope,
            remaining: end.y - start.y,
        });
    }

    let Some(first) = edges.first().copied() else {
        log::debug!("scanline fill skipped: no non-horizontal edges");
        return;
    };
    if edges
        .iter()
        .all(|e| e.slope == VERTICAL_SLOPE && e.start.x == first.start.x)
    {
        log::debug!("scanline fill skipped: polygon collapses to a column");
        return;
    }

    edges.sort_by_key(|e| e.start.y);
    let y_min = edges[0].start.y;
    let y_max = edges
        .iter()
        .map(|e| e.start.y + e.remaining)
        .max()
        .unwrap_or(y_min);

    let mut table: Vec<Vec<ScanEdge>> = vec![Vec::new(); (y_max - y_min + 1) as usize];
    for edge in edges {
        table[(edge.start.y - y_min) as usize].push(edge);
    }

    let mut active: Vec<ScanEdge> = Vec::with_capacity(n);
    for (row, bucket) in table.into_iter().enumerate() {
        let y = y_min + row as i32;
        active.extend(bucket);
        active.sort_by(|a, b| a.exact_x_at(y).total_cmp(&b.exact_x_at(y)));

        if active.len() % 2 == 0 {
            for pair in active.chunks_exact(2) {
                let x1 = pair[0].x_at(y);
                let x2 = pair[1].x_at(y);
                if x1 != x2 {
                    for x in x1..=x2 {
                        target.plot(x, y, color);
                    }
                }
            }
        }

        active.retain_mut(|e| {
            if e.remaining == 0 {
                false
            } else {
                e.remaining -= 1;
                true
            }
        });
    }
}

// ============================================================================
// Triangle fill
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct TriEdge {
    start: Point,
    end: Point,
    inv_slope: f64,
}

/// Walk every pixel of a triangle, top row inclusive and bottom row exclusive.
///
/// Vertices are sorted by (y, x). A triangle with a horizontal side is a
/// single flat triangle; any other is split at the middle vertex's row into
/// a flat-bottom and a flat-top half. Rows where the left and right
/// intercepts coincide are skipped.
pub fn scan_triangle(points: [Point; 3], mut plot: impl FnMut(i32, i32)) {
    let mut t = points;
    t.sort_by_key(|p| (p.y, p.x));
    if t[0].y == t[2].y {
        return;
    }

    if t[0].y == t[1].y || t[1].y == t[2].y {
        scan_flat_triangle(t, &mut plot);
        return;
    }

    let m = f64::from(t[2].y - t[0].y) / f64::from(t[2].x - t[0].x);
    let split = Point::new(
        (f64::from(t[1].y - t[0].y) / m + f64::from(t[0].x)) as i32,
        t[1].y,
    );

    if t[1].x < split.x {
        scan_flat_triangle([t[0], t[1], split], &mut plot);
        scan_flat_triangle([t[1], split, t[2]], &mut plot);
    } else {
        scan_flat_triangle([t[0], split, t[1]], &mut plot);
        scan_flat_triangle([split, t[1], t[2]], &mut plot);
    }
}

fn scan_flat_triangle(tri: [Point; 3], plot: &mut impl FnMut(i32, i32)) {
    let mut edges: Vec<TriEdge> = Vec::with_capacity(2);
    for i in 0..3 {
        let mut start = tri[(i + 2) % 3];
        let mut end = tri[i];
        if start.y == end.y {
            continue;
        }
        if start.y > end.y {
            std::mem::swap(&mut start, &mut end);
        }
        edges.push(TriEdge {
            start,
            end,
            inv_slope: f64::from(end.x - start.x) / f64::from(end.y - start.y),
        });
    }
    if edges.len() != 2 {
        return;
    }

    // Shared apex: order by where the edges end; shared base: by where they start
    edges.sort_by_key(|e| (e.start.x, e.end.x));
    let (left, right) = (edges[0], edges[1]);

    let mut x1 = f64::from(left.start.x);
    let mut x2 = f64::from(right.start.x);
    for y in left.start.y..left.end.y {
        let (a, b) = (x1 as i32, x2 as i32);
        if a != b {
            for x in a..=b {
                plot(x, y);
            }
        }
        x1 += left.inv_slope;
        x2 += right.inv_slope;
    }
}

/// Fill a triangle with the given shading rule
pub fn fill_triangle<T: PixelTarget + ?Sized>(
    target: &mut T,
    tri: [Point; 3],
    shading: TriangleShading,
) {
    scan_triangle(tri, |x, y| {
        let color = shading.color_at(&tri, Point::new(x, y));
        target.plot(x, y, color);
    });
}

// ============================================================================
// Polygon entry point
// ============================================================================

/// Clip and draw a closed polygon.
///
/// Outline mode strokes the clipped edges. Triangles with nearest or
/// barycentric shading use the triangle filler with `vertex_colors`; every
/// other filled polygon goes through the scanline filler with `fill`.
pub fn draw_polygon<T: PixelTarget + ?Sized>(
    target: &mut T,
    points: &[Point],
    outline: Color,
    fill: Color,
    line_algorithm: LineAlgorithm,
    fill_algorithm: FillAlgorithm,
    vertex_colors: [Color; 3],
) {
    let clipped = clip_polygon(points, target.viewport());
    if is_degenerate(&clipped) {
        log::debug!("polygon skipped after clipping ({} points)", clipped.len());
        return;
    }

    match fill_algorithm {
        FillAlgorithm::Outline => {
            let n = clipped.len();
            for i in 0..n {
                draw_line_unclipped(target, clipped[i], clipped[(i + 1) % n], outline, line_algorithm);
            }
        },
        FillAlgorithm::Nearest if clipped.len() == 3 => {
            let tri = [clipped[0], clipped[1], clipped[2]];
            fill_triangle(target, tri, TriangleShading::Nearest(vertex_colors));
        },
        FillAlgorithm::Barycentric if clipped.len() == 3 => {
            let tri = [clipped[0], clipped[1], clipped[2]];
            fill_triangle(target, tri, TriangleShading::Barycentric(vertex_colors));
        },
        _ => fill_scanline(target, &clipped, fill),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::PixelBuffer;
    use crate::raster::testing::Recorder;
    use std::collections::HashSet;

    fn square(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<Point> {
        vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ]
    }

    #[test]
    fn test_scanline_square_covers_interior() {
        let mut rec = Recorder::new(50, 50);
        fill_scanline(&mut rec, &square(10, 10, 20, 20), Color::BLACK);
        let pts: HashSet<Point> = rec.points().into_iter().collect();
        // Rows 10..=19, columns 10..=20
        assert_eq!(pts.len(), 10 * 11);
        assert!(pts.contains(&Point::new(10, 10)));
        assert!(pts.contains(&Point::new(20, 19)));
        assert!(!pts.contains(&Point::new(15, 20)));
    }

    #[test]
    fn test_scanline_concave_leaves_notch_empty() {
        // U shape: notch between x=14..16 from y=10 to y=20
        let u = vec![
            Point::new(10, 10),
            Point::new(14, 10),
            Point::new(14, 20),
            Point::new(16, 20),
            Point::new(16, 10),
            Point::new(20, 10),
            Point::new(20, 30),
            Point::new(10, 30),
        ];
        let mut rec = Recorder::new(50, 50);
        fill_scanline(&mut rec, &u, Color::BLACK);
        let pts: HashSet<Point> = rec.points().into_iter().collect();
        assert!(pts.contains(&Point::new(12, 15)));
        assert!(pts.contains(&Point::new(18, 15)));
        assert!(!pts.contains(&Point::new(15, 15)));
        assert!(pts.contains(&Point::new(15, 25)));
    }

    #[test]
    fn test_scanline_skips_flat_polygons() {
        let mut rec = Recorder::new(50, 50);
        let row = [Point::new(1, 5), Point::new(9, 5), Point::new(4, 5)];
        fill_scanline(&mut rec, &row, Color::BLACK);
        let column = [Point::new(5, 1), Point::new(5, 9), Point::new(5, 4)];
        fill_scanline(&mut rec, &column, Color::BLACK);
        assert!(rec.plots.is_empty());
    }

    #[test]
    fn test_triangle_rows_are_half_open() {
        let mut rows = HashSet::new();
        scan_triangle(
            [Point::new(0, 0), Point::new(10, 0), Point::new(0, 10)],
            |_, y| {
                rows.insert(y);
            },
        );
        assert_eq!(rows, (0..10).collect());
    }

    #[test]
    fn test_split_triangle_has_no_overlap() {
        let mut seen = HashSet::new();
        let mut duplicates = 0;
        scan_triangle(
            [Point::new(20, 0), Point::new(0, 15), Point::new(30, 40)],
            |x, y| {
                if !seen.insert((x, y)) {
                    duplicates += 1;
                }
            },
        );
        assert_eq!(duplicates, 0);
        assert!(seen.len() > 300);
        assert!(seen.contains(&(20, 20)));
    }

    #[test]
    fn test_triangle_orientation_does_not_matter() {
        let collect = |tri: [Point; 3]| {
            let mut s = HashSet::new();
            scan_triangle(tri, |x, y| {
                s.insert((x, y));
            });
            s
        };
        let a = Point::new(5, 2);
        let b = Point::new(40, 18);
        let c = Point::new(12, 33);
        assert_eq!(collect([a, b, c]), collect([c, b, a]));
        assert_eq!(collect([a, b, c]), collect([b, a, c]));
    }

    #[test]
    fn test_barycentric_at_vertices() {
        let tri = [Point::new(0, 0), Point::new(30, 0), Point::new(0, 30)];
        let shading = TriangleShading::Barycentric(DEFAULT_VERTEX_COLORS);
        for (i, v) in tri.iter().enumerate() {
            assert_eq!(shading.color_at(&tri, *v), DEFAULT_VERTEX_COLORS[i]);
        }
        let w = barycentric_weights(&tri, Point::new(10, 10));
        assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(w.iter().all(|l| (l - 1.0 / 3.0).abs() < 1e-9));
    }

    #[test]
    fn test_barycentric_outside_is_clamped() {
        let tri = [Point::new(0, 0), Point::new(10, 0), Point::new(0, 10)];
        let w = barycentric_weights(&tri, Point::new(20, 20));
        assert!(w.iter().all(|l| (0.0..=1.0).contains(l)));
        assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_nearest_vertex_ties_prefer_lower_index() {
        let tri = [Point::new(0, 0), Point::new(10, 0), Point::new(5, 10)];
        assert_eq!(nearest_vertex(&tri, Point::new(5, 0)), 0);
        assert_eq!(nearest_vertex(&tri, Point::new(9, 1)), 1);
        assert_eq!(nearest_vertex(&tri, Point::new(5, 9)), 2);
    }

    #[test]
    fn test_draw_polygon_outline_vs_fill() {
        let mut outline = PixelBuffer::with_size(40, 40);
        outline.clear(Color::WHITE);
        draw_polygon(
            &mut outline,
            &square(5, 5, 30, 30),
            Color::BLACK,
            Color::BLUE,
            LineAlgorithm::Bresenham,
            FillAlgorithm::Outline,
            DEFAULT_VERTEX_COLORS,
        );
        assert_eq!(outline.get_pixel(5, 17), Some(Color::BLACK));
        assert_eq!(outline.get_pixel(17, 17), Some(Color::WHITE));

        let mut filled = PixelBuffer::with_size(40, 40);
        filled.clear(Color::WHITE);
        draw_polygon(
            &mut filled,
            &square(5, 5, 30, 30),
            Color::BLACK,
            Color::BLUE,
            LineAlgorithm::Bresenham,
            FillAlgorithm::Solid,
            DEFAULT_VERTEX_COLORS,
        );
        assert_eq!(filled.get_pixel(17, 17), Some(Color::BLUE));
    }

    #[test]
    fn test_draw_polygon_clips_to_raster() {
        let mut buffer = PixelBuffer::with_size(20, 20);
        buffer.clear(Color::WHITE);
        draw_polygon(
            &mut buffer,
            &square(-50, -50, 100, 100),
            Color::BLACK,
            Color::GREEN,
            LineAlgorithm::Dda,
            FillAlgorithm::Solid,
            DEFAULT_VERTEX_COLORS,
        );
        assert_eq!(buffer.get_pixel(0, 0), Some(Color::GREEN));
        assert_eq!(buffer.get_pixel(19, 10), Some(Color::GREEN));
    }

    #[test]
    fn test_draw_polygon_nearest_triangle() {
        let mut buffer = PixelBuffer::with_size(60, 60);
        buffer.clear(Color::WHITE);
        let tri = [Point::new(5, 5), Point::new(55, 5), Point::new(5, 55)];
        draw_polygon(
            &mut buffer,
            &tri,
            Color::BLACK,
            Color::BLACK,
            LineAlgorithm::Dda,
            FillAlgorithm::Nearest,
            DEFAULT_VERTEX_COLORS,
        );
        assert_eq!(buffer.get_pixel(8, 8), Some(Color::RED));
        assert_eq!(buffer.get_pixel(45, 8), Some(Color::BLUE));
        assert_eq!(buffer.get_pixel(8, 45), Some(Color::GREEN));
    }
}
