//! Hermite, Bézier (de Casteljau) and uniform cubic B-spline curves.
//!
//! Curves are tessellated into short Bresenham segments. Control points are
//! marked afterwards with small circles in the highlight color; the stroke
//! and the markers can also be drawn separately, e.g. at different depths.

use super::{draw_circle, draw_line, PixelTarget};
use crate::context::{CurveKind, LineAlgorithm};
use crate::display::Color;
use crate::geometry::Point;

const HERMITE_STEPS: u32 = 20;
const CASTELJAU_STEPS: u32 = 40;
const COONS_STEPS: u32 = 20;
const MARKER_RADIUS: i32 = 2;

/// A curve control point with its companion handle.
///
/// For Hermite curves `handle - point` is the tangent at `point`. The other
/// curve kinds only use `point`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurvePoint {
    pub point: Point,
    pub handle: Point,
}

impl CurvePoint {
    pub const fn new(point: Point, handle: Point) -> Self {
        Self { point, handle }
    }
}

/// Draw a curve of the given kind through `points`, then its markers
pub fn draw_curve<T: PixelTarget + ?Sized>(
    target: &mut T,
    points: &[CurvePoint],
    color: Color,
    kind: CurveKind,
) {
    draw_curve_stroke(target, points, color, kind);
    draw_curve_markers(target, points, kind);
}

/// Control-point markers, plus the tangent handles of Hermite curves
pub fn draw_curve_markers<T: PixelTarget + ?Sized>(target: &mut T, points: &[CurvePoint], kind: CurveKind) {
    for cp in points {
        if kind == CurveKind::Hermite {
            segment(target, cp.point, cp.handle, Color::HIGHLIGHT);
            marker(target, cp.handle);
        }
        marker(target, cp.point);
    }
}

/// The curve itself without markers
pub fn draw_curve_stroke<T: PixelTarget + ?Sized>(
    target: &mut T,
    points: &[CurvePoint],
    color: Color,
    kind: CurveKind,
) {
    match kind {
        CurveKind::Hermite => draw_hermite(target, points, color),
        CurveKind::Casteljau => {
            let masters: Vec<Point> = points.iter().map(|cp| cp.point).collect();
            draw_casteljau(target, &masters, color);
        },
        CurveKind::Coons => {
            let masters: Vec<Point> = points.iter().map(|cp| cp.point).collect();
            draw_coons(target, &masters, color);
        },
    }
}

#[inline]
fn segment<T: PixelTarget + ?Sized>(target: &mut T, a: Point, b: Point, color: Color) {
    draw_line(target, a, b, color, LineAlgorithm::Bresenham);
}

fn marker<T: PixelTarget + ?Sized>(target: &mut T, at: Point) {
    draw_circle(target, at, Point::new(at.x, at.y + MARKER_RADIUS), Color::HIGHLIGHT);
}

// ============================================================================
// Hermite
// ============================================================================

/// Cubic Hermite basis `[h00, h01, h10, h11]` at `t`
#[inline]
fn hermite_basis(t: f64) -> [f64; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        2.0 * t3 - 3.0 * t2 + 1.0,
        -2.0 * t3 + 3.0 * t2,
        t3 - 2.0 * t2 + t,
        t3 - t2,
    ]
}

/// Piecewise Hermite curve through consecutive control points
pub fn draw_hermite<T: PixelTarget + ?Sized>(target: &mut T, points: &[CurvePoint], color: Color) {
    for pair in points.windows(2) {
        let (p0, p1) = (pair[0], pair[1]);
        let tangent0 = p0.handle - p0.point;
        let tangent1 = p1.handle - p1.point;

        let mut prev = p0.point;
        for k in 1..HERMITE_STEPS {
            let t = f64::from(k) / f64::from(HERMITE_STEPS);
            let [f0, f1, f2, f3] = hermite_basis(t);
            let x = f64::from(p0.point.x) * f0
                + f64::from(p1.point.x) * f1
                + f64::from(tangent0.x) * f2
                + f64::from(tangent1.x) * f3;
            let y = f64::from(p0.point.y) * f0
                + f64::from(p1.point.y) * f1
                + f64::from(tangent0.y) * f2
                + f64::from(tangent1.y) * f3;
            let q = Point::from_f64(x, y);
            segment(target, prev, q, color);
            prev = q;
        }
        segment(target, prev, p1.point, color);
    }
}

// ============================================================================
// Bézier
// ============================================================================

/// Point on the Bézier curve of `controls` at `t`, by repeated interpolation
pub fn casteljau_point(controls: &[Point], t: f64) -> Option<Point> {
    let mut work: Vec<(f64, f64)> = controls
        .iter()
        .map(|p| (f64::from(p.x), f64::from(p.y)))
        .collect();
    let n = work.len();
    for level in 1..n {
        for i in 0..n - level {
            work[i] = (
                work[i].0 * (1.0 - t) + work[i + 1].0 * t,
                work[i].1 * (1.0 - t) + work[i + 1].1 * t,
            );
        }
    }
    work.first().map(|&(x, y)| Point::from_f64(x, y))
}

/// Single Bézier curve of degree `n - 1` through all control points
pub fn draw_casteljau<T: PixelTarget + ?Sized>(target: &mut T, controls: &[Point], color: Color) {
    let (Some(&first), Some(&last)) = (controls.first(), controls.last()) else {
        return;
    };

    let mut prev = first;
    for k in 1..=CASTELJAU_STEPS {
        let t = f64::from(k) / f64::from(CASTELJAU_STEPS);
        if let Some(q) = casteljau_point(controls, t) {
            segment(target, prev, q, color);
            prev = q;
        }
    }
    if prev != last {
        segment(target, prev, last, color);
    }
}

// ============================================================================
// Coons (uniform cubic B-spline)
// ============================================================================

/// Uniform cubic B-spline basis at `t`
#[inline]
fn coons_basis(t: f64) -> [f64; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        -t3 / 6.0 + t2 / 2.0 - t / 2.0 + 1.0 / 6.0,
        t3 / 2.0 - t2 + 2.0 / 3.0,
        -t3 / 2.0 + t2 / 2.0 + t / 2.0 + 1.0 / 6.0,
        t3 / 6.0,
    ]
}

/// Point of the spline segment defined by a 4-point window at `t`
pub fn coons_point(window: &[Point; 4], t: f64) -> Point {
    let b = coons_basis(t);
    let (mut x, mut y) = (0.0, 0.0);
    for (p, w) in window.iter().zip(b) {
        x += f64::from(p.x) * w;
        y += f64::from(p.y) * w;
    }
    Point::from_f64(x, y)
}

/// B-spline over a sliding window of four control points. A window ends
/// where the next one starts, so consecutive windows meet without a join.
pub fn draw_coons<T: PixelTarget + ?Sized>(target: &mut T, controls: &[Point], color: Color) {
    for i in 3..controls.len() {
        let window = [controls[i - 3], controls[i - 2], controls[i - 1], controls[i]];
        let mut prev = coons_point(&window, 0.0);
        for k in 1..=COONS_STEPS {
            let t = f64::from(k) / f64::from(COONS_STEPS);
            let q = coons_point(&window, t);
            segment(target, prev, q, color);
            prev = q;
        }
    }
}
