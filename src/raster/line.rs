use super::{clip_line, PixelTarget};
use crate::context::LineAlgorithm;
use crate::display::Color;
use crate::geometry::Point;

/// Draw a clipped line with the chosen algorithm
pub fn draw_line<T: PixelTarget + ?Sized>(
    target: &mut T,
    a: Point,
    b: Point,
    color: Color,
    algorithm: LineAlgorithm,
) {
    if let Some((a, b)) = clip_line(a, b, target.viewport()) {
        draw_line_unclipped(target, a, b, color, algorithm);
    }
}

/// Draw a line whose endpoints were already clipped (polygon outlines)
pub fn draw_line_unclipped<T: PixelTarget + ?Sized>(
    target: &mut T,
    a: Point,
    b: Point,
    color: Color,
    algorithm: LineAlgorithm,
) {
    match algorithm {
        LineAlgorithm::Dda => draw_line_dda(target, a, b, color),
        LineAlgorithm::Bresenham => draw_line_bresenham(target, a, b, color),
    }
}

#[inline]
fn round_half_up(v: f64) -> i32 {
    (v + 0.5).floor() as i32
}

/// Floating-point DDA. Walks the major axis one pixel at a time and rounds
/// the minor coordinate. Both endpoints are plotted.
pub fn draw_line_dda<T: PixelTarget + ?Sized>(target: &mut T, start: Point, end: Point, color: Color) {
    let dx = end.x - start.x;
    let dy = end.y - start.y;

    if dx.abs() >= dy.abs() {
        let (start, end) = if start.x <= end.x { (start, end) } else { (end, start) };
        let m = if dx == 0 {
            0.0
        } else {
            f64::from(end.y - start.y) / f64::from(end.x - start.x)
        };
        let mut y = f64::from(start.y);
        for x in start.x..=end.x {
            target.plot(x, round_half_up(y), color);
            y += m;
        }
    } else {
        let (start, end) = if start.y <= end.y { (start, end) } else { (end, start) };
        let inv_m = f64::from(end.x - start.x) / f64::from(end.y - start.y);
        let mut x = f64::from(start.x);
        for y in start.y..=end.y {
            target.plot(round_half_up(x), y, color);
            x += inv_m;
        }
    }
}

/// Integer Bresenham.
///
/// The decision variable starts at `2*dminor + tmp*dmajor` and moves by
/// `k1 = 2*dminor` or `k2 = 2*dminor + tmp*2*dmajor`. `tmp` is -1 when the
/// minor coordinate grows along the major axis (step when `p > 0`) and +1
/// when it shrinks (step when `p < 0`).
pub fn draw_line_bresenham<T: PixelTarget + ?Sized>(
    target: &mut T,
    start: Point,
    end: Point,
    color: Color,
) {
    if start.x == end.x {
        let (y0, y1) = if start.y <= end.y { (start.y, end.y) } else { (end.y, start.y) };
        for y in y0..=y1 {
            target.plot(start.x, y, color);
        }
        return;
    }

    let slope = f64::from(end.y - start.y) / f64::from(end.x - start.x);

    if slope.abs() <= 1.0 {
        let (start, end) = if start.x < end.x { (start, end) } else { (end, start) };
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        let tmp = if dy > 0 { -1 } else { 1 };
        let k1 = 2 * dy;
        let k2 = 2 * dy + tmp * 2 * dx;
        let mut p = 2 * dy + tmp * dx;

        let mut y = start.y;
        target.plot(start.x, y, color);
        for x in start.x + 1..=end.x {
            if tmp == -1 && p > 0 {
                y += 1;
                p += k2;
            } else if tmp == 1 && p < 0 {
                y -= 1;
                p += k2;
            } else {
                p += k1;
            }
            target.plot(x, y, color);
        }
    } else {
        let (start, end) = if start.y < end.y { (start, end) } else { (end, start) };
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        let tmp = if dx > 0 { -1 } else { 1 };
        let k1 = 2 * dx;
        let k2 = 2 * dx + tmp * 2 * dy;
        let mut p = 2 * dx + tmp * dy;

        let mut x = start.x;
        target.plot(x, start.y, color);
        for y in start.y + 1..=end.y {
            if tmp == -1 && p > 0 {
                x += 1;
                p += k2;
            } else if tmp == 1 && p < 0 {
                x -= 1;
                p += k2;
            } else {
                p += k1;
            }
            target.plot(x, y, color);
        }
    }
}

/// Midpoint circle through `edge`; the radius is the truncated distance.
/// Each of the eight mirrored points is bounds-checked by the target.
pub fn draw_circle<T: PixelTarget + ?Sized>(target: &mut T, center: Point, edge: Point, color: Color) {
    let radius = center.distance_to(&edge) as i32;

    let mut x = 0;
    let mut y = radius;
    let mut p = 1 - radius;
    let mut two_x = 3;
    let mut two_y = 2 * radius - 2;

    while x <= y {
        for (ox, oy) in [
            (x, y),
            (y, x),
            (-x, y),
            (-y, x),
            (x, -y),
            (y, -x),
            (-x, -y),
            (-y, -x),
        ] {
            target.plot(center.x + ox, center.y + oy, color);
        }

        if p > 0 {
            p -= two_y;
            y -= 1;
            two_y -= 2;
        }
        p += two_x;
        two_x += 2;
        x += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::testing::Recorder;

    fn is_eight_connected(points: &[Point]) -> bool {
        points
            .windows(2)
            .all(|w| (w[0].x - w[1].x).abs() <= 1 && (w[0].y - w[1].y).abs() <= 1)
    }

    fn endpoints_match(points: &[Point], a: Point, b: Point) -> bool {
        let (first, last) = (points[0], points[points.len() - 1]);
        (first == a && last == b) || (first == b && last == a)
    }

    #[test]
    fn test_bresenham_gentle_slope_sequence() {
        let mut rec = Recorder::new(10, 10);
        draw_line_bresenham(&mut rec, Point::new(0, 0), Point::new(4, 2), Color::BLACK);
        assert_eq!(
            rec.points(),
            vec![
                Point::new(0, 0),
                Point::new(1, 0),
                Point::new(2, 1),
                Point::new(3, 1),
                Point::new(4, 2)
            ]
        );
    }

    #[test]
    fn test_pixel_count_and_endpoints_all_octants() {
        let center = Point::new(50, 50);
        let ends = [
            Point::new(90, 60),
            Point::new(60, 90),
            Point::new(40, 90),
            Point::new(10, 60),
            Point::new(10, 40),
            Point::new(40, 10),
            Point::new(60, 10),
            Point::new(90, 40),
            Point::new(90, 50),
            Point::new(50, 90),
            Point::new(80, 80),
            Point::new(20, 80),
        ];
        for end in ends {
            let expected = (end.x - center.x).abs().max((end.y - center.y).abs()) as usize + 1;
            for alg in [LineAlgorithm::Dda, LineAlgorithm::Bresenham] {
                let mut rec = Recorder::new(100, 100);
                draw_line(&mut rec, center, end, Color::BLACK, alg);
                let pts = rec.points();
                assert_eq!(pts.len(), expected, "{:?} to {:?}", alg, end);
                assert!(is_eight_connected(&pts), "{:?} to {:?}", alg, end);
                assert!(endpoints_match(&pts, center, end), "{:?} to {:?}", alg, end);
            }
        }
    }

    #[test]
    fn test_single_point_line() {
        for alg in [LineAlgorithm::Dda, LineAlgorithm::Bresenham] {
            let mut rec = Recorder::new(10, 10);
            draw_line(&mut rec, Point::new(3, 3), Point::new(3, 3), Color::BLACK, alg);
            assert_eq!(rec.points(), vec![Point::new(3, 3)]);
        }
    }

    #[test]
    fn test_line_is_clipped_before_drawing() {
        let mut rec = Recorder::new(10, 10);
        draw_line(
            &mut rec,
            Point::new(-20, 4),
            Point::new(30, 4),
            Color::BLACK,
            LineAlgorithm::Bresenham,
        );
        assert_eq!(rec.plots.len(), 10);
        assert!(rec.points().iter().all(|p| p.x >= 0 && p.x < 10));
    }

    #[test]
    fn test_circle_points_lie_on_radius() {
        let mut rec = Recorder::new(100, 100);
        let center = Point::new(50, 50);
        draw_circle(&mut rec, center, Point::new(50, 62), Color::BLACK);
        assert!(!rec.plots.is_empty());
        for p in rec.points() {
            let d = p.distance_to(&center);
            assert!((d - 12.0).abs() < 1.0, "{:?} at distance {}", p, d);
        }
        assert!(rec.points().contains(&Point::new(62, 50)));
        assert!(rec.points().contains(&Point::new(50, 38)));
    }

    #[test]
    fn test_circle_in_buffer_drops_offscreen_pixels() {
        let mut buffer = crate::display::PixelBuffer::with_size(20, 20);
        buffer.clear(Color::WHITE);
        draw_circle(&mut buffer, Point::new(0, 0), Point::new(5, 0), Color::BLACK);
        assert_eq!(buffer.get_pixel(5, 0), Some(Color::BLACK));
        assert_eq!(buffer.get_pixel(0, 5), Some(Color::BLACK));
    }
}
