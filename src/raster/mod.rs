//! 2D rasterization: clipping, lines, circles, polygon fill and curves.
//!
//! Everything here draws through [`PixelTarget`], so the same code paints
//! straight into a [`PixelBuffer`] or through the layer compositor of a 2D
//! scene.

pub mod clip;
pub mod curve;
pub mod fill;
pub mod line;

pub use clip::{clip_line, clip_polygon, is_degenerate, Viewport};
pub use curve::{
    draw_casteljau, draw_coons, draw_curve, draw_curve_markers, draw_curve_stroke, draw_hermite,
    CurvePoint,
};
pub use fill::{
    barycentric_weights, draw_polygon, fill_scanline, fill_triangle, nearest_vertex,
    scan_triangle, TriangleShading, DEFAULT_VERTEX_COLORS,
};
pub use line::{draw_circle, draw_line, draw_line_bresenham, draw_line_dda, draw_line_unclipped};

use crate::display::{Color, PixelBuffer};

/// Anything the rasterizers can plot into
pub trait PixelTarget {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Plot one pixel; coordinates outside the raster are ignored
    fn plot(&mut self, x: i32, y: i32, color: Color);

    fn viewport(&self) -> Viewport {
        Viewport::new(self.width(), self.height())
    }
}

impl PixelTarget for PixelBuffer {
    #[inline]
    fn width(&self) -> u32 {
        PixelBuffer::width(self)
    }

    #[inline]
    fn height(&self) -> u32 {
        PixelBuffer::height(self)
    }

    #[inline]
    fn plot(&mut self, x: i32, y: i32, color: Color) {
        self.set_pixel(x, y, color);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::PixelTarget;
    use crate::display::Color;
    use crate::geometry::Point;

    /// Records every plotted pixel in order
    pub struct Recorder {
        pub width: u32,
        pub height: u32,
        pub plots: Vec<(Point, Color)>,
    }

    impl Recorder {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                plots: Vec::new(),
            }
        }

        pub fn points(&self) -> Vec<Point> {
            self.plots.iter().map(|(p, _)| *p).collect()
        }
    }

    impl PixelTarget for Recorder {
        fn width(&self) -> u32 {
            self.width
        }

        fn height(&self) -> u32 {
            self.height
        }

        fn plot(&mut self, x: i32, y: i32, color: Color) {
            self.plots.push((Point::new(x, y), color));
        }
    }
}
