use super::Scene;
use crate::context::LineAlgorithm;
use crate::display::{Color, PixelBuffer};
use crate::raster::PixelTarget;

/// Markers sit above their own object but below the next layer up
const MARKER_DEPTH_OFFSET: f64 = 0.5;

/// Per-pixel color and depth planes that settle overlaps between layers.
///
/// A write at depth `d` wins only if `d` is strictly above the stored depth;
/// a losing write repaints the pixel with the stored winner. The final image
/// therefore does not depend on the order objects are drawn in.
#[derive(Debug, Clone)]
pub struct DepthCompositor {
    width: u32,
    height: u32,
    colors: Vec<Color>,
    depths: Vec<f64>,
}

impl DepthCompositor {
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width * height) as usize;
        Self {
            width,
            height,
            colors: vec![Color::WHITE; len],
            depths: vec![f64::NEG_INFINITY; len],
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    /// Reset both planes to `(background, -inf)`
    pub fn reset(&mut self, background: Color) {
        self.colors.fill(background);
        self.depths.fill(f64::NEG_INFINITY);
    }

    /// Stored depth at a pixel, `None` outside the planes
    pub fn depth_at(&self, x: i32, y: i32) -> Option<f64> {
        self.index(x, y).map(|i| self.depths[i])
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some((y as u32 * self.width + x as u32) as usize)
        } else {
            None
        }
    }

    /// A drawing target that writes through the planes at `depth`
    pub fn layer<'a>(&'a mut self, buffer: &'a mut PixelBuffer, depth: f64) -> LayerTarget<'a> {
        LayerTarget {
            compositor: self,
            buffer,
            depth,
        }
    }

    /// Clear and repaint every object of `scene` at its layer height
    pub fn compose(
        &mut self,
        scene: &Scene,
        buffer: &mut PixelBuffer,
        background: Color,
        line_algorithm: LineAlgorithm,
    ) {
        if (buffer.width(), buffer.height()) != (self.width, self.height) {
            self.resize(buffer.width(), buffer.height());
        }
        self.reset(background);
        buffer.clear(background);
        for object in scene.by_layer() {
            let depth = f64::from(object.layer);
            object.draw_body(&mut self.layer(buffer, depth), line_algorithm);
            object.draw_markers(&mut self.layer(buffer, depth + MARKER_DEPTH_OFFSET));
        }
    }
}

/// Pixel target for one layer of a compositor pass
pub struct LayerTarget<'a> {
    compositor: &'a mut DepthCompositor,
    buffer: &'a mut PixelBuffer,
    depth: f64,
}

impl PixelTarget for LayerTarget<'_> {
    fn width(&self) -> u32 {
        self.buffer.width()
    }

    fn height(&self) -> u32 {
        self.buffer.height()
    }

    fn plot(&mut self, x: i32, y: i32, color: Color) {
        let Some(i) = self.compositor.index(x, y) else {
            return;
        };
        if self.depth > self.compositor.depths[i] {
            self.compositor.depths[i] = self.depth;
            self.compositor.colors[i] = color;
            self.buffer.set_pixel(x, y, color);
        } else {
            self.buffer.set_pixel(x, y, self.compositor.colors[i]);
        }
    }
}
