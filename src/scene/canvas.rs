use std::path::Path;

use super::{format, DepthCompositor, Object2D, Scene};
use crate::context::{CurveKind, FillAlgorithm, RenderContext};
use crate::display::{Color, PixelBuffer};
use crate::error::Result;
use crate::geometry::{rectangle_from_corners, Point, Transform2D};
use crate::raster::CurvePoint;

/// A 2D scene bound to its raster.
///
/// Every successful edit repaints the whole scene through the compositor, so
/// [`Canvas::buffer`] always shows the current state. Edits that name a
/// missing object return `false` and leave the image alone.
#[derive(Debug)]
pub struct Canvas {
    buffer: PixelBuffer,
    compositor: DepthCompositor,
    scene: Scene,
    context: RenderContext,
}

impl Canvas {
    pub fn new(width: u32, height: u32, context: RenderContext) -> Self {
        let mut canvas = Self {
            buffer: PixelBuffer::with_size(width, height),
            compositor: DepthCompositor::new(width, height),
            scene: Scene::new(),
            context,
        };
        canvas.repaint();
        canvas
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut PixelBuffer {
        &mut self.buffer
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Change render settings; call [`Canvas::repaint`] afterwards
    pub fn context_mut(&mut self) -> &mut RenderContext {
        &mut self.context
    }

    /// Reallocate the raster and both compositor planes, then repaint
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == (self.buffer.width(), self.buffer.height()) {
            return;
        }
        log::debug!("canvas resized to {}x{}", width, height);
        self.buffer.resize(width, height);
        self.compositor.resize(width, height);
        self.repaint();
    }

    pub fn repaint(&mut self) {
        self.compositor.compose(
            &self.scene,
            &mut self.buffer,
            self.context.background,
            self.context.line_algorithm,
        );
    }

    fn repaint_if(&mut self, changed: bool) -> bool {
        if changed {
            self.repaint();
        }
        changed
    }

    // ------------------------------------------------------------------------
    // Integer selector surface
    // ------------------------------------------------------------------------

    /// 0 = DDA, 1 = Bresenham
    pub fn set_line_algorithm_code(&mut self, code: i32) -> bool {
        let changed = self.context.set_line_algorithm_code(code);
        self.repaint_if(changed)
    }

    pub fn add_line(&mut self, a: Point, b: Point, color: Color) -> Option<String> {
        self.insert(Object2D::line(a, b).with_outline(color))
    }

    pub fn add_circle(&mut self, center: Point, edge: Point, color: Color) -> Option<String> {
        self.insert(Object2D::circle(center, edge).with_outline(color))
    }

    /// Add a polygon; `fill_code` is 0 outline, 1 solid, 2 nearest vertex,
    /// 3 barycentric. Two points describe opposite corners of a rectangle.
    pub fn add_polygon(
        &mut self,
        points: &[Point],
        outline: Color,
        fill: Color,
        fill_code: i32,
    ) -> Option<String> {
        let algorithm = FillAlgorithm::from_code(fill_code)?;
        let points = match points {
            [a, b] => rectangle_from_corners(*a, *b).to_vec(),
            _ => points.to_vec(),
        };
        self.insert(
            Object2D::polygon(points)
                .with_outline(outline)
                .with_fill(fill, algorithm),
        )
    }

    /// Add a curve; `curve_code` is 0 Hermite, 1 de Casteljau, 2 Coons
    pub fn add_curve(
        &mut self,
        points: Vec<CurvePoint>,
        color: Color,
        curve_code: i32,
    ) -> Option<String> {
        let kind = CurveKind::from_code(curve_code)?;
        self.insert(Object2D::curve(points, kind).with_outline(color))
    }

    // ------------------------------------------------------------------------
    // Object editing by name
    // ------------------------------------------------------------------------

    /// Add on the top layer and repaint; `None` if the name is taken
    pub fn insert(&mut self, object: Object2D) -> Option<String> {
        let name = self.scene.add(object)?;
        self.repaint();
        Some(name)
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let removed = self.scene.remove(name).is_some();
        self.repaint_if(removed)
    }

    pub fn raise(&mut self, name: &str) -> bool {
        let changed = self.scene.raise(name);
        self.repaint_if(changed)
    }

    pub fn lower(&mut self, name: &str) -> bool {
        let changed = self.scene.lower(name);
        self.repaint_if(changed)
    }

    pub fn recolor(&mut self, name: &str, color: Color) -> bool {
        let changed = self.scene.recolor(name, color);
        self.repaint_if(changed)
    }

    pub fn set_fill_code(&mut self, name: &str, fill_code: i32) -> bool {
        let changed = FillAlgorithm::from_code(fill_code)
            .is_some_and(|alg| self.scene.set_fill_algorithm(name, alg));
        self.repaint_if(changed)
    }

    pub fn set_curve_code(&mut self, name: &str, curve_code: i32) -> bool {
        let changed = CurveKind::from_code(curve_code)
            .is_some_and(|kind| self.scene.set_curve_kind(name, kind));
        self.repaint_if(changed)
    }

    pub fn transform(&mut self, name: &str, transform: &Transform2D) -> bool {
        let changed = self.scene.transform(name, transform);
        self.repaint_if(changed)
    }

    /// Mirror across the object's default axis
    pub fn mirror(&mut self, name: &str) -> bool {
        let Some((a, b)) = self.scene.get(name).and_then(Object2D::default_mirror_axis) else {
            return false;
        };
        self.transform(name, &Transform2D::Mirror { a, b })
    }

    pub fn drag_point(&mut self, name: &str, from: Point, to: Point) -> bool {
        let changed = self.scene.drag_point(name, from, to);
        self.repaint_if(changed)
    }

    /// Topmost object under `p`
    pub fn object_at(&self, p: Point, tolerance: f64) -> Option<&str> {
        self.scene.object_at(p, tolerance).map(|o| o.name.as_str())
    }

    pub fn clear(&mut self) {
        self.scene.clear();
        self.repaint();
    }

    /// Replace the scene from a file. On error the current scene is kept.
    pub fn load_scene(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.scene = format::load_scene(path)?;
        self.repaint();
        Ok(())
    }

    pub fn save_scene(&self, path: impl AsRef<Path>) -> Result<()> {
        format::save_scene(&self.scene, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::LineAlgorithm;

    fn canvas() -> Canvas {
        Canvas::new(100, 100, RenderContext::new())
    }

    #[test]
    fn test_new_canvas_is_background() {
        let c = canvas();
        assert_eq!(c.buffer().count_not(Color::WHITE), 0);
    }

    #[test]
    fn test_two_point_polygon_becomes_rectangle() {
        let mut c = canvas();
        let name = c
            .add_polygon(&[Point::new(10, 10), Point::new(30, 20)], Color::BLACK, Color::RED, 1)
            .unwrap();
        assert_eq!(c.scene().get(&name).map(|o| o.points.len()), Some(4));
        assert_eq!(c.buffer().get_pixel(20, 15), Some(Color::RED));
    }

    #[test]
    fn test_unknown_codes_are_rejected() {
        let mut c = canvas();
        assert!(c.add_polygon(&[Point::new(0, 0), Point::new(5, 5)], Color::BLACK, Color::RED, 7).is_none());
        assert!(c.add_curve(Vec::new(), Color::BLACK, 3).is_none());
        assert!(!c.set_line_algorithm_code(2));
        assert!(c.set_line_algorithm_code(1));
        assert_eq!(c.context().line_algorithm, LineAlgorithm::Bresenham);
    }

    #[test]
    fn test_missing_names_are_noops() {
        let mut c = canvas();
        assert!(!c.remove("ghost"));
        assert!(!c.raise("ghost"));
        assert!(!c.recolor("ghost", Color::RED));
        assert!(!c.transform("ghost", &Transform2D::Translate { dx: 1, dy: 1 }));
        assert!(!c.mirror("ghost"));
    }

    #[test]
    fn test_edits_repaint() {
        let mut c = canvas();
        let name = c.add_line(Point::new(0, 50), Point::new(99, 50), Color::BLACK).unwrap();
        assert_eq!(c.buffer().get_pixel(40, 50), Some(Color::BLACK));

        assert!(c.transform(&name, &Transform2D::Translate { dx: 0, dy: 10 }));
        assert_eq!(c.buffer().get_pixel(40, 50), Some(Color::WHITE));
        assert_eq!(c.buffer().get_pixel(40, 60), Some(Color::BLACK));

        assert!(c.recolor(&name, Color::BLUE));
        assert_eq!(c.buffer().get_pixel(40, 60), Some(Color::BLUE));

        assert!(c.remove(&name));
        assert_eq!(c.buffer().count_not(Color::WHITE), 0);
    }

    #[test]
    fn test_raise_changes_overlap_winner() {
        let mut c = canvas();
        let red = c
            .add_polygon(&[Point::new(10, 10), Point::new(50, 50)], Color::RED, Color::RED, 1)
            .unwrap();
        c.add_polygon(&[Point::new(30, 30), Point::new(70, 70)], Color::BLUE, Color::BLUE, 1);
        assert_eq!(c.buffer().get_pixel(40, 40), Some(Color::BLUE));
        assert!(c.raise(&red));
        assert_eq!(c.buffer().get_pixel(40, 40), Some(Color::RED));
    }

    #[test]
    fn test_resize_keeps_scene() {
        let mut c = canvas();
        c.add_line(Point::new(0, 5), Point::new(20, 5), Color::BLACK);
        c.resize(40, 30);
        assert_eq!((c.buffer().width(), c.buffer().height()), (40, 30));
        assert_eq!(c.buffer().get_pixel(10, 5), Some(Color::BLACK));
    }

    #[test]
    fn test_failed_load_keeps_scene() {
        let mut c = canvas();
        c.add_line(Point::new(0, 5), Point::new(20, 5), Color::BLACK);
        let path = std::env::temp_dir().join(format!("rasterlab-bad-{}.txt", std::process::id()));
        std::fs::write(&path, "NOT A SCENE\n").unwrap();
        assert!(c.load_scene(&path).is_err());
        assert_eq!(c.scene().len(), 1);
        let _ = std::fs::remove_file(&path);
    }
}
