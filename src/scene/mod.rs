//! Named, layered 2D drawing objects.
//!
//! A [`Scene`] owns objects keyed by unique name. Layer heights decide the
//! winner wherever objects overlap (see [`DepthCompositor`]); they stay
//! contiguous from 0 after deletes.

mod canvas;
mod compositor;
mod format;

pub use canvas::Canvas;
pub use compositor::{DepthCompositor, LayerTarget};
pub use format::{
    load_scene, parse_scene, save_scene, write_scene, LEGACY_SCENE_HEADER, SCENE_HEADER,
};

use std::collections::BTreeMap;

use crate::context::{CurveKind, FillAlgorithm, LineAlgorithm};
use crate::display::Color;
use crate::geometry::{distance_to_segment, nearest_index, point_in_polygon, Point, Transform2D};
use crate::raster::{
    draw_circle, draw_curve_markers, draw_curve_stroke, draw_line, draw_polygon, CurvePoint,
    PixelTarget, DEFAULT_VERTEX_COLORS,
};

/// Default offset of a new curve handle from its control point
pub const DEFAULT_HANDLE_OFFSET: Point = Point::new(0, -100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Line,
    Circle,
    Polygon,
    Curve,
}

impl ObjectKind {
    /// Keyword used in the scene file and in generated names
    pub fn keyword(self) -> &'static str {
        match self {
            ObjectKind::Line => "line",
            ObjectKind::Circle => "circle",
            ObjectKind::Polygon => "polygon",
            ObjectKind::Curve => "curve",
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "line" => Some(ObjectKind::Line),
            "circle" => Some(ObjectKind::Circle),
            "polygon" => Some(ObjectKind::Polygon),
            "curve" => Some(ObjectKind::Curve),
            _ => None,
        }
    }
}

/// One drawable object of a 2D scene
#[derive(Debug, Clone, PartialEq)]
pub struct Object2D {
    pub kind: ObjectKind,
    pub name: String,
    /// Line endpoints, circle center and rim point, or polygon vertices
    pub points: Vec<Point>,
    /// Control points of a curve; empty for other kinds
    pub curve_points: Vec<CurvePoint>,
    pub outline: Color,
    pub fill: Color,
    pub fill_algorithm: FillAlgorithm,
    pub curve_kind: CurveKind,
    pub layer: i32,
}

impl Object2D {
    fn with_kind(kind: ObjectKind, points: Vec<Point>, curve_points: Vec<CurvePoint>) -> Self {
        Self {
            kind,
            name: String::new(),
            points,
            curve_points,
            outline: Color::BLACK,
            fill: Color::BLACK,
            fill_algorithm: FillAlgorithm::default(),
            curve_kind: CurveKind::default(),
            layer: 0,
        }
    }

    pub fn line(a: Point, b: Point) -> Self {
        Self::with_kind(ObjectKind::Line, vec![a, b], Vec::new())
    }

    /// Circle through `edge` around `center`
    pub fn circle(center: Point, edge: Point) -> Self {
        Self::with_kind(ObjectKind::Circle, vec![center, edge], Vec::new())
    }

    pub fn polygon(points: Vec<Point>) -> Self {
        Self::with_kind(ObjectKind::Polygon, points, Vec::new())
    }

    pub fn curve(points: Vec<CurvePoint>, kind: CurveKind) -> Self {
        let mut object = Self::with_kind(ObjectKind::Curve, Vec::new(), points);
        object.curve_kind = kind;
        object
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_outline(mut self, color: Color) -> Self {
        self.outline = color;
        self
    }

    pub fn with_fill(mut self, color: Color, algorithm: FillAlgorithm) -> Self {
        self.fill = color;
        self.fill_algorithm = algorithm;
        self
    }

    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    /// Master points: the geometry points, or the curve control points
    pub fn anchor_points(&self) -> Vec<Point> {
        match self.kind {
            ObjectKind::Curve => self.curve_points.iter().map(|cp| cp.point).collect(),
            _ => self.points.clone(),
        }
    }

    /// Pivot for rotate, scale and shear: the first anchor point
    pub fn pivot(&self) -> Option<Point> {
        self.anchor_points().first().copied()
    }

    /// Mirror axis used when the caller does not pick one: the vertical
    /// through the first point for lines and circles, the closing edge
    /// (last to first anchor) for polygons and curves
    pub fn default_mirror_axis(&self) -> Option<(Point, Point)> {
        let anchors = self.anchor_points();
        let first = *anchors.first()?;
        match self.kind {
            ObjectKind::Line | ObjectKind::Circle => {
                Some((first, Point::new(first.x, first.y + 1)))
            },
            ObjectKind::Polygon | ObjectKind::Curve => {
                let last = *anchors.last()?;
                if last == first {
                    None
                } else {
                    Some((last, first))
                }
            },
        }
    }

    pub fn apply(&mut self, transform: &Transform2D) {
        for p in &mut self.points {
            *p = transform.apply(*p);
        }
        for cp in &mut self.curve_points {
            cp.point = transform.apply(cp.point);
            cp.handle = transform.apply(cp.handle);
        }
    }

    /// Move the control point or handle nearest to `from` onto `to`
    pub fn drag_nearest(&mut self, from: Point, to: Point) -> bool {
        if self.kind == ObjectKind::Curve {
            let candidates = self
                .curve_points
                .iter()
                .flat_map(|cp| [cp.point, cp.handle]);
            let Some(i) = nearest_index(candidates, from) else {
                return false;
            };
            let cp = &mut self.curve_points[i / 2];
            if i % 2 == 0 {
                let delta = to - cp.point;
                cp.point = to;
                cp.handle = cp.handle + delta;
            } else {
                cp.handle = to;
            }
            true
        } else {
            match nearest_index(self.points.iter().copied(), from) {
                Some(i) => {
                    self.points[i] = to;
                    true
                },
                None => false,
            }
        }
    }

    /// Whether `p` hits this object, allowing `tolerance` pixels for strokes
    pub fn hit(&self, p: Point, tolerance: f64) -> bool {
        match self.kind {
            ObjectKind::Line => match self.points.as_slice() {
                [a, b] => distance_to_segment(p, *a, *b) <= tolerance,
                _ => false,
            },
            ObjectKind::Circle => match self.points.as_slice() {
                [c, e] => p.distance_to(c) <= c.distance_to(e) + tolerance,
                _ => false,
            },
            ObjectKind::Polygon => {
                let n = self.points.len();
                point_in_polygon(p, &self.points)
                    || (0..n).any(|i| {
                        distance_to_segment(p, self.points[i], self.points[(i + 1) % n])
                            <= tolerance
                    })
            },
            ObjectKind::Curve => {
                let anchors = self.anchor_points();
                anchors.iter().any(|a| a.distance_to(&p) <= tolerance)
                    || anchors
                        .windows(2)
                        .any(|w| distance_to_segment(p, w[0], w[1]) <= tolerance)
            },
        }
    }

    /// Rasterize this object into `target`, markers included
    pub fn draw<T: PixelTarget + ?Sized>(&self, target: &mut T, line_algorithm: LineAlgorithm) {
        self.draw_body(target, line_algorithm);
        self.draw_markers(target);
    }

    /// Curve control-point markers and handles; nothing for other kinds
    pub fn draw_markers<T: PixelTarget + ?Sized>(&self, target: &mut T) {
        if self.kind == ObjectKind::Curve {
            draw_curve_markers(target, &self.curve_points, self.curve_kind);
        }
    }

    /// The object's geometry without decorations
    pub fn draw_body<T: PixelTarget + ?Sized>(&self, target: &mut T, line_algorithm: LineAlgorithm) {
        match self.kind {
            ObjectKind::Line => {
                if let [a, b] = self.points.as_slice() {
                    draw_line(target, *a, *b, self.outline, line_algorithm);
                }
            },
            ObjectKind::Circle => {
                if let [center, edge] = self.points.as_slice() {
                    draw_circle(target, *center, *edge, self.outline);
                }
            },
            ObjectKind::Polygon => draw_polygon(
                target,
                &self.points,
                self.outline,
                self.fill,
                line_algorithm,
                self.fill_algorithm,
                DEFAULT_VERTEX_COLORS,
            ),
            ObjectKind::Curve => {
                draw_curve_stroke(target, &self.curve_points, self.outline, self.curve_kind);
            },
        }
    }
}

// ============================================================================
// Scene
// ============================================================================

/// Objects keyed by unique name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    objects: BTreeMap<String, Object2D>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Object2D> {
        self.objects.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// First free name of the form `"<kind> (<n>)"`
    pub fn next_name(&self, kind: ObjectKind) -> String {
        (0..)
            .map(|n| format!("{} ({})", kind.keyword(), n))
            .find(|name| !self.objects.contains_key(name))
            .unwrap_or_else(|| kind.keyword().to_string())
    }

    /// Add an object on top of every existing one. An empty name is replaced
    /// with a generated one; a taken name rejects the object.
    pub fn add(&mut self, mut object: Object2D) -> Option<String> {
        if object.name.is_empty() {
            object.name = self.next_name(object.kind);
        }
        if self.objects.contains_key(&object.name) {
            return None;
        }
        object.layer = self.len() as i32;
        let name = object.name.clone();
        self.objects.insert(name.clone(), object);
        Some(name)
    }

    /// Insert keeping the object's own layer (used by the file loader)
    pub(crate) fn insert_raw(&mut self, object: Object2D) -> bool {
        if self.objects.contains_key(&object.name) {
            return false;
        }
        self.objects.insert(object.name.clone(), object);
        true
    }

    /// Delete an object; layers above it shift down by one
    pub fn remove(&mut self, name: &str) -> Option<Object2D> {
        let removed = self.objects.remove(name)?;
        for object in self.objects.values_mut() {
            if object.layer > removed.layer {
                object.layer -= 1;
            }
        }
        Some(removed)
    }

    fn swap_layer(&mut self, name: &str, offset: i32) -> bool {
        let Some(layer) = self.objects.get(name).map(|o| o.layer) else {
            return false;
        };
        let target = layer + offset;
        let Some(other) = self
            .objects
            .values()
            .find(|o| o.layer == target)
            .map(|o| o.name.clone())
        else {
            return false;
        };
        if let Some(o) = self.objects.get_mut(&other) {
            o.layer = layer;
        }
        if let Some(o) = self.objects.get_mut(name) {
            o.layer = target;
        }
        true
    }

    /// Swap with the object one layer above
    pub fn raise(&mut self, name: &str) -> bool {
        self.swap_layer(name, 1)
    }

    /// Swap with the object one layer below
    pub fn lower(&mut self, name: &str) -> bool {
        self.swap_layer(name, -1)
    }

    /// Renumber layers 0..n keeping the current order
    pub fn normalize_layers(&mut self) {
        let order: Vec<String> = self.by_layer().iter().map(|o| o.name.clone()).collect();
        for (layer, name) in order.iter().enumerate() {
            if let Some(o) = self.objects.get_mut(name) {
                o.layer = layer as i32;
            }
        }
    }

    /// Set both outline and fill color
    pub fn recolor(&mut self, name: &str, color: Color) -> bool {
        match self.objects.get_mut(name) {
            Some(o) => {
                o.outline = color;
                o.fill = color;
                true
            },
            None => false,
        }
    }

    pub fn set_fill_algorithm(&mut self, name: &str, algorithm: FillAlgorithm) -> bool {
        match self.objects.get_mut(name) {
            Some(o) => {
                o.fill_algorithm = algorithm;
                true
            },
            None => false,
        }
    }

    pub fn set_curve_kind(&mut self, name: &str, kind: CurveKind) -> bool {
        match self.objects.get_mut(name) {
            Some(o) if o.kind == ObjectKind::Curve => {
                o.curve_kind = kind;
                true
            },
            _ => false,
        }
    }

    pub fn transform(&mut self, name: &str, transform: &Transform2D) -> bool {
        match self.objects.get_mut(name) {
            Some(o) => {
                o.apply(transform);
                true
            },
            None => false,
        }
    }

    pub fn drag_point(&mut self, name: &str, from: Point, to: Point) -> bool {
        self.objects
            .get_mut(name)
            .is_some_and(|o| o.drag_nearest(from, to))
    }

    /// Objects in paint order: ascending layer, then name
    pub fn by_layer(&self) -> Vec<&Object2D> {
        let mut objects: Vec<&Object2D> = self.objects.values().collect();
        objects.sort_by(|a, b| a.layer.cmp(&b.layer).then_with(|| a.name.cmp(&b.name)));
        objects
    }

    /// Topmost object hit at `p`
    pub fn object_at(&self, p: Point, tolerance: f64) -> Option<&Object2D> {
        self.by_layer()
            .into_iter()
            .rev()
            .find(|o| o.hit(p, tolerance))
    }
}
