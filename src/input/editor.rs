use super::{InputEvent, Key, MouseButtonKind};
use crate::context::{CurveKind, FillAlgorithm, LineAlgorithm};
use crate::display::{Color, PixelBuffer};
use crate::geometry::{rectangle_from_corners, Point, Transform2D};
use crate::raster::{draw_circle, draw_line, CurvePoint};
use crate::scene::{Canvas, Object2D, DEFAULT_HANDLE_OFFSET};

const ROTATE_STEP_DEGREES: f64 = 15.0;
const SCALE_UP: f64 = 1.1;
const SCALE_DOWN: f64 = 1.0 / 1.1;
const SHEAR_STEP: f64 = 0.2;
const PREVIEW_COLOR: Color = Color::rgb(255, 160, 0);

/// Which drawing tool the left mouse button uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Pick, move and edit existing objects
    Select,
    Line,
    Circle,
    Polygon,
    Curve,
}

#[derive(Debug, Clone, PartialEq)]
enum State {
    Idle,
    /// Left button held since `start`
    DrawingLine { start: Point },
    DrawingCircle { center: Point },
    DrawingPolygon { vertices: Vec<Point> },
    DrawingCurve { points: Vec<CurvePoint> },
    Selected { name: String },
    /// Dragging the whole object
    Moving { name: String, last: Point },
    /// Dragging the point (or curve handle) nearest to the cursor
    DraggingPoint { name: String, last: Point },
}

/// Mouse and keyboard driven editing of a [`Canvas`].
///
/// Left click uses the current tool. Polygons and curves collect points
/// until Enter (or, for polygons, a click on the first vertex). With the
/// select tool a drag moves the object under the cursor; shift-drag moves
/// its nearest point instead. Arrow keys rotate and scale the selection.
pub struct Editor {
    tool: Tool,
    state: State,
    mouse: Point,
    shift_held: bool,
    snap_distance: f64,
    hit_tolerance: f64,
    outline: Color,
    fill: Color,
    fill_algorithm: FillAlgorithm,
    curve_kind: CurveKind,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self {
            tool: Tool::Select,
            state: State::Idle,
            mouse: Point::default(),
            shift_held: false,
            snap_distance: 8.0,
            hit_tolerance: 4.0,
            outline: Color::BLACK,
            fill: Color::rgb(70, 130, 180),
            fill_algorithm: FillAlgorithm::Outline,
            curve_kind: CurveKind::Hermite,
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switch tools; any half-drawn shape is dropped
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.state = State::Idle;
    }

    pub fn set_colors(&mut self, outline: Color, fill: Color) {
        self.outline = outline;
        self.fill = fill;
    }

    pub fn fill_algorithm(&self) -> FillAlgorithm {
        self.fill_algorithm
    }

    pub fn curve_kind(&self) -> CurveKind {
        self.curve_kind
    }

    /// Name of the selected object, if any
    pub fn selected(&self) -> Option<&str> {
        match &self.state {
            State::Selected { name } | State::Moving { name, .. } | State::DraggingPoint { name, .. } => {
                Some(name.as_str())
            },
            _ => None,
        }
    }

    /// Whether a shape is being drawn and a preview is pending
    pub fn is_drawing(&self) -> bool {
        matches!(
            self.state,
            State::DrawingLine { .. }
                | State::DrawingCircle { .. }
                | State::DrawingPolygon { .. }
                | State::DrawingCurve { .. }
        )
    }

    pub fn handle_event(&mut self, canvas: &mut Canvas, event: &InputEvent) {
        match *event {
            InputEvent::MouseMove { x, y } => {
                self.mouse = Point::new(x, y);
                self.on_mouse_move(canvas);
            },
            InputEvent::MouseDown { x, y, button } => {
                self.mouse = Point::new(x, y);
                match button {
                    MouseButtonKind::Left => self.on_left_down(canvas),
                    MouseButtonKind::Right => self.state = State::Idle,
                    MouseButtonKind::Middle => {},
                }
            },
            InputEvent::MouseUp { x, y, button } => {
                self.mouse = Point::new(x, y);
                if button == MouseButtonKind::Left {
                    self.on_left_up(canvas);
                }
            },
            InputEvent::Wheel { delta } => {
                let factor = if delta > 0 { SCALE_UP } else { SCALE_DOWN };
                if delta != 0 {
                    self.scale_selected(canvas, factor);
                }
            },
            InputEvent::KeyDown(Key::Shift) => self.shift_held = true,
            InputEvent::KeyUp(Key::Shift) => self.shift_held = false,
            InputEvent::KeyDown(key) => self.on_key(canvas, key),
            _ => {},
        }
    }

    fn on_mouse_move(&mut self, canvas: &mut Canvas) {
        let to = self.mouse;
        match &mut self.state {
            State::Moving { name, last } => {
                let delta = to - *last;
                if canvas.transform(name, &Transform2D::Translate { dx: delta.x, dy: delta.y }) {
                    *last = to;
                }
            },
            State::DraggingPoint { name, last } => {
                if canvas.drag_point(name, *last, to) {
                    *last = to;
                }
            },
            _ => {},
        }
    }

    fn on_left_down(&mut self, canvas: &mut Canvas) {
        let click = self.mouse;
        let state = std::mem::replace(&mut self.state, State::Idle);
        self.state = match (self.tool, state) {
            (Tool::Select, _) => match canvas.object_at(click, self.hit_tolerance) {
                Some(name) if self.shift_held => State::DraggingPoint {
                    name: name.to_string(),
                    last: click,
                },
                Some(name) => State::Moving {
                    name: name.to_string(),
                    last: click,
                },
                None => State::Idle,
            },
            (Tool::Line, _) => State::DrawingLine { start: click },
            (Tool::Circle, _) => State::DrawingCircle { center: click },
            (Tool::Polygon, State::DrawingPolygon { mut vertices }) => {
                if vertices.len() >= 3 && click.distance_to(&vertices[0]) < self.snap_distance {
                    self.finish_polygon(canvas, &vertices)
                } else {
                    vertices.push(click);
                    State::DrawingPolygon { vertices }
                }
            },
            (Tool::Polygon, _) => State::DrawingPolygon {
                vertices: vec![click],
            },
            (Tool::Curve, State::DrawingCurve { mut points }) => {
                points.push(CurvePoint::new(click, click + DEFAULT_HANDLE_OFFSET));
                State::DrawingCurve { points }
            },
            (Tool::Curve, _) => State::DrawingCurve {
                points: vec![CurvePoint::new(click, click + DEFAULT_HANDLE_OFFSET)],
            },
        };
    }

    fn on_left_up(&mut self, canvas: &mut Canvas) {
        let at = self.mouse;
        let state = std::mem::replace(&mut self.state, State::Idle);
        self.state = match state {
            State::DrawingLine { start } if start != at => {
                selected_or_idle(canvas.add_line(start, at, self.outline))
            },
            State::DrawingCircle { center } if center.distance_to(&at) >= 1.0 => {
                selected_or_idle(canvas.add_circle(center, at, self.outline))
            },
            State::DrawingLine { .. } | State::DrawingCircle { .. } => State::Idle,
            State::Moving { name, .. } | State::DraggingPoint { name, .. } => State::Selected { name },
            other => other,
        };
    }

    fn finish_polygon(&self, canvas: &mut Canvas, vertices: &[Point]) -> State {
        let object = match vertices {
            [a, b] => Object2D::polygon(rectangle_from_corners(*a, *b).to_vec()),
            _ => Object2D::polygon(vertices.to_vec()),
        };
        selected_or_idle(canvas.insert(
            object
                .with_outline(self.outline)
                .with_fill(self.fill, self.fill_algorithm),
        ))
    }

    fn on_key(&mut self, canvas: &mut Canvas, key: Key) {
        match key {
            Key::Escape => self.state = State::Idle,
            Key::Enter => {
                let state = std::mem::replace(&mut self.state, State::Idle);
                self.state = match state {
                    State::DrawingPolygon { vertices } if vertices.len() >= 2 => {
                        self.finish_polygon(canvas, &vertices)
                    },
                    State::DrawingCurve { points } if points.len() >= 2 => selected_or_idle(
                        canvas.insert(Object2D::curve(points, self.curve_kind).with_outline(self.outline)),
                    ),
                    State::DrawingPolygon { .. } | State::DrawingCurve { .. } => State::Idle,
                    other => other,
                };
            },
            Key::Delete => {
                if let Some(name) = self.selected().map(str::to_string) {
                    canvas.remove(&name);
                    self.state = State::Idle;
                }
            },
            Key::PageUp => self.with_selected(|canvas, name| canvas.raise(name), canvas),
            Key::PageDown => self.with_selected(|canvas, name| canvas.lower(name), canvas),
            Key::Left => self.rotate_selected(canvas, -ROTATE_STEP_DEGREES),
            Key::Right => self.rotate_selected(canvas, ROTATE_STEP_DEGREES),
            Key::Up => self.scale_selected(canvas, SCALE_UP),
            Key::Down => self.scale_selected(canvas, SCALE_DOWN),
            Key::Char('s') => self.set_tool(Tool::Select),
            Key::Char('l') => self.set_tool(Tool::Line),
            Key::Char('c') => self.set_tool(Tool::Circle),
            Key::Char('p') => self.set_tool(Tool::Polygon),
            Key::Char('b') => self.set_tool(Tool::Curve),
            Key::Char('m') => self.with_selected(|canvas, name| canvas.mirror(name), canvas),
            Key::Char('h') => self.with_pivot(canvas, |pivot| Transform2D::Shear {
                pivot,
                factor: SHEAR_STEP,
            }),
            Key::Char('f') => {
                self.fill_algorithm =
                    FillAlgorithm::from_code((self.fill_algorithm.code() + 1) % 4).unwrap_or_default();
                let code = self.fill_algorithm.code();
                self.with_selected(|canvas, name| canvas.set_fill_code(name, code), canvas);
            },
            Key::Char('k') => {
                self.curve_kind =
                    CurveKind::from_code((self.curve_kind.code() + 1) % 3).unwrap_or_default();
                let code = self.curve_kind.code();
                self.with_selected(|canvas, name| canvas.set_curve_code(name, code), canvas);
            },
            Key::Char('d') => {
                let next = match canvas.context().line_algorithm {
                    LineAlgorithm::Dda => LineAlgorithm::Bresenham,
                    LineAlgorithm::Bresenham => LineAlgorithm::Dda,
                };
                canvas.set_line_algorithm_code(next.code());
            },
            _ => {},
        }
    }

    fn with_selected(&self, edit: impl FnOnce(&mut Canvas, &str) -> bool, canvas: &mut Canvas) {
        if let Some(name) = self.selected() {
            if !edit(canvas, name) {
                log::debug!("edit of {:?} had no effect", name);
            }
        }
    }

    /// Apply a transform built around the selected object's pivot
    fn with_pivot(&self, canvas: &mut Canvas, build: impl FnOnce(Point) -> Transform2D) {
        let Some(name) = self.selected() else {
            return;
        };
        if let Some(pivot) = canvas.scene().get(name).and_then(Object2D::pivot) {
            canvas.transform(name, &build(pivot));
        }
    }

    fn rotate_selected(&self, canvas: &mut Canvas, degrees: f64) {
        self.with_pivot(canvas, |pivot| Transform2D::Rotate { pivot, degrees });
    }

    fn scale_selected(&self, canvas: &mut Canvas, factor: f64) {
        self.with_pivot(canvas, |pivot| Transform2D::Scale {
            pivot,
            sx: factor,
            sy: factor,
        });
    }

    /// Draw the in-progress shape and the selection markers on top of the
    /// last repaint
    pub fn draw_overlay(&self, canvas: &Canvas, buffer: &mut PixelBuffer) {
        let algorithm = canvas.context().line_algorithm;
        match &self.state {
            State::DrawingLine { start } => {
                draw_line(buffer, *start, self.mouse, PREVIEW_COLOR, algorithm);
            },
            State::DrawingCircle { center } => {
                draw_circle(buffer, *center, self.mouse, PREVIEW_COLOR);
            },
            State::DrawingPolygon { vertices } => {
                for pair in vertices.windows(2) {
                    draw_line(buffer, pair[0], pair[1], PREVIEW_COLOR, algorithm);
                }
                if let Some(last) = vertices.last() {
                    draw_line(buffer, *last, self.mouse, PREVIEW_COLOR, algorithm);
                }
            },
            State::DrawingCurve { points } => {
                for cp in points {
                    draw_line(buffer, cp.point, cp.handle, Color::HIGHLIGHT, algorithm);
                    draw_circle(buffer, cp.point, cp.point + Point::new(0, 2), Color::HIGHLIGHT);
                }
            },
            _ => {
                if let Some(object) = self.selected().and_then(|name| canvas.scene().get(name)) {
                    for p in object.anchor_points() {
                        draw_circle(buffer, p, p + Point::new(0, 3), PREVIEW_COLOR);
                    }
                }
            },
        }
    }
}

fn selected_or_idle(name: Option<String>) -> State {
    match name {
        Some(name) => State::Selected { name },
        None => State::Idle,
    }
}
