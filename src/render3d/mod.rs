//! 3D pipeline: projection, hidden-surface removal and Phong shading.
//!
//! A [`Renderer3D`] owns the Z-buffer and turns a [`HalfEdgeMesh`] into
//! pixels using the settings in a [`RenderContext`]. The mesh is read only.

mod lighting;
mod projection;
mod zbuffer;

pub use lighting::LightSettings;
pub use projection::{
    project, project_point, view_direction, Camera, ProjectionPlane, DEFAULT_CAMERA_DISTANCE,
};
pub use zbuffer::ZBuffer;

use crate::context::{RenderContext, Representation, SurfaceShading};
use crate::display::{Color, PixelBuffer};
use crate::geometry::Point;
use crate::math3d::Vec3;
use crate::mesh::{FaceId, HalfEdgeMesh};
use crate::raster::{barycentric_weights, clip_polygon, draw_line, is_degenerate, scan_triangle, PixelTarget};

/// Screen-space corner of a triangle ready for filling
#[derive(Debug, Clone, Copy)]
struct Corner {
    pixel: Point,
    depth: f64,
    color: Color,
}

/// Draws meshes into a pixel buffer
#[derive(Debug, Clone)]
pub struct Renderer3D {
    zbuffer: ZBuffer,
}

impl Renderer3D {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            zbuffer: ZBuffer::new(width, height),
        }
    }

    pub fn zbuffer(&self) -> &ZBuffer {
        &self.zbuffer
    }

    /// Clear `buffer` to the background and draw `mesh` in the context's
    /// representation
    pub fn draw(&mut self, mesh: &HalfEdgeMesh, context: &RenderContext, buffer: &mut PixelBuffer) {
        buffer.clear(context.background);
        match context.representation {
            Representation::Wireframe => draw_wireframe(mesh, context, buffer),
            Representation::Surface => self.draw_surface(mesh, context, buffer),
        }
    }

    fn draw_surface(&mut self, mesh: &HalfEdgeMesh, context: &RenderContext, buffer: &mut PixelBuffer) {
        let (width, height) = (buffer.width(), buffer.height());
        self.zbuffer.reset(width, height, context.background);

        let projected = project(mesh, context, width, height);
        let vertex_normals = match (context.light, context.shading) {
            (Some(_), SurfaceShading::Gouraud) => vertex_normals(mesh),
            _ => Vec::new(),
        };

        let mut skipped = 0usize;
        for face in mesh.face_ids() {
            let corners = mesh.face_vertices(face);
            let Some(screen) = corners
                .iter()
                .map(|v| projected[v.0])
                .collect::<Option<Vec<Vec3>>>()
            else {
                skipped += 1;
                continue;
            };

            let base = mesh.face(face).color.unwrap_or(context.face_color);
            let normal = facing_normal(mesh, face, context);
            let colors: Vec<Color> = match context.light {
                None => vec![base; corners.len()],
                Some(light) => match context.shading {
                    SurfaceShading::Flat => {
                        let centroid = corners
                            .iter()
                            .fold(Vec3::zero(), |acc, v| acc + mesh.position(*v))
                            * (1.0 / corners.len() as f64);
                        let view = view_direction(centroid, context);
                        vec![light.shade(centroid, normal, view); corners.len()]
                    },
                    SurfaceShading::Gouraud => corners
                        .iter()
                        .map(|v| {
                            let p = mesh.position(*v);
                            let view = view_direction(p, context);
                            let mut n = vertex_normals[v.0];
                            if n.dot(&view) < 0.0 {
                                n = -n;
                            }
                            light.shade(p, n, view)
                        })
                        .collect(),
                },
            };

            let corner = |i: usize| Corner {
                pixel: Point::from_f64(screen[i].x, screen[i].y),
                depth: screen[i].z,
                color: colors[i],
            };
            for i in 1..corners.len() - 1 {
                self.fill_triangle([corner(0), corner(i), corner(i + 1)], buffer);
            }
        }

        if skipped > 0 {
            log::debug!("{} faces skipped behind the camera", skipped);
        }
    }

    /// Depth-tested fill with per-pixel interpolation of depth and color
    fn fill_triangle(&mut self, corners: [Corner; 3], buffer: &mut PixelBuffer) {
        let tri = corners.map(|c| c.pixel);
        let colors = corners.map(|c| c.color);
        let flat = colors[0] == colors[1] && colors[1] == colors[2];
        let viewport = buffer.viewport();
        let zbuffer = &mut self.zbuffer;

        let mut plot = |x: i32, y: i32| {
            let w = barycentric_weights(&tri, Point::new(x, y));
            let depth = w[0] * corners[0].depth + w[1] * corners[1].depth + w[2] * corners[2].depth;
            let color = if flat { colors[0] } else { Color::blend3(&colors, w) };
            if zbuffer.test_and_set(x, y, depth, color) {
                buffer.set_pixel(x, y, color);
            }
        };

        if tri.iter().all(|p| viewport.contains(*p)) {
            scan_triangle(tri, &mut plot);
            return;
        }

        let clipped = clip_polygon(&tri, viewport);
        if is_degenerate(&clipped) {
            return;
        }
        for i in 1..clipped.len() - 1 {
            scan_triangle([clipped[0], clipped[i], clipped[i + 1]], &mut plot);
        }
    }
}

/// Draw every edge once: a half-edge is skipped when its pair was drawn
fn draw_wireframe(mesh: &HalfEdgeMesh, context: &RenderContext, buffer: &mut PixelBuffer) {
    let projected = project(mesh, context, buffer.width(), buffer.height());
    let mut drawn = vec![false; mesh.half_edge_count()];

    for (i, he) in mesh.half_edges().iter().enumerate() {
        if he.pair.is_some_and(|p| drawn[p.0]) {
            continue;
        }
        drawn[i] = true;

        let start = projected[he.origin.0];
        let end = projected[mesh.half_edge(he.next).origin.0];
        if let (Some(a), Some(b)) = (start, end) {
            draw_line(
                buffer,
                Point::from_f64(a.x, a.y),
                Point::from_f64(b.x, b.y),
                context.wire_color,
                context.line_algorithm,
            );
        }
    }
}

/// Face normal turned towards the viewer
fn facing_normal(mesh: &HalfEdgeMesh, face: FaceId, context: &RenderContext) -> Vec3 {
    let normal = mesh.face_normal(face);
    let anchor = mesh.position(mesh.half_edge(mesh.face(face).half_edge).origin);
    if normal.dot(&view_direction(anchor, context)) < 0.0 {
        -normal
    } else {
        normal
    }
}

/// Average of the normals of the faces around each vertex
fn vertex_normals(mesh: &HalfEdgeMesh) -> Vec<Vec3> {
    let mut sums = vec![Vec3::zero(); mesh.vertex_count()];
    for face in mesh.face_ids() {
        let n = mesh.face_normal(face);
        for v in mesh.face_vertices(face) {
            sums[v.0] = sums[v.0] + n;
        }
    }
    sums.iter().map(Vec3::normalize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ProjectionKind;
    use crate::mesh::cube;

    fn square_facing_viewer(z: f64, color: Color) -> HalfEdgeMesh {
        let positions = vec![
            Vec3::new(-20.0, -20.0, z),
            Vec3::new(20.0, -20.0, z),
            Vec3::new(20.0, 20.0, z),
            Vec3::new(-20.0, 20.0, z),
        ];
        let mut mesh = HalfEdgeMesh::from_polygons(positions, &[vec![0, 1, 2, 3]]).unwrap();
        mesh.set_face_color(FaceId(0), Some(color));
        mesh
    }

    fn surface_context() -> RenderContext {
        let mut ctx = RenderContext::new();
        ctx.representation = Representation::Surface;
        ctx
    }

    #[test]
    fn test_wireframe_draws_edges_only() {
        let mesh = cube(40.0);
        let mut buffer = PixelBuffer::with_size(200, 200);
        let mut renderer = Renderer3D::new(200, 200);
        renderer.draw(&mesh, &RenderContext::new(), &mut buffer);
        // Corner (0,0,0) lands on the centre; the cube's top-down outline is
        // the square from (100,60) to (140,100)
        assert_eq!(buffer.get_pixel(100, 100), Some(Color::BLACK));
        assert_eq!(buffer.get_pixel(140, 60), Some(Color::BLACK));
        assert_eq!(buffer.get_pixel(10, 10), Some(Color::WHITE));
    }

    #[test]
    fn test_surface_fills_with_face_color() {
        let mesh = square_facing_viewer(0.0, Color::RED);
        let mut buffer = PixelBuffer::with_size(100, 100);
        let mut renderer = Renderer3D::new(100, 100);
        renderer.draw(&mesh, &surface_context(), &mut buffer);
        assert_eq!(buffer.get_pixel(50, 50), Some(Color::RED));
        assert_eq!(buffer.get_pixel(5, 5), Some(Color::WHITE));
    }

    #[test]
    fn test_nearer_face_hides_farther_one() {
        let positions = vec![
            Vec3::new(-20.0, -20.0, 0.0),
            Vec3::new(20.0, -20.0, 0.0),
            Vec3::new(20.0, 20.0, 0.0),
            Vec3::new(-20.0, 20.0, 0.0),
            Vec3::new(-10.0, -10.0, 10.0),
            Vec3::new(10.0, -10.0, 10.0),
            Vec3::new(10.0, 10.0, 10.0),
            Vec3::new(-10.0, 10.0, 10.0),
        ];
        for order in [[0, 1], [1, 0]] {
            let quads = [vec![0, 1, 2, 3], vec![4, 5, 6, 7]];
            let polygons = vec![quads[order[0]].clone(), quads[order[1]].clone()];
            let mut mesh = HalfEdgeMesh::from_polygons(positions.clone(), &polygons).unwrap();
            let near = if order[0] == 1 { 0 } else { 1 };
            mesh.set_face_color(FaceId(near), Some(Color::BLUE));
            mesh.set_face_color(FaceId(1 - near), Some(Color::RED));

            let mut buffer = PixelBuffer::with_size(100, 100);
            let mut renderer = Renderer3D::new(100, 100);
            renderer.draw(&mesh, &surface_context(), &mut buffer);
            assert_eq!(buffer.get_pixel(50, 50), Some(Color::BLUE));
            assert_eq!(buffer.get_pixel(35, 50), Some(Color::RED));
        }
    }

    #[test]
    fn test_unprojectable_faces_are_skipped() {
        let mesh = square_facing_viewer(600.0, Color::RED);
        let mut ctx = surface_context();
        ctx.projection = ProjectionKind::Perspective;
        let mut buffer = PixelBuffer::with_size(100, 100);
        let mut renderer = Renderer3D::new(100, 100);
        renderer.draw(&mesh, &ctx, &mut buffer);
        assert_eq!(buffer.count_not(Color::WHITE), 0);
    }

    #[test]
    fn test_lit_flat_face_uses_phong_color() {
        let mesh = square_facing_viewer(0.0, Color::RED);
        let mut ctx = surface_context();
        let light = LightSettings {
            position: Vec3::new(0.0, 0.0, 1000.0),
            ambient_color: Color::BLACK,
            ..LightSettings::default()
        };
        ctx.light = Some(light);
        let mut buffer = PixelBuffer::with_size(100, 100);
        let mut renderer = Renderer3D::new(100, 100);
        renderer.draw(&mesh, &ctx, &mut buffer);

        let expected = light.shade(Vec3::zero(), Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(buffer.get_pixel(50, 50), Some(expected));
    }

    #[test]
    fn test_gouraud_sphere_renders() {
        let mesh = crate::mesh::uv_sphere(40.0, 12, 8).unwrap();
        let mut ctx = surface_context();
        ctx.shading = SurfaceShading::Gouraud;
        ctx.light = Some(LightSettings::default());
        let mut buffer = PixelBuffer::with_size(120, 120);
        let mut renderer = Renderer3D::new(120, 120);
        renderer.draw(&mesh, &ctx, &mut buffer);
        assert_ne!(buffer.get_pixel(65, 62), Some(Color::WHITE));
        assert_eq!(buffer.get_pixel(2, 2), Some(Color::WHITE));
        assert!(renderer.zbuffer().depth_at(65, 62).is_some_and(|d| d > 0.0));
    }
}
