use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::context::{ProjectionKind, RenderContext};
use crate::math3d::Vec3;
use crate::mesh::HalfEdgeMesh;

/// Camera distance used when nothing else is configured
pub const DEFAULT_CAMERA_DISTANCE: f64 = 500.0;

/// Viewer position; `position.z` is the perspective distance from the
/// projection plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        Self { position }
    }

    pub fn at_distance(distance: f64) -> Self {
        Self::new(Vec3::new(0.0, 0.0, distance))
    }

    #[inline]
    pub fn distance(&self) -> f64 {
        self.position.z
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::at_distance(DEFAULT_CAMERA_DISTANCE)
    }
}

/// Orientation of the projection plane.
///
/// Azimuth and zenith are in radians. The orthonormal basis is recomputed on
/// every angle change: `n` points from the plane towards the viewer, `u` is
/// screen up and `v = n x u`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionPlane {
    azimuth: f64,
    zenith: f64,
    n: Vec3,
    u: Vec3,
    v: Vec3,
}

impl ProjectionPlane {
    pub fn new(azimuth: f64, zenith: f64) -> Self {
        let mut plane = Self {
            azimuth,
            zenith,
            n: Vec3::zero(),
            u: Vec3::zero(),
            v: Vec3::zero(),
        };
        plane.rebuild_basis();
        plane
    }

    pub fn set_angles(&mut self, azimuth: f64, zenith: f64) {
        self.azimuth = azimuth;
        self.zenith = zenith;
        self.rebuild_basis();
    }

    fn rebuild_basis(&mut self) {
        let (a, z) = (self.azimuth, self.zenith);
        self.n = Vec3::new(z.sin() * a.sin(), z.sin() * a.cos(), z.cos());
        let zu = z + FRAC_PI_2;
        self.u = Vec3::new(zu.sin() * a.sin(), zu.sin() * a.cos(), zu.cos());
        self.v = self.n.cross(&self.u);
    }

    #[inline]
    pub fn azimuth(&self) -> f64 {
        self.azimuth
    }

    #[inline]
    pub fn zenith(&self) -> f64 {
        self.zenith
    }

    /// Plane normal, pointing at the viewer
    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.n
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.u
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        self.v
    }
}

impl Default for ProjectionPlane {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Project one point to `(screen x, screen y, depth)`.
///
/// `None` when perspective is on and the point sits at or behind the camera.
pub fn project_point(p: Vec3, context: &RenderContext, width: u32, height: u32) -> Option<Vec3> {
    let plane = &context.plane;
    let mut x = p.dot(&plane.right());
    let mut y = p.dot(&plane.up());
    let z = p.dot(&plane.normal());

    if context.projection == ProjectionKind::Perspective {
        let cz = context.camera.distance();
        if z >= cz {
            return None;
        }
        let scale = cz / (cz - z);
        x *= scale;
        y *= scale;
    }

    Some(Vec3::new(
        f64::from(width) / 2.0 - x,
        f64::from(height) / 2.0 - y,
        z,
    ))
}

/// Project every vertex of `mesh`, indexed like the mesh vertices
pub fn project(mesh: &HalfEdgeMesh, context: &RenderContext, width: u32, height: u32) -> Vec<Option<Vec3>> {
    mesh.vertices()
        .iter()
        .map(|v| project_point(v.position, context, width, height))
        .collect()
}

/// Direction from `p` towards the viewer
pub fn view_direction(p: Vec3, context: &RenderContext) -> Vec3 {
    let n = context.plane.normal();
    match context.projection {
        ProjectionKind::Parallel => n,
        ProjectionKind::Perspective => (n * context.camera.distance() - p).normalize(),
    }
}
