//! rasterlab: a software rasterizer for layered 2D vector scenes and
//! half-edge 3D meshes.
//!
//! Everything draws into a [`PixelBuffer`]. The 2D side keeps named objects
//! in a [`Scene`] and resolves overlaps by layer through a depth compositor;
//! the 3D side projects a [`HalfEdgeMesh`] through a camera and projection
//! plane and fills it with a Z-buffer and optional Phong lighting. Render
//! settings travel in a [`RenderContext`].

pub mod config;
pub mod context;
pub mod display;
pub mod error;
pub mod geometry;
pub mod input;
pub mod math3d;
pub mod mesh;
pub mod raster;
pub mod render3d;
pub mod scene;
pub mod util;

pub use config::{CliArgs, ViewerConfig};
pub use context::{
    CurveKind, FillAlgorithm, LineAlgorithm, ProjectionKind, RenderContext, Representation,
    SurfaceShading,
};
pub use display::{Color, PixelBuffer};
pub use error::{Error, Result};
pub use geometry::{Point, Transform2D};
pub use math3d::Vec3;
pub use mesh::HalfEdgeMesh;
pub use raster::PixelTarget;
pub use render3d::{Camera, LightSettings, ProjectionPlane, Renderer3D};
pub use scene::{Canvas, Object2D, ObjectKind, Scene};
