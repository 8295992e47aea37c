//! Render settings threaded explicitly through every draw call.
//!
//! Algorithm choices are plain enums that keep the integer codes used by the
//! scene file format and by integer-driven callers (`from_code` / `code`).

use serde::{Deserialize, Serialize};

use crate::display::Color;
use crate::render3d::{Camera, LightSettings, ProjectionPlane};

/// Declares a selector enum with a stable integer code per variant
macro_rules! selector {
    (
        $(#[$meta:meta])*
        $name:ident { $( $(#[$vmeta:meta])* $variant:ident = $code:literal ),+ $(,)? }
        default $default:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Variant for an integer code, `None` for unknown codes
            pub fn from_code(code: i32) -> Option<Self> {
                match code {
                    $( $code => Some(Self::$variant), )+
                    _ => None,
                }
            }

            pub fn code(self) -> i32 {
                match self {
                    $( Self::$variant => $code, )+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }
    };
}

selector! {
    /// Line rasterization algorithm
    LineAlgorithm { Dda = 0, Bresenham = 1 }
    default Dda
}

selector! {
    /// How a polygon interior is painted
    FillAlgorithm {
        /// Outline only, no interior
        Outline = 0,
        /// Single fill color
        Solid = 1,
        /// Color of the nearest triangle vertex
        Nearest = 2,
        /// Barycentric blend of the triangle vertex colors
        Barycentric = 3,
    }
    default Outline
}

selector! {
    CurveKind { Hermite = 0, Casteljau = 1, Coons = 2 }
    default Hermite
}

selector! {
    ProjectionKind { Parallel = 0, Perspective = 1 }
    default Parallel
}

selector! {
    Representation { Wireframe = 0, Surface = 1 }
    default Wireframe
}

selector! {
    /// Color source across a mesh face in surface mode
    SurfaceShading {
        /// One color per face
        Flat = 0,
        /// Per-vertex colors interpolated per pixel
        Gouraud = 1,
    }
    default Flat
}

/// Everything a render call needs to know besides the geometry
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    pub background: Color,
    pub line_algorithm: LineAlgorithm,
    /// Edge color for wireframe meshes
    pub wire_color: Color,
    /// Face color used when a face has none of its own
    pub face_color: Color,
    pub camera: Camera,
    pub plane: ProjectionPlane,
    pub projection: ProjectionKind,
    pub representation: Representation,
    pub shading: SurfaceShading,
    /// `None` renders unlit face colors
    pub light: Option<LightSettings>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self {
            background: Color::WHITE,
            line_algorithm: LineAlgorithm::default(),
            wire_color: Color::BLACK,
            face_color: Color::rgb(128, 128, 128),
            camera: Camera::default(),
            plane: ProjectionPlane::default(),
            projection: ProjectionKind::default(),
            representation: Representation::default(),
            shading: SurfaceShading::default(),
            light: None,
        }
    }

    pub fn set_azimuth_degrees(&mut self, degrees: f64) {
        self.plane.set_angles(degrees.to_radians(), self.plane.zenith());
    }

    pub fn set_zenith_degrees(&mut self, degrees: f64) {
        self.plane.set_angles(self.plane.azimuth(), degrees.to_radians());
    }

    /// Move the camera along the Z axis; the distance is the perspective depth
    pub fn set_camera_distance(&mut self, distance: f64) {
        self.camera = Camera::at_distance(distance);
    }

    // Integer-coded setters; unknown codes leave the context unchanged

    pub fn set_line_algorithm_code(&mut self, code: i32) -> bool {
        LineAlgorithm::from_code(code)
            .map(|alg| self.line_algorithm = alg)
            .is_some()
    }

    pub fn set_projection_code(&mut self, code: i32) -> bool {
        ProjectionKind::from_code(code)
            .map(|kind| self.projection = kind)
            .is_some()
    }

    pub fn set_representation_code(&mut self, code: i32) -> bool {
        Representation::from_code(code)
            .map(|rep| self.representation = rep)
            .is_some()
    }

    pub fn set_shading_code(&mut self, code: i32) -> bool {
        SurfaceShading::from_code(code)
            .map(|shading| self.shading = shading)
            .is_some()
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new()
    }
}
