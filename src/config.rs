//! Viewer settings: a JSON file with defaults for every field, overridden
//! by command-line flags.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::context::{LineAlgorithm, ProjectionKind, RenderContext, Representation, SurfaceShading};
use crate::display::{Color, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::{ConfigError, Result};
use crate::render3d::{Camera, LightSettings, DEFAULT_CAMERA_DISTANCE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    pub background: Color,
    pub line_algorithm: LineAlgorithm,
    pub wire_color: Color,
    pub face_color: Color,
    pub projection: ProjectionKind,
    pub representation: Representation,
    pub shading: SurfaceShading,
    pub azimuth_degrees: f64,
    pub zenith_degrees: f64,
    pub camera_distance: f64,
    /// Phong lighting; absent means unlit face colors
    pub light: Option<LightSettings>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            vsync: true,
            background: Color::WHITE,
            line_algorithm: LineAlgorithm::Dda,
            wire_color: Color::BLACK,
            face_color: Color::rgb(128, 128, 128),
            projection: ProjectionKind::Parallel,
            representation: Representation::Wireframe,
            shading: SurfaceShading::Flat,
            azimuth_degrees: 0.0,
            zenith_degrees: 0.0,
            camera_distance: DEFAULT_CAMERA_DISTANCE,
            light: None,
        }
    }
}

impl ViewerConfig {
    pub fn from_json(text: &str) -> std::result::Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = Self::from_json(&fs::read_to_string(path)?)?;
        log::info!("loaded settings from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::ZeroSize { field: "width" });
        }
        if self.height == 0 {
            return Err(ConfigError::ZeroSize { field: "height" });
        }
        Ok(())
    }

    pub fn render_context(&self) -> RenderContext {
        let mut context = RenderContext::new();
        context.background = self.background;
        context.line_algorithm = self.line_algorithm;
        context.wire_color = self.wire_color;
        context.face_color = self.face_color;
        context.projection = self.projection;
        context.representation = self.representation;
        context.shading = self.shading;
        context.camera = Camera::at_distance(self.camera_distance);
        context.set_azimuth_degrees(self.azimuth_degrees);
        context.set_zenith_degrees(self.zenith_degrees);
        context.light = self.light;
        context
    }
}

// ============================================================================
// Command line
// ============================================================================

/// Parsed command-line flags; `None` leaves the configured value alone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliArgs {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub vsync: Option<bool>,
    pub config: Option<PathBuf>,
    pub scene: Option<PathBuf>,
    pub mesh: Option<PathBuf>,
    pub verbose: bool,
    pub help: bool,
    /// Flags that were not recognised, reported once logging is up
    pub unknown: Vec<String>,
}

pub const USAGE: &str = "\
Usage: rasterlab [OPTIONS]

Options:
  --width W, -w W            Raster width
  --height H, -h H           Raster height
  --resolution WxH, -r WxH   Raster size (e.g., 1280x720)
  --config FILE              JSON settings file
  --scene FILE               2D scene to open
  --mesh FILE                VTK mesh to open in 3D mode
  --no-vsync                 Disable VSync
  --verbose, -v              Debug logging
  --help                     Show this help message";

impl CliArgs {
    /// Parse flags (without the program name). Unparsable values are
    /// ignored; unknown flags are collected in `unknown`.
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let mut parsed = Self::default();

        let mut i = 0;
        while i < args.len() {
            let value = args.get(i + 1);
            match args[i].as_str() {
                "--width" | "-w" => {
                    parsed.width = value.and_then(|v| v.parse().ok()).or(parsed.width);
                    i += 1;
                },
                "--height" | "-h" => {
                    parsed.height = value.and_then(|v| v.parse().ok()).or(parsed.height);
                    i += 1;
                },
                "--resolution" | "-r" => {
                    if let Some((w, h)) = value.and_then(|v| parse_resolution(v)) {
                        parsed.width = Some(w);
                        parsed.height = Some(h);
                    }
                    i += 1;
                },
                "--config" => {
                    parsed.config = value.map(PathBuf::from);
                    i += 1;
                },
                "--scene" => {
                    parsed.scene = value.map(PathBuf::from);
                    i += 1;
                },
                "--mesh" => {
                    parsed.mesh = value.map(PathBuf::from);
                    i += 1;
                },
                "--no-vsync" => parsed.vsync = Some(false),
                "--verbose" | "-v" => parsed.verbose = true,
                "--help" => parsed.help = true,
                other => parsed.unknown.push(other.to_string()),
            }
            i += 1;
        }
        parsed
    }

    /// Overlay the flags onto a loaded configuration
    pub fn apply(&self, config: &mut ViewerConfig) {
        if let Some(w) = self.width.filter(|w| *w > 0) {
            config.width = w;
        }
        if let Some(h) = self.height.filter(|h| *h > 0) {
            config.height = h;
        }
        if let Some(vsync) = self.vsync {
            config.vsync = vsync;
        }
    }
}

/// Parse `WxH`, e.g. `1920x1080`
fn parse_resolution(text: &str) -> Option<(u32, u32)> {
    let (w, h) = text.split_once('x')?;
    Some((w.parse().ok()?, h.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(ViewerConfig::from_json("{}").unwrap(), ViewerConfig::default());
    }

    #[test]
    fn test_partial_json() {
        let config = ViewerConfig::from_json(
            r#"{"width": 320, "projection": "perspective", "light": {"shininess": 4.0}}"#,
        )
        .unwrap();
        assert_eq!(config.width, 320);
        assert_eq!(config.height, DEFAULT_HEIGHT);
        assert_eq!(config.projection, ProjectionKind::Perspective);
        assert_eq!(config.light.map(|l| l.shininess), Some(4.0));
    }

    #[test]
    fn test_rejects_zero_size_and_bad_json() {
        assert!(matches!(
            ViewerConfig::from_json(r#"{"height": 0}"#),
            Err(ConfigError::ZeroSize { field: "height" })
        ));
        assert!(matches!(
            ViewerConfig::from_json("{"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_render_context_carries_settings() {
        let config = ViewerConfig {
            azimuth_degrees: 90.0,
            camera_distance: 250.0,
            background: Color::BLACK,
            ..ViewerConfig::default()
        };
        let ctx = config.render_context();
        assert_eq!(ctx.background, Color::BLACK);
        assert_eq!(ctx.camera.distance(), 250.0);
        assert!((ctx.plane.azimuth() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_cli_flags() {
        let args = CliArgs::parse(["-r", "800x600", "--mesh", "cube.vtk", "--no-vsync", "-v"]);
        assert_eq!(args.width, Some(800));
        assert_eq!(args.height, Some(600));
        assert_eq!(args.mesh, Some(PathBuf::from("cube.vtk")));
        assert_eq!(args.vsync, Some(false));
        assert!(args.verbose);
        assert!(!args.help);
        assert!(args.unknown.is_empty());

        let mut config = ViewerConfig::default();
        args.apply(&mut config);
        assert_eq!((config.width, config.height, config.vsync), (800, 600, false));
    }

    #[test]
    fn test_cli_ignores_bad_values() {
        let args = CliArgs::parse(["--width", "wide", "-r", "100by100", "--bogus"]);
        assert_eq!(args.width, None);
        assert_eq!(args.height, None);
        assert_eq!(args.unknown, vec!["--bogus".to_string()]);
    }
}
