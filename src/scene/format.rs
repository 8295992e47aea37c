//! Line-oriented text format for 2D scenes.
//!
//! ```text
//! RASTERLAB 2D SCENE FORMAT
//! TYPE:polygon
//! NAME:polygon (0)
//! OUTLINE_COLOR:0:0:0
//! FILLING_COLOR:255:0:0
//! FILLING_ALG:1
//! CURVE_TYPE:0
//! LAYER:0
//! POINTS:3
//! 10:10
//! 50:10
//! 10:50
//!
//! ```
//!
//! Curve points carry their handle as a second pair: `x:y:hx:hy`. Loading is
//! all-or-nothing. Loaded layers are renumbered `0..n` in paint order.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use super::{Object2D, ObjectKind, Scene};
use crate::context::{CurveKind, FillAlgorithm};
use crate::display::Color;
use crate::error::{Result, SceneFormatError};
use crate::geometry::Point;
use crate::raster::CurvePoint;

pub const SCENE_HEADER: &str = "RASTERLAB 2D SCENE FORMAT";

/// Header of scenes saved by the older viewer; same stanza layout
pub const LEGACY_SCENE_HEADER: &str = "MODELVIEWER 2D SCENE FORMAT";

// ============================================================================
// Writing
// ============================================================================

/// Serialize a scene, objects in paint order
pub fn write_scene(scene: &Scene) -> String {
    let mut out = String::new();
    out.push_str(SCENE_HEADER);
    out.push('\n');

    for object in scene.by_layer() {
        let color = |c: Color| format!("{}:{}:{}", c.r, c.g, c.b);
        // Writing into a String cannot fail
        let _ = writeln!(out, "TYPE:{}", object.kind.keyword());
        let _ = writeln!(out, "NAME:{}", object.name);
        let _ = writeln!(out, "OUTLINE_COLOR:{}", color(object.outline));
        let _ = writeln!(out, "FILLING_COLOR:{}", color(object.fill));
        let _ = writeln!(out, "FILLING_ALG:{}", object.fill_algorithm.code());
        let _ = writeln!(out, "CURVE_TYPE:{}", object.curve_kind.code());
        let _ = writeln!(out, "LAYER:{}", object.layer);
        if object.kind == ObjectKind::Curve {
            let _ = writeln!(out, "POINTS:{}", object.curve_points.len());
            for cp in &object.curve_points {
                let _ = writeln!(
                    out,
                    "{}:{}:{}:{}",
                    cp.point.x, cp.point.y, cp.handle.x, cp.handle.y
                );
            }
        } else {
            let _ = writeln!(out, "POINTS:{}", object.points.len());
            for p in &object.points {
                let _ = writeln!(out, "{}:{}", p.x, p.y);
            }
        }
        out.push('\n');
    }
    out
}

pub fn save_scene(scene: &Scene, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, write_scene(scene))?;
    log::info!("saved {} objects to {}", scene.len(), path.display());
    Ok(())
}

// ============================================================================
// Reading
// ============================================================================

struct Cursor<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    last_line: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
            last_line: 0,
        }
    }

    /// Next line with its 1-based number, `\r` stripped
    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        let (i, line) = self.lines.next()?;
        self.last_line = i + 1;
        Some((i + 1, line.trim_end_matches('\r')))
    }

    fn require(&mut self) -> std::result::Result<(usize, &'a str), SceneFormatError> {
        self.next_line().ok_or(SceneFormatError::UnexpectedEof)
    }

    /// Read `KEY:value` and return the raw value
    fn keyed(&mut self, key: &'static str) -> std::result::Result<(usize, &'a str), SceneFormatError> {
        let (line, text) = self.require()?;
        match text.split_once(':') {
            Some((k, value)) if k == key => Ok((line, value)),
            _ => Err(SceneFormatError::UnexpectedKey {
                line,
                expected: key,
                found: text.to_string(),
            }),
        }
    }

    /// Read `KEY:f1:f2:...` with exactly `count` numeric fields
    fn keyed_numbers<N: std::str::FromStr>(
        &mut self,
        key: &'static str,
        count: usize,
    ) -> std::result::Result<(usize, Vec<N>), SceneFormatError> {
        let (line, value) = self.keyed(key)?;
        let numbers = numbers(line, key, value, count)?;
        Ok((line, numbers))
    }
}

fn numbers<N: std::str::FromStr>(
    line: usize,
    key: &'static str,
    value: &str,
    count: usize,
) -> std::result::Result<Vec<N>, SceneFormatError> {
    let fields: Vec<&str> = value.split(':').collect();
    if fields.len() != count {
        return Err(SceneFormatError::FieldCount {
            line,
            key,
            expected: count,
            found: fields.len(),
        });
    }
    fields
        .iter()
        .map(|f| {
            f.trim().parse::<N>().map_err(|_| SceneFormatError::NotANumber {
                line,
                value: (*f).to_string(),
            })
        })
        .collect()
}

fn color(fields: &[u8]) -> Color {
    Color::rgb(fields[0], fields[1], fields[2])
}

fn parse_object(
    cursor: &mut Cursor,
    type_line: usize,
    type_value: &str,
) -> std::result::Result<Object2D, SceneFormatError> {
    let kind = ObjectKind::from_keyword(type_value).ok_or_else(|| {
        SceneFormatError::UnknownType {
            line: type_line,
            value: type_value.to_string(),
        }
    })?;

    let (_, name) = cursor.keyed("NAME")?;
    let (_, outline) = cursor.keyed_numbers::<u8>("OUTLINE_COLOR", 3)?;
    let (_, fill) = cursor.keyed_numbers::<u8>("FILLING_COLOR", 3)?;

    let (line, code) = cursor.keyed_numbers::<i32>("FILLING_ALG", 1)?;
    let fill_algorithm =
        FillAlgorithm::from_code(code[0]).ok_or(SceneFormatError::UnknownSelector {
            line,
            selector: "FILLING_ALG",
            code: code[0],
        })?;

    let (line, code) = cursor.keyed_numbers::<i32>("CURVE_TYPE", 1)?;
    let curve_kind = CurveKind::from_code(code[0]).ok_or(SceneFormatError::UnknownSelector {
        line,
        selector: "CURVE_TYPE",
        code: code[0],
    })?;

    let (_, layer) = cursor.keyed_numbers::<i32>("LAYER", 1)?;
    let (count_line, count) = cursor.keyed_numbers::<usize>("POINTS", 1)?;
    let count = count[0];

    if matches!(kind, ObjectKind::Line | ObjectKind::Circle) && count != 2 {
        return Err(SceneFormatError::PointCount {
            line: count_line,
            kind: kind.keyword(),
            found: count,
        });
    }

    let mut points = Vec::new();
    let mut curve_points = Vec::new();
    for _ in 0..count {
        let (line, text) = cursor.require()?;
        if kind == ObjectKind::Curve {
            let v = numbers::<i32>(line, "POINTS", text, 4)?;
            curve_points.push(CurvePoint::new(Point::new(v[0], v[1]), Point::new(v[2], v[3])));
        } else {
            let v = numbers::<i32>(line, "POINTS", text, 2)?;
            points.push(Point::new(v[0], v[1]));
        }
    }

    match cursor.next_line() {
        Some((_, "")) => {},
        Some((line, _)) => return Err(SceneFormatError::MissingTerminator { line }),
        None => {
            return Err(SceneFormatError::MissingTerminator {
                line: cursor.last_line + 1,
            })
        },
    }

    Ok(Object2D {
        kind,
        name: name.to_string(),
        points,
        curve_points,
        outline: color(&outline),
        fill: color(&fill),
        fill_algorithm,
        curve_kind,
        layer: layer[0],
    })
}

/// Parse a whole scene; the first problem rejects the file
pub fn parse_scene(text: &str) -> std::result::Result<Scene, SceneFormatError> {
    let mut cursor = Cursor::new(text);
    match cursor.next_line() {
        Some((_, header)) if header == SCENE_HEADER || header == LEGACY_SCENE_HEADER => {},
        _ => return Err(SceneFormatError::Header),
    }

    let mut scene = Scene::new();
    while let Some((line, text)) = cursor.next_line() {
        let type_value = match text.split_once(':') {
            Some(("TYPE", value)) => value,
            _ => {
                return Err(SceneFormatError::UnexpectedKey {
                    line,
                    expected: "TYPE",
                    found: text.to_string(),
                })
            },
        };
        let object = parse_object(&mut cursor, line, type_value)?;
        let name = object.name.clone();
        if !scene.insert_raw(object) {
            return Err(SceneFormatError::DuplicateName { line, name });
        }
    }
    scene.normalize_layers();
    Ok(scene)
}

/// Read a scene file. On error nothing is returned, so the caller's current
/// scene stays as it was.
pub fn load_scene(path: impl AsRef<Path>) -> Result<Scene> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    match parse_scene(&text) {
        Ok(scene) => {
            log::info!("loaded {} objects from {}", scene.len(), path.display());
            Ok(scene)
        },
        Err(e) => {
            log::warn!("rejected scene file {}: {}", path.display(), e);
            Err(e.into())
        },
    }
}
