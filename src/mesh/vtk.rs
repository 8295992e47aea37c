//! Legacy VTK polydata, ASCII flavour.
//!
//! Only the subset the viewer writes is accepted: a fixed four-line header,
//! one `POINTS` block and one `POLYGONS` block. Any deviation rejects the
//! file and no mesh is produced.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use super::HalfEdgeMesh;
use crate::error::{MeshFormatError, Result};
use crate::math3d::Vec3;

pub const VTK_HEADER: [&str; 4] = [
    "#vtk DataFile Version 3.0",
    "vtk output",
    "ASCII",
    "DATASET POLYDATA",
];

pub fn write_vtk(mesh: &HalfEdgeMesh) -> String {
    let mut out = String::new();
    for line in VTK_HEADER {
        out.push_str(line);
        out.push('\n');
    }

    let _ = writeln!(out, "POINTS {} float", mesh.vertex_count());
    for v in mesh.vertices() {
        let _ = writeln!(out, "{} {} {}", v.position.x, v.position.y, v.position.z);
    }

    let polygons = mesh.polygons();
    let total: usize = polygons.iter().map(|p| p.len() + 1).sum();
    let _ = writeln!(out, "POLYGONS {} {}", polygons.len(), total);
    for polygon in &polygons {
        out.push_str(&polygon.len().to_string());
        for index in polygon {
            let _ = write!(out, " {}", index);
        }
        out.push('\n');
    }
    out
}

pub fn save_vtk(mesh: &HalfEdgeMesh, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, write_vtk(mesh))?;
    log::info!(
        "saved mesh with {} vertices and {} faces to {}",
        mesh.vertex_count(),
        mesh.face_count(),
        path.display()
    );
    Ok(())
}

struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> Lines<'a> {
    fn take(&mut self, section: &'static str) -> std::result::Result<(usize, &'a str), MeshFormatError> {
        self.inner
            .next()
            .map(|(i, l)| (i + 1, l.trim_end_matches('\r')))
            .ok_or(MeshFormatError::UnexpectedEof { section })
    }
}

fn number<N: std::str::FromStr>(line: usize, token: &str) -> std::result::Result<N, MeshFormatError> {
    token.parse().map_err(|_| MeshFormatError::NotANumber {
        line,
        value: token.to_string(),
    })
}

/// `KEYWORD <count> <third>` block header
fn block_header<'a>(
    lines: &mut Lines<'a>,
    keyword: &'static str,
) -> std::result::Result<(usize, usize, &'a str), MeshFormatError> {
    let (line, text) = lines.take(keyword)?;
    let tokens: Vec<&str> = text.split_whitespace().collect();
    match tokens.as_slice() {
        [k, count, third] if *k == keyword => Ok((line, number(line, count)?, *third)),
        _ => Err(MeshFormatError::Malformed {
            line,
            section: keyword,
            found: text.to_string(),
        }),
    }
}

/// Spaced version line written by the VTK library itself; accepted on load
const VTK_VERSION_SPACED: &str = "# vtk DataFile Version 3.0";

pub fn parse_vtk(text: &str) -> std::result::Result<HalfEdgeMesh, MeshFormatError> {
    let mut lines = Lines {
        inner: text.lines().enumerate(),
    };

    for (i, expected) in VTK_HEADER.into_iter().enumerate() {
        let (line, found) = lines.take("header")?;
        if found != expected && !(i == 0 && found == VTK_VERSION_SPACED) {
            return Err(MeshFormatError::Header {
                line,
                expected,
                found: found.to_string(),
            });
        }
    }

    let (line, point_count, kind) = block_header(&mut lines, "POINTS")?;
    if kind != "float" && kind != "int" {
        return Err(MeshFormatError::Malformed {
            line,
            section: "POINTS",
            found: kind.to_string(),
        });
    }

    let mut positions = Vec::with_capacity(point_count);
    for _ in 0..point_count {
        let (line, text) = lines.take("POINTS")?;
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let [x, y, z] = tokens.as_slice() else {
            return Err(MeshFormatError::Malformed {
                line,
                section: "POINTS",
                found: text.to_string(),
            });
        };
        positions.push(Vec3::new(number(line, x)?, number(line, y)?, number(line, z)?));
    }

    let (line, polygon_count, total) = block_header(&mut lines, "POLYGONS")?;
    let declared: usize = number(line, total)?;

    let mut polygons = Vec::with_capacity(polygon_count);
    let mut actual = 0;
    for _ in 0..polygon_count {
        let (line, text) = lines.take("POLYGONS")?;
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let malformed = || MeshFormatError::Malformed {
            line,
            section: "POLYGONS",
            found: text.to_string(),
        };
        if tokens.len() < 4 {
            return Err(malformed());
        }
        let k: usize = number(line, tokens[0])?;
        if tokens.len() != k + 1 {
            return Err(malformed());
        }
        let mut polygon = Vec::with_capacity(k);
        for token in &tokens[1..] {
            let index: usize = number(line, token)?;
            if index >= point_count {
                return Err(MeshFormatError::IndexOutOfRange {
                    line,
                    index,
                    count: point_count,
                });
            }
            polygon.push(index);
        }
        actual += k + 1;
        polygons.push(polygon);
    }

    if actual != declared {
        return Err(MeshFormatError::TotalMismatch { declared, actual });
    }

    Ok(HalfEdgeMesh::from_polygons(positions, &polygons)?)
}

pub fn load_vtk(path: impl AsRef<Path>) -> Result<HalfEdgeMesh> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    match parse_vtk(&text) {
        Ok(mesh) => {
            log::info!(
                "loaded {} ({} vertices, {} faces, {} shared edges)",
                path.display(),
                mesh.vertex_count(),
                mesh.face_count(),
                mesh.pair_count()
            );
            Ok(mesh)
        },
        Err(e) => {
            log::warn!("rejected mesh file {}: {}", path.display(), e);
            Err(e.into())
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TETRA: &str = "#vtk DataFile Version 3.0\n\
                         vtk output\n\
                         ASCII\n\
                         DATASET POLYDATA\n\
                         POINTS 4 float\n\
                         0 0 0\n\
                         1 0 0\n\
                         0 1 0\n\
                         0 0 1\n\
                         POLYGONS 4 16\n\
                         3 0 2 1\n\
                         3 0 1 3\n\
                         3 1 2 3\n\
                         3 2 0 3\n";

    #[test]
    fn test_parse_closed_tetrahedron() {
        let mesh = parse_vtk(TETRA).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 4);
        assert_eq!(mesh.pair_count(), 6);
        assert_eq!(mesh.boundary_count(), 0);
        assert!(mesh.validate());
    }

    #[test]
    fn test_write_matches_input() {
        let mesh = parse_vtk(TETRA).unwrap();
        assert_eq!(write_vtk(&mesh), TETRA);
    }

    #[test]
    fn test_header_versions() {
        assert!(TETRA.starts_with(VTK_HEADER[0]));
        let spaced = TETRA.replacen("#vtk", "# vtk", 1);
        assert_eq!(parse_vtk(&spaced).unwrap(), parse_vtk(TETRA).unwrap());

        for (from, to) in [
            ("#vtk DataFile Version 3.0", "#vtk DataFile Version 2.0"),
            ("vtk output", "vtk"),
            ("ASCII", "BINARY"),
            ("DATASET POLYDATA", "DATASET UNSTRUCTURED_GRID"),
        ] {
            let text = TETRA.replacen(from, to, 1);
            assert!(
                matches!(parse_vtk(&text), Err(MeshFormatError::Header { .. })),
                "accepted {:?}",
                to
            );
        }
    }

    /// Cube as saved by the older viewer: its face list reuses directed edges
    const LEGACY_CUBE: &str = "#vtk DataFile Version 3.0\n\
                               vtk output\n\
                               ASCII\n\
                               DATASET POLYDATA\n\
                               POINTS 8 float\n\
                               0 0 0\n\
                               0 100 0\n\
                               100 100 0\n\
                               100 0 0\n\
                               0 0 100\n\
                               0 100 100\n\
                               100 100 100\n\
                               100 0 100\n\
                               POLYGONS 12 48\n\
                               3 0 1 3\n\
                               3 1 2 3\n\
                               3 0 1 5\n\
                               3 0 4 5\n\
                               3 0 3 4\n\
                               3 3 7 4\n\
                               3 3 2 7\n\
                               3 2 6 7\n\
                               3 1 5 6\n\
                               3 2 1 6\n\
                               3 4 7 5\n\
                               3 5 7 6\n";

    #[test]
    fn test_loads_cube_with_repeated_edges() {
        let mesh = parse_vtk(LEGACY_CUBE).unwrap();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 12);
        assert_eq!(mesh.pair_count(), 15);
        assert_eq!(mesh.boundary_count(), 6);
        assert!(mesh.validate());
        assert_eq!(write_vtk(&mesh), LEGACY_CUBE);
    }

    #[test]
    fn test_rejections() {
        let cases = [
            ("POINTS 4 float", "POINTS four float"),
            ("POINTS 4 float", "POINTS 4 double"),
            ("0 0 1\n", "0 0\n"),
            ("1 0 0\n", "1 x 0\n"),
            ("3 0 2 1", "3 0 2"),
            ("3 0 2 1", "4 0 2 1"),
            ("3 0 2 1", "3 0 2 7"),
            ("POLYGONS 4 16", "POLYGONS 4 15"),
        ];
        for (from, to) in cases {
            let text = TETRA.replacen(from, to, 1);
            assert!(parse_vtk(&text).is_err(), "accepted {:?} -> {:?}", from, to);
        }
    }

    #[test]
    fn test_premature_end() {
        let text: String = TETRA.lines().take(12).map(|l| format!("{}\n", l)).collect();
        assert_eq!(
            parse_vtk(&text),
            Err(MeshFormatError::UnexpectedEof { section: "POLYGONS" })
        );
    }

    #[test]
    fn test_repeated_edge_is_not_an_error() {
        let text = TETRA.replacen("3 0 1 3", "3 0 2 3", 1);
        let mesh = parse_vtk(&text).unwrap();
        assert!(mesh.validate());
        assert!(mesh.boundary_count() > 0);
    }
}
