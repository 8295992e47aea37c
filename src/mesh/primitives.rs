use std::f64::consts::PI;

use super::HalfEdgeMesh;
use crate::error::MeshError;
use crate::math3d::Vec3;

/// Triangles of the unit cube, wound so every shared edge pairs up
const CUBE_TRIANGLES: [[usize; 3]; 12] = [
    [0, 1, 2],
    [0, 2, 3],
    [4, 7, 6],
    [4, 6, 5],
    [1, 0, 4],
    [1, 4, 5],
    [3, 2, 6],
    [3, 6, 7],
    [0, 3, 7],
    [0, 7, 4],
    [2, 1, 5],
    [2, 5, 6],
];

/// Axis-aligned cube with one corner at the origin and edge length `edge`
pub fn cube(edge: f64) -> HalfEdgeMesh {
    let d = edge;
    let positions = vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(0.0, d, 0.0),
        Vec3::new(d, d, 0.0),
        Vec3::new(d, 0.0, 0.0),
        Vec3::new(0.0, 0.0, d),
        Vec3::new(0.0, d, d),
        Vec3::new(d, d, d),
        Vec3::new(d, 0.0, d),
    ];
    let polygons: Vec<Vec<usize>> = CUBE_TRIANGLES.iter().map(|t| t.to_vec()).collect();
    // The fixed index table is a closed manifold, construction cannot fail
    HalfEdgeMesh::from_polygons(positions, &polygons).unwrap_or_default()
}

/// UV sphere centred on the origin.
///
/// `longitude` slices around the z axis, `latitude` stacks from pole to
/// pole. The poles are single vertices; every other ring holds `longitude`
/// vertices. Produces `2 * longitude * (latitude - 1)` triangles.
pub fn uv_sphere(radius: f64, longitude: usize, latitude: usize) -> Result<HalfEdgeMesh, MeshError> {
    if longitude < 3 || latitude < 2 {
        return Err(MeshError::DegenerateFace {
            face: 0,
            count: longitude.min(latitude),
        });
    }

    let rings = latitude - 1;
    let mut positions = Vec::with_capacity(rings * longitude + 2);
    positions.push(Vec3::new(0.0, 0.0, radius));
    for i in 0..rings {
        let theta = PI / 2.0 - (i + 1) as f64 * PI / latitude as f64;
        for j in 0..longitude {
            let phi = j as f64 * 2.0 * PI / longitude as f64;
            positions.push(Vec3::new(
                radius * theta.cos() * phi.cos(),
                radius * theta.cos() * phi.sin(),
                radius * theta.sin(),
            ));
        }
    }
    let south = positions.len();
    positions.push(Vec3::new(0.0, 0.0, -radius));

    let ring = |i: usize, j: usize| 1 + i * longitude + j % longitude;
    let mut polygons = Vec::with_capacity(2 * longitude * rings);

    for j in 0..longitude {
        polygons.push(vec![0, ring(0, j), ring(0, j + 1)]);
    }
    for i in 0..rings - 1 {
        for j in 0..longitude {
            let a = ring(i, j);
            let b = ring(i, j + 1);
            let c = ring(i + 1, j + 1);
            let d = ring(i + 1, j);
            polygons.push(vec![b, a, d]);
            polygons.push(vec![b, d, c]);
        }
    }
    for j in 0..longitude {
        polygons.push(vec![ring(rings - 1, j + 1), ring(rings - 1, j), south]);
    }

    HalfEdgeMesh::from_polygons(positions, &polygons)
}
