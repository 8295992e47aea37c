//! Half-edge boundary representation of polyhedral meshes.
//!
//! Vertices, half-edges and faces live in three arenas and refer to each
//! other through typed indices. A mesh is built once, by [`HalfEdgeMesh::from_polygons`],
//! the VTK loader or a generator, and rendering only ever reads it.

mod primitives;
mod vtk;

pub use primitives::{cube, uv_sphere};
pub use vtk::{load_vtk, parse_vtk, save_vtk, write_vtk, VTK_HEADER};

use std::collections::HashMap;

use crate::display::Color;
use crate::error::MeshError;
use crate::math3d::Vec3;
use crate::util::Rng;

/// Type-safe vertex identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub usize);

/// Type-safe half-edge identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HalfEdgeId(pub usize);

/// Type-safe face identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    /// One half-edge leaving this vertex, `None` for isolated vertices
    pub outgoing: Option<HalfEdgeId>,
}

/// One directed side of a face boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfEdge {
    pub origin: VertexId,
    pub face: FaceId,
    pub next: HalfEdgeId,
    pub prev: HalfEdgeId,
    /// The opposite half-edge of the neighbouring face, `None` on a boundary
    pub pair: Option<HalfEdgeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    /// Any half-edge of the boundary cycle
    pub half_edge: HalfEdgeId,
    pub color: Option<Color>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HalfEdgeMesh {
    vertices: Vec<Vertex>,
    half_edges: Vec<HalfEdge>,
    faces: Vec<Face>,
}

impl HalfEdgeMesh {
    /// Build a mesh from vertex positions and polygons given as vertex index
    /// lists. Each polygon corner becomes a half-edge; a half-edge `a -> b`
    /// is paired with the latest unpaired `b -> a`. A repeated directed edge
    /// replaces the earlier one as the pairing candidate, which then stays
    /// boundary.
    pub fn from_polygons(positions: Vec<Vec3>, polygons: &[Vec<usize>]) -> Result<Self, MeshError> {
        let vertex_count = positions.len();
        let mut vertices: Vec<Vertex> = positions
            .into_iter()
            .map(|position| Vertex {
                position,
                outgoing: None,
            })
            .collect();
        let mut half_edges: Vec<HalfEdge> = Vec::new();
        let mut faces = Vec::with_capacity(polygons.len());
        let mut open: HashMap<(usize, usize), HalfEdgeId> = HashMap::new();

        for (f, polygon) in polygons.iter().enumerate() {
            let k = polygon.len();
            if k < 3 {
                return Err(MeshError::DegenerateFace { face: f, count: k });
            }
            if let Some(&index) = polygon.iter().find(|&&i| i >= vertex_count) {
                return Err(MeshError::VertexOutOfRange {
                    face: f,
                    index,
                    count: vertex_count,
                });
            }

            let base = half_edges.len();
            let face = FaceId(f);
            for (j, &origin) in polygon.iter().enumerate() {
                half_edges.push(HalfEdge {
                    origin: VertexId(origin),
                    face,
                    next: HalfEdgeId(base + (j + 1) % k),
                    prev: HalfEdgeId(base + (j + k - 1) % k),
                    pair: None,
                });
                vertices[origin].outgoing.get_or_insert(HalfEdgeId(base + j));
            }

            for j in 0..k {
                let start = polygon[j];
                let end = polygon[(j + 1) % k];
                let id = HalfEdgeId(base + j);
                if let Some(twin) = open.remove(&(end, start)) {
                    half_edges[id.0].pair = Some(twin);
                    half_edges[twin.0].pair = Some(id);
                } else if let Some(shadowed) = open.insert((start, end), id) {
                    log::debug!(
                        "directed edge {} -> {} repeated; half-edge {} stays boundary",
                        start,
                        end,
                        shadowed.0
                    );
                }
            }

            faces.push(Face {
                half_edge: HalfEdgeId(base),
                color: None,
            });
        }

        Ok(Self {
            vertices,
            half_edges,
            faces,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn half_edge_count(&self) -> usize {
        self.half_edges.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn half_edges(&self) -> &[HalfEdge] {
        &self.half_edges
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0]
    }

    pub fn half_edge(&self, id: HalfEdgeId) -> &HalfEdge {
        &self.half_edges[id.0]
    }

    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id.0]
    }

    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> {
        (0..self.faces.len()).map(FaceId)
    }

    pub fn position(&self, id: VertexId) -> Vec3 {
        self.vertices[id.0].position
    }

    /// Vertex a half-edge points to
    pub fn destination(&self, id: HalfEdgeId) -> VertexId {
        self.half_edges[self.half_edges[id.0].next.0].origin
    }

    /// Walk the boundary cycle of a face
    pub fn face_half_edges(&self, face: FaceId) -> FaceCycle<'_> {
        let start = self.faces[face.0].half_edge;
        FaceCycle {
            mesh: self,
            start,
            current: Some(start),
            remaining: self.half_edges.len(),
            looped: false,
        }
    }

    pub fn face_vertices(&self, face: FaceId) -> Vec<VertexId> {
        self.face_half_edges(face)
            .map(|he| self.half_edges[he.0].origin)
            .collect()
    }

    /// Faces as vertex index lists, in face order
    pub fn polygons(&self) -> Vec<Vec<usize>> {
        self.face_ids()
            .map(|f| self.face_vertices(f).into_iter().map(|v| v.0).collect())
            .collect()
    }

    /// Unit normal from the first three corners (right-hand rule)
    pub fn face_normal(&self, face: FaceId) -> Vec3 {
        let corners = self.face_vertices(face);
        if corners.len() < 3 {
            return Vec3::zero();
        }
        let a = self.position(corners[0]);
        let b = self.position(corners[1]);
        let c = self.position(corners[2]);
        (b - a).cross(&(c - a)).normalize()
    }

    /// Number of mutually paired edges (each counted once)
    pub fn pair_count(&self) -> usize {
        self.half_edges.iter().filter(|he| he.pair.is_some()).count() / 2
    }

    /// Half-edges without a pair
    pub fn boundary_count(&self) -> usize {
        self.half_edges.iter().filter(|he| he.pair.is_none()).count()
    }

    /// Check the link invariants: `next`/`prev` are inverse, pairs are
    /// mutual and run the opposite way, and every face cycle closes on
    /// half-edges that belong to it
    pub fn validate(&self) -> bool {
        let n = self.half_edges.len();
        let links_ok = self.half_edges.iter().enumerate().all(|(i, he)| {
            he.next.0 < n
                && he.prev.0 < n
                && self.half_edges[he.next.0].prev.0 == i
                && self.half_edges[he.prev.0].next.0 == i
                && he.pair.map_or(true, |p| {
                    p.0 < n
                        && self.half_edges[p.0].pair == Some(HalfEdgeId(i))
                        && self.half_edges[p.0].origin == self.destination(HalfEdgeId(i))
                })
        });
        if !links_ok {
            return false;
        }
        self.face_ids().all(|f| {
            let mut cycle = self.face_half_edges(f);
            let all_owned = cycle.by_ref().all(|he| self.half_edges[he.0].face == f);
            all_owned && cycle.closed()
        })
    }

    /// Set or clear the color of one face
    pub fn set_face_color(&mut self, face: FaceId, color: Option<Color>) -> bool {
        match self.faces.get_mut(face.0) {
            Some(f) => {
                f.color = color;
                true
            },
            None => false,
        }
    }

    /// Give every face a reproducible random color
    pub fn randomize_face_colors(&mut self, seed: u64) {
        let mut rng = Rng::new(seed);
        for face in &mut self.faces {
            face.color = Some(rng.next_color());
        }
    }

    pub fn clear_face_colors(&mut self) {
        for face in &mut self.faces {
            face.color = None;
        }
    }
}

/// Iterator over the half-edges of one face, starting at the face's anchor
pub struct FaceCycle<'a> {
    mesh: &'a HalfEdgeMesh,
    start: HalfEdgeId,
    current: Option<HalfEdgeId>,
    /// Steps left before the walk is declared broken
    remaining: usize,
    looped: bool,
}

impl FaceCycle<'_> {
    /// Whether the walk came back to its start
    fn closed(&self) -> bool {
        self.looped
    }
}

impl Iterator for FaceCycle<'_> {
    type Item = HalfEdgeId;

    fn next(&mut self) -> Option<HalfEdgeId> {
        let current = self.current?;
        if self.remaining == 0 {
            self.current = None;
            return None;
        }
        self.remaining -= 1;
        let next = self.mesh.half_edges[current.0].next;
        if next == self.start {
            self.looped = true;
            self.current = None;
        } else {
            self.current = Some(next);
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_positions() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_two_triangles_share_one_pair() {
        let mesh =
            HalfEdgeMesh::from_polygons(square_positions(), &[vec![0, 1, 2], vec![0, 2, 3]]).unwrap();
        assert_eq!(mesh.half_edge_count(), 6);
        assert_eq!(mesh.pair_count(), 1);
        assert_eq!(mesh.boundary_count(), 4);

        let paired: Vec<(usize, &HalfEdge)> = mesh
            .half_edges()
            .iter()
            .enumerate()
            .filter(|(_, he)| he.pair.is_some())
            .collect();
        assert_eq!(paired.len(), 2);
        let (i, he) = paired[0];
        assert_eq!(mesh.half_edge(he.pair.unwrap()).pair, Some(HalfEdgeId(i)));
        assert!(mesh.validate());
    }

    #[test]
    fn test_face_cycle_closes() {
        let mesh = HalfEdgeMesh::from_polygons(square_positions(), &[vec![0, 1, 2, 3]]).unwrap();
        let cycle: Vec<HalfEdgeId> = mesh.face_half_edges(FaceId(0)).collect();
        assert_eq!(cycle.len(), 4);
        assert_eq!(mesh.polygons(), vec![vec![0, 1, 2, 3]]);
        for he in cycle {
            let e = mesh.half_edge(he);
            assert_eq!(mesh.half_edge(e.next).prev, he);
            assert_eq!(mesh.half_edge(e.prev).next, he);
        }
    }

    #[test]
    fn test_rejects_bad_faces() {
        assert_eq!(
            HalfEdgeMesh::from_polygons(square_positions(), &[vec![0, 1]]),
            Err(MeshError::DegenerateFace { face: 0, count: 2 })
        );
        assert_eq!(
            HalfEdgeMesh::from_polygons(square_positions(), &[vec![0, 1, 9]]),
            Err(MeshError::VertexOutOfRange {
                face: 0,
                index: 9,
                count: 4
            })
        );
    }

    #[test]
    fn test_repeated_directed_edge_stays_boundary() {
        let mesh = HalfEdgeMesh::from_polygons(
            square_positions(),
            &[vec![0, 1, 2], vec![0, 1, 3], vec![1, 0, 3]],
        )
        .unwrap();
        assert!(mesh.validate());
        // 1 -> 0 pairs with the second 0 -> 1; the first one is shadowed
        let first = HalfEdgeId(0);
        let second = HalfEdgeId(3);
        assert_eq!(mesh.half_edge(first).pair, None);
        assert_eq!(mesh.half_edge(second).pair, Some(HalfEdgeId(6)));
        assert_eq!(mesh.pair_count(), 3);
    }

    #[test]
    fn test_face_normal_follows_winding() {
        let mesh = HalfEdgeMesh::from_polygons(square_positions(), &[vec![0, 1, 2]]).unwrap();
        assert!(mesh.face_normal(FaceId(0)).approx_eq(&Vec3::new(0.0, 0.0, 1.0), 1e-9));
    }

    #[test]
    fn test_face_colors() {
        let mut mesh =
            HalfEdgeMesh::from_polygons(square_positions(), &[vec![0, 1, 2], vec![0, 2, 3]]).unwrap();
        assert!(mesh.set_face_color(FaceId(1), Some(Color::RED)));
        assert!(!mesh.set_face_color(FaceId(5), Some(Color::RED)));
        assert_eq!(mesh.face(FaceId(1)).color, Some(Color::RED));

        mesh.randomize_face_colors(7);
        assert!(mesh.faces().iter().all(|f| f.color.is_some()));
        mesh.clear_face_colors();
        assert!(mesh.faces().iter().all(|f| f.color.is_none()));
    }

    #[test]
    fn test_validate_catches_broken_links() {
        let mut mesh =
            HalfEdgeMesh::from_polygons(square_positions(), &[vec![0, 1, 2], vec![0, 2, 3]]).unwrap();
        mesh.half_edges[0].next = HalfEdgeId(0);
        assert!(!mesh.validate());
    }
}
