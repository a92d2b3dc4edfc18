//! Half-edge navigation over plain index arrays.
//!
//! [`AdjacencyIndex`] gives half-edge style O(1) adjacency queries without
//! storing twin/next/prev links. It is an arena-side table built from a
//! [`Mesh`] snapshot:
//!
//! - every directed edge `(from, to)` maps to the face that owns it and the
//!   corner it starts at;
//! - every vertex maps to one outgoing directed edge (the first registered).
//!
//! The twin of an edge is found by looking up its reverse, and the next edge
//! of a face by reading the face's index loop one corner further along.
//!
//! # Rotating around a vertex
//!
//! [`AdjacencyIndex::next_around_vertex`] takes an outgoing edge `(v, w)`,
//! finds the face owning `(w, v)` and returns the edge following `(w, v)` in
//! that face, which again starts at `v`. Repeating this visits the whole fan
//! of faces around `v`, clockwise when faces are wound counter-clockwise.
//!
//! The walk only closes on a closed 2-manifold. On open or non-manifold input
//! a lookup comes back empty or the cycle never returns to its start, so
//! [`AdjacencyIndex::vertex_fan`] reports both as errors instead of looping.
//!
//! # Staleness
//!
//! The index borrows the mesh it was built from, so the mesh cannot be edited
//! while the index is alive. Rebuild it after structural edits.

use std::collections::HashMap;

use super::edge::DirectedEdge;
use super::index::{FaceId, VertexId};
use super::store::Mesh;
use crate::error::{MeshError, Result};

/// Face and starting corner of a directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EdgeSlot {
    face: FaceId,
    corner: u32,
}

/// Directed-edge → face table with one outgoing edge per vertex.
#[derive(Debug, Clone)]
pub struct AdjacencyIndex<'m> {
    mesh: &'m Mesh,
    owners: HashMap<DirectedEdge, EdgeSlot>,
    outgoing: Vec<Option<DirectedEdge>>,
    out_degree: Vec<u32>,
    duplicates: Vec<DirectedEdge>,
}

impl<'m> AdjacencyIndex<'m> {
    /// Build the index in O(V + F).
    ///
    /// A directed edge that occurs in more than one face keeps its first owner;
    /// the repeats are remembered and make [`validate_closed_manifold`]
    /// fail.
    ///
    /// [`validate_closed_manifold`]: AdjacencyIndex::validate_closed_manifold
    pub fn build(mesh: &'m Mesh) -> Self {
        let num_halfedges: usize = mesh.faces().iter().map(|f| f.len()).sum();
        let mut owners = HashMap::with_capacity(num_halfedges);
        let mut outgoing = vec![None; mesh.num_vertices()];
        let mut out_degree = vec![0u32; mesh.num_vertices()];
        let mut duplicates = Vec::new();

        for (fi, face) in mesh.faces().iter().enumerate() {
            let face_id = FaceId::new(fi);
            for (corner, edge) in face.edges().enumerate() {
                let slot = EdgeSlot {
                    face: face_id,
                    corner: corner as u32,
                };
                if owners.contains_key(&edge) {
                    duplicates.push(edge);
                    continue;
                }
                owners.insert(edge, slot);
                let from = edge.from().index();
                out_degree[from] += 1;
                if outgoing[from].is_none() {
                    outgoing[from] = Some(edge);
                }
            }
        }

        log::trace!(
            "adjacency index: {} directed edges, {} duplicates",
            owners.len(),
            duplicates.len()
        );

        Self {
            mesh,
            owners,
            outgoing,
            out_degree,
            duplicates,
        }
    }

    /// The mesh this index was built from.
    pub fn mesh(&self) -> &'m Mesh {
        self.mesh
    }

    /// Number of registered directed edges.
    pub fn num_directed_edges(&self) -> usize {
        self.owners.len()
    }

    /// One directed edge starting at `v`, the first one seen while building.
    /// `None` for a vertex no face references.
    #[inline]
    pub fn outgoing(&self, v: VertexId) -> Option<DirectedEdge> {
        self.outgoing[v.index()]
    }

    /// The face owning `edge`, or `None` for a boundary or unknown edge.
    #[inline]
    pub fn face_of(&self, edge: DirectedEdge) -> Option<FaceId> {
        self.owners.get(&edge).map(|slot| slot.face)
    }

    /// The edge after `edge` in its owning face.
    pub fn next_in_face(&self, edge: DirectedEdge) -> Option<DirectedEdge> {
        let slot = self.owners.get(&edge)?;
        let face = self.mesh.face(slot.face);
        let next = slot.corner as usize + 1;
        Some(DirectedEdge::new(face.corner(next), face.corner(next + 1)))
    }

    /// The edge before `edge` in its owning face.
    pub fn prev_in_face(&self, edge: DirectedEdge) -> Option<DirectedEdge> {
        let slot = self.owners.get(&edge)?;
        let face = self.mesh.face(slot.face);
        let n = face.len();
        let prev = slot.corner as usize + n - 1;
        Some(DirectedEdge::new(face.corner(prev), face.corner(prev + 1)))
    }

    /// Rotate one step around `edge.from()`: the edge following the reverse
    /// of `edge` within the face that owns the reverse.
    ///
    /// `None` when the reverse edge has no owner (boundary or non-manifold).
    #[inline]
    pub fn next_around_vertex(&self, edge: DirectedEdge) -> Option<DirectedEdge> {
        self.next_in_face(edge.reversed())
    }

    /// True if no face owns the reverse of `edge`.
    #[inline]
    pub fn is_boundary_edge(&self, edge: DirectedEdge) -> bool {
        !self.owners.contains_key(&edge.reversed())
    }

    /// Every directed edge with no reverse partner, in face order.
    pub fn boundary_edges(&self) -> Vec<DirectedEdge> {
        self.mesh
            .directed_edges()
            .map(|(_, e)| e)
            .filter(|&e| self.is_boundary_edge(e))
            .collect()
    }

    /// Directed edges that were found in more than one face.
    pub fn duplicate_edges(&self) -> &[DirectedEdge] {
        &self.duplicates
    }

    /// Walk the full cycle of outgoing edges around `v`, starting at
    /// [`outgoing(v)`](AdjacencyIndex::outgoing).
    ///
    /// Fails with [`MeshError::OpenFan`] on a missing reverse edge, with
    /// [`MeshError::IsolatedVertex`] for an unreferenced vertex, and with
    /// [`MeshError::NonManifold`] if the walk does not return to its start
    /// within the number of outgoing edges of `v`.
    pub fn vertex_fan(&self, v: VertexId) -> Result<Vec<DirectedEdge>> {
        let start = self
            .outgoing(v)
            .ok_or(MeshError::IsolatedVertex { vertex: v.index() })?;
        let limit = self.out_degree[v.index()] as usize;

        let mut fan = Vec::with_capacity(limit);
        let mut edge = start;
        loop {
            fan.push(edge);
            let reverse = edge.reversed();
            edge = self.next_around_vertex(edge).ok_or(MeshError::OpenFan {
                vertex: v.index(),
                from: reverse.from().index(),
                to: reverse.to().index(),
            })?;
            if edge == start {
                break;
            }
            if fan.len() >= limit {
                return Err(MeshError::NonManifold {
                    details: format!(
                        "faces around vertex {} do not form a single cycle",
                        v.index()
                    ),
                });
            }
        }

        if fan.len() != limit {
            return Err(MeshError::NonManifold {
                details: format!(
                    "vertex {} has {} outgoing edges but its fan cycle has {}",
                    v.index(),
                    limit,
                    fan.len()
                ),
            });
        }
        Ok(fan)
    }

    /// Number of edges around `v` in a closed manifold neighborhood.
    pub fn valence(&self, v: VertexId) -> Result<usize> {
        self.vertex_fan(v).map(|fan| fan.len())
    }

    /// Check that every vertex fan forms exactly one closed cycle.
    ///
    /// This is the precondition of dual construction and the other operators
    /// that walk around vertices.
    pub fn validate_closed_manifold(&self) -> Result<()> {
        if let Some(edge) = self.duplicates.first() {
            return Err(MeshError::NonManifold {
                details: format!(
                    "directed edge ({}, {}) is owned by more than one face",
                    edge.from(),
                    edge.to()
                ),
            });
        }
        for v in self.mesh.vertex_ids() {
            self.vertex_fan(v)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn cube() -> Mesh {
        let positions = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        let faces = [
            [0usize, 3, 2, 1],
            [4, 5, 6, 7],
            [0, 1, 5, 4],
            [2, 3, 7, 6],
            [0, 4, 7, 3],
            [1, 2, 6, 5],
        ];
        Mesh::from_polygons(&positions, &faces).unwrap()
    }

    fn e(a: usize, b: usize) -> DirectedEdge {
        DirectedEdge::new(a, b)
    }

    #[test]
    fn test_outgoing_is_first_registered() {
        let mesh = cube();
        let index = AdjacencyIndex::build(&mesh);
        assert_eq!(index.outgoing(VertexId::new(0)), Some(e(0, 3)));
        assert_eq!(index.outgoing(VertexId::new(4)), Some(e(4, 5)));
        assert_eq!(index.num_directed_edges(), 24);
    }

    #[test]
    fn test_face_of() {
        let mesh = cube();
        let index = AdjacencyIndex::build(&mesh);
        assert_eq!(index.face_of(e(0, 3)), Some(FaceId::new(0)));
        assert_eq!(index.face_of(e(3, 0)), Some(FaceId::new(4)));
        assert_eq!(index.face_of(e(0, 6)), None);
    }

    #[test]
    fn test_next_around_vertex_stays_on_vertex() {
        let mesh = cube();
        let index = AdjacencyIndex::build(&mesh);
        let start = e(0, 3);
        // (3,0) lives in face 4 = [0, 4, 7, 3]; the edge after it is (0, 4).
        let next = index.next_around_vertex(start).unwrap();
        assert_eq!(next, e(0, 4));
        assert_eq!(next.from(), start.from());
    }

    #[test]
    fn test_vertex_fan_closes() {
        let mesh = cube();
        let index = AdjacencyIndex::build(&mesh);
        for v in mesh.vertex_ids() {
            let fan = index.vertex_fan(v).unwrap();
            assert_eq!(fan.len(), 3);
            assert!(fan.iter().all(|edge| edge.from() == v));
        }
        assert!(index.validate_closed_manifold().is_ok());
    }

    #[test]
    fn test_open_fan_is_reported() {
        let mut mesh = cube();
        mesh.remove_face(FaceId::new(1));
        let index = AdjacencyIndex::build(&mesh);
        assert_eq!(index.boundary_edges().len(), 4);
        assert!(index.is_boundary_edge(e(5, 4)));
        let err = index.vertex_fan(VertexId::new(4)).unwrap_err();
        assert!(matches!(err, MeshError::OpenFan { vertex: 4, .. }));
        assert!(index.validate_closed_manifold().is_err());
    }

    #[test]
    fn test_duplicate_edges_fail_validation() {
        let mut mesh = cube();
        mesh.add_face([0usize, 3, 2, 1]).unwrap();
        let index = AdjacencyIndex::build(&mesh);
        assert_eq!(index.duplicate_edges().len(), 4);
        assert!(matches!(
            index.validate_closed_manifold(),
            Err(MeshError::NonManifold { .. })
        ));
    }

    #[test]
    fn test_two_cones_sharing_apex_is_non_manifold() {
        // Two tetrahedra glued at vertex 0 only: the fan around 0 is two cycles.
        let positions = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
            Point3::new(0.0, 0.0, -1.0),
        ];
        let faces = [
            [0usize, 2, 1],
            [0, 1, 3],
            [1, 2, 3],
            [2, 0, 3],
            [0, 5, 4],
            [0, 4, 6],
            [4, 5, 6],
            [5, 0, 6],
        ];
        let mesh = Mesh::from_polygons(&positions, &faces).unwrap();
        let index = AdjacencyIndex::build(&mesh);
        assert!(matches!(
            index.vertex_fan(VertexId::new(0)),
            Err(MeshError::NonManifold { .. })
        ));
    }

    #[test]
    fn test_isolated_vertex() {
        let mut mesh = cube();
        let v = mesh.add_vertex(Point3::new(5.0, 5.0, 5.0));
        let index = AdjacencyIndex::build(&mesh);
        assert_eq!(index.outgoing(v), None);
        assert_eq!(
            index.vertex_fan(v),
            Err(MeshError::IsolatedVertex { vertex: 8 })
        );
    }
}
