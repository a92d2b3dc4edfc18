//! Dual polyhedron construction.
//!
//! Swaps the roles of vertices and faces: every face of the input becomes a
//! vertex at its centroid, and every vertex becomes a face joining the
//! centroids of the faces around it.
//!
//! The fan around a vertex is walked with
//! [`AdjacencyIndex::next_around_vertex`], which turns clockwise when seen
//! from outside a counter-clockwise mesh. The collected loop is reversed so
//! the dual keeps outward orientation.
//!
//! Applying the construction twice gives back the original vertex and face
//! counts, but not the original positions.

use crate::error::{MeshError, Result};
use crate::mesh::{AdjacencyIndex, DirectedEdge, Face, FaceId, Mesh, VertexId};

/// Build the dual of a closed manifold mesh.
///
/// Fails with [`MeshError::OpenFan`], [`MeshError::NonManifold`] or
/// [`MeshError::IsolatedVertex`] if any vertex fan is not a single closed
/// cycle. Face tags are not carried over.
///
/// # Example
///
/// ```
/// use trellis::algo::dual::dual;
/// use trellis::seed::{Cube, Generator};
///
/// let octahedron = dual(&Cube::default().produce()).unwrap();
/// assert_eq!(octahedron.num_vertices(), 6);
/// assert_eq!(octahedron.num_faces(), 8);
/// ```
pub fn dual(mesh: &Mesh) -> Result<Mesh> {
    let index = AdjacencyIndex::build(mesh);
    let cycles = vertex_cycles(&index)?;

    let mut out = Mesh::with_capacity(mesh.num_faces(), mesh.num_vertices());
    out.vertices.extend(mesh.face_ids().map(|f| mesh.face_centroid(f)));

    for cycle in &cycles {
        let corners = cycle
            .iter()
            .map(|&edge| owner(&index, edge).map(|f| VertexId::new(f.index())))
            .collect::<Result<Vec<_>>>()?;
        out.push_face(Face::new(corners));
    }

    log::debug!(
        "dual: {}v/{}f -> {}v/{}f",
        mesh.num_vertices(),
        mesh.num_faces(),
        out.num_vertices(),
        out.num_faces()
    );
    Ok(out)
}

/// Outgoing edges around every vertex, in counter-clockwise order seen from
/// outside, after checking that the mesh is a closed manifold.
pub(crate) fn vertex_cycles(index: &AdjacencyIndex<'_>) -> Result<Vec<Vec<DirectedEdge>>> {
    index.validate_closed_manifold()?;
    index
        .mesh()
        .vertex_ids()
        .map(|v| {
            let mut fan = index.vertex_fan(v)?;
            fan.reverse();
            Ok(fan)
        })
        .collect()
}

/// The face owning `edge`, which must exist on a validated closed mesh.
pub(crate) fn owner(index: &AdjacencyIndex<'_>, edge: DirectedEdge) -> Result<FaceId> {
    index.face_of(edge).ok_or_else(|| MeshError::NonManifold {
        details: format!("directed edge ({}, {}) has no owning face", edge.from(), edge.to()),
    })
}
