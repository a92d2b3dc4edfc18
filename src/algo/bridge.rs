//! Loop bridging.
//!
//! Stitches two rings or two edges of existing geometry together with quads.
//! This is how tube walls, struts and the rim of a solidified shell are built.
//!
//! No orientation correction happens here. Passing edges in the wrong
//! relative order produces an inward-facing quad; keeping loops consistently
//! oriented is up to the caller.

use crate::error::{MeshError, Result};
use crate::mesh::{DirectedEdge, Face, FaceId, Mesh, VertexId};

/// Add the quad `(a.from, a.to, b.from, b.to)` to the mesh.
///
/// For the quad to be consistent with faces already bordering `a`, `a` should
/// be a boundary edge in the direction its neighboring face does *not* use,
/// and `b` should run the opposite way to `a` along the other loop.
///
/// # Example
///
/// ```
/// use trellis::algo::bridge::bridge_edges;
/// use trellis::mesh::{DirectedEdge, Mesh};
/// use nalgebra::Point3;
///
/// let mut mesh = Mesh::new();
/// for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]] {
///     mesh.add_vertex(Point3::from(p));
/// }
/// let face = bridge_edges(&mut mesh, DirectedEdge::new(0usize, 1usize), DirectedEdge::new(2usize, 3usize)).unwrap();
/// assert_eq!(mesh.face(face).len(), 4);
/// ```
pub fn bridge_edges(mesh: &mut Mesh, a: DirectedEdge, b: DirectedEdge) -> Result<FaceId> {
    mesh.insert_face(Face::new([a.from(), a.to(), b.from(), b.to()]))
}

/// Bridge two vertex loops of equal length with a strip of quads.
///
/// Quad `i` is `(a[i], a[i + 1], b[i + 1], b[i])`. With `closed` the strip
/// wraps around and `a.len()` quads are added; otherwise `a.len() - 1`.
/// Returns the new faces in order.
pub fn bridge_loops(
    mesh: &mut Mesh,
    a: &[VertexId],
    b: &[VertexId],
    closed: bool,
) -> Result<Vec<FaceId>> {
    if a.len() != b.len() {
        return Err(MeshError::LoopMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    let n = a.len();
    let min_len = if closed { 3 } else { 2 };
    if n < min_len {
        return Err(MeshError::invalid_param(
            "loop length",
            n,
            "too short to bridge",
        ));
    }

    let quads = if closed { n } else { n - 1 };
    let mut faces = Vec::with_capacity(quads);
    for i in 0..quads {
        let j = (i + 1) % n;
        let left = DirectedEdge::try_new(a[i], a[j])?;
        let right = DirectedEdge::try_new(b[j], b[i])?;
        faces.push(bridge_edges(mesh, left, right)?);
    }

    log::debug!("bridge_loops: {} quads (closed: {})", faces.len(), closed);
    Ok(faces)
}
