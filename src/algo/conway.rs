//! Conway polyhedron operators.
//!
//! Each operator rebuilds a closed manifold from walks around its vertices
//! and faces, the same walk dual construction uses. Combined with the
//! Platonic seeds they give every Archimedean solid:
//!
//! | Solid                        | Construction          |
//! |------------------------------|-----------------------|
//! | truncated tetrahedron        | `truncate(T)`         |
//! | cuboctahedron                | `ambo(C)`             |
//! | truncated cube / octahedron  | `truncate(C / O)`     |
//! | rhombicuboctahedron          | `ambo(ambo(C))`       |
//! | truncated cuboctahedron      | `truncate(ambo(C))`   |
//! | snub cube                    | `snub(C)`             |
//!
//! and likewise for the dodecahedron and icosahedron.
//!
//! Only the topology is exact; positions are simple interpolations and are
//! not canonicalized into regular solids.

use std::collections::HashMap;

use nalgebra::Point3;

use super::dual::{dual, vertex_cycles};
use crate::error::{MeshError, Result};
use crate::mesh::{AdjacencyIndex, DirectedEdge, Face, Mesh, VertexId};

/// Rectification: one vertex at each edge midpoint, one face per original
/// face and one per original vertex.
pub fn ambo(mesh: &Mesh) -> Result<Mesh> {
    let index = AdjacencyIndex::build(mesh);
    let cycles = vertex_cycles(&index)?;

    let mut edge_ids: HashMap<(VertexId, VertexId), VertexId> = HashMap::new();
    let mut out = Mesh::with_capacity(mesh.num_edges(), mesh.num_faces() + mesh.num_vertices());
    for (_, edge) in mesh.directed_edges() {
        edge_ids.entry(edge.undirected()).or_insert_with(|| {
            let a = mesh.position(edge.from()).coords;
            let b = mesh.position(edge.to()).coords;
            out.add_vertex(Point3::from((a + b) * 0.5))
        });
    }
    let midpoint = |e: DirectedEdge| edge_ids[&e.undirected()];

    for face in mesh.faces() {
        out.push_face(Face::new(face.edges().map(midpoint)));
    }
    for cycle in &cycles {
        out.push_face(Face::new(cycle.iter().map(|&e| midpoint(e))));
    }

    log::debug!("ambo: {}v/{}f", out.num_vertices(), out.num_faces());
    Ok(out)
}

/// Corner cutting: every vertex is replaced by a small face whose corners lie
/// `ratio` of the way along each outgoing edge.
///
/// `ratio` must lie strictly between 0 and 0.5.
pub fn truncate(mesh: &Mesh, ratio: f64) -> Result<Mesh> {
    if !(ratio > 0.0 && ratio < 0.5) {
        return Err(MeshError::invalid_param("ratio", ratio, "must be in (0, 0.5)"));
    }
    let index = AdjacencyIndex::build(mesh);
    let cycles = vertex_cycles(&index)?;

    let mut out = Mesh::with_capacity(
        index.num_directed_edges(),
        mesh.num_faces() + mesh.num_vertices(),
    );
    let cut = edge_points(mesh, &mut out, ratio);

    for face in mesh.faces() {
        let corners = face.edges().flat_map(|e| [cut[&e], cut[&e.reversed()]]);
        out.push_face(Face::new(corners));
    }
    for cycle in &cycles {
        out.push_face(Face::new(cycle.iter().map(|e| cut[e])));
    }

    log::debug!("truncate({}): {}v/{}f", ratio, out.num_vertices(), out.num_faces());
    Ok(out)
}

/// Gyro: every face corner becomes a pentagon spun around the face center.
///
/// Keeps the original vertices, adds one vertex per face center and two per
/// edge (one third of the way from each end), and produces one pentagon per
/// directed edge.
pub fn gyro(mesh: &Mesh) -> Result<Mesh> {
    let index = AdjacencyIndex::build(mesh);
    index.validate_closed_manifold()?;

    let nd = index.num_directed_edges();
    let mut out = Mesh::with_capacity(mesh.num_vertices() + mesh.num_faces() + nd, nd);
    out.vertices.extend_from_slice(mesh.positions());
    let centers: Vec<VertexId> = mesh
        .face_ids()
        .map(|f| out.add_vertex(mesh.face_centroid(f)))
        .collect();
    let third = edge_points(mesh, &mut out, 1.0 / 3.0);

    for (fi, face) in mesh.faces().iter().enumerate() {
        let n = face.len();
        for i in 0..n {
            let (v1, v2, v3) = (face.corner(i), face.corner(i + 1), face.corner(i + 2));
            let incoming = DirectedEdge::new(v1, v2);
            let outgoing = DirectedEdge::new(v2, v3);
            out.push_face(Face::new([
                centers[fi],
                third[&incoming],
                third[&incoming.reversed()],
                v2,
                third[&outgoing],
            ]));
        }
    }

    log::debug!("gyro: {}v/{}f", out.num_vertices(), out.num_faces());
    Ok(out)
}

/// Snub: the dual of [`gyro`].
pub fn snub(mesh: &Mesh) -> Result<Mesh> {
    dual(&gyro(mesh)?)
}

/// Add one vertex per directed edge `(a, b)` at `a + t (b - a)`, in
/// face-then-corner order, and return the lookup.
fn edge_points(mesh: &Mesh, out: &mut Mesh, t: f64) -> HashMap<DirectedEdge, VertexId> {
    let mut ids = HashMap::new();
    for (_, edge) in mesh.directed_edges() {
        for e in [edge, edge.reversed()] {
            ids.entry(e).or_insert_with(|| {
                let a = mesh.position(e.from());
                let b = mesh.position(e.to());
                out.add_vertex(a + (b - a) * t)
            });
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{Cube, Dodecahedron, Generator, Grid, Icosahedron, Octahedron, Tetrahedron};

    fn counts(mesh: &Mesh) -> (usize, usize, usize) {
        let report = mesh.topology_report();
        assert!(report.is_closed_manifold(), "{report:?}");
        (report.vertex_count, report.edge_count, report.face_count)
    }

    #[test]
    fn test_ambo() {
        assert_eq!(counts(&ambo(&Cube::default().produce()).unwrap()), (12, 24, 14));
        assert_eq!(counts(&ambo(&Dodecahedron.produce()).unwrap()), (30, 60, 32));
        // ambo(T) is the octahedron
        assert_eq!(counts(&ambo(&Tetrahedron.produce()).unwrap()), (6, 12, 8));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(counts(&truncate(&Tetrahedron.produce(), 1.0 / 3.0).unwrap()), (12, 18, 8));
        assert_eq!(counts(&truncate(&Octahedron.produce(), 1.0 / 3.0).unwrap()), (24, 36, 14));
        assert_eq!(counts(&truncate(&Icosahedron.produce(), 1.0 / 3.0).unwrap()), (60, 90, 32));
    }

    #[test]
    fn test_truncate_face_sizes() {
        let t = truncate(&Cube::default().produce(), 0.25).unwrap();
        let octagons = t.faces().iter().filter(|f| f.len() == 8).count();
        let triangles = t.faces().iter().filter(|f| f.len() == 3).count();
        assert_eq!((octagons, triangles), (6, 8));
    }

    #[test]
    fn test_truncate_rejects_bad_ratio() {
        let cube = Cube::default().produce();
        assert!(truncate(&cube, 0.0).is_err());
        assert!(truncate(&cube, 0.5).is_err());
        assert!(truncate(&cube, f64::NAN).is_err());
    }

    #[test]
    fn test_gyro_and_snub() {
        let cube = Cube::default().produce();
        let g = gyro(&cube).unwrap();
        assert_eq!(counts(&g), (38, 60, 24));
        assert!(g.faces().iter().all(|f| f.len() == 5));

        assert_eq!(counts(&snub(&cube).unwrap()), (24, 60, 38));
        assert_eq!(counts(&snub(&Dodecahedron.produce()).unwrap()), (60, 150, 92));
    }

    #[test]
    fn test_outward_orientation() {
        for mesh in [
            ambo(&Cube::default().produce()).unwrap(),
            truncate(&Cube::default().produce(), 0.3).unwrap(),
            gyro(&Octahedron.produce()).unwrap(),
        ] {
            for f in mesh.face_ids() {
                let c = mesh.face_centroid(f).coords;
                assert!(mesh.face_normal(f).dot(&c) > 0.0);
            }
        }
    }

    #[test]
    fn test_open_input_is_rejected() {
        let grid = Grid::new(2, 2).produce();
        assert!(ambo(&grid).is_err());
        assert!(truncate(&grid, 0.3).is_err());
        assert!(gyro(&grid).is_err());
    }
}
