//! The topology step shared by every subdivision rule.

use std::collections::HashMap;

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use super::rules::{VertexRule, VertexStencil};
use crate::mesh::{Face, FaceId, Mesh, VertexId};

/// An undirected edge of the input, numbered in first-encounter order.
#[derive(Debug, Clone)]
struct EdgeInfo {
    ends: (VertexId, VertexId),
    /// First two faces using the edge.
    faces: (usize, Option<usize>),
    /// Total number of faces using the edge.
    shared: usize,
}

impl EdgeInfo {
    /// Exactly two faces meet here.
    #[inline]
    fn is_interior(&self) -> bool {
        self.shared == 2
    }
}

/// Edge table: per-edge info in first-encounter order plus a lookup by
/// canonical (smaller index first) key.
struct EdgeTable {
    edges: Vec<EdgeInfo>,
    lookup: HashMap<(VertexId, VertexId), usize>,
}

impl EdgeTable {
    fn build(mesh: &Mesh) -> Self {
        let mut edges: Vec<EdgeInfo> = Vec::new();
        let mut lookup = HashMap::new();

        for (fi, face) in mesh.faces().iter().enumerate() {
            for edge in face.edges() {
                let key = edge.undirected();
                match lookup.get(&key) {
                    Some(&ei) => {
                        let info: &mut EdgeInfo = &mut edges[ei];
                        if info.faces.1.is_none() {
                            info.faces.1 = Some(fi);
                        }
                        info.shared += 1;
                    }
                    None => {
                        lookup.insert(key, edges.len());
                        edges.push(EdgeInfo {
                            ends: key,
                            faces: (fi, None),
                            shared: 1,
                        });
                    }
                }
            }
        }

        Self { edges, lookup }
    }

    #[inline]
    fn index(&self, a: VertexId, b: VertexId) -> usize {
        let key = if a < b { (a, b) } else { (b, a) };
        // Every face edge was inserted by `build`.
        self.lookup[&key]
    }
}

/// Run one subdivision pass and return the refined mesh.
///
/// Output vertex order: the original vertices (repositioned by `rule`), then
/// one face point per face in face order, then one edge point per edge in
/// first-encounter order. Face `f` with `n` corners becomes `n` consecutive
/// quads, each carrying `f`'s tag.
pub fn subdivide_once(mesh: &Mesh, rule: &dyn VertexRule, parallel: bool) -> Mesh {
    if mesh.num_faces() == 0 {
        return mesh.clone();
    }

    let positions = mesh.positions();
    let face_points: Vec<Point3<f64>> = if parallel {
        (0..mesh.num_faces())
            .into_par_iter()
            .map(|f| mesh.face_centroid(FaceId::new(f)))
            .collect()
    } else {
        mesh.face_ids().map(|f| mesh.face_centroid(f)).collect()
    };

    let table = EdgeTable::build(mesh);
    let smooth_edges = rule.smooths_edges();
    let edge_point = |info: &EdgeInfo| {
        let (a, b) = info.ends;
        let ends = positions[a.index()].coords + positions[b.index()].coords;
        match info.faces {
            (f0, Some(f1)) if smooth_edges && info.is_interior() => {
                Point3::from((ends + face_points[f0].coords + face_points[f1].coords) * 0.25)
            }
            _ => Point3::from(ends * 0.5),
        }
    };
    let edge_points: Vec<Point3<f64>> = if parallel {
        table.edges.par_iter().map(edge_point).collect()
    } else {
        table.edges.iter().map(edge_point).collect()
    };

    let updated = if rule.moves_vertices() {
        reposition_vertices(mesh, &table, &face_points, &edge_points, rule, parallel)
    } else {
        positions.to_vec()
    };

    let nv = mesh.num_vertices();
    let nf = mesh.num_faces();
    let quad_count: usize = mesh.faces().iter().map(Face::len).sum();

    let mut out = Mesh::with_capacity(nv + nf + edge_points.len(), quad_count);
    out.vertices.extend(updated);
    out.vertices.extend(face_points);
    out.vertices.extend(edge_points);

    let edge_vertex = |a: VertexId, b: VertexId| VertexId::new(nv + nf + table.index(a, b));
    for (fi, face) in mesh.faces().iter().enumerate() {
        let fp = VertexId::new(nv + fi);
        let n = face.len();
        for i in 0..n {
            let v = face.corner(i);
            let next = edge_vertex(v, face.corner(i + 1));
            let prev = edge_vertex(face.corner(i + n - 1), v);
            let mut quad = Face::new([v, next, fp, prev]);
            quad.set_tag(face.tag().map(str::to_owned));
            out.push_face(quad);
        }
    }

    out
}

fn reposition_vertices(
    mesh: &Mesh,
    table: &EdgeTable,
    face_points: &[Point3<f64>],
    edge_points: &[Point3<f64>],
    rule: &dyn VertexRule,
    parallel: bool,
) -> Vec<Point3<f64>> {
    let n = mesh.num_vertices();
    let positions = mesh.positions();

    let mut vertex_faces: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (fi, face) in mesh.faces().iter().enumerate() {
        for &v in face.indices() {
            let list = &mut vertex_faces[v.index()];
            if list.last() != Some(&fi) && !list.contains(&fi) {
                list.push(fi);
            }
        }
    }

    let mut vertex_edges: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut boundary_neighbors: Vec<Vec<VertexId>> = vec![Vec::new(); n];
    for (ei, info) in table.edges.iter().enumerate() {
        let (a, b) = info.ends;
        vertex_edges[a.index()].push(ei);
        vertex_edges[b.index()].push(ei);
        if info.shared == 1 {
            boundary_neighbors[a.index()].push(b);
            boundary_neighbors[b.index()].push(a);
        }
    }

    let update = |v: usize| {
        let faces = &vertex_faces[v];
        let edges = &vertex_edges[v];
        let stencil = VertexStencil {
            position: positions[v],
            face_average: mean(faces.iter().map(|&f| face_points[f].coords), faces.len()),
            edge_average: mean(edges.iter().map(|&e| edge_points[e].coords), edges.len()),
            valence: faces.len(),
            boundary_neighbors: boundary_neighbors[v]
                .iter()
                .map(|&u| positions[u.index()])
                .collect(),
        };
        rule.reposition(&stencil)
    };

    if parallel {
        (0..n).into_par_iter().map(update).collect()
    } else {
        (0..n).map(update).collect()
    }
}

fn mean(points: impl Iterator<Item = Vector3<f64>>, count: usize) -> Vector3<f64> {
    if count == 0 {
        Vector3::zeros()
    } else {
        points.sum::<Vector3<f64>>() / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::subdivide::{CatmullClark, KeepPositions};

    fn single_quad() -> Mesh {
        let positions = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ];
        Mesh::from_polygons(&positions, &[[0usize, 1, 2, 3]]).unwrap()
    }

    fn two_quads() -> Mesh {
        let positions = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        Mesh::from_polygons(&positions, &[[0usize, 1, 2, 3], [1, 4, 5, 2]]).unwrap()
    }

    #[test]
    fn test_single_quad_layout() {
        let mesh = subdivide_once(&single_quad(), &KeepPositions, false);
        // 4 original + 1 face point + 4 edge points
        assert_eq!(mesh.num_vertices(), 9);
        assert_eq!(mesh.num_faces(), 4);

        // Face point right after the originals, at the centroid.
        assert_eq!(mesh.positions()[4], Point3::new(1.0, 1.0, 0.0));
        // Edge points in first-encounter order: (0,1), (1,2), (2,3), (3,0).
        assert_eq!(mesh.positions()[5], Point3::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.positions()[8], Point3::new(0.0, 1.0, 0.0));

        // First child quad: corner 0, edge (0,1), face point, edge (3,0).
        let first: Vec<usize> = mesh.faces()[0].indices().iter().map(|v| v.index()).collect();
        assert_eq!(first, vec![0, 5, 4, 8]);
    }

    #[test]
    fn test_children_keep_parent_orientation() {
        let mesh = subdivide_once(&single_quad(), &KeepPositions, false);
        for f in mesh.face_ids() {
            assert!(mesh.face_normal(f).z > 0.0);
        }
    }

    #[test]
    fn test_two_quads_share_edge_point() {
        let mesh = subdivide_once(&two_quads(), &CatmullClark::default(), false);
        // 6 original + 2 face points + 7 edge points
        assert_eq!(mesh.num_vertices(), 15);
        assert_eq!(mesh.num_faces(), 8);
        let report = mesh.topology_report();
        assert!(report.is_manifold());
        assert_eq!(report.euler_characteristic(), 1);
    }

    /// `two_quads` folded up along the shared edge (1, 2).
    fn folded_quads() -> Mesh {
        let mut mesh = two_quads();
        mesh.set_position(VertexId::new(4), Point3::new(1.0, 0.0, 1.0));
        mesh.set_position(VertexId::new(5), Point3::new(1.0, 1.0, 1.0));
        mesh
    }

    #[test]
    fn test_interior_edge_point_uses_face_points() {
        let mesh = subdivide_once(&folded_quads(), &CatmullClark::default(), false);
        // Shared edge (1, 2) is the second edge encountered. Face points are
        // (0.5, 0.5, 0) and (1, 0.5, 0.5).
        let shared = mesh.positions()[6 + 2 + 1];
        let expected = Point3::new((1.0 + 1.0 + 0.5 + 1.0) / 4.0, 0.5, 0.5 / 4.0);
        assert!((shared - expected).norm() < 1e-12);
    }

    #[test]
    fn test_flat_edge_point_is_midpoint() {
        let mesh = subdivide_once(&folded_quads(), &KeepPositions, false);
        let shared = mesh.positions()[6 + 2 + 1];
        assert_eq!(shared, Point3::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn test_triangle_becomes_three_quads() {
        let positions = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh = Mesh::from_polygons(&positions, &[[0usize, 1, 2]]).unwrap();
        let out = subdivide_once(&mesh, &KeepPositions, true);
        assert_eq!(out.num_faces(), 3);
        assert_eq!(out.num_vertices(), 7);
        assert!(out.is_quad_mesh());
    }
}
