//! Seed solids.
//!
//! A handful of base shapes that modifier chains start from: the five
//! Platonic solids and an open grid plane. Every generator returns a fresh,
//! independent mesh; nothing is cached between calls.
//!
//! All closed seeds are wound counter-clockwise seen from outside.

use nalgebra::{Point3, Vector3};

use crate::mesh::{Face, Mesh};

/// Something that produces a mesh from its own parameters.
pub trait Generator {
    /// Build a new mesh.
    fn produce(&self) -> Mesh;
}

/// Axis-aligned cube centered at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cube {
    /// Edge length.
    pub size: f64,
}

impl Default for Cube {
    fn default() -> Self {
        Self { size: 1.0 }
    }
}

impl Generator for Cube {
    fn produce(&self) -> Mesh {
        let h = self.size * 0.5;
        let vertices = vec![
            Point3::new(-h, -h, -h),
            Point3::new(h, -h, -h),
            Point3::new(h, h, -h),
            Point3::new(-h, h, -h),
            Point3::new(-h, -h, h),
            Point3::new(h, -h, h),
            Point3::new(h, h, h),
            Point3::new(-h, h, h),
        ];
        let faces = [
            [0usize, 3, 2, 1], // bottom
            [4, 5, 6, 7],      // top
            [0, 1, 5, 4],      // front
            [2, 3, 7, 6],      // back
            [0, 4, 7, 3],      // left
            [1, 2, 6, 5],      // right
        ]
        .into_iter()
        .map(Face::new)
        .collect();
        Mesh { vertices, faces }
    }
}

/// Regular tetrahedron inscribed in the cube `[-1, 1]^3`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tetrahedron;

impl Generator for Tetrahedron {
    fn produce(&self) -> Mesh {
        let vertices = vec![
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(1.0, -1.0, -1.0),
            Point3::new(-1.0, 1.0, -1.0),
            Point3::new(-1.0, -1.0, 1.0),
        ];
        triangles_from_edge_length(vertices, 8.0_f64.sqrt())
    }
}

/// Regular octahedron with vertices on the unit axes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Octahedron;

impl Generator for Octahedron {
    fn produce(&self) -> Mesh {
        let vertices = vec![
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, -1.0),
        ];
        triangles_from_edge_length(vertices, 2.0_f64.sqrt())
    }
}

/// Regular icosahedron with edge length 2.
#[derive(Debug, Clone, Copy, Default)]
pub struct Icosahedron;

impl Generator for Icosahedron {
    fn produce(&self) -> Mesh {
        let phi = (1.0 + 5.0_f64.sqrt()) / 2.0;
        let mut vertices = Vec::with_capacity(12);
        for a in [-1.0, 1.0] {
            for b in [-phi, phi] {
                vertices.push(Point3::new(0.0, a, b));
                vertices.push(Point3::new(a, b, 0.0));
                vertices.push(Point3::new(b, 0.0, a));
            }
        }
        triangles_from_edge_length(vertices, 2.0)
    }
}

/// Regular dodecahedron, placed at the face centers of [`Icosahedron`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Dodecahedron;

impl Generator for Dodecahedron {
    fn produce(&self) -> Mesh {
        let ico = Icosahedron.produce();
        let vertices: Vec<Point3<f64>> = ico.face_ids().map(|f| ico.face_centroid(f)).collect();

        // One pentagon per icosahedron vertex, ordered counter-clockwise
        // around the outward direction of that vertex.
        let faces = ico
            .vertex_ids()
            .map(|v| {
                let axis = ico.position(v).coords.normalize();
                let around: Vec<usize> = ico
                    .faces()
                    .iter()
                    .enumerate()
                    .filter(|(_, face)| face.position_of(v).is_some())
                    .map(|(fi, _)| fi)
                    .collect();
                Face::new(sort_around(&vertices, around, &axis))
            })
            .collect();

        Mesh { vertices, faces }
    }
}

/// Open square grid of `nx * ny` quads spanning `[-1, 1]^2` in the z = 0 plane,
/// facing +z.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    /// Cells along x.
    pub nx: usize,
    /// Cells along y.
    pub ny: usize,
}

impl Grid {
    /// Create a grid generator.
    pub fn new(nx: usize, ny: usize) -> Self {
        Self { nx, ny }
    }
}

impl Generator for Grid {
    fn produce(&self) -> Mesh {
        let (nx, ny) = (self.nx.max(1), self.ny.max(1));
        let mut mesh = Mesh::with_capacity((nx + 1) * (ny + 1), nx * ny);

        let (dx, dy) = (2.0 / nx as f64, 2.0 / ny as f64);
        for j in 0..=ny {
            for i in 0..=nx {
                mesh.add_vertex(Point3::new(-1.0 + i as f64 * dx, -1.0 + j as f64 * dy, 0.0));
            }
        }

        for j in 0..ny {
            for i in 0..nx {
                let v00 = j * (nx + 1) + i;
                let v10 = v00 + 1;
                let v01 = v00 + (nx + 1);
                let v11 = v01 + 1;
                mesh.push_face(Face::new([v00, v10, v11, v01]));
            }
        }

        mesh
    }
}

/// Triangulate a convex vertex set whose faces are exactly the equilateral
/// triangles of side `edge`, wound outward.
fn triangles_from_edge_length(vertices: Vec<Point3<f64>>, edge: f64) -> Mesh {
    let tol = edge * 1e-6;
    let adjacent = |a: usize, b: usize| ((vertices[a] - vertices[b]).norm() - edge).abs() < tol;

    let mut faces = Vec::new();
    let n = vertices.len();
    for i in 0..n {
        for j in (i + 1)..n {
            if !adjacent(i, j) {
                continue;
            }
            for k in (j + 1)..n {
                if !adjacent(j, k) || !adjacent(i, k) {
                    continue;
                }
                let normal = (vertices[j] - vertices[i]).cross(&(vertices[k] - vertices[i]));
                let centroid = (vertices[i].coords + vertices[j].coords + vertices[k].coords) / 3.0;
                if normal.dot(&centroid) >= 0.0 {
                    faces.push(Face::new([i, j, k]));
                } else {
                    faces.push(Face::new([i, k, j]));
                }
            }
        }
    }

    Mesh { vertices, faces }
}

/// Order `indices` counter-clockwise around `axis`.
fn sort_around(points: &[Point3<f64>], mut indices: Vec<usize>, axis: &Vector3<f64>) -> Vec<usize> {
    let center: Vector3<f64> =
        indices.iter().map(|&i| points[i].coords).sum::<Vector3<f64>>() / indices.len() as f64;
    let reference = (points[indices[0]].coords - center).normalize();
    let binormal = axis.cross(&reference);
    let angle = |i: usize| {
        let d = points[i].coords - center;
        d.dot(&binormal).atan2(d.dot(&reference))
    };
    indices.sort_by(|&a, &b| angle(a).total_cmp(&angle(b)));
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::VertexId;

    fn check_closed(mesh: &Mesh, v: usize, e: usize, f: usize) {
        let report = mesh.topology_report();
        assert_eq!(report.vertex_count, v);
        assert_eq!(report.edge_count, e);
        assert_eq!(report.face_count, f);
        assert!(report.is_closed_manifold(), "{report:?}");
        assert_eq!(report.euler_characteristic(), 2);

        // Outward winding: every face normal points away from the origin.
        for fid in mesh.face_ids() {
            let c = mesh.face_centroid(fid).coords;
            assert!(mesh.face_normal(fid).dot(&c) > 0.0);
        }
    }

    #[test]
    fn test_platonic_solids() {
        check_closed(&Tetrahedron.produce(), 4, 6, 4);
        check_closed(&Cube::default().produce(), 8, 12, 6);
        check_closed(&Octahedron.produce(), 6, 12, 8);
        check_closed(&Dodecahedron.produce(), 20, 30, 12);
        check_closed(&Icosahedron.produce(), 12, 30, 20);
    }

    #[test]
    fn test_grid_is_open_and_faces_up() {
        let mesh = Grid::new(3, 2).produce();
        assert_eq!(mesh.num_vertices(), 12);
        assert_eq!(mesh.num_faces(), 6);
        let report = mesh.topology_report();
        assert_eq!(report.boundary_edges, 10);
        assert!(report.is_manifold());
        for f in mesh.face_ids() {
            assert!((mesh.face_normal(f) - Vector3::z()).norm() < 1e-12);
        }
    }

    #[test]
    fn test_generators_are_independent() {
        let mut a = Cube::default().produce();
        let b = Cube::default().produce();
        a.position_mut(VertexId::new(0)).x = 10.0;
        assert_ne!(a, b);
        assert_eq!(b, Cube::default().produce());
    }
}
