//! Shell an open surface into a closed solid.
//!
//! The surface is copied, the copy is pushed back along the vertex normals by
//! the shell thickness and its winding is flipped, and every boundary edge of
//! the original is sealed against its copy with a quad.
//!
//! ```text
//!   outer   a ------- b          rim quad: (b, a, a', b')
//!           |         |
//!   inner   a' ------ b'         a' = a + n, b' = b + n
//! ```
//!
//! Given a manifold, consistently oriented open surface the result is a
//! closed manifold with outward-facing faces. A closed input simply gets an
//! inner shell and no rim.

use rayon::prelude::*;

use crate::algo::bridge::bridge_edges;
use crate::error::{MeshError, Result};
use crate::mesh::{AdjacencyIndex, DirectedEdge, Mesh, NormalWeighting};

/// Options for [`solidify`].
#[derive(Debug, Clone, PartialEq)]
pub struct SolidifyOptions {
    /// Shell thickness. Positive values grow the solid inward (against the
    /// face normals); negative values grow it outward.
    pub thickness: f64,

    /// How face normals are averaged into the offset directions.
    pub weighting: NormalWeighting,

    /// Tag applied to the rim quads.
    pub rim_tag: Option<String>,

    /// Whether to offset vertices in parallel (default: true).
    pub parallel: bool,
}

impl Default for SolidifyOptions {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl SolidifyOptions {
    /// Options with the given thickness.
    pub fn new(thickness: f64) -> Self {
        Self {
            thickness,
            weighting: NormalWeighting::default(),
            rim_tag: None,
            parallel: true,
        }
    }

    /// Set the normal weighting.
    pub fn with_weighting(mut self, weighting: NormalWeighting) -> Self {
        self.weighting = weighting;
        self
    }

    /// Tag the rim quads.
    pub fn with_rim_tag(mut self, tag: impl Into<String>) -> Self {
        self.rim_tag = Some(tag.into());
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    fn validate(&self) -> Result<()> {
        if !self.thickness.is_finite() {
            return Err(MeshError::invalid_param(
                "thickness",
                self.thickness,
                "must be finite",
            ));
        }
        Ok(())
    }
}

/// Turn `mesh` into a shell of the given thickness.
///
/// Returns the number of rim quads added, one per boundary edge of the input.
/// Zero thickness and an empty mesh leave the mesh untouched.
pub fn solidify(mesh: &mut Mesh, options: &SolidifyOptions) -> Result<usize> {
    options.validate()?;
    if options.thickness == 0.0 || mesh.num_faces() == 0 {
        return Ok(0);
    }

    let n = mesh.num_vertices();
    let boundary: Vec<DirectedEdge> = AdjacencyIndex::build(mesh).boundary_edges();

    let normals = mesh.vertex_normals(options.weighting);
    let t = options.thickness;
    let mut inner = mesh.clone();
    if options.parallel {
        inner
            .vertices
            .par_iter_mut()
            .zip(normals.par_iter())
            .for_each(|(p, normal)| *p -= normal * t);
    } else {
        for (p, normal) in inner.vertices.iter_mut().zip(&normals) {
            *p -= normal * t;
        }
    }
    inner.reverse_winding();
    mesh.append(&inner);

    for edge in &boundary {
        let outer = edge.reversed();
        let face = bridge_edges(mesh, outer, edge.offset(n))?;
        if let Some(tag) = &options.rim_tag {
            mesh.face_mut(face).set_tag(Some(tag.clone()));
        }
    }

    if boundary.is_empty() {
        log::warn!("solidify: closed input, no rim added");
    }
    log::debug!(
        "solidify: thickness {}, {} vertices, {} faces, {} rim quads",
        t,
        mesh.num_vertices(),
        mesh.num_faces(),
        boundary.len()
    );
    Ok(boundary.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{Cube, Generator, Grid};
    use nalgebra::Point3;

    #[test]
    fn test_grid_becomes_closed_slab() {
        let mut mesh = Grid::new(2, 2).produce();
        let rim = solidify(&mut mesh, &SolidifyOptions::new(0.25)).unwrap();

        // 2x2 grid: 8 boundary edges.
        assert_eq!(rim, 8);
        assert_eq!(mesh.num_vertices(), 18);
        assert_eq!(mesh.num_faces(), 4 + 4 + 8);

        let report = mesh.topology_report();
        assert!(report.is_closed_manifold(), "{report:?}");
        assert_eq!(report.euler_characteristic(), 2);
    }

    #[test]
    fn test_inner_shell_offset_and_orientation() {
        let mut mesh = Grid::new(1, 1).produce();
        solidify(&mut mesh, &SolidifyOptions::new(0.5)).unwrap();

        // Grid faces +z, so the inner copy sits at z = -0.5 and faces -z.
        for p in &mesh.positions()[4..] {
            assert!((p.z + 0.5).abs() < 1e-12);
        }
        let inner = crate::mesh::FaceId::new(1);
        assert!(mesh.face_normal(inner).z < 0.0);
    }

    #[test]
    fn test_rim_faces_point_outward() {
        let mut mesh = Grid::new(3, 3).produce();
        solidify(&mut mesh, &SolidifyOptions::new(0.1).with_rim_tag("rim")).unwrap();
        let rim: Vec<_> = mesh
            .face_ids()
            .filter(|&f| mesh.face(f).tag() == Some("rim"))
            .collect();
        assert_eq!(rim.len(), 12);
        for f in rim {
            let c = mesh.face_centroid(f);
            let outward = nalgebra::Vector3::new(c.x, c.y, 0.0);
            assert!(mesh.face_normal(f).dot(&outward) > 0.0);
        }
    }

    #[test]
    fn test_zero_thickness_is_noop() {
        let original = Grid::new(2, 2).produce();
        let mut mesh = original.clone();
        assert_eq!(solidify(&mut mesh, &SolidifyOptions::new(0.0)).unwrap(), 0);
        assert_eq!(mesh, original);

        let mut empty = Mesh::new();
        assert_eq!(solidify(&mut empty, &SolidifyOptions::new(1.0)).unwrap(), 0);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_closed_input_gets_no_rim() {
        let mut mesh = Cube::default().produce();
        let rim = solidify(&mut mesh, &SolidifyOptions::new(0.1)).unwrap();
        assert_eq!(rim, 0);
        assert_eq!(mesh.num_faces(), 12);
        // The inner cube is smaller than the outer one.
        assert!(mesh.positions()[8].coords.norm() < mesh.positions()[0].coords.norm());
        assert!(mesh.topology_report().is_closed_manifold());
    }

    #[test]
    fn test_rejects_nan_thickness() {
        let mut mesh = Grid::new(1, 1).produce();
        assert!(solidify(&mut mesh, &SolidifyOptions::new(f64::NAN)).is_err());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut a = Grid::new(4, 3).produce();
        a.set_position(crate::mesh::VertexId::new(7), Point3::new(0.1, 0.2, 0.3));
        let mut b = a.clone();
        solidify(&mut a, &SolidifyOptions::new(0.2)).unwrap();
        solidify(&mut b, &SolidifyOptions::new(0.2).with_parallel(false)).unwrap();
        assert_eq!(a, b);
    }
}
