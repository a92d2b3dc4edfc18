//! Face-split subdivision.
//!
//! Both subdivision variants share one topology step. Each iteration:
//!
//! 1. Creates a face point at each face centroid
//! 2. Creates an edge point on every edge: the average of its two endpoints
//!    and the two adjacent face points, or the plain midpoint on a boundary
//! 3. Repositions the original vertices according to a [`VertexRule`]
//! 4. Replaces every n-gon by n quads
//!    `(vertex, next edge point, face point, previous edge point)`
//!
//! The result is always an all-quad mesh, manifold whenever the input was.
//!
//! # Vertex Rules
//!
//! - [`CatmullClark`]: `(F + 2E + (n - 3)P) / n` where F is the mean of the
//!   adjacent face points, E the mean of the adjacent edge points, P the old
//!   position and n the valence. Boundary vertices follow the crease rule
//!   `3/4 P + 1/8 (a + b)` when boundaries are preserved.
//! - [`KeepPositions`]: original vertices stay where they are, so the shape's
//!   silhouette is unchanged and only the faces are split.
//!
//! # Example
//!
//! ```
//! use trellis::algo::subdivide::{subdivide, SubdivideOptions};
//! use trellis::seed::{Cube, Generator};
//!
//! let mut mesh = Cube::default().produce();
//! subdivide(&mut mesh, &SubdivideOptions::new(2).flat());
//!
//! assert_eq!(mesh.num_vertices(), 98);
//! assert_eq!(mesh.num_faces(), 96);
//! ```
//!
//! # References
//!
//! - Catmull, E. & Clark, J. (1978). "Recursively generated B-spline surfaces
//!   on arbitrary topological meshes." Computer-Aided Design, 10(6), 350-355.

mod rules;
mod split;

pub use rules::{CatmullClark, KeepPositions, VertexRule, VertexStencil};
pub use split::subdivide_once;

use crate::algo::Progress;
use crate::mesh::Mesh;

/// Options for subdivision.
#[derive(Debug, Clone)]
pub struct SubdivideOptions {
    /// Number of subdivision iterations.
    pub iterations: usize,

    /// Reposition original vertices with the Catmull-Clark rule (`true`) or
    /// keep them in place (`false`).
    pub smooth: bool,

    /// Whether boundary vertices use the crease rule when smoothing.
    pub preserve_boundary: bool,

    /// Whether to use parallel execution (default: true).
    pub parallel: bool,
}

impl Default for SubdivideOptions {
    fn default() -> Self {
        Self::new(1)
    }
}

impl SubdivideOptions {
    /// Create smoothing options with the specified number of iterations.
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            smooth: true,
            preserve_boundary: true,
            parallel: true,
        }
    }

    /// Split faces without moving original vertices.
    pub fn flat(mut self) -> Self {
        self.smooth = false;
        self
    }

    /// Set whether to smooth.
    pub fn with_smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }

    /// Set whether to preserve boundary edges.
    pub fn with_preserve_boundary(mut self, preserve: bool) -> Self {
        self.preserve_boundary = preserve;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    fn rule(&self) -> Box<dyn VertexRule> {
        if self.smooth {
            Box::new(CatmullClark {
                preserve_boundary: self.preserve_boundary,
            })
        } else {
            Box::new(KeepPositions)
        }
    }
}

/// Subdivide a mesh in place.
///
/// Zero iterations and an empty mesh are no-ops.
pub fn subdivide(mesh: &mut Mesh, options: &SubdivideOptions) {
    subdivide_with_progress(mesh, options, &Progress::none());
}

/// Subdivision with progress reporting.
pub fn subdivide_with_progress(mesh: &mut Mesh, options: &SubdivideOptions, progress: &Progress) {
    let rule = options.rule();
    subdivide_with_rule(mesh, options.iterations, rule.as_ref(), options.parallel, progress);
}

/// Subdivide with a caller-supplied vertex rule.
pub fn subdivide_with_rule(
    mesh: &mut Mesh,
    iterations: usize,
    rule: &dyn VertexRule,
    parallel: bool,
    progress: &Progress,
) {
    if iterations == 0 || mesh.num_faces() == 0 {
        return;
    }

    log::debug!(
        "subdivide: {} iterations, {} vertices, {} faces",
        iterations,
        mesh.num_vertices(),
        mesh.num_faces()
    );

    for iter in 0..iterations {
        progress.report(iter, iterations, "Subdivision");
        *mesh = subdivide_once(mesh, rule, parallel);
        log::trace!(
            "subdivide: pass {} -> {} vertices, {} faces",
            iter + 1,
            mesh.num_vertices(),
            mesh.num_faces()
        );
    }
    progress.report(iterations, iterations, "Subdivision");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{Cube, Generator, Grid, Tetrahedron};
    use nalgebra::{Point3, Vector3};

    #[test]
    fn test_flat_cube_counts() {
        let mut mesh = Cube::default().produce();
        subdivide(&mut mesh, &SubdivideOptions::new(1).flat());
        assert_eq!(mesh.num_vertices(), 26);
        assert_eq!(mesh.num_faces(), 24);

        subdivide(&mut mesh, &SubdivideOptions::new(1).flat());
        assert_eq!(mesh.num_vertices(), 98);
        assert_eq!(mesh.num_faces(), 96);
        assert!(mesh.topology_report().is_closed_manifold());
    }

    #[test]
    fn test_flat_keeps_silhouette() {
        let original = Cube::default().produce();
        let mut mesh = original.clone();
        subdivide(&mut mesh, &SubdivideOptions::new(2).flat());

        assert_eq!(&mesh.positions()[..8], original.positions());
        // Every point stays on the surface of the unit cube.
        for p in mesh.positions() {
            let max = p.coords.abs().max();
            assert!((max - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_zero_iterations_is_identity() {
        let original = Cube::default().produce();
        let mut mesh = original.clone();
        subdivide(&mut mesh, &SubdivideOptions::new(0));
        assert_eq!(mesh, original);
    }

    #[test]
    fn test_smooth_triangles_become_quads() {
        let mut mesh = Tetrahedron.produce();
        subdivide(&mut mesh, &SubdivideOptions::new(1));
        // 4 + 4 face points + 6 edge points; every triangle becomes 3 quads.
        assert_eq!(mesh.num_vertices(), 14);
        assert_eq!(mesh.num_faces(), 12);
        assert!(mesh.is_quad_mesh());
        let report = mesh.topology_report();
        assert!(report.is_closed_manifold());
        assert_eq!(report.euler_characteristic(), 2);
    }

    #[test]
    fn test_smooth_cube_shrinks_symmetrically() {
        let mut mesh = Cube::default().produce();
        subdivide(&mut mesh, &SubdivideOptions::new(2));

        let centroid: Vector3<f64> =
            mesh.positions().iter().map(|p| p.coords).sum::<Vector3<f64>>() / mesh.num_vertices() as f64;
        assert!(centroid.norm() < 1e-12);
        for p in mesh.positions() {
            assert!(p.coords.abs().max() < 0.5 + 1e-12);
        }
    }

    #[test]
    fn test_cube_corner_weights() {
        // Corner (0.5, 0.5, 0.5): the face points average to 1/6 per axis,
        // the edge points (e.g. (0, 0.375, 0.375)) to 1/4, and n = 3 gives
        // the old position zero weight.
        let mut mesh = Cube::default().produce();
        subdivide(&mut mesh, &SubdivideOptions::new(1));
        let corner = mesh.positions()[6];
        let expected = (1.0 / 6.0 + 2.0 * 0.25) / 3.0;
        assert!((corner.coords - Vector3::repeat(expected)).norm() < 1e-12);
    }

    #[test]
    fn test_boundary_crease_rule_keeps_grid_flat() {
        let mut mesh = Grid::new(2, 2).produce();
        subdivide(&mut mesh, &SubdivideOptions::new(1));
        assert_eq!(mesh.num_faces(), 16);
        for p in mesh.positions() {
            assert!(p.z.abs() < 1e-12);
        }
        // The grid corner is pinned by the crease rule.
        assert_eq!(mesh.positions()[0], Point3::new(-1.0, -1.0, 0.0));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut a = Tetrahedron.produce();
        let mut b = a.clone();
        subdivide(&mut a, &SubdivideOptions::new(2));
        subdivide(&mut b, &SubdivideOptions::new(2).sequential());
        assert_eq!(a, b);
    }

    #[test]
    fn test_progress_reports_every_pass() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let progress = Progress::new(move |_, _, _| {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        let mut mesh = Cube::default().produce();
        subdivide_with_progress(&mut mesh, &SubdivideOptions::new(3).flat(), &progress);
        assert_eq!(calls.load(Ordering::Relaxed), 4);
    }

    #[test]
    fn test_tags_are_inherited() {
        let mut mesh = Cube::default().produce();
        mesh.face_mut(crate::mesh::FaceId::new(1)).set_tag(Some("top".into()));
        subdivide(&mut mesh, &SubdivideOptions::new(1).flat());
        let tagged = mesh.faces().iter().filter(|f| f.tag() == Some("top")).count();
        assert_eq!(tagged, 4);
    }
}
