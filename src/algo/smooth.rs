//! Mesh smoothing.
//!
//! Umbrella-operator smoothing on polygon meshes. A vertex's neighbors are
//! the vertices it shares an edge with, whatever the face sizes.
//!
//! # Algorithms
//!
//! - [`laplacian_smooth`]: Classic Laplacian smoothing (may cause shrinkage)
//! - [`taubin_smooth`]: Taubin's λ|μ smoothing (reduces shrinkage)
//!
//! Every pass reads the old positions of all vertices before any new position
//! is written, so the result does not depend on vertex order or on whether
//! the pass runs in parallel.
//!
//! # Example
//!
//! ```
//! use trellis::algo::smooth::{laplacian_smooth, SmoothOptions};
//! use trellis::seed::{Cube, Generator};
//!
//! let mut mesh = Cube::default().produce();
//! let options = SmoothOptions::default().with_iterations(5).with_lambda(0.3);
//! laplacian_smooth(&mut mesh, &options);
//! ```

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::mesh::{AdjacencyIndex, Mesh};

use super::Progress;

/// Options for mesh smoothing algorithms.
#[derive(Debug, Clone)]
pub struct SmoothOptions {
    /// Number of smoothing iterations.
    pub iterations: usize,

    /// Smoothing factor (0.0 to 1.0).
    /// Higher values result in more aggressive smoothing.
    pub lambda: f64,

    /// Whether to preserve boundary vertices (don't move them).
    pub preserve_boundary: bool,

    /// Whether to use parallel execution (default: true).
    pub parallel: bool,
}

impl Default for SmoothOptions {
    fn default() -> Self {
        Self {
            iterations: 1,
            lambda: 0.5,
            preserve_boundary: true,
            parallel: true,
        }
    }
}

impl SmoothOptions {
    /// Create options with the specified number of iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Create options with the specified lambda value.
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda.clamp(0.0, 1.0);
        self
    }

    /// Create options that allow boundary vertices to move.
    pub fn allow_boundary_movement(mut self) -> Self {
        self.preserve_boundary = false;
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

    fn is_noop(&self) -> bool {
        self.iterations == 0 || self.lambda == 0.0
    }
}

/// Per-vertex data the smoothing passes need, computed once.
struct Neighborhood {
    neighbors: Vec<Vec<usize>>,
    pinned: Vec<bool>,
}

impl Neighborhood {
    fn build(mesh: &Mesh, preserve_boundary: bool) -> Self {
        let n = mesh.num_vertices();
        let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (_, edge) in mesh.directed_edges() {
            let (a, b) = (edge.from().index(), edge.to().index());
            if !neighbors[a].contains(&b) {
                neighbors[a].push(b);
            }
            if !neighbors[b].contains(&a) {
                neighbors[b].push(a);
            }
        }

        let mut pinned = vec![false; n];
        if preserve_boundary {
            for edge in AdjacencyIndex::build(mesh).boundary_edges() {
                pinned[edge.from().index()] = true;
                pinned[edge.to().index()] = true;
            }
        }

        Self { neighbors, pinned }
    }

    /// One Laplacian step with factor `lambda` for every vertex.
    fn step(&self, mesh: &mut Mesh, lambda: f64, parallel: bool) {
        let old = mesh.positions();
        let update = |i: usize| {
            let pos = old[i];
            let around = &self.neighbors[i];
            if self.pinned[i] || around.is_empty() {
                return pos;
            }
            let centroid: Vector3<f64> =
                around.iter().map(|&j| old[j].coords).sum::<Vector3<f64>>() / around.len() as f64;
            Point3::from(pos.coords + (centroid - pos.coords) * lambda)
        };

        let new_positions: Vec<Point3<f64>> = if parallel {
            (0..old.len()).into_par_iter().map(update).collect()
        } else {
            (0..old.len()).map(update).collect()
        };
        mesh.vertices = new_positions;
    }
}

/// Performs Laplacian smoothing on a mesh.
///
/// Laplacian smoothing moves each vertex towards the centroid of its neighbors.
/// This is a simple and fast smoothing method, but it tends to shrink the mesh
/// over multiple iterations. For shrinkage-resistant smoothing, use [`taubin_smooth`].
///
/// # Algorithm
///
/// For each iteration:
/// 1. For each vertex v, compute the centroid c of its neighbors
/// 2. Move v towards c: `new_pos = old_pos + λ * (c - old_pos)`
pub fn laplacian_smooth(mesh: &mut Mesh, options: &SmoothOptions) {
    laplacian_smooth_with_progress(mesh, options, &Progress::none());
}

/// Laplacian smoothing with progress reporting.
pub fn laplacian_smooth_with_progress(mesh: &mut Mesh, options: &SmoothOptions, progress: &Progress) {
    if options.is_noop() {
        return;
    }

    let hood = Neighborhood::build(mesh, options.preserve_boundary);
    for iter in 0..options.iterations {
        progress.report(iter, options.iterations, "Laplacian smoothing");
        hood.step(mesh, options.lambda, options.parallel);
    }
    progress.report(options.iterations, options.iterations, "Laplacian smoothing");
    log::debug!("laplacian_smooth: {} iterations, λ = {}", options.iterations, options.lambda);
}

/// Performs Taubin smoothing on a mesh.
///
/// Taubin smoothing alternates between a positive smoothing step (λ) and a
/// negative "inflation" step (μ) to reduce the shrinkage that occurs with
/// standard Laplacian smoothing.
///
/// The μ value is computed as: `μ = λ / (k * λ - 1)` with the passband
/// frequency k = 0.1.
///
/// # Reference
///
/// Taubin, G. (1995). "A signal processing approach to fair surface design."
/// SIGGRAPH '95.
pub fn taubin_smooth(mesh: &mut Mesh, options: &SmoothOptions) {
    taubin_smooth_with_progress(mesh, options, &Progress::none());
}

/// Taubin smoothing with progress reporting.
pub fn taubin_smooth_with_progress(mesh: &mut Mesh, options: &SmoothOptions, progress: &Progress) {
    if options.is_noop() {
        return;
    }

    let k_pb = 0.1_f64;
    let mu = options.lambda / (k_pb * options.lambda - 1.0);

    let hood = Neighborhood::build(mesh, options.preserve_boundary);
    for iter in 0..options.iterations {
        progress.report(iter, options.iterations, "Taubin smoothing");
        hood.step(mesh, options.lambda, options.parallel);
        hood.step(mesh, mu, options.parallel);
    }
    progress.report(options.iterations, options.iterations, "Taubin smoothing");
    log::debug!(
        "taubin_smooth: {} iterations, λ = {}, μ = {:.4}",
        options.iterations,
        options.lambda,
        mu
    );
}
