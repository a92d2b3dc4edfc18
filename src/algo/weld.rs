//! Vertex welding and double removal.
//!
//! Coincident vertices are merged into the lowest-indexed member of their
//! group, faces are rewritten through the merge map, and the clean-up that
//! merging makes necessary is done in the same pass: faces that collapse to
//! fewer than three distinct corners are dropped, as are faces that now
//! duplicate an earlier face, and vertices no face references any more are
//! removed.

use std::collections::{HashMap, HashSet};

use nalgebra::Point3;
use rayon::prelude::*;

use crate::error::{MeshError, Result};
use crate::mesh::{Mesh, VertexId};

/// When two positions count as the same point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeldTolerance {
    /// Bit-identical coordinates (`-0.0` equals `0.0`).
    Exact,
    /// Equal after rounding every coordinate to this many decimal places.
    Decimals(u32),
    /// Closer than this Euclidean distance.
    Distance(f64),
}

impl Default for WeldTolerance {
    fn default() -> Self {
        WeldTolerance::Decimals(4)
    }
}

/// Options for [`weld`].
#[derive(Debug, Clone, PartialEq)]
pub struct WeldOptions {
    /// Position equality.
    pub tolerance: WeldTolerance,

    /// Whether to drop faces that duplicate an earlier face (default: true).
    pub remove_duplicate_faces: bool,

    /// Whether to compute position keys in parallel (default: true).
    pub parallel: bool,
}

impl Default for WeldOptions {
    fn default() -> Self {
        Self::new(WeldTolerance::default())
    }
}

impl WeldOptions {
    /// Options with the given tolerance.
    pub fn new(tolerance: WeldTolerance) -> Self {
        Self {
            tolerance,
            remove_duplicate_faces: true,
            parallel: true,
        }
    }

    /// Exact-match welding.
    pub fn exact() -> Self {
        Self::new(WeldTolerance::Exact)
    }

    /// Set whether duplicate faces are removed.
    pub fn with_remove_duplicate_faces(mut self, remove: bool) -> Self {
        self.remove_duplicate_faces = remove;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    fn validate(&self) -> Result<()> {
        match self.tolerance {
            WeldTolerance::Decimals(d) if d > MAX_DECIMALS => Err(MeshError::invalid_param(
                "decimals",
                d,
                "more places than an f64 can hold",
            )),
            WeldTolerance::Distance(eps) if !(eps.is_finite() && eps > 0.0) => Err(
                MeshError::invalid_param("distance", eps, "must be positive and finite"),
            ),
            _ => Ok(()),
        }
    }
}

const MAX_DECIMALS: u32 = 15;

/// What a weld pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeldReport {
    /// Vertices redirected to another vertex.
    pub merged_vertices: usize,
    /// Vertices removed from the vertex list.
    pub removed_vertices: usize,
    /// Faces dropped for having fewer than three distinct corners.
    pub degenerate_faces: usize,
    /// Faces dropped as duplicates of an earlier face.
    pub duplicate_faces: usize,
}

impl WeldReport {
    /// Whether the pass left the mesh untouched.
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Weld coincident vertices of `mesh` in place.
///
/// # Example
///
/// ```
/// use trellis::algo::weld::{weld, WeldOptions};
/// use trellis::mesh::Mesh;
/// use nalgebra::Point3;
///
/// // Two triangles that touch along an edge but do not share vertices.
/// let positions = [
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mut mesh = Mesh::from_polygons(&positions, &[[0usize, 1, 2], [3, 4, 5]]).unwrap();
///
/// let report = weld(&mut mesh, &WeldOptions::exact()).unwrap();
/// assert_eq!(report.merged_vertices, 2);
/// assert_eq!(mesh.num_vertices(), 4);
/// ```
pub fn weld(mesh: &mut Mesh, options: &WeldOptions) -> Result<WeldReport> {
    options.validate()?;
    if mesh.is_empty() {
        return Ok(WeldReport::default());
    }

    let remap = match options.tolerance {
        WeldTolerance::Exact => merge_by_key(mesh.positions(), options.parallel, exact_key),
        WeldTolerance::Decimals(d) => {
            let scale = 10f64.powi(d as i32);
            merge_by_key(mesh.positions(), options.parallel, |p| rounded_key(p, scale))
        }
        WeldTolerance::Distance(eps) => merge_by_distance(mesh.positions(), eps),
    };

    let mut report = WeldReport {
        merged_vertices: remap.iter().enumerate().filter(|&(i, r)| r.index() != i).count(),
        ..WeldReport::default()
    };

    if report.merged_vertices > 0 {
        for face in &mut mesh.faces {
            let indices = face.indices_mut();
            for v in indices.iter_mut() {
                *v = remap[v.index()];
            }
            indices.dedup();
            while indices.len() > 1 && indices.first() == indices.last() {
                indices.pop();
            }
        }
        report.degenerate_faces = mesh.retain_faces(|_, face| face.distinct_count() >= 3);
    }

    if options.remove_duplicate_faces {
        let mut seen: HashSet<Vec<VertexId>> = HashSet::with_capacity(mesh.num_faces());
        report.duplicate_faces = mesh.retain_faces(|_, face| seen.insert(face.canonical_key()));
    }

    if report.merged_vertices > 0 || report.degenerate_faces > 0 || report.duplicate_faces > 0 {
        report.removed_vertices = mesh.remove_unreferenced_vertices();
    }

    log::debug!(
        "weld: merged {}, removed {} vertices, dropped {} degenerate and {} duplicate faces",
        report.merged_vertices,
        report.removed_vertices,
        report.degenerate_faces,
        report.duplicate_faces
    );
    Ok(report)
}

fn exact_key(p: &Point3<f64>) -> [u64; 3] {
    // -0.0 + 0.0 == +0.0
    [(p.x + 0.0).to_bits(), (p.y + 0.0).to_bits(), (p.z + 0.0).to_bits()]
}

fn rounded_key(p: &Point3<f64>, scale: f64) -> [i64; 3] {
    [
        (p.x * scale).round() as i64,
        (p.y * scale).round() as i64,
        (p.z * scale).round() as i64,
    ]
}

/// Map each vertex to the first vertex with the same key.
fn merge_by_key<K, F>(positions: &[Point3<f64>], parallel: bool, key: F) -> Vec<VertexId>
where
    K: std::hash::Hash + Eq + Send,
    F: Fn(&Point3<f64>) -> K + Sync,
{
    let keys: Vec<K> = if parallel {
        positions.par_iter().map(&key).collect()
    } else {
        positions.iter().map(&key).collect()
    };

    let mut first: HashMap<K, VertexId> = HashMap::with_capacity(keys.len());
    keys.into_iter()
        .enumerate()
        .map(|(i, k)| *first.entry(k).or_insert(VertexId::new(i)))
        .collect()
}

/// Map each vertex to the lowest-indexed vertex within `epsilon`, using a
/// spatial hash with cells of twice the tolerance.
fn merge_by_distance(positions: &[Point3<f64>], epsilon: f64) -> Vec<VertexId> {
    let cell_size = epsilon * 2.0;
    let cell_of = |p: &Point3<f64>| {
        (
            (p.x / cell_size).floor() as i64,
            (p.y / cell_size).floor() as i64,
            (p.z / cell_size).floor() as i64,
        )
    };

    let mut grid: HashMap<(i64, i64, i64), Vec<usize>> = HashMap::new();
    for (i, p) in positions.iter().enumerate() {
        grid.entry(cell_of(p)).or_default().push(i);
    }

    let mut remap: Vec<usize> = (0..positions.len()).collect();
    for (i, p) in positions.iter().enumerate() {
        if remap[i] != i {
            continue;
        }
        let (cx, cy, cz) = cell_of(p);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(candidates) = grid.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &j in candidates {
                        if j > i && remap[j] == j && (positions[j] - p).norm() < epsilon {
                            remap[j] = i;
                        }
                    }
                }
            }
        }
    }

    remap.into_iter().map(VertexId::new).collect()
}
