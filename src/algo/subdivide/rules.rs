//! Vertex repositioning rules for face-split subdivision.

use nalgebra::{Point3, Vector3};

/// Everything a rule may look at when moving an original vertex.
#[derive(Debug, Clone)]
pub struct VertexStencil {
    /// Position before this pass.
    pub position: Point3<f64>,
    /// Mean of the face points of the faces around the vertex.
    pub face_average: Vector3<f64>,
    /// Mean of the edge points of the edges around the vertex.
    pub edge_average: Vector3<f64>,
    /// Number of faces around the vertex.
    pub valence: usize,
    /// Old positions of the neighbors reached through boundary edges.
    pub boundary_neighbors: Vec<Point3<f64>>,
}

impl VertexStencil {
    /// Whether the vertex lies on at least one boundary edge.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        !self.boundary_neighbors.is_empty()
    }
}

/// Where an original vertex goes after one subdivision pass.
pub trait VertexRule: Send + Sync {
    /// New position for the vertex described by `stencil`.
    fn reposition(&self, stencil: &VertexStencil) -> Point3<f64>;

    /// `false` if [`reposition`](VertexRule::reposition) always returns the
    /// old position, letting the split skip building stencils.
    fn moves_vertices(&self) -> bool {
        true
    }

    /// `true` if interior edge points blend in the two adjacent face points;
    /// `false` places every edge point at the edge midpoint.
    fn smooths_edges(&self) -> bool {
        true
    }
}

/// The Catmull-Clark vertex rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatmullClark {
    /// Apply the crease rule on boundaries instead of the interior rule.
    pub preserve_boundary: bool,
}

impl Default for CatmullClark {
    fn default() -> Self {
        Self {
            preserve_boundary: true,
        }
    }
}

impl VertexRule for CatmullClark {
    fn reposition(&self, s: &VertexStencil) -> Point3<f64> {
        if s.valence == 0 {
            return s.position;
        }

        if self.preserve_boundary && s.is_boundary() {
            return match s.boundary_neighbors.as_slice() {
                // A single face meeting at the vertex makes it a corner
                [_, _] if s.valence == 1 => s.position,
                [a, b] => Point3::from(s.position.coords * 0.75 + (a.coords + b.coords) * 0.125),
                // Pinched vertices stay put
                _ => s.position,
            };
        }

        let n = s.valence as f64;
        Point3::from((s.face_average + s.edge_average * 2.0 + s.position.coords * (n - 3.0)) / n)
    }
}

/// Leaves original vertices where they are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeepPositions;

impl VertexRule for KeepPositions {
    #[inline]
    fn reposition(&self, s: &VertexStencil) -> Point3<f64> {
        s.position
    }

    fn moves_vertices(&self) -> bool {
        false
    }

    fn smooths_edges(&self) -> bool {
        false
    }
}
