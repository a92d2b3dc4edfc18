//! # Trellis
//!
//! An indexed polygon mesh kernel with topology-transforming modifiers.
//!
//! Trellis stores a mesh as two plain vectors, vertex positions and faces
//! (each an ordered loop of vertex indices), and derives half-edge style
//! adjacency from them on demand. On top of that sit the classical
//! connectivity-changing algorithms: subdivision, solidify, dual
//! construction, loop bridging, Conway operators and vertex welding.
//!
//! ## Features
//!
//! - **Index-based storage**: no pointer links, type-safe [`VertexId`](mesh::VertexId) / [`FaceId`](mesh::FaceId)
//! - **Adjacency on demand**: [`AdjacencyIndex`](mesh::AdjacencyIndex) borrows the mesh, so it can never go stale
//! - **Selection**: composable face predicates and set operations
//! - **Modifiers**: every algorithm is a [`Modifier`](algo::pipeline::Modifier) and chains in a [`Pipeline`](algo::pipeline::Pipeline)
//! - **Deterministic**: identical input gives bit-identical output, parallel or not
//!
//! ## Quick Start
//!
//! ```
//! use trellis::prelude::*;
//! use trellis::algo::subdivide::{subdivide, SubdivideOptions};
//!
//! let mut mesh = Cube::default().produce();
//! subdivide(&mut mesh, &SubdivideOptions::new(2));
//!
//! let report = mesh.topology_report();
//! assert!(report.is_closed_manifold());
//! assert_eq!(report.euler_characteristic(), 2);
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use trellis::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//!
//! let faces = [
//!     [0usize, 2, 1], // bottom
//!     [0, 1, 3],      // front
//!     [1, 2, 3],      // right
//!     [2, 0, 3],      // left
//! ];
//!
//! let mesh = Mesh::from_polygons(&vertices, &faces).unwrap();
//! assert_eq!(mesh.num_vertices(), 4);
//! assert_eq!(mesh.num_faces(), 4);
//! ```
//!
//! ## Mesh Traversal
//!
//! ```
//! use trellis::prelude::*;
//!
//! let mesh = Octahedron.produce();
//! let index = AdjacencyIndex::build(&mesh);
//!
//! // Walk the fan of faces around a vertex
//! let v = VertexId::new(0);
//! for edge in index.vertex_fan(v).unwrap() {
//!     println!("{:?} in face {:?}", edge, index.face_of(edge));
//! }
//! assert_eq!(index.valence(v).unwrap(), 4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod mesh;
pub mod seed;
pub mod select;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use trellis::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::pipeline::{Modifier, Pipeline};
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        AdjacencyIndex, Axis, DirectedEdge, Face, FaceId, Mesh, NormalWeighting, TopologyReport,
        VertexId,
    };
    pub use crate::seed::{Cube, Dodecahedron, Generator, Grid, Icosahedron, Octahedron, Tetrahedron};
    pub use crate::select::{select_faces, FacePredicate, Selection};
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::Point3;

    #[test]
    fn test_tetrahedron() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];

        let faces = [
            [0usize, 2, 1], // bottom
            [0, 1, 3],      // front
            [1, 2, 3],      // right
            [2, 0, 3],      // left
        ];

        let mesh = Mesh::from_polygons(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 4);

        let index = AdjacencyIndex::build(&mesh);
        // 4 faces * 3 directed edges, every one paired
        assert_eq!(index.num_directed_edges(), 12);
        assert!(index.boundary_edges().is_empty());
        assert!(index.validate_closed_manifold().is_ok());

        for v in mesh.vertex_ids() {
            assert_eq!(index.valence(v).unwrap(), 3, "vertex {:?}", v);
        }
    }
}
