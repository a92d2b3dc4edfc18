//! Core mesh data structures.
//!
//! This module provides the indexed polygon mesh and the adjacency index built
//! on top of it.
//!
//! # Overview
//!
//! The primary type is [`Mesh`]: a vertex-position vector and a face vector,
//! each [`Face`] an ordered loop of vertex indices. There are no pointer links
//! between elements; everything is an index into one of the two vectors.
//!
//! Adjacency is derived on demand. [`AdjacencyIndex`] maps each
//! [`DirectedEdge`] to the face that owns it and gives half-edge style
//! navigation (twin, next, rotate around a vertex) in O(1) per query.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`FaceId`] - Identifies a face
//!
//! # Construction
//!
//! ```
//! use trellis::mesh::{AdjacencyIndex, Mesh};
//! use nalgebra::Point3;
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let mesh = Mesh::from_polygons(&positions, &[[0usize, 1, 2]]).unwrap();
//!
//! let index = AdjacencyIndex::build(&mesh);
//! assert_eq!(index.boundary_edges().len(), 3);
//! ```

mod adjacency;
mod axis;
mod edge;
mod face;
mod index;
mod store;

pub use adjacency::AdjacencyIndex;
pub use axis::Axis;
pub use edge::DirectedEdge;
pub use face::Face;
pub use index::{FaceId, VertexId};
pub use store::{Mesh, NormalWeighting, TopologyReport};
