//! Error types for trellis.
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// A face references a vertex index that is not in the vertex list.
    #[error("face {face} references invalid vertex index {vertex} (vertex count {count})")]
    InvalidVertexIndex {
        /// The face index (the index it would have had, for faces being added).
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
        /// Number of vertices in the mesh.
        count: usize,
    },

    /// A face has fewer than three indices or repeats a vertex consecutively.
    #[error("face {face} is degenerate ({reason})")]
    DegenerateFace {
        /// The face index.
        face: usize,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A directed edge was built from invalid endpoints.
    #[error("invalid directed edge ({from}, {to}): {reason}")]
    InvalidEdge {
        /// Start vertex as supplied.
        from: i64,
        /// End vertex as supplied.
        to: i64,
        /// Reason the edge is invalid.
        reason: &'static str,
    },

    /// The mesh has non-manifold topology.
    #[error("mesh has non-manifold topology: {details}")]
    NonManifold {
        /// Description of the non-manifold condition.
        details: String,
    },

    /// A walk around a vertex hit an edge with no owning face.
    #[error("vertex {vertex} has an open face fan (edge ({from}, {to}) has no owning face)")]
    OpenFan {
        /// The vertex being walked around.
        vertex: usize,
        /// Start of the missing directed edge.
        from: usize,
        /// End of the missing directed edge.
        to: usize,
    },

    /// A vertex is not referenced by any face.
    #[error("vertex {vertex} is not referenced by any face")]
    IsolatedVertex {
        /// The vertex index.
        vertex: usize,
    },

    /// Two vertex loops passed to a bridging operation cannot be paired.
    #[error("cannot bridge loops of length {left} and {right}")]
    LoopMismatch {
        /// Length of the first loop.
        left: usize,
        /// Length of the second loop.
        right: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
