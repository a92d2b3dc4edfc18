//! Directed edges.
//!
//! A [`DirectedEdge`] is one face's view of an undirected mesh edge: the
//! ordered pair of consecutive (wrapping) indices within that face. In a
//! manifold mesh every undirected edge appears as exactly two directed edges
//! pointing in opposite directions, each owned by a different face.

use std::fmt;

use super::index::VertexId;
use crate::error::{MeshError, Result};

/// An ordered vertex-index pair `(from, to)` with `from != to`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DirectedEdge {
    from: VertexId,
    to: VertexId,
}

impl DirectedEdge {
    /// Create a directed edge.
    ///
    /// # Panics
    /// Panics if `from == to`. A self-loop is a contract violation; use
    /// [`DirectedEdge::try_new`] when the endpoints come from untrusted input.
    #[inline]
    pub fn new(from: impl Into<VertexId>, to: impl Into<VertexId>) -> Self {
        let (from, to) = (from.into(), to.into());
        assert!(from != to, "directed edge endpoints must differ (got {from} -> {to})");
        Self { from, to }
    }

    /// Create a directed edge, reporting a self-loop as an error.
    pub fn try_new(from: impl Into<VertexId>, to: impl Into<VertexId>) -> Result<Self> {
        let (from, to) = (from.into(), to.into());
        if from == to {
            return Err(MeshError::InvalidEdge {
                from: from.index() as i64,
                to: to.index() as i64,
                reason: "endpoints must differ",
            });
        }
        Ok(Self { from, to })
    }

    /// Start vertex.
    #[inline]
    pub fn from(self) -> VertexId {
        self.from
    }

    /// End vertex.
    #[inline]
    pub fn to(self) -> VertexId {
        self.to
    }

    /// The same edge seen from the other side.
    #[inline]
    pub fn reversed(self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }

    /// Order-independent key identifying the undirected edge.
    #[inline]
    pub fn undirected(self) -> (VertexId, VertexId) {
        if self.from < self.to {
            (self.from, self.to)
        } else {
            (self.to, self.from)
        }
    }

    /// Both endpoints shifted by `offset`.
    #[inline]
    pub fn offset(self, offset: usize) -> Self {
        Self {
            from: self.from.offset(offset),
            to: self.to.offset(offset),
        }
    }
}

impl fmt::Debug for DirectedEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E({} -> {})", self.from, self.to)
    }
}

impl TryFrom<(i64, i64)> for DirectedEdge {
    type Error = MeshError;

    fn try_from((from, to): (i64, i64)) -> Result<Self> {
        if from < 0 || to < 0 {
            return Err(MeshError::InvalidEdge {
                from,
                to,
                reason: "indices must be non-negative",
            });
        }
        if from > u32::MAX as i64 || to > u32::MAX as i64 {
            return Err(MeshError::InvalidEdge {
                from,
                to,
                reason: "index exceeds 32 bits",
            });
        }
        DirectedEdge::try_new(from as usize, to as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_pairs() {
        let e = DirectedEdge::new(3usize, 5usize);
        let r = e.reversed();
        assert_eq!(r.from().index(), 5);
        assert_eq!(r.to().index(), 3);
        assert_eq!(r.reversed(), e);
        assert_eq!(e.undirected(), r.undirected());
    }

    #[test]
    #[should_panic(expected = "must differ")]
    fn test_self_loop_panics() {
        let _ = DirectedEdge::new(2usize, 2usize);
    }

    #[test]
    fn test_fallible_construction() {
        assert!(DirectedEdge::try_new(1usize, 1usize).is_err());
        assert!(DirectedEdge::try_from((-1i64, 2i64)).is_err());
        assert!(DirectedEdge::try_from((4i64, 4i64)).is_err());
        let e = DirectedEdge::try_from((0i64, 7i64)).unwrap();
        assert_eq!(e, DirectedEdge::new(0usize, 7usize));
    }
}
