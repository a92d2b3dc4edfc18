//! Polygon faces.

use super::edge::DirectedEdge;
use super::index::VertexId;

/// A polygon: an ordered loop of at least three vertex indices.
///
/// The order of the indices is the winding; by convention a counter-clockwise
/// loop seen from outside faces outward. The optional tag is free-form
/// metadata for downstream consumers (material names, part labels) and is
/// carried through modifiers onto the faces derived from this one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    indices: Vec<VertexId>,
    tag: Option<String>,
}

impl Face {
    /// Create an untagged face. Validation against a vertex list happens in
    /// [`Mesh::add_face`](super::Mesh::add_face).
    pub fn new<I, V>(indices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<VertexId>,
    {
        Self {
            indices: indices.into_iter().map(Into::into).collect(),
            tag: None,
        }
    }

    /// Attach a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// The vertex loop.
    #[inline]
    pub fn indices(&self) -> &[VertexId] {
        &self.indices
    }

    /// Mutable access to the vertex loop.
    #[inline]
    pub fn indices_mut(&mut self) -> &mut Vec<VertexId> {
        &mut self.indices
    }

    /// Number of corners.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// True for a face with no corners (never the case for faces stored in a mesh).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The tag, if any.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Replace the tag.
    pub fn set_tag(&mut self, tag: Option<String>) {
        self.tag = tag;
    }

    /// Corner `i`, wrapping around the loop.
    #[inline]
    pub fn corner(&self, i: usize) -> VertexId {
        self.indices[i % self.indices.len()]
    }

    /// Position of `v` in the loop.
    pub fn position_of(&self, v: VertexId) -> Option<usize> {
        self.indices.iter().position(|&x| x == v)
    }

    /// Directed edges in winding order, including the closing edge.
    ///
    /// # Panics
    /// Panics if two consecutive corners are the same vertex.
    pub fn edges(&self) -> impl Iterator<Item = DirectedEdge> + '_ {
        let n = self.indices.len();
        (0..n).map(move |i| DirectedEdge::new(self.indices[i], self.indices[(i + 1) % n]))
    }

    /// Reverse the winding in place. The first corner stays first.
    pub fn reverse(&mut self) {
        if self.indices.len() > 1 {
            self.indices[1..].reverse();
        }
    }

    /// A copy of this face with reversed winding.
    pub fn reversed(&self) -> Self {
        let mut face = self.clone();
        face.reverse();
        face
    }

    /// Number of distinct vertices in the loop.
    pub fn distinct_count(&self) -> usize {
        let mut sorted = self.indices.clone();
        sorted.sort_unstable();
        sorted.dedup();
        sorted.len()
    }

    /// Key shared by all faces with the same vertex set, independent of
    /// rotation and winding.
    pub fn canonical_key(&self) -> Vec<VertexId> {
        let mut key = self.indices.clone();
        key.sort_unstable();
        key
    }

    /// True if `other` uses the same vertex set.
    pub fn is_duplicate_of(&self, other: &Face) -> bool {
        self.len() == other.len() && self.canonical_key() == other.canonical_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_wrap() {
        let face = Face::new([0usize, 1, 2, 3]);
        let edges: Vec<_> = face.edges().collect();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[3], DirectedEdge::new(3usize, 0usize));
    }

    #[test]
    fn test_reverse_keeps_first_corner() {
        let face = Face::new([0usize, 1, 2, 3]).reversed();
        let raw: Vec<usize> = face.indices().iter().map(|v| v.index()).collect();
        assert_eq!(raw, vec![0, 3, 2, 1]);
    }

    #[test]
    fn test_duplicates_ignore_rotation_and_winding() {
        let a = Face::new([4usize, 5, 6]);
        let b = Face::new([6usize, 4, 5]);
        let c = Face::new([4usize, 6, 5]);
        let d = Face::new([4usize, 5, 7]);
        assert!(a.is_duplicate_of(&b));
        assert!(a.is_duplicate_of(&c));
        assert!(!a.is_duplicate_of(&d));
    }

    #[test]
    fn test_tag() {
        let face = Face::new([0usize, 1, 2]).with_tag("rim");
        assert_eq!(face.tag(), Some("rim"));
        assert_eq!(face.reversed().tag(), Some("rim"));
    }
}
