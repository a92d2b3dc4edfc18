//! Predicate-based face and vertex selection.
//!
//! Modifiers that act on part of a mesh take a [`Selection`]: an ordered,
//! duplicate-free list of faces. Selections are built by running a
//! [`FacePredicate`] over every face, and combined with set operations.
//!
//! # Example
//!
//! ```
//! use trellis::seed::{Generator, Cube};
//! use trellis::select::{select_faces, FacePredicate, NormalSimilarity, VertexCount};
//! use nalgebra::Vector3;
//!
//! let mesh = Cube::default().produce();
//! let top = select_faces(
//!     &mesh,
//!     &VertexCount::exactly(4).and(NormalSimilarity::new(Vector3::z(), 0.1)),
//! );
//! assert_eq!(top.len(), 1);
//! ```

use std::collections::HashMap;

use nalgebra::{Point3, Vector3};

use crate::mesh::{Axis, Face, FaceId, Mesh, VertexId};

/// An ordered, duplicate-free set of faces of one mesh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    faces: Vec<FaceId>,
}

impl Selection {
    /// An empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// A selection of the given faces, sorted and de-duplicated.
    pub fn from_faces<I: IntoIterator<Item = FaceId>>(faces: I) -> Self {
        let mut faces: Vec<FaceId> = faces.into_iter().collect();
        faces.sort_unstable();
        faces.dedup();
        Self { faces }
    }

    /// Every face of `mesh`.
    pub fn all(mesh: &Mesh) -> Self {
        Self {
            faces: mesh.face_ids().collect(),
        }
    }

    /// Number of selected faces.
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// True if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Selected faces in mesh order.
    pub fn faces(&self) -> &[FaceId] {
        &self.faces
    }

    /// Iterate over the selected faces in mesh order.
    pub fn iter(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces.iter().copied()
    }

    /// True if `f` is selected.
    pub fn contains(&self, f: FaceId) -> bool {
        self.faces.binary_search(&f).is_ok()
    }

    /// Faces in either selection.
    pub fn union(&self, other: &Selection) -> Selection {
        Self::from_faces(self.iter().chain(other.iter()))
    }

    /// Faces in both selections.
    pub fn intersection(&self, other: &Selection) -> Selection {
        Self {
            faces: self.iter().filter(|&f| other.contains(f)).collect(),
        }
    }

    /// Faces in this selection but not in `other`.
    pub fn difference(&self, other: &Selection) -> Selection {
        Self {
            faces: self.iter().filter(|&f| !other.contains(f)).collect(),
        }
    }

    /// Faces of `mesh` not in this selection.
    pub fn complement(&self, mesh: &Mesh) -> Selection {
        Self {
            faces: mesh.face_ids().filter(|&f| !self.contains(f)).collect(),
        }
    }
}

impl FromIterator<FaceId> for Selection {
    fn from_iter<I: IntoIterator<Item = FaceId>>(iter: I) -> Self {
        Self::from_faces(iter)
    }
}

/// A yes/no test applied to one face of a mesh.
pub trait FacePredicate {
    /// Whether `face` of `mesh` is selected.
    fn matches(&self, mesh: &Mesh, face: FaceId) -> bool;

    /// Both predicates must match.
    fn and<P: FacePredicate>(self, other: P) -> And<Self, P>
    where
        Self: Sized,
    {
        And(self, other)
    }

    /// Either predicate must match.
    fn or<P: FacePredicate>(self, other: P) -> Or<Self, P>
    where
        Self: Sized,
    {
        Or(self, other)
    }

    /// The predicate must not match.
    fn not(self) -> Not<Self>
    where
        Self: Sized,
    {
        Not(self)
    }
}

impl<F> FacePredicate for F
where
    F: Fn(&Mesh, FaceId) -> bool,
{
    fn matches(&self, mesh: &Mesh, face: FaceId) -> bool {
        self(mesh, face)
    }
}

/// Conjunction of two predicates.
#[derive(Debug, Clone)]
pub struct And<A, B>(pub A, pub B);

impl<A: FacePredicate, B: FacePredicate> FacePredicate for And<A, B> {
    fn matches(&self, mesh: &Mesh, face: FaceId) -> bool {
        self.0.matches(mesh, face) && self.1.matches(mesh, face)
    }
}

/// Disjunction of two predicates.
#[derive(Debug, Clone)]
pub struct Or<A, B>(pub A, pub B);

impl<A: FacePredicate, B: FacePredicate> FacePredicate for Or<A, B> {
    fn matches(&self, mesh: &Mesh, face: FaceId) -> bool {
        self.0.matches(mesh, face) || self.1.matches(mesh, face)
    }
}

/// Negation of a predicate.
#[derive(Debug, Clone)]
pub struct Not<A>(pub A);

impl<A: FacePredicate> FacePredicate for Not<A> {
    fn matches(&self, mesh: &Mesh, face: FaceId) -> bool {
        !self.0.matches(mesh, face)
    }
}

/// Faces whose corner count lies in `min..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexCount {
    /// Smallest accepted corner count.
    pub min: usize,
    /// Largest accepted corner count.
    pub max: usize,
}

impl VertexCount {
    /// Exactly `n` corners.
    pub fn exactly(n: usize) -> Self {
        Self { min: n, max: n }
    }

    /// At least `n` corners.
    pub fn at_least(n: usize) -> Self {
        Self {
            min: n,
            max: usize::MAX,
        }
    }
}

impl FacePredicate for VertexCount {
    fn matches(&self, mesh: &Mesh, face: FaceId) -> bool {
        let n = mesh.face(face).len();
        n >= self.min && n <= self.max
    }
}

/// Which part of a face must lie inside a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundsTest {
    /// Every corner must be inside.
    #[default]
    AllVertices,
    /// At least one corner must be inside.
    AnyVertex,
    /// The centroid must be inside.
    Centroid,
}

/// Faces inside an axis-aligned box (bounds inclusive).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WithinBounds {
    /// Minimum corner.
    pub min: Point3<f64>,
    /// Maximum corner.
    pub max: Point3<f64>,
    /// What has to be inside.
    pub test: BoundsTest,
}

impl WithinBounds {
    /// Faces entirely inside the box.
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self {
            min,
            max,
            test: BoundsTest::AllVertices,
        }
    }

    /// Use a different containment test.
    pub fn with_test(mut self, test: BoundsTest) -> Self {
        self.test = test;
        self
    }

    fn contains(&self, p: &Point3<f64>) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] && p[i] <= self.max[i])
    }
}

impl FacePredicate for WithinBounds {
    fn matches(&self, mesh: &Mesh, face: FaceId) -> bool {
        let corners = mesh.face(face).indices();
        match self.test {
            BoundsTest::AllVertices => corners.iter().all(|&v| self.contains(mesh.position(v))),
            BoundsTest::AnyVertex => corners.iter().any(|&v| self.contains(mesh.position(v))),
            BoundsTest::Centroid => self.contains(&mesh.face_centroid(face)),
        }
    }
}

/// Faces whose centroid lies on one side of an axis-aligned plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CentroidPlane {
    /// Plane normal axis.
    pub axis: Axis,
    /// Plane offset along the axis.
    pub value: f64,
    /// Select the side with larger coordinates (`true`) or smaller ones.
    pub above: bool,
}

impl CentroidPlane {
    /// Faces with centroid coordinate `>= value`.
    pub fn above(axis: Axis, value: f64) -> Self {
        Self {
            axis,
            value,
            above: true,
        }
    }

    /// Faces with centroid coordinate `<= value`.
    pub fn below(axis: Axis, value: f64) -> Self {
        Self {
            axis,
            value,
            above: false,
        }
    }
}

impl FacePredicate for CentroidPlane {
    fn matches(&self, mesh: &Mesh, face: FaceId) -> bool {
        let c = mesh.face_centroid(face)[self.axis.index()];
        if self.above {
            c >= self.value
        } else {
            c <= self.value
        }
    }
}

/// Faces whose normal is within `max_angle` radians of a direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalSimilarity {
    direction: Vector3<f64>,
    cos_max_angle: f64,
}

impl NormalSimilarity {
    /// Faces facing `direction` give or take `max_angle` radians.
    ///
    /// A zero direction selects nothing.
    pub fn new(direction: Vector3<f64>, max_angle: f64) -> Self {
        Self {
            direction: direction
                .try_normalize(f64::EPSILON)
                .unwrap_or_else(Vector3::zeros),
            cos_max_angle: max_angle.cos(),
        }
    }
}

impl FacePredicate for NormalSimilarity {
    fn matches(&self, mesh: &Mesh, face: FaceId) -> bool {
        let normal = mesh.face_normal(face);
        if normal == Vector3::zeros() || self.direction == Vector3::zeros() {
            return false;
        }
        normal.dot(&self.direction) >= self.cos_max_angle
    }
}

/// Faces carrying the given tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tagged(pub String);

impl FacePredicate for Tagged {
    fn matches(&self, mesh: &Mesh, face: FaceId) -> bool {
        mesh.face(face).tag() == Some(self.0.as_str())
    }
}

/// Run `predicate` over every face.
pub fn select_faces<P: FacePredicate + ?Sized>(mesh: &Mesh, predicate: &P) -> Selection {
    Selection {
        faces: mesh
            .face_ids()
            .filter(|&f| predicate.matches(mesh, f))
            .collect(),
    }
}

/// Vertices inside an axis-aligned box (bounds inclusive), in index order.
pub fn select_vertices(mesh: &Mesh, min: Point3<f64>, max: Point3<f64>) -> Vec<VertexId> {
    let bounds = WithinBounds::new(min, max);
    mesh.vertex_ids()
        .filter(|&v| bounds.contains(mesh.position(v)))
        .collect()
}

/// Every face that duplicates an earlier face (same vertex set, any rotation
/// or winding). The first face of each duplicate class is not selected.
pub fn duplicate_faces(mesh: &Mesh) -> Selection {
    let mut seen: HashMap<Vec<VertexId>, FaceId> = HashMap::with_capacity(mesh.num_faces());
    let mut duplicates = Vec::new();
    for (f, face) in mesh.face_ids().zip(mesh.faces()) {
        if seen.insert(face.canonical_key(), f).is_some() {
            duplicates.push(f);
        }
    }
    Selection { faces: duplicates }
}

/// Remove the selected faces. Vertices are left in place. Returns the number
/// of faces removed.
pub fn delete_faces(mesh: &mut Mesh, selection: &Selection) -> usize {
    mesh.retain_faces(|f, _| !selection.contains(f))
}

/// Set the tag of every selected face.
pub fn tag_faces(mesh: &mut Mesh, selection: &Selection, tag: &str) {
    for f in selection.iter() {
        mesh.face_mut(f).set_tag(Some(tag.to_string()));
    }
}

/// Copy the selected faces into a new mesh holding only the vertices they use.
/// Vertex and face order follow the source mesh.
pub fn extract(mesh: &Mesh, selection: &Selection) -> Mesh {
    let faces: Vec<Face> = selection.iter().map(|f| mesh.face(f).clone()).collect();
    let mut out = Mesh {
        vertices: mesh.positions().to_vec(),
        faces,
    };
    out.remove_unreferenced_vertices();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{Cube, Generator, Grid};

    #[test]
    fn test_vertex_count() {
        let mut mesh = Cube::default().produce();
        mesh.add_face([0usize, 1, 2]).unwrap();
        assert_eq!(select_faces(&mesh, &VertexCount::exactly(3)).len(), 1);
        assert_eq!(select_faces(&mesh, &VertexCount::at_least(4)).len(), 6);
    }

    #[test]
    fn test_normal_similarity_on_cube() {
        let mesh = Cube::default().produce();
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let pos = select_faces(&mesh, &NormalSimilarity::new(axis.unit(), 0.01));
            let neg = select_faces(&mesh, &NormalSimilarity::new(-axis.unit(), 0.01));
            assert_eq!(pos.len(), 1);
            assert_eq!(neg.len(), 1);
            assert_ne!(pos, neg);
        }
        let side = NormalSimilarity::new(Vector3::z(), 0.01).not();
        assert_eq!(select_faces(&mesh, &side).len(), 5);
    }

    #[test]
    fn test_centroid_plane_and_bounds() {
        let mesh = Grid::new(4, 4).produce();
        let left = select_faces(&mesh, &CentroidPlane::below(Axis::X, 0.0));
        assert_eq!(left.len(), 8);

        let corner = WithinBounds::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(-0.5, -0.5, 1.0));
        assert_eq!(select_faces(&mesh, &corner).len(), 1);
        let touching = corner.with_test(BoundsTest::AnyVertex);
        assert_eq!(select_faces(&mesh, &touching).len(), 4);
    }

    #[test]
    fn test_closure_predicate() {
        let mesh = Grid::new(2, 2).produce();
        let even = |_: &Mesh, f: FaceId| f.index() % 2 == 0;
        assert_eq!(select_faces(&mesh, &even).faces(), &[FaceId::new(0), FaceId::new(2)]);
    }

    #[test]
    fn test_set_operations() {
        let mesh = Grid::new(2, 2).produce();
        let a = Selection::from_faces([FaceId::new(2), FaceId::new(0), FaceId::new(2)]);
        let b: Selection = [FaceId::new(1), FaceId::new(2)].into_iter().collect();
        assert_eq!(a.faces(), &[FaceId::new(0), FaceId::new(2)]);
        assert_eq!(a.union(&b).len(), 3);
        assert_eq!(a.intersection(&b).faces(), &[FaceId::new(2)]);
        assert_eq!(a.difference(&b).faces(), &[FaceId::new(0)]);
        assert_eq!(a.complement(&mesh).faces(), &[FaceId::new(1), FaceId::new(3)]);
    }

    #[test]
    fn test_duplicate_faces() {
        let mut mesh = Cube::default().produce();
        let first = mesh.face(FaceId::new(2)).clone();
        mesh.insert_face(first.reversed()).unwrap();
        mesh.insert_face(first).unwrap();

        let dups = duplicate_faces(&mesh);
        assert_eq!(dups.faces(), &[FaceId::new(6), FaceId::new(7)]);

        assert_eq!(delete_faces(&mut mesh, &dups), 2);
        assert!(duplicate_faces(&mesh).is_empty());
    }

    #[test]
    fn test_tag_and_extract() {
        let mut mesh = Cube::default().produce();
        let top = select_faces(&mesh, &NormalSimilarity::new(Vector3::z(), 0.01));
        tag_faces(&mut mesh, &top, "lid");
        assert_eq!(select_faces(&mesh, &Tagged("lid".into())), top);

        let lid = extract(&mesh, &top);
        assert_eq!(lid.num_faces(), 1);
        assert_eq!(lid.num_vertices(), 4);
        assert_eq!(lid.faces()[0].tag(), Some("lid"));
    }

    #[test]
    fn test_select_vertices() {
        let mesh = Cube::default().produce();
        let high = select_vertices(&mesh, Point3::new(-1.0, -1.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        assert_eq!(high.len(), 4);
    }
}
