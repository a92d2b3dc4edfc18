//! Indexed polygon mesh storage.
//!
//! A [`Mesh`] is an ordered vertex-position list plus an ordered face list,
//! each face an ordered loop of vertex indices. Vertices are shared: moving a
//! vertex moves every face that references it.
//!
//! The store enforces exactly one invariant, that every face index is less
//! than the vertex count. Manifoldness is not enforced here; it is a property
//! that topology-preserving modifiers maintain and that [`Mesh::topology_report`]
//! checks after the fact.

use std::collections::HashMap;

use nalgebra::{Point3, Vector3};

use super::edge::DirectedEdge;
use super::face::Face;
use super::index::{FaceId, VertexId};
use crate::error::{MeshError, Result};

/// How face normals are weighted when averaged into vertex normals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalWeighting {
    /// Weight each face by its area.
    Area,
    /// Weight each face by its interior angle at the vertex.
    #[default]
    Angle,
}

/// An indexed polygon mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub(crate) vertices: Vec<Point3<f64>>,
    pub(crate) faces: Vec<Face>,
}

impl Mesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(num_vertices),
            faces: Vec::with_capacity(num_faces),
        }
    }

    /// Build a mesh from raw positions and index loops, validating every face.
    pub fn from_polygons<F>(positions: &[Point3<f64>], polygons: &[F]) -> Result<Self>
    where
        F: AsRef<[usize]>,
    {
        let mut mesh = Self::with_capacity(positions.len(), polygons.len());
        mesh.vertices.extend_from_slice(positions);
        for polygon in polygons {
            mesh.add_face(polygon.as_ref().iter().copied())?;
        }
        Ok(mesh)
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// True if the mesh has neither vertices nor faces.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.faces.is_empty()
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId) -> &Point3<f64> {
        &self.vertices[v.index()]
    }

    /// Get a mutable reference to the position of a vertex.
    #[inline]
    pub fn position_mut(&mut self, v: VertexId) -> &mut Point3<f64> {
        &mut self.vertices[v.index()]
    }

    /// Set the position of a vertex.
    #[inline]
    pub fn set_position(&mut self, v: VertexId, pos: Point3<f64>) {
        self.vertices[v.index()] = pos;
    }

    /// All vertex positions in index order.
    #[inline]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, f: FaceId) -> &Face {
        &self.faces[f.index()]
    }

    /// Get a mutable face by ID.
    ///
    /// Editing indices through this reference bypasses validation.
    #[inline]
    pub fn face_mut(&mut self, f: FaceId) -> &mut Face {
        &mut self.faces[f.index()]
    }

    /// All faces in order.
    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Iterate over every directed edge of every face, tagged with its face.
    pub fn directed_edges(&self) -> impl Iterator<Item = (FaceId, DirectedEdge)> + '_ {
        self.faces
            .iter()
            .enumerate()
            .flat_map(|(fi, face)| face.edges().map(move |e| (FaceId::new(fi), e)))
    }

    // ==================== Construction ====================

    /// Add a new vertex and return its ID.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(position);
        id
    }

    /// Add a face after checking it against the vertex list.
    pub fn add_face<I, V>(&mut self, indices: I) -> Result<FaceId>
    where
        I: IntoIterator<Item = V>,
        V: Into<VertexId>,
    {
        self.insert_face(Face::new(indices))
    }

    /// Add a tagged face after checking it against the vertex list.
    pub fn add_face_tagged<I, V>(&mut self, indices: I, tag: impl Into<String>) -> Result<FaceId>
    where
        I: IntoIterator<Item = V>,
        V: Into<VertexId>,
    {
        self.insert_face(Face::new(indices).with_tag(tag))
    }

    /// Add a prepared [`Face`] after checking it against the vertex list.
    pub fn insert_face(&mut self, face: Face) -> Result<FaceId> {
        let id = self.faces.len();
        self.check_face(id, &face)?;
        self.faces.push(face);
        Ok(FaceId::new(id))
    }

    /// Append a face built by a modifier from indices it has just allocated.
    pub(crate) fn push_face(&mut self, face: Face) -> FaceId {
        debug_assert!(self.check_face(self.faces.len(), &face).is_ok());
        let id = FaceId::new(self.faces.len());
        self.faces.push(face);
        id
    }

    fn check_face(&self, id: usize, face: &Face) -> Result<()> {
        if face.len() < 3 {
            return Err(MeshError::DegenerateFace {
                face: id,
                reason: "fewer than 3 corners",
            });
        }
        let count = self.vertices.len();
        if let Some(bad) = face.indices().iter().find(|v| v.index() >= count) {
            return Err(MeshError::InvalidVertexIndex {
                face: id,
                vertex: bad.index(),
                count,
            });
        }
        let n = face.len();
        if (0..n).any(|i| face.corner(i) == face.corner(i + 1)) {
            return Err(MeshError::DegenerateFace {
                face: id,
                reason: "repeated consecutive vertex",
            });
        }
        Ok(())
    }

    /// Remove a face, shifting all later faces down by one.
    pub fn remove_face(&mut self, f: FaceId) -> Face {
        self.faces.remove(f.index())
    }

    /// Keep only the faces for which `keep` returns true, preserving order.
    pub fn retain_faces<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(FaceId, &Face) -> bool,
    {
        let before = self.faces.len();
        let mut index = 0;
        self.faces.retain(|face| {
            let k = keep(FaceId::new(index), face);
            index += 1;
            k
        });
        before - self.faces.len()
    }

    /// Merge `other` into this mesh. Its vertices are appended after ours and
    /// its face indices are shifted accordingly. Returns the vertex offset.
    pub fn append(&mut self, other: &Mesh) -> usize {
        let offset = self.vertices.len();
        self.vertices.extend_from_slice(&other.vertices);
        self.faces.extend(other.faces.iter().map(|face| {
            let mut face = face.clone();
            for v in face.indices_mut() {
                *v = v.offset(offset);
            }
            face
        }));
        offset
    }

    /// Reverse the winding of every face.
    pub fn reverse_winding(&mut self) {
        for face in &mut self.faces {
            face.reverse();
        }
    }

    /// Drop vertices that no face references and compact the vertex list,
    /// keeping the relative order of survivors. Returns the number removed.
    pub fn remove_unreferenced_vertices(&mut self) -> usize {
        let mut referenced = vec![false; self.vertices.len()];
        for face in &self.faces {
            for v in face.indices() {
                referenced[v.index()] = true;
            }
        }
        if referenced.iter().all(|&r| r) {
            return 0;
        }

        let mut remap = vec![usize::MAX; self.vertices.len()];
        let mut kept = Vec::with_capacity(self.vertices.len());
        for (old, pos) in self.vertices.iter().enumerate() {
            if referenced[old] {
                remap[old] = kept.len();
                kept.push(*pos);
            }
        }
        for face in &mut self.faces {
            for v in face.indices_mut() {
                *v = VertexId::new(remap[v.index()]);
            }
        }

        let removed = self.vertices.len() - kept.len();
        self.vertices = kept;
        removed
    }

    // ==================== Geometry ====================

    /// Average of a face's corner positions.
    pub fn face_centroid(&self, f: FaceId) -> Point3<f64> {
        let face = self.face(f);
        let sum: Vector3<f64> = face.indices().iter().map(|&v| self.position(v).coords).sum();
        Point3::from(sum / face.len() as f64)
    }

    /// Newell vector of a face: its normal scaled by twice its area.
    fn newell(&self, face: &Face) -> Vector3<f64> {
        let n = face.len();
        (0..n)
            .map(|i| {
                let a = self.position(face.corner(i)).coords;
                let b = self.position(face.corner(i + 1)).coords;
                a.cross(&b)
            })
            .sum()
    }

    /// Unit normal of a face (zero for a degenerate face).
    pub fn face_normal(&self, f: FaceId) -> Vector3<f64> {
        self.newell(self.face(f))
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::zeros)
    }

    /// Area of a (planar) face.
    pub fn face_area(&self, f: FaceId) -> f64 {
        0.5 * self.newell(self.face(f)).norm()
    }

    /// Total surface area.
    pub fn surface_area(&self) -> f64 {
        self.face_ids().map(|f| self.face_area(f)).sum()
    }

    /// Per-vertex unit normals averaged from adjacent faces.
    ///
    /// Vertices referenced by no face get a zero normal.
    pub fn vertex_normals(&self, weighting: NormalWeighting) -> Vec<Vector3<f64>> {
        let mut normals = vec![Vector3::zeros(); self.vertices.len()];

        for face in &self.faces {
            let area_vector = self.newell(face);
            let unit = match area_vector.try_normalize(f64::EPSILON) {
                Some(u) => u,
                None => continue,
            };
            let n = face.len();
            for i in 0..n {
                let v = face.corner(i);
                match weighting {
                    NormalWeighting::Area => normals[v.index()] += area_vector,
                    NormalWeighting::Angle => {
                        let p = self.position(v);
                        let prev = self.position(face.corner(i + n - 1)) - p;
                        let next = self.position(face.corner(i + 1)) - p;
                        normals[v.index()] += unit * prev.angle(&next);
                    }
                }
            }
        }

        for n in &mut normals {
            *n = n.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros);
        }
        normals
    }

    /// Compute the bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.vertices.first()?;
        let mut min = *first;
        let mut max = *first;

        for p in &self.vertices {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }

        Some((min, max))
    }

    /// Check if all faces are triangles.
    pub fn is_triangle_mesh(&self) -> bool {
        self.faces.iter().all(|f| f.len() == 3)
    }

    /// Check if all faces are quads.
    pub fn is_quad_mesh(&self) -> bool {
        self.faces.iter().all(|f| f.len() == 4)
    }

    // ==================== Topology ====================

    /// Number of distinct undirected edges.
    pub fn num_edges(&self) -> usize {
        let mut edges: Vec<(VertexId, VertexId)> =
            self.directed_edges().map(|(_, e)| e.undirected()).collect();
        edges.sort_unstable();
        edges.dedup();
        edges.len()
    }

    /// V - E + F.
    pub fn euler_characteristic(&self) -> i64 {
        self.num_vertices() as i64 - self.num_edges() as i64 + self.num_faces() as i64
    }

    /// Count the edge-level defects of the mesh.
    pub fn topology_report(&self) -> TopologyReport {
        let mut directed: HashMap<DirectedEdge, usize> = HashMap::new();
        let mut undirected: HashMap<(VertexId, VertexId), usize> = HashMap::new();
        let mut referenced = vec![false; self.vertices.len()];

        for (_, e) in self.directed_edges() {
            *directed.entry(e).or_insert(0) += 1;
            *undirected.entry(e.undirected()).or_insert(0) += 1;
            referenced[e.from().index()] = true;
        }

        let duplicate_directed_edges = directed.values().filter(|&&c| c > 1).count();
        let boundary_edges = directed
            .keys()
            .filter(|e| !directed.contains_key(&e.reversed()))
            .count();
        let non_manifold_edges = undirected.values().filter(|&&c| c > 2).count();

        TopologyReport {
            vertex_count: self.num_vertices(),
            edge_count: undirected.len(),
            face_count: self.num_faces(),
            boundary_edges,
            duplicate_directed_edges,
            non_manifold_edges,
            isolated_vertices: referenced.iter().filter(|&&r| !r).count(),
        }
    }
}

/// Edge-level summary of a mesh's connectivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopologyReport {
    /// Number of vertices.
    pub vertex_count: usize,
    /// Number of distinct undirected edges.
    pub edge_count: usize,
    /// Number of faces.
    pub face_count: usize,
    /// Directed edges whose reverse is not owned by any face.
    pub boundary_edges: usize,
    /// Directed edges owned by more than one face.
    pub duplicate_directed_edges: usize,
    /// Undirected edges used by more than two faces.
    pub non_manifold_edges: usize,
    /// Vertices no face references.
    pub isolated_vertices: usize,
}

impl TopologyReport {
    /// V - E + F.
    pub fn euler_characteristic(&self) -> i64 {
        self.vertex_count as i64 - self.edge_count as i64 + self.face_count as i64
    }

    /// No edge has a missing partner.
    pub fn is_closed(&self) -> bool {
        self.boundary_edges == 0
    }

    /// Every edge is used at most once in each direction and by at most two faces.
    pub fn is_manifold(&self) -> bool {
        self.duplicate_directed_edges == 0 && self.non_manifold_edges == 0
    }

    /// Every undirected edge is shared by exactly two faces with opposite
    /// directions, and no vertex is left dangling.
    pub fn is_closed_manifold(&self) -> bool {
        self.is_closed() && self.is_manifold() && self.isolated_vertices == 0
    }
}
