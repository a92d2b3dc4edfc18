//! Modifier chains.
//!
//! Every modifier is a value implementing [`Modifier`]: the options structs of
//! the individual algorithms, plus unit structs for the parameterless
//! operators. A [`Pipeline`] runs a list of them in order, threading one mesh
//! through.
//!
//! ```
//! use trellis::algo::pipeline::{Dual, Pipeline, Truncate};
//! use trellis::algo::subdivide::SubdivideOptions;
//! use trellis::seed::Cube;
//!
//! let pipeline = Pipeline::new()
//!     .then(Truncate::default())
//!     .then(Dual)
//!     .then(SubdivideOptions::new(1).flat());
//! let mesh = pipeline.run_on(&Cube::default()).unwrap();
//! assert_eq!(mesh.euler_characteristic(), 2);
//! ```

use crate::error::Result;
use crate::mesh::Mesh;
use crate::seed::Generator;

use super::conway::{ambo, gyro, snub, truncate};
use super::deform::{deform, DeformOptions};
use super::dual::dual;
use super::smooth::{laplacian_smooth, taubin_smooth, SmoothOptions};
use super::solidify::{solidify, SolidifyOptions};
use super::subdivide::{subdivide, SubdivideOptions};
use super::weld::{weld, WeldOptions};

/// A mesh-to-mesh transform.
pub trait Modifier: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Transform `mesh`, consuming it.
    fn apply(&self, mesh: Mesh) -> Result<Mesh>;
}

impl Modifier for SubdivideOptions {
    fn name(&self) -> &'static str {
        if self.smooth {
            "subdivide"
        } else {
            "subdivide (flat)"
        }
    }

    fn apply(&self, mut mesh: Mesh) -> Result<Mesh> {
        subdivide(&mut mesh, self);
        Ok(mesh)
    }
}

impl Modifier for SolidifyOptions {
    fn name(&self) -> &'static str {
        "solidify"
    }

    fn apply(&self, mut mesh: Mesh) -> Result<Mesh> {
        solidify(&mut mesh, self)?;
        Ok(mesh)
    }
}

impl Modifier for WeldOptions {
    fn name(&self) -> &'static str {
        "weld"
    }

    fn apply(&self, mut mesh: Mesh) -> Result<Mesh> {
        weld(&mut mesh, self)?;
        Ok(mesh)
    }
}

impl Modifier for DeformOptions {
    fn name(&self) -> &'static str {
        "deform"
    }

    fn apply(&self, mut mesh: Mesh) -> Result<Mesh> {
        deform(&mut mesh, self)?;
        Ok(mesh)
    }
}

impl Modifier for SmoothOptions {
    fn name(&self) -> &'static str {
        "laplacian smooth"
    }

    fn apply(&self, mut mesh: Mesh) -> Result<Mesh> {
        laplacian_smooth(&mut mesh, self);
        Ok(mesh)
    }
}

/// Taubin smoothing as a modifier.
#[derive(Debug, Clone, Default)]
pub struct Taubin(pub SmoothOptions);

impl Modifier for Taubin {
    fn name(&self) -> &'static str {
        "taubin smooth"
    }

    fn apply(&self, mut mesh: Mesh) -> Result<Mesh> {
        taubin_smooth(&mut mesh, &self.0);
        Ok(mesh)
    }
}

/// Dual construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dual;

impl Modifier for Dual {
    fn name(&self) -> &'static str {
        "dual"
    }

    fn apply(&self, mesh: Mesh) -> Result<Mesh> {
        dual(&mesh)
    }
}

/// Rectification.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ambo;

impl Modifier for Ambo {
    fn name(&self) -> &'static str {
        "ambo"
    }

    fn apply(&self, mesh: Mesh) -> Result<Mesh> {
        ambo(&mesh)
    }
}

/// Corner truncation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Truncate {
    /// Fraction of each edge cut away at each end.
    pub ratio: f64,
}

impl Default for Truncate {
    fn default() -> Self {
        Self { ratio: 1.0 / 3.0 }
    }
}

impl Modifier for Truncate {
    fn name(&self) -> &'static str {
        "truncate"
    }

    fn apply(&self, mesh: Mesh) -> Result<Mesh> {
        truncate(&mesh, self.ratio)
    }
}

/// Gyro.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gyro;

impl Modifier for Gyro {
    fn name(&self) -> &'static str {
        "gyro"
    }

    fn apply(&self, mesh: Mesh) -> Result<Mesh> {
        gyro(&mesh)
    }
}

/// Snub.
#[derive(Debug, Clone, Copy, Default)]
pub struct Snub;

impl Modifier for Snub {
    fn name(&self) -> &'static str {
        "snub"
    }

    fn apply(&self, mesh: Mesh) -> Result<Mesh> {
        snub(&mesh)
    }
}

/// An ordered list of modifiers.
#[derive(Default)]
pub struct Pipeline {
    steps: Vec<Box<dyn Modifier>>,
}

impl Pipeline {
    /// An empty pipeline; running it returns the input unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step.
    pub fn then<M: Modifier + 'static>(mut self, modifier: M) -> Self {
        self.push(Box::new(modifier));
        self
    }

    /// Append an already boxed step.
    pub fn push(&mut self, modifier: Box<dyn Modifier>) {
        self.steps.push(modifier);
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether there are no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Names of the steps, in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run every step in order. Stops at the first error.
    pub fn run(&self, mut mesh: Mesh) -> Result<Mesh> {
        for (i, step) in self.steps.iter().enumerate() {
            mesh = step.apply(mesh)?;
            log::debug!(
                "pipeline step {} ({}): {} vertices, {} faces",
                i,
                step.name(),
                mesh.num_vertices(),
                mesh.num_faces()
            );
        }
        Ok(mesh)
    }

    /// Produce a seed and run the pipeline on it.
    pub fn run_on<G: Generator + ?Sized>(&self, generator: &G) -> Result<Mesh> {
        self.run(generator.produce())
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeshError;
    use crate::seed::{Cube, Grid, Octahedron};

    #[test]
    fn test_empty_pipeline_is_identity() {
        let mesh = Pipeline::new().run_on(&Cube::default()).unwrap();
        assert_eq!(mesh, Cube::default().produce());
    }

    #[test]
    fn test_chain_keeps_closed_manifold() {
        let pipeline = Pipeline::new()
            .then(Ambo)
            .then(SubdivideOptions::new(1))
            .then(Taubin(SmoothOptions::default().with_iterations(2)))
            .then(Dual);
        assert_eq!(pipeline.len(), 4);

        let mesh = pipeline.run_on(&Octahedron).unwrap();
        let report = mesh.topology_report();
        assert!(report.is_closed_manifold());
        assert_eq!(report.euler_characteristic(), 2);
    }

    #[test]
    fn test_open_surface_chain() {
        let pipeline = Pipeline::new()
            .then(SolidifyOptions::new(0.2))
            .then(WeldOptions::default())
            .then(Dual);
        let mesh = pipeline.run_on(&Grid::new(3, 3)).unwrap();
        assert!(mesh.topology_report().is_closed_manifold());
    }

    #[test]
    fn test_error_stops_pipeline() {
        let pipeline = Pipeline::new().then(Dual).then(SubdivideOptions::new(1));
        let err = pipeline.run_on(&Grid::new(2, 2)).unwrap_err();
        assert!(matches!(err, MeshError::OpenFan { .. }));
    }

    #[test]
    fn test_names() {
        let pipeline = Pipeline::new()
            .then(Snub)
            .then(Gyro)
            .then(SubdivideOptions::new(1).flat());
        assert_eq!(pipeline.names(), vec!["snub", "gyro", "subdivide (flat)"]);
        assert_eq!(format!("{pipeline:?}"), r#"["snub", "gyro", "subdivide (flat)"]"#);
    }
}
