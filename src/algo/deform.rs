//! Per-vertex deformations.
//!
//! Every deformation maps each vertex position independently, so a pass has
//! no cross-vertex dependencies and runs in parallel unless asked not to.
//! Connectivity is never touched.
//!
//! # Example
//!
//! ```
//! use trellis::algo::deform::{deform, Deformation, DeformOptions};
//! use trellis::mesh::Axis;
//! use trellis::seed::{Cube, Generator};
//! use nalgebra::Vector3;
//!
//! let mut mesh = Cube::default().produce();
//! deform(&mut mesh, &DeformOptions::new(Deformation::Translate(Vector3::new(0.0, 0.0, 1.0)))).unwrap();
//! deform(&mut mesh, &DeformOptions::new(Deformation::Twist { axis: Axis::Z, rate: 0.5 })).unwrap();
//! ```

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::error::{MeshError, Result};
use crate::mesh::{Axis, Mesh};

/// A position-to-position mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Deformation {
    /// Move every vertex by a fixed offset.
    Translate(Vector3<f64>),

    /// Scale per axis about a pivot.
    Scale {
        /// Scale factor per axis.
        factors: Vector3<f64>,
        /// Fixed point of the scaling.
        pivot: Point3<f64>,
    },

    /// `p[along] += factor * p[by]`.
    Shear {
        /// Coordinate that is displaced.
        along: Axis,
        /// Coordinate the displacement is proportional to.
        by: Axis,
        /// Displacement per unit of `by`.
        factor: f64,
    },

    /// Bend the `spine` axis into a circular arc curving toward `toward`.
    ///
    /// The plane `spine = 0` stays fixed; a point at distance `s` along the
    /// spine is rotated by `s * curvature` radians about the arc center at
    /// `toward = 1 / curvature`.
    Bend {
        /// Axis that gets curved.
        spine: Axis,
        /// Direction the arc curves toward.
        toward: Axis,
        /// Inverse bend radius; zero is the identity.
        curvature: f64,
    },

    /// Rotate about `axis` by `rate` radians per unit of height along it.
    Twist {
        /// Twist axis (through the origin).
        axis: Axis,
        /// Radians per unit length.
        rate: f64,
    },

    /// Pull vertices toward a sphere.
    Spherize {
        /// Sphere center.
        center: Point3<f64>,
        /// Sphere radius.
        radius: f64,
        /// Blend factor: 0 leaves the mesh alone, 1 lands exactly on the sphere.
        factor: f64,
    },
}

impl Deformation {
    /// Check the parameters.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Deformation::Translate(offset) if !offset.iter().all(|c| c.is_finite()) => {
                Err(MeshError::invalid_param("offset", offset.transpose(), "must be finite"))
            }
            Deformation::Scale { factors, .. } if !factors.iter().all(|c| c.is_finite()) => {
                Err(MeshError::invalid_param("factors", factors.transpose(), "must be finite"))
            }
            Deformation::Shear { along, by, .. } if along == by => Err(MeshError::invalid_param(
                "shear axes",
                format!("{along:?}/{by:?}"),
                "must differ",
            )),
            Deformation::Bend { spine, toward, .. } if spine == toward => Err(
                MeshError::invalid_param("bend axes", format!("{spine:?}/{toward:?}"), "must differ"),
            ),
            Deformation::Bend { curvature, .. } if !curvature.is_finite() => {
                Err(MeshError::invalid_param("curvature", curvature, "must be finite"))
            }
            Deformation::Spherize { radius, .. } if !(radius > 0.0 && radius.is_finite()) => {
                Err(MeshError::invalid_param("radius", radius, "must be positive"))
            }
            _ => Ok(()),
        }
    }

    /// Where `p` goes.
    pub fn apply(&self, p: &Point3<f64>) -> Point3<f64> {
        match *self {
            Deformation::Translate(offset) => p + offset,
            Deformation::Scale { factors, pivot } => pivot + (p - pivot).component_mul(&factors),
            Deformation::Shear { along, by, factor } => {
                let mut q = *p;
                q[along.index()] += factor * p[by.index()];
                q
            }
            Deformation::Bend {
                spine,
                toward,
                curvature,
            } => {
                if curvature == 0.0 {
                    return *p;
                }
                let radius = 1.0 / curvature;
                let theta = p[spine.index()] * curvature;
                let arm = radius - p[toward.index()];
                let mut q = *p;
                q[spine.index()] = theta.sin() * arm;
                q[toward.index()] = radius - theta.cos() * arm;
                q
            }
            Deformation::Twist { axis, rate } => {
                let (b, c) = axis.others();
                let (sin, cos) = (p[axis.index()] * rate).sin_cos();
                let mut q = *p;
                q[b.index()] = p[b.index()] * cos - p[c.index()] * sin;
                q[c.index()] = p[b.index()] * sin + p[c.index()] * cos;
                q
            }
            Deformation::Spherize {
                center,
                radius,
                factor,
            } => match (p - center).try_normalize(f64::EPSILON) {
                Some(dir) => {
                    let target = center + dir * radius;
                    p + (target - p) * factor
                }
                None => *p,
            },
        }
    }
}

/// Options for [`deform`].
#[derive(Debug, Clone, PartialEq)]
pub struct DeformOptions {
    /// The mapping applied to every vertex.
    pub deformation: Deformation,

    /// Whether to use parallel execution (default: true).
    pub parallel: bool,
}

impl DeformOptions {
    /// Options for the given deformation.
    pub fn new(deformation: Deformation) -> Self {
        Self {
            deformation,
            parallel: true,
        }
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Apply a deformation to every vertex of `mesh`.
pub fn deform(mesh: &mut Mesh, options: &DeformOptions) -> Result<()> {
    let d = &options.deformation;
    d.validate()?;

    if options.parallel {
        mesh.vertices.par_iter_mut().for_each(|p| *p = d.apply(p));
    } else {
        for p in &mut mesh.vertices {
            *p = d.apply(p);
        }
    }
    log::trace!("deform: {:?} on {} vertices", d, mesh.num_vertices());
    Ok(())
}

/// Move every vertex by `offset`.
pub fn translate(mesh: &mut Mesh, offset: Vector3<f64>) -> Result<()> {
    deform(mesh, &DeformOptions::new(Deformation::Translate(offset)))
}

/// Scale about `pivot`.
pub fn scale(mesh: &mut Mesh, factors: Vector3<f64>, pivot: Point3<f64>) -> Result<()> {
    deform(mesh, &DeformOptions::new(Deformation::Scale { factors, pivot }))
}
