//! Mesh processing algorithms.
//!
//! Every algorithm here is a mesh-to-mesh transform:
//!
//! - **Subdivision**: face-split subdivision with Catmull-Clark or flat vertex rules
//! - **Solidify**: shell an open surface into a closed solid
//! - **Bridging**: stitch edges and loops together with quads
//! - **Dual**: swap vertices and faces of a closed manifold
//! - **Conway operators**: ambo, truncate, gyro, snub
//! - **Welding**: merge coincident vertices, drop degenerate and duplicate faces
//! - **Smoothing**: Laplacian and Taubin smoothing
//! - **Deformation**: translate, scale, shear, bend, twist, spherize
//!
//! [`pipeline`] chains them.

pub mod bridge;
pub mod conway;
pub mod deform;
pub mod dual;
pub mod pipeline;
pub mod progress;
pub mod smooth;
pub mod solidify;
pub mod subdivide;
pub mod weld;

pub use progress::Progress;
