//! Geometry primitives shared by the octree and the analyzers.
//!
//! Conventions follow OpenGL: right-handed world space, cameras look down
//! their local -Z, clip space z runs from -1 (near) to 1 (far).

pub mod bounds;
pub mod camera;
pub mod frustum;
pub mod plane;
pub mod ray;

pub use bounds::{BoundingBox, BoundingSphere};
pub use camera::{Camera, Projection};
pub use frustum::Frustum;
pub use plane::{Plane, PlaneSide};
pub use ray::Ray;
