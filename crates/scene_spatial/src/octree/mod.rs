//! Octree module for point-based spatial queries.
//!
//! Objects are keyed by identity and stored at a single point. Nodes live in a
//! flat arena and reference their children by index; leaves subdivide into
//! octants once they exceed the configured item threshold.
//!
//! # Octant Convention
//!
//! ```text
//! octant = (x >= cx) | (y >= cy) << 1 | (z >= cz) << 2
//! ```
//!
//! # Module Structure
//!
//! - [`config`]: `OctreeConfig` - split threshold, minimum cell size, growth
//! - [`node`]: `OctreeNode` - arena cell and octant math
//! - [`tree`]: `Octree` - insert/remove and region queries

pub mod config;
pub mod node;
pub mod tree;

// Re-exports
pub use config::OctreeConfig;
pub use node::{NodeIndex, OctreeNode};
pub use tree::Octree;
