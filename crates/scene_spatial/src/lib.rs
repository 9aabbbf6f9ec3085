//! scene_spatial - Engine independent spatial index and shadow camera fitting
//!
//! This crate holds the geometry a renderer needs to decide what to draw and
//! how to light it, without depending on any renderer.
//!
//! # Features
//!
//! - **Octree**: Point index keyed by identity with region, radius, ray and
//!   nearest-neighbour queries
//! - **Near/Far Fitting**: Tight clipping planes around the visible instances
//! - **Directional Shadows**: Orthographic shadow camera fitted to the view
//!   frustum's bounding sphere
//! - **Shadow Atlas**: Fixed grid allocation of shadow map regions
//! - **Shadow Planning**: One call per frame wiring all of the above
//!
//! # Example
//!
//! ```ignore
//! use scene_spatial::{Camera, Light, ModelInstance, ShadowSystem, ShadowSystemConfig};
//!
//! let mut system = ShadowSystem::from_config(ShadowSystemConfig::default())?;
//! let mut camera = Camera::perspective(67.0, 16.0, 9.0);
//!
//! let plan = system.plan_frame(&mut camera, &instances, &[Light::directional(Vec3::NEG_Y)])?;
//! for shadow in &plan.shadows {
//!     render_shadow_map(&shadow.camera, shadow.region);
//! }
//! ```

pub mod error;
pub use error::{Result, SpatialError};

// Geometry primitives
pub mod math;
pub use math::{BoundingBox, BoundingSphere, Camera, Frustum, Plane, PlaneSide, Projection, Ray};

// Scene instances and identity
pub mod scene;
pub use scene::{InstanceId, ModelInstance, SceneInstance};

// Octree module for point-based spatial queries
pub mod octree;
pub use octree::{Octree, OctreeConfig};

// Near/far plane analysis
pub mod near_far;
pub use near_far::{
	AabbCachedNearFarAnalyzer, AabbNearFarAnalyzer, NearFar, NearFarAnalyzer, NearFarConfig,
	NearFarStrategy,
};

// Directional shadow camera analysis
pub mod directional;
pub use directional::{
	BoundingSphereDirectionalAnalyzer, DirectionalAnalyzer, DirectionalResult, DirectionalStrategy,
	FrustumDirectionalAnalyzer,
};

// Shadow atlas allocation
pub mod allocator;
pub use allocator::{AllocatorResult, FixedShadowMapAllocator, ShadowMapAllocator};

pub mod light;
pub use light::{DirectionalLight, FrustumLightFilter, Light, LightFilter, NoLightFilter, SpotLight};

// Per-frame shadow planning
pub mod system;
pub use system::{
	DefaultShadowSystem, DirectionalFit, FramePlan, LightShadow, ShadowSystem, ShadowSystemConfig,
};

// Metrics (feature-gated)
pub mod metrics;
