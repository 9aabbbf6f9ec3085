//! Near/far plane fitting for a viewing camera.
//!
//! Tightens the clipping planes around the instances the camera can actually
//! see. The fit is sphere-based: the union of all visible instance boxes is
//! reduced to its bounding sphere, and the planes are placed at
//! `distance(camera, center) ± radius`.
//!
//! # Module Structure
//!
//! - [`NearFarConfig`] - provisional planes and minimum plane distance
//! - [`AabbNearFarAnalyzer`] - recomputes instance bounds every frame
//! - [`AabbCachedNearFarAnalyzer`] - memoises instance bounds by id
//! - [`NearFarStrategy`] - runtime choice between the two

use std::collections::HashMap;

use glam::Vec3;
use tracing::{debug, trace};

use crate::error::{Result, SpatialError};
use crate::math::{BoundingBox, Camera};
use crate::scene::{InstanceId, SceneInstance};

// =============================================================================
// NearFar - result
// =============================================================================

/// Fitted clipping plane distances.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NearFar {
	pub near: f32,
	pub far: f32,
}

impl NearFar {
	/// Write the planes onto `camera` and refresh its matrices.
	pub fn apply_to(&self, camera: &mut Camera) {
		camera.near = self.near;
		camera.far = self.far;
		camera.update();
	}
}

// =============================================================================
// NearFarConfig
// =============================================================================

/// Configuration for near/far analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct NearFarConfig {
	/// Near plane used while selecting visible instances.
	pub provisional_near: f32,
	/// Far plane used while selecting visible instances.
	pub provisional_far: f32,
	/// Smallest distance either plane may take.
	pub min_plane: f32,
}

impl Default for NearFarConfig {
	fn default() -> Self {
		Self {
			provisional_near: 0.1,
			provisional_far: 1000.0,
			min_plane: 1.0,
		}
	}
}

impl NearFarConfig {
	pub fn validate(&self) -> Result<()> {
		if !(self.provisional_near > 0.0) {
			return Err(SpatialError::InvalidConfig(format!(
				"provisional_near must be positive, got {}",
				self.provisional_near
			)));
		}
		if !(self.provisional_far > self.provisional_near) || !self.provisional_far.is_finite() {
			return Err(SpatialError::InvalidConfig(format!(
				"provisional_far ({}) must be finite and beyond provisional_near ({})",
				self.provisional_far, self.provisional_near
			)));
		}
		if !(self.min_plane > 0.0) || !self.min_plane.is_finite() {
			return Err(SpatialError::InvalidConfig(format!(
				"min_plane must be positive, got {}",
				self.min_plane
			)));
		}
		Ok(())
	}

	/// Turn the union of visible bounds into clamped plane distances.
	///
	/// `visible` may be empty (nothing contributed), in which case the
	/// provisional planes are returned with the near plane raised to
	/// `min_plane`.
	pub fn fit(&self, camera_position: Vec3, visible: &BoundingBox) -> NearFar {
		let sphere = visible.bounding_sphere();
		let (mut near, mut far) = if sphere.is_valid() {
			let dist = camera_position.distance(sphere.center);
			(dist - sphere.radius, dist + sphere.radius)
		} else {
			(self.provisional_near.max(self.min_plane), self.provisional_far)
		};

		if near <= 0.0 {
			near = self.min_plane;
		}
		if far <= 0.0 {
			far = self.min_plane;
		}
		if far <= near {
			far = near + self.min_plane;
		}
		NearFar { near, far }
	}
}

// =============================================================================
// NearFarAnalyzer - strategy trait
// =============================================================================

/// Computes near/far planes for a camera over a set of instances.
pub trait NearFarAnalyzer<I: SceneInstance> {
	/// Fit planes for `camera`. The camera itself is not modified; use
	/// [`NearFar::apply_to`] to write the result back.
	fn analyze(&mut self, camera: &Camera, instances: &[I]) -> NearFar;
}

/// Camera copy with the provisional planes applied.
fn provisional_camera(camera: &Camera, config: &NearFarConfig) -> Camera {
	let mut probe = camera.clone();
	probe.near = config.provisional_near;
	probe.far = config.provisional_far;
	probe.update();
	probe
}

/// Whether a box takes part in the fit: overlapping the provisional frustum
/// and not enclosing the camera.
#[inline]
fn contributes(probe: &Camera, bounds: &BoundingBox) -> bool {
	probe.frustum().bounds_in_frustum(bounds) && !bounds.contains_point(probe.position)
}

// =============================================================================
// AabbNearFarAnalyzer
// =============================================================================

/// Near/far analyzer that recomputes every instance box on each call.
#[derive(Clone, Debug, Default)]
pub struct AabbNearFarAnalyzer {
	config: NearFarConfig,
}

impl AabbNearFarAnalyzer {
	pub fn new(config: NearFarConfig) -> Result<Self> {
		config.validate()?;
		Ok(Self { config })
	}

	pub fn config(&self) -> &NearFarConfig {
		&self.config
	}
}

impl<I: SceneInstance> NearFarAnalyzer<I> for AabbNearFarAnalyzer {
	#[tracing::instrument(skip_all, name = "near_far::analyze")]
	fn analyze(&mut self, camera: &Camera, instances: &[I]) -> NearFar {
		let probe = provisional_camera(camera, &self.config);

		let mut visible = BoundingBox::empty();
		let mut scratch = BoundingBox::empty();
		let mut contributing = 0usize;
		for instance in instances {
			instance.calculate_bounding_box(&mut scratch);
			if contributes(&probe, &scratch) {
				visible.ext_box(&scratch);
				contributing += 1;
			}
		}

		let result = self.config.fit(probe.position, &visible);
		debug!(
			instances = instances.len(),
			contributing,
			near = result.near,
			far = result.far,
			"near/far fitted"
		);
		result
	}
}

// =============================================================================
// AabbCachedNearFarAnalyzer
// =============================================================================

/// Near/far analyzer that memoises each instance's box by [`InstanceId`].
///
/// Cached boxes are never refreshed on their own. Call
/// [`invalidate`](Self::invalidate) when an instance moves or changes shape,
/// or [`clear`](Self::clear) to drop everything.
#[derive(Clone, Debug, Default)]
pub struct AabbCachedNearFarAnalyzer {
	config: NearFarConfig,
	cache: HashMap<InstanceId, BoundingBox>,
}

impl AabbCachedNearFarAnalyzer {
	pub fn new(config: NearFarConfig) -> Result<Self> {
		config.validate()?;
		Ok(Self {
			config,
			cache: HashMap::new(),
		})
	}

	pub fn config(&self) -> &NearFarConfig {
		&self.config
	}

	/// Forget the cached box of one instance. Returns whether it was cached.
	pub fn invalidate(&mut self, id: InstanceId) -> bool {
		self.cache.remove(&id).is_some()
	}

	/// Forget every cached box.
	pub fn clear(&mut self) {
		self.cache.clear();
	}

	/// Number of cached boxes.
	pub fn cached_len(&self) -> usize {
		self.cache.len()
	}
}

impl<I: SceneInstance> NearFarAnalyzer<I> for AabbCachedNearFarAnalyzer {
	#[tracing::instrument(skip_all, name = "near_far::analyze_cached")]
	fn analyze(&mut self, camera: &Camera, instances: &[I]) -> NearFar {
		let probe = provisional_camera(camera, &self.config);

		let mut visible = BoundingBox::empty();
		let mut contributing = 0usize;
		let mut misses = 0usize;
		for instance in instances {
			let bounds = self.cache.entry(instance.id()).or_insert_with(|| {
				misses += 1;
				instance.bounding_box()
			});
			if contributes(&probe, bounds) {
				visible.ext_box(bounds);
				contributing += 1;
			}
		}
		trace!(misses, cached = self.cache.len(), "bounds cache");

		let result = self.config.fit(probe.position, &visible);
		debug!(
			instances = instances.len(),
			contributing,
			near = result.near,
			far = result.far,
			"near/far fitted"
		);
		result
	}
}

// =============================================================================
// NearFarStrategy
// =============================================================================

/// Closed set of near/far analyzers, selectable at runtime.
#[derive(Clone, Debug)]
pub enum NearFarStrategy {
	Aabb(AabbNearFarAnalyzer),
	AabbCached(AabbCachedNearFarAnalyzer),
}

impl NearFarStrategy {
	pub fn new(config: NearFarConfig, cached: bool) -> Result<Self> {
		Ok(if cached {
			Self::AabbCached(AabbCachedNearFarAnalyzer::new(config)?)
		} else {
			Self::Aabb(AabbNearFarAnalyzer::new(config)?)
		})
	}
}

impl Default for NearFarStrategy {
	fn default() -> Self {
		Self::AabbCached(AabbCachedNearFarAnalyzer::default())
	}
}

impl<I: SceneInstance> NearFarAnalyzer<I> for NearFarStrategy {
	fn analyze(&mut self, camera: &Camera, instances: &[I]) -> NearFar {
		match self {
			Self::Aabb(analyzer) => analyzer.analyze(camera, instances),
			Self::AabbCached(analyzer) => analyzer.analyze(camera, instances),
		}
	}
}
