//! Per-frame shadow planning.
//!
//! [`ShadowSystem`] wires the analyzers, the light filter and the atlas
//! allocator together. One call to [`ShadowSystem::plan_frame`]:
//!
//! 1. fits the main camera's near/far planes to the visible instances,
//! 2. builds a shadow camera for every light the filter keeps,
//! 3. assigns each shadow camera an atlas region.

use glam::Vec3;
use tracing::{debug, warn};
use web_time::Instant;

use crate::allocator::{AllocatorResult, FixedShadowMapAllocator, ShadowMapAllocator};
use crate::directional::{
	shadow_up, BoundingSphereDirectionalAnalyzer, DirectionalAnalyzer, DirectionalStrategy,
	FrustumDirectionalAnalyzer,
};
use crate::error::{Result, SpatialError};
use crate::light::{FrustumLightFilter, Light, LightFilter, SpotLight};
use crate::math::Camera;
use crate::metrics::ShadowMetrics;
use crate::near_far::{NearFar, NearFarAnalyzer, NearFarConfig, NearFarStrategy};
use crate::scene::SceneInstance;

// =============================================================================
// ShadowSystemConfig
// =============================================================================

/// Directional fitting strategy selected by [`ShadowSystemConfig`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DirectionalFit {
	#[default]
	BoundingSphere,
	FrustumSilhouette,
}

/// Configuration for the default shadow pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct ShadowSystemConfig {
	pub near_far: NearFarConfig,
	/// Memoise instance bounds between frames.
	pub cached_near_far: bool,
	/// Shadow atlas edge length in pixels.
	pub atlas_size: u32,
	/// Shadow maps per frame before the atlas wraps.
	pub max_maps: u32,
	pub directional_fit: DirectionalFit,
	/// Directional viewport edge as a multiple of the fitted sphere radius.
	pub directional_viewport_scale: f32,
	/// Near plane distance of spot light shadow cameras.
	pub spot_near: f32,
}

impl Default for ShadowSystemConfig {
	fn default() -> Self {
		Self {
			near_far: NearFarConfig::default(),
			cached_near_far: true,
			atlas_size: 4096,
			max_maps: 4,
			directional_fit: DirectionalFit::BoundingSphere,
			directional_viewport_scale: 1.0,
			spot_near: 0.1,
		}
	}
}

impl ShadowSystemConfig {
	pub fn validate(&self) -> Result<()> {
		self.near_far.validate()?;
		if self.atlas_size == 0 || self.max_maps == 0 {
			return Err(SpatialError::InvalidConfig(
				"atlas_size and max_maps must be non-zero".to_string(),
			));
		}
		if !(self.directional_viewport_scale > 0.0) || !self.directional_viewport_scale.is_finite() {
			return Err(SpatialError::InvalidConfig(format!(
				"directional_viewport_scale must be positive, got {}",
				self.directional_viewport_scale
			)));
		}
		if !(self.spot_near > 0.0) || !self.spot_near.is_finite() {
			return Err(SpatialError::InvalidConfig(format!(
				"spot_near must be positive, got {}",
				self.spot_near
			)));
		}
		Ok(())
	}
}

// =============================================================================
// FramePlan
// =============================================================================

/// Shadow map assignment for one light.
#[derive(Clone, Debug)]
pub struct LightShadow {
	/// Index into the light slice given to `plan_frame`.
	pub light_index: usize,
	/// Camera that renders this light's shadow map.
	pub camera: Camera,
	/// Atlas region to render into.
	pub region: AllocatorResult,
}

/// Everything decided for one frame.
#[derive(Clone, Debug, Default)]
pub struct FramePlan {
	/// Planes applied to the main camera, `None` when there were no instances.
	pub near_far: Option<NearFar>,
	pub shadows: Vec<LightShadow>,
	/// Lights skipped by the filter or unable to cast a shadow.
	pub filtered_out: usize,
	/// More shadows than atlas regions; some regions are shared.
	pub overflowed: bool,
}

// =============================================================================
// ShadowSystem
// =============================================================================

/// Default component stack built by [`ShadowSystem::from_config`].
pub type DefaultShadowSystem =
	ShadowSystem<NearFarStrategy, DirectionalStrategy, FixedShadowMapAllocator, FrustumLightFilter>;

/// Shadow planner generic over its four strategies.
#[derive(Clone, Debug)]
pub struct ShadowSystem<N, D, A, F> {
	config: ShadowSystemConfig,
	near_far: N,
	directional: D,
	allocator: A,
	filter: F,
	metrics: ShadowMetrics,
}

impl DefaultShadowSystem {
	/// Build the default pipeline described by `config`.
	pub fn from_config(config: ShadowSystemConfig) -> Result<Self> {
		config.validate()?;
		let near_far = NearFarStrategy::new(config.near_far.clone(), config.cached_near_far)?;
		let directional = match config.directional_fit {
			DirectionalFit::BoundingSphere => DirectionalStrategy::BoundingSphere(
				BoundingSphereDirectionalAnalyzer::new(config.directional_viewport_scale)?,
			),
			DirectionalFit::FrustumSilhouette => {
				DirectionalStrategy::FrustumSilhouette(FrustumDirectionalAnalyzer)
			}
		};
		let allocator = FixedShadowMapAllocator::new(config.atlas_size, config.max_maps)?;
		Self::new(config, near_far, directional, allocator, FrustumLightFilter)
	}
}

impl<N, D, A, F> ShadowSystem<N, D, A, F>
where
	D: DirectionalAnalyzer,
	A: ShadowMapAllocator,
	F: LightFilter,
{
	pub fn new(
		config: ShadowSystemConfig,
		near_far: N,
		directional: D,
		allocator: A,
		filter: F,
	) -> Result<Self> {
		config.validate()?;
		Ok(Self {
			config,
			near_far,
			directional,
			allocator,
			filter,
			metrics: ShadowMetrics::new(),
		})
	}

	pub fn config(&self) -> &ShadowSystemConfig {
		&self.config
	}

	pub fn near_far_analyzer_mut(&mut self) -> &mut N {
		&mut self.near_far
	}

	pub fn allocator(&self) -> &A {
		&self.allocator
	}

	pub fn metrics(&self) -> &ShadowMetrics {
		&self.metrics
	}

	/// Plan one frame.
	///
	/// Updates `camera` with the fitted near/far planes, then allocates a
	/// shadow map for each light that passes the filter. Analyzer errors
	/// abort the frame; the allocator frame is closed either way.
	#[tracing::instrument(skip_all, name = "shadow::plan_frame")]
	pub fn plan_frame<I>(
		&mut self,
		camera: &mut Camera,
		instances: &[I],
		lights: &[Light],
	) -> Result<FramePlan>
	where
		I: SceneInstance,
		N: NearFarAnalyzer<I>,
	{
		let start = Instant::now();

		let near_far = if instances.is_empty() {
			debug!("no instances, near/far skipped");
			None
		} else {
			let near_far = self.near_far.analyze(camera, instances);
			near_far.apply_to(camera);
			Some(near_far)
		};

		let mut plan = FramePlan {
			near_far,
			..Default::default()
		};

		self.allocator.begin();
		let planned = self.plan_lights(camera, lights, &mut plan);
		self.allocator.end();
		planned?;

		plan.overflowed = plan.shadows.len() > self.allocator.capacity() as usize;
		if plan.overflowed {
			warn!(
				shadows = plan.shadows.len(),
				capacity = self.allocator.capacity(),
				"shadow atlas overflow, regions reused"
			);
		}

		let elapsed_us = start.elapsed().as_micros() as u64;
		self.metrics.record_frame(
			elapsed_us,
			plan.shadows.len() as u32,
			plan.filtered_out as u32,
			plan.overflowed,
			plan.near_far.is_none(),
		);
		debug!(
			lights = lights.len(),
			shadows = plan.shadows.len(),
			filtered_out = plan.filtered_out,
			elapsed_us,
			"frame planned"
		);
		Ok(plan)
	}

	fn plan_lights(&mut self, camera: &Camera, lights: &[Light], plan: &mut FramePlan) -> Result<()> {
		for (light_index, light) in lights.iter().enumerate() {
			if !self.filter.filter(light, camera) {
				plan.filtered_out += 1;
				continue;
			}

			let shadow_camera = match light {
				Light::Directional(sun) => self
					.directional
					.analyze(camera.frustum(), sun.direction)?
					.to_camera(),
				Light::Spot(spot) => match spot_camera(spot, self.config.spot_near)? {
					Some(shadow_camera) => shadow_camera,
					None => {
						debug!(light_index, range = spot.range, "spot light range too short");
						plan.filtered_out += 1;
						continue;
					}
				},
			};

			let region = self.allocator.next_result(&shadow_camera);
			plan.shadows.push(LightShadow {
				light_index,
				camera: shadow_camera,
				region,
			});
		}
		Ok(())
	}
}

/// Perspective shadow camera covering a spot light's cone.
///
/// Returns `None` when the range does not reach past `near`.
pub fn spot_camera(spot: &SpotLight, near: f32) -> Result<Option<Camera>> {
	let dir = spot.direction.normalize_or_zero();
	if dir == Vec3::ZERO || !dir.is_finite() {
		return Err(SpatialError::ZeroDirection);
	}
	if !(spot.range > near) {
		return Ok(None);
	}

	let fov = (2.0 * spot.cutoff_angle_degrees).clamp(1.0, 179.0);
	let mut camera = Camera::perspective(fov, 1.0, 1.0);
	camera.position = spot.position;
	camera.direction = dir;
	camera.up = shadow_up(dir);
	camera.near = near;
	camera.far = spot.range;
	camera.update();
	Ok(Some(camera))
}

#[cfg(test)]
#[path = "system_test.rs"]
mod system_test;
