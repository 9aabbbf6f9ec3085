//! Scene description parsing.

use std::path::Path;

use anyhow::{Context, Result};
use glam::{Mat4, Quat, Vec3};
use serde::Deserialize;

use scene_spatial::{
	BoundingBox, Camera, DirectionalFit, Light, ModelInstance, NearFarConfig, OctreeConfig,
	ShadowSystemConfig,
};

/// Root of a scene file.
#[derive(Debug, Deserialize)]
pub struct SceneConfig {
	pub camera: CameraConfig,
	#[serde(default)]
	pub shadows: ShadowsConfig,
	#[serde(default)]
	pub octree: Option<OctreeSection>,
	#[serde(default)]
	pub instances: Vec<InstanceConfig>,
	#[serde(default)]
	pub lights: Vec<LightConfig>,
	#[serde(default)]
	pub queries: Vec<QueryConfig>,
}

/// Viewing camera.
#[derive(Debug, Deserialize)]
pub struct CameraConfig {
	pub position: [f32; 3],
	pub target: [f32; 3],
	/// Vertical field of view in degrees.
	#[serde(default = "default_fov_y")]
	pub fov_y: f32,
	/// Viewport width and height.
	#[serde(default = "default_viewport")]
	pub viewport: [f32; 2],
}

fn default_fov_y() -> f32 {
	67.0
}

fn default_viewport() -> [f32; 2] {
	[16.0, 9.0]
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StrategyConfig {
	#[default]
	BoundingSphere,
	FrustumSilhouette,
}

/// Shadow pipeline settings. Missing keys take the library defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ShadowsConfig {
	pub atlas_size: u32,
	pub max_maps: u32,
	pub strategy: StrategyConfig,
	pub cached_near_far: bool,
	pub viewport_scale: f32,
	pub spot_near: f32,
	pub provisional_near: f32,
	pub provisional_far: f32,
	pub min_plane: f32,
}

impl Default for ShadowsConfig {
	fn default() -> Self {
		let system = ShadowSystemConfig::default();
		Self {
			atlas_size: system.atlas_size,
			max_maps: system.max_maps,
			strategy: StrategyConfig::default(),
			cached_near_far: system.cached_near_far,
			viewport_scale: system.directional_viewport_scale,
			spot_near: system.spot_near,
			provisional_near: system.near_far.provisional_near,
			provisional_far: system.near_far.provisional_far,
			min_plane: system.near_far.min_plane,
		}
	}
}

/// Octree tuning. Missing keys take the library defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OctreeSection {
	pub split_threshold: usize,
	pub min_half_extent: f32,
	pub initial_half_extent: f32,
}

impl Default for OctreeSection {
	fn default() -> Self {
		let octree = OctreeConfig::default();
		Self {
			split_threshold: octree.split_threshold,
			min_half_extent: octree.min_half_extent,
			initial_half_extent: octree.initial_half_extent,
		}
	}
}

/// Axis-aligned part bounds in model space.
#[derive(Debug, Deserialize)]
pub struct PartConfig {
	pub min: [f32; 3],
	pub max: [f32; 3],
}

/// One model placed in the scene.
#[derive(Debug, Deserialize)]
pub struct InstanceConfig {
	pub name: String,
	pub position: [f32; 3],
	#[serde(default = "default_scale")]
	pub scale: f32,
	pub parts: Vec<PartConfig>,
}

fn default_scale() -> f32 {
	1.0
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LightConfig {
	Directional {
		direction: [f32; 3],
	},
	Spot {
		position: [f32; 3],
		direction: [f32; 3],
		range: f32,
		/// Cone half-angle in degrees.
		cutoff: f32,
	},
}

/// Octree probe: nearest instance and instances within `radius` of `point`.
#[derive(Debug, Deserialize)]
pub struct QueryConfig {
	pub point: [f32; 3],
	pub radius: f32,
}

impl SceneConfig {
	/// Load a scene from a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read scene file: {}", path.display()))?;
		Self::parse(&content).with_context(|| format!("Invalid scene: {}", path.display()))
	}

	/// Parse and validate scene TOML.
	pub fn parse(content: &str) -> Result<Self> {
		let config: SceneConfig =
			toml::from_str(content).with_context(|| "Failed to parse scene TOML")?;

		let camera = &config.camera;
		if camera.position == camera.target {
			anyhow::bail!("camera position and target must differ");
		}
		if camera.viewport.iter().any(|v| !(*v > 0.0)) {
			anyhow::bail!("camera viewport must be positive, got {:?}", camera.viewport);
		}
		if !(camera.fov_y > 0.0 && camera.fov_y < 180.0) {
			anyhow::bail!("camera fov_y must be in (0, 180), got {}", camera.fov_y);
		}
		for instance in &config.instances {
			if instance.parts.is_empty() {
				anyhow::bail!("instance '{}' has no parts", instance.name);
			}
			if let Some(part) = instance
				.parts
				.iter()
				.find(|p| (0..3).any(|i| p.min[i] > p.max[i]))
			{
				anyhow::bail!(
					"instance '{}' has a part with min {:?} above max {:?}",
					instance.name,
					part.min,
					part.max
				);
			}
		}

		config
			.shadow_system_config()
			.validate()
			.context("Invalid [shadows] section")?;
		config
			.octree_config()
			.validate()
			.context("Invalid [octree] section")?;

		Ok(config)
	}

	pub fn shadow_system_config(&self) -> ShadowSystemConfig {
		let shadows = &self.shadows;
		ShadowSystemConfig {
			near_far: NearFarConfig {
				provisional_near: shadows.provisional_near,
				provisional_far: shadows.provisional_far,
				min_plane: shadows.min_plane,
			},
			cached_near_far: shadows.cached_near_far,
			atlas_size: shadows.atlas_size,
			max_maps: shadows.max_maps,
			directional_fit: match shadows.strategy {
				StrategyConfig::BoundingSphere => DirectionalFit::BoundingSphere,
				StrategyConfig::FrustumSilhouette => DirectionalFit::FrustumSilhouette,
			},
			directional_viewport_scale: shadows.viewport_scale,
			spot_near: shadows.spot_near,
		}
	}

	pub fn octree_config(&self) -> OctreeConfig {
		match &self.octree {
			Some(section) => OctreeConfig {
				split_threshold: section.split_threshold,
				min_half_extent: section.min_half_extent,
				initial_half_extent: section.initial_half_extent,
				..Default::default()
			},
			None => OctreeConfig::default(),
		}
	}

	/// Viewing camera aimed at its target.
	pub fn camera(&self) -> Camera {
		let [width, height] = self.camera.viewport;
		let mut camera = Camera::perspective(self.camera.fov_y, width, height);
		camera.position = Vec3::from(self.camera.position);
		camera.look_at(Vec3::from(self.camera.target));
		camera.update();
		camera
	}

	pub fn instances(&self) -> Vec<ModelInstance> {
		self
			.instances
			.iter()
			.map(|instance| {
				let transform = Mat4::from_scale_rotation_translation(
					Vec3::splat(instance.scale),
					Quat::IDENTITY,
					Vec3::from(instance.position),
				);
				ModelInstance::new(
					instance
						.parts
						.iter()
						.map(|p| BoundingBox::new(Vec3::from(p.min), Vec3::from(p.max))),
				)
				.with_transform(transform)
			})
			.collect()
	}

	pub fn lights(&self) -> Vec<Light> {
		self
			.lights
			.iter()
			.map(|light| match *light {
				LightConfig::Directional { direction } => Light::directional(Vec3::from(direction)),
				LightConfig::Spot {
					position,
					direction,
					range,
					cutoff,
				} => Light::spot(Vec3::from(position), Vec3::from(direction), range, cutoff),
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const SCENE: &str = r#"
[camera]
position = [0.0, 2.0, 10.0]
target = [0.0, 0.0, 0.0]

[shadows]
max_maps = 9
strategy = "bounding_sphere"

[[instances]]
name = "crate"
position = [1.0, 0.0, -2.0]
scale = 2.0
parts = [{ min = [-0.5, 0.0, -0.5], max = [0.5, 1.0, 0.5] }]

[[lights]]
kind = "directional"
direction = [0.3, -1.0, 0.2]

[[lights]]
kind = "spot"
position = [0.0, 4.0, 0.0]
direction = [0.0, -1.0, 0.0]
range = 12.0
cutoff = 25.0

[[queries]]
point = [0.0, 0.0, 0.0]
radius = 5.0
"#;

	#[test]
	fn test_parse_scene() {
		let config = SceneConfig::parse(SCENE).unwrap();
		assert_eq!(config.camera.fov_y, 67.0, "default fov");
		assert_eq!(config.instances.len(), 1);
		assert_eq!(config.lights.len(), 2);
		assert_eq!(config.queries.len(), 1);
		assert!(config.octree.is_none());

		let system = config.shadow_system_config();
		assert_eq!(system.max_maps, 9);
		assert_eq!(system.atlas_size, ShadowSystemConfig::default().atlas_size);
		assert_eq!(system.directional_fit, DirectionalFit::BoundingSphere);
	}

	#[test]
	fn test_instances_apply_scale_and_position() {
		let config = SceneConfig::parse(SCENE).unwrap();
		let instances = config.instances();
		let bounds = scene_spatial::SceneInstance::bounding_box(&instances[0]);
		assert_eq!(bounds.min, Vec3::new(0.0, 0.0, -3.0));
		assert_eq!(bounds.max, Vec3::new(2.0, 2.0, -1.0));
	}

	#[test]
	fn test_camera_looks_at_target() {
		let config = SceneConfig::parse(SCENE).unwrap();
		let camera = config.camera();
		assert!(camera.frustum().point_in_frustum(Vec3::ZERO));
		assert!(!camera.frustum().point_in_frustum(Vec3::new(0.0, 2.0, 20.0)));
	}

	#[test]
	fn test_lights() {
		let lights = SceneConfig::parse(SCENE).unwrap().lights();
		assert!(matches!(lights[0], Light::Directional(_)));
		match lights[1] {
			Light::Spot(spot) => {
				assert_eq!(spot.range, 12.0);
				assert_eq!(spot.cutoff_angle_degrees, 25.0);
			}
			_ => panic!("expected spot light"),
		}
	}

	#[test]
	fn test_rejects_unknown_strategy() {
		let bad = SCENE.replace("\"bounding_sphere\"", "\"cascaded\"");
		assert!(SceneConfig::parse(&bad).is_err());
	}

	#[test]
	fn test_rejects_inverted_part() {
		let bad = SCENE.replace("max = [0.5, 1.0, 0.5]", "max = [0.5, -1.0, 0.5]");
		let err = SceneConfig::parse(&bad).unwrap_err();
		assert!(err.to_string().contains("crate"), "{}", err);
	}

	#[test]
	fn test_rejects_zero_maps() {
		let bad = SCENE.replace("max_maps = 9", "max_maps = 0");
		assert!(SceneConfig::parse(&bad).is_err());
	}

	#[test]
	fn test_octree_section_defaults() {
		let scene = format!("{}\n[octree]\nsplit_threshold = 2\n", SCENE);
		let config = SceneConfig::parse(&scene).unwrap();
		let octree = config.octree_config();
		assert_eq!(octree.split_threshold, 2);
		assert_eq!(octree.initial_half_extent, OctreeConfig::default().initial_half_extent);
	}
}
