//! Shadow-casting lights and per-frame light filtering.

use glam::Vec3;

use crate::math::Camera;

/// Light shining uniformly along one direction, like the sun.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
	pub direction: Vec3,
}

/// Cone-shaped light with a limited range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpotLight {
	pub position: Vec3,
	pub direction: Vec3,
	/// Distance past which the light has no effect.
	pub range: f32,
	/// Half-angle of the cone in degrees.
	pub cutoff_angle_degrees: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Light {
	Directional(DirectionalLight),
	Spot(SpotLight),
}

impl Light {
	pub fn directional(direction: Vec3) -> Self {
		Self::Directional(DirectionalLight { direction })
	}

	pub fn spot(position: Vec3, direction: Vec3, range: f32, cutoff_angle_degrees: f32) -> Self {
		Self::Spot(SpotLight {
			position,
			direction,
			range,
			cutoff_angle_degrees,
		})
	}

	pub fn direction(&self) -> Vec3 {
		match self {
			Self::Directional(light) => light.direction,
			Self::Spot(light) => light.direction,
		}
	}
}

/// Decides which lights get a shadow map this frame.
pub trait LightFilter {
	/// `true` keeps the light.
	fn filter(&self, light: &Light, camera: &Camera) -> bool;
}

/// Keeps every light.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLightFilter;

impl LightFilter for NoLightFilter {
	fn filter(&self, _light: &Light, _camera: &Camera) -> bool {
		true
	}
}

/// Drops spot lights whose range cannot reach the camera frustum.
///
/// Directional lights affect the whole scene and are always kept.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrustumLightFilter;

impl LightFilter for FrustumLightFilter {
	fn filter(&self, light: &Light, camera: &Camera) -> bool {
		match light {
			Light::Directional(_) => true,
			Light::Spot(spot) => camera.frustum().sphere_in_frustum(spot.position, spot.range),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn camera() -> Camera {
		let mut camera = Camera::perspective(67.0, 1.0, 1.0);
		camera.far = 50.0;
		camera.update();
		camera
	}

	#[test]
	fn test_no_filter_keeps_everything() {
		let behind = Light::spot(Vec3::new(0.0, 0.0, 500.0), Vec3::Z, 1.0, 30.0);
		assert!(NoLightFilter.filter(&behind, &camera()));
	}

	#[test]
	fn test_frustum_filter_rejects_spot_behind_camera() {
		let behind = Light::spot(Vec3::new(0.0, 0.0, 20.0), Vec3::Z, 5.0, 30.0);
		assert!(!FrustumLightFilter.filter(&behind, &camera()));
	}

	#[test]
	fn test_frustum_filter_keeps_reaching_spots() {
		let filter = FrustumLightFilter;
		let inside = Light::spot(Vec3::new(0.0, 5.0, -10.0), Vec3::NEG_Y, 8.0, 30.0);
		assert!(filter.filter(&inside, &camera()));

		// Outside the frustum, but its range reaches in.
		let reaching = Light::spot(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z, 10.0, 30.0);
		assert!(filter.filter(&reaching, &camera()));
	}

	#[test]
	fn test_frustum_filter_keeps_directional() {
		let sun = Light::directional(Vec3::new(0.3, -1.0, 0.2));
		assert!(FrustumLightFilter.filter(&sun, &camera()));
		assert_eq!(sun.direction(), Vec3::new(0.3, -1.0, 0.2));
	}
}
