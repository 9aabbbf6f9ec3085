//! Shadow camera fitting for directional lights.
//!
//! Given the viewing camera's frustum and a light direction, produce the
//! orthographic camera that renders the light's shadow map.
//!
//! # Bounding sphere fit
//!
//! ```text
//!            light
//!              |  dir
//!   position = c - dir * 1.5r
//!              |
//!   near 0.5r -+-------- sphere top
//!              |    c
//!   far  2.5r -+-------- sphere bottom
//! ```
//!
//! The frustum corners are boxed, the box is reduced to its bounding sphere
//! (center `c`, radius `r`) and the camera is backed off along the light
//! direction so the sphere sits between the planes.

use glam::Vec3;
use tracing::trace;

use crate::error::{Result, SpatialError};
use crate::math::{Camera, Frustum, Projection};

// =============================================================================
// DirectionalResult
// =============================================================================

/// Orthographic shadow camera parameters for one directional light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalResult {
	/// Unit light direction.
	pub direction: Vec3,
	pub position: Vec3,
	/// Unit up vector orthogonal to `direction`.
	pub up: Vec3,
	pub near: f32,
	pub far: f32,
	pub viewport_width: f32,
	pub viewport_height: f32,
}

impl DirectionalResult {
	/// Copy onto `camera` as an orthographic projection and update it.
	pub fn apply_to(&self, camera: &mut Camera) {
		camera.projection = Projection::Orthographic { zoom: 1.0 };
		camera.position = self.position;
		camera.direction = self.direction;
		camera.up = self.up;
		camera.near = self.near;
		camera.far = self.far;
		camera.viewport_width = self.viewport_width;
		camera.viewport_height = self.viewport_height;
		camera.update();
	}

	/// New orthographic camera with these parameters.
	pub fn to_camera(&self) -> Camera {
		let mut camera = Camera::orthographic(self.viewport_width, self.viewport_height);
		self.apply_to(&mut camera);
		camera
	}
}

// =============================================================================
// DirectionalAnalyzer - strategy trait
// =============================================================================

/// Fits a shadow camera for a directional light to a viewing frustum.
pub trait DirectionalAnalyzer {
	fn analyze(&self, frustum: &Frustum, direction: Vec3) -> Result<DirectionalResult>;
}

/// Normalize a light direction, rejecting zero and non-finite input.
fn light_direction(direction: Vec3) -> Result<Vec3> {
	let dir = direction.normalize_or_zero();
	if dir == Vec3::ZERO || !dir.is_finite() {
		return Err(SpatialError::ZeroDirection);
	}
	Ok(dir)
}

/// Unit up vector for a camera looking along `dir`.
///
/// Rotates the direction's components `(y, z, x)` and removes the part
/// parallel to `dir`. When the rotated vector is parallel to `dir` (all
/// components equal in magnitude and sign) the world axis least aligned with
/// `dir` is used instead.
pub fn shadow_up(dir: Vec3) -> Vec3 {
	let permuted = Vec3::new(dir.y, dir.z, dir.x);
	let rejected = permuted - dir * permuted.dot(dir);
	if rejected.length_squared() > 1e-6 {
		return rejected.normalize();
	}

	let abs = dir.abs();
	let axis = if abs.x <= abs.y && abs.x <= abs.z {
		Vec3::X
	} else if abs.y <= abs.z {
		Vec3::Y
	} else {
		Vec3::Z
	};
	(axis - dir * axis.dot(dir)).normalize()
}

// =============================================================================
// BoundingSphereDirectionalAnalyzer
// =============================================================================

/// Fits the shadow camera to the bounding sphere of the frustum corners.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundingSphereDirectionalAnalyzer {
	/// Viewport edge as a multiple of the sphere radius. 2.0 covers the
	/// whole sphere.
	pub viewport_scale: f32,
}

impl Default for BoundingSphereDirectionalAnalyzer {
	fn default() -> Self {
		Self { viewport_scale: 1.0 }
	}
}

impl BoundingSphereDirectionalAnalyzer {
	pub fn new(viewport_scale: f32) -> Result<Self> {
		if !(viewport_scale > 0.0) || !viewport_scale.is_finite() {
			return Err(SpatialError::InvalidConfig(format!(
				"viewport_scale must be positive, got {}",
				viewport_scale
			)));
		}
		Ok(Self { viewport_scale })
	}
}

impl DirectionalAnalyzer for BoundingSphereDirectionalAnalyzer {
	fn analyze(&self, frustum: &Frustum, direction: Vec3) -> Result<DirectionalResult> {
		let dir = light_direction(direction)?;

		let sphere = frustum.bounding_box().bounding_sphere();
		if !sphere.is_valid() || !(sphere.radius > 0.0) || !sphere.radius.is_finite() {
			return Err(SpatialError::DegenerateFrustum);
		}
		let (center, radius) = (sphere.center, sphere.radius);
		let viewport = radius * self.viewport_scale;

		let result = DirectionalResult {
			direction: dir,
			position: center - dir * (1.5 * radius),
			up: shadow_up(dir),
			near: 0.5 * radius,
			far: 2.5 * radius,
			viewport_width: viewport,
			viewport_height: viewport,
		};
		trace!(?center, radius, "directional shadow fitted");
		Ok(result)
	}
}

// =============================================================================
// FrustumDirectionalAnalyzer
// =============================================================================

/// Tight fit to the frustum silhouette as seen from the light.
///
/// Not implemented: every call fails with [`SpatialError::Unimplemented`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrustumDirectionalAnalyzer;

impl DirectionalAnalyzer for FrustumDirectionalAnalyzer {
	fn analyze(&self, _frustum: &Frustum, _direction: Vec3) -> Result<DirectionalResult> {
		Err(SpatialError::Unimplemented("frustum silhouette directional analysis"))
	}
}

// =============================================================================
// DirectionalStrategy
// =============================================================================

/// Closed set of directional strategies, selectable at runtime.
#[derive(Clone, Debug, PartialEq)]
pub enum DirectionalStrategy {
	BoundingSphere(BoundingSphereDirectionalAnalyzer),
	FrustumSilhouette(FrustumDirectionalAnalyzer),
}

impl Default for DirectionalStrategy {
	fn default() -> Self {
		Self::BoundingSphere(BoundingSphereDirectionalAnalyzer::default())
	}
}

impl DirectionalAnalyzer for DirectionalStrategy {
	fn analyze(&self, frustum: &Frustum, direction: Vec3) -> Result<DirectionalResult> {
		match self {
			Self::BoundingSphere(analyzer) => analyzer.analyze(frustum, direction),
			Self::FrustumSilhouette(analyzer) => analyzer.analyze(frustum, direction),
		}
	}
}
