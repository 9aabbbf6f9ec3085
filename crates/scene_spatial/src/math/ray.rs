//! Rays and ray/volume intersection.

use glam::Vec3;

use super::BoundingBox;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
	pub origin: Vec3,
	/// Unit direction.
	pub direction: Vec3,
}

impl Ray {
	/// Create a ray; `direction` is normalized.
	pub fn new(origin: Vec3, direction: Vec3) -> Self {
		Self {
			origin,
			direction: direction.normalize_or_zero(),
		}
	}

	#[inline]
	pub fn point_at(&self, distance: f32) -> Vec3 {
		self.origin + self.direction * distance
	}

	/// Distance along the ray to where it enters `bounds` (slab test).
	///
	/// Returns `Some(0.0)` when the origin is already inside.
	pub fn intersect_bounds(&self, bounds: &BoundingBox) -> Option<f32> {
		if !bounds.is_valid() {
			return None;
		}
		let mut t_enter = f32::NEG_INFINITY;
		let mut t_exit = f32::INFINITY;
		for axis in 0..3 {
			let origin = self.origin[axis];
			let dir = self.direction[axis];
			let (min, max) = (bounds.min[axis], bounds.max[axis]);
			if dir == 0.0 {
				// Parallel to this slab: either always inside it or never.
				if origin < min || origin > max {
					return None;
				}
				continue;
			}
			let inv = 1.0 / dir;
			let (t1, t2) = ((min - origin) * inv, (max - origin) * inv);
			t_enter = t_enter.max(t1.min(t2));
			t_exit = t_exit.min(t1.max(t2));
		}

		if t_exit < 0.0 || t_enter > t_exit {
			return None;
		}
		Some(t_enter.max(0.0))
	}

	/// Distance along the ray to the first hit with a sphere.
	pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
		let oc = self.origin - center;
		let b = oc.dot(self.direction);
		let c = oc.length_squared() - radius * radius;
		let disc = b * b - c;
		if disc < 0.0 {
			return None;
		}
		let root = disc.sqrt();
		let near = -b - root;
		if near >= 0.0 {
			return Some(near);
		}
		let far = -b + root;
		(far >= 0.0).then_some(far)
	}
}
