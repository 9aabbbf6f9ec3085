//! Plane in Hessian normal form.

use glam::Vec3;

/// Which side of a plane a point lies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaneSide {
	/// On the side the normal points to.
	Front,
	/// On the opposite side.
	Back,
	OnPlane,
}

/// Plane `normal · p + d = 0` with a unit-length normal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
	pub normal: Vec3,
	pub d: f32,
}

impl Plane {
	pub fn new(normal: Vec3, d: f32) -> Self {
		Self { normal, d }
	}

	/// Plane through a point with the given normal.
	pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
		let normal = normal.normalize_or_zero();
		Self {
			normal,
			d: -normal.dot(point),
		}
	}

	/// Plane through three points. The normal follows the right-hand rule for
	/// `a -> b -> c`; collinear points give a zero normal.
	pub fn from_points(a: Vec3, b: Vec3, c: Vec3) -> Self {
		Self::from_point_normal(a, (b - a).cross(c - a))
	}

	/// Signed distance from `point`; positive in front.
	#[inline]
	pub fn distance(&self, point: Vec3) -> f32 {
		self.normal.dot(point) + self.d
	}

	pub fn side(&self, point: Vec3) -> PlaneSide {
		let dist = self.distance(point);
		if dist == 0.0 {
			PlaneSide::OnPlane
		} else if dist < 0.0 {
			PlaneSide::Back
		} else {
			PlaneSide::Front
		}
	}

	/// Same plane facing the other way.
	#[inline]
	pub fn flipped(&self) -> Self {
		Self {
			normal: -self.normal,
			d: -self.d,
		}
	}
}
