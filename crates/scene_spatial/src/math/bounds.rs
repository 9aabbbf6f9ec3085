//! Axis-aligned bounding boxes and the spheres derived from them.

use glam::{Mat4, Vec3};

/// Axis-aligned bounding box.
///
/// An "empty" box has inverted extents (`min = +inf`, `max = -inf`) so it can
/// be used as the identity of a union fold: extending it by anything yields
/// that thing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
	/// Minimum corner.
	pub min: Vec3,
	/// Maximum corner.
	pub max: Vec3,
}

impl BoundingBox {
	/// Box with inverted extents (ready for encapsulation).
	pub const EMPTY: Self = Self {
		min: Vec3::INFINITY,
		max: Vec3::NEG_INFINITY,
	};

	/// Create a new box from min and max corners.
	///
	/// # Panics
	/// Debug-asserts that min <= max on all axes.
	pub fn new(min: Vec3, max: Vec3) -> Self {
		debug_assert!(
			min.cmple(max).all(),
			"BoundingBox min must be <= max on all axes"
		);
		Self { min, max }
	}

	/// Create an empty box.
	#[inline]
	pub fn empty() -> Self {
		Self::EMPTY
	}

	/// Create a box from center and half-extents.
	pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
		Self {
			min: center - half_extents,
			max: center + half_extents,
		}
	}

	/// Smallest box enclosing all `points`. Empty if there are none.
	pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
		let mut out = Self::EMPTY;
		for point in points {
			out.ext_point(point);
		}
		out
	}

	/// Reset to the empty state.
	#[inline]
	pub fn inf(&mut self) -> &mut Self {
		*self = Self::EMPTY;
		self
	}

	/// Check if the box is valid (min <= max on all axes).
	#[inline]
	pub fn is_valid(&self) -> bool {
		self.min.cmple(self.max).all()
	}

	/// Expand the box to include a point.
	#[inline]
	pub fn ext_point(&mut self, point: Vec3) -> &mut Self {
		self.min = self.min.min(point);
		self.max = self.max.max(point);
		self
	}

	/// Expand the box to include another box. Invalid boxes are ignored.
	#[inline]
	pub fn ext_box(&mut self, other: &BoundingBox) -> &mut Self {
		if other.is_valid() {
			self.min = self.min.min(other.min);
			self.max = self.max.max(other.max);
		}
		self
	}

	/// Get the center of the box.
	#[inline]
	pub fn center(&self) -> Vec3 {
		(self.min + self.max) * 0.5
	}

	/// Get the size of the box (max - min).
	#[inline]
	pub fn dimensions(&self) -> Vec3 {
		self.max - self.min
	}

	/// The eight corners. Bit 0 of the index selects max X, bit 1 max Y,
	/// bit 2 max Z.
	pub fn corners(&self) -> [Vec3; 8] {
		std::array::from_fn(|i| {
			Vec3::new(
				if i & 1 != 0 { self.max.x } else { self.min.x },
				if i & 2 != 0 { self.max.y } else { self.min.y },
				if i & 4 != 0 { self.max.z } else { self.min.z },
			)
		})
	}

	/// Check if the box contains a point.
	///
	/// Half-open: the min side is inclusive, the max side exclusive.
	#[inline]
	pub fn contains_point(&self, point: Vec3) -> bool {
		point.cmpge(self.min).all() && point.cmplt(self.max).all()
	}

	/// Check if `other` lies entirely inside this box (closed on both sides).
	#[inline]
	pub fn contains_box(&self, other: &BoundingBox) -> bool {
		self.is_valid()
			&& other.is_valid()
			&& self.min.cmple(other.min).all()
			&& other.max.cmple(self.max).all()
	}

	/// Check if this box overlaps another.
	///
	/// Touching at the boundary counts as overlapping.
	#[inline]
	pub fn intersects(&self, other: &BoundingBox) -> bool {
		self.is_valid()
			&& other.is_valid()
			&& self.min.cmple(other.max).all()
			&& self.max.cmpge(other.min).all()
	}

	/// Bounds of this box after applying `transform` to its corners.
	pub fn transformed(&self, transform: &Mat4) -> BoundingBox {
		if !self.is_valid() {
			return Self::EMPTY;
		}
		Self::from_points(
			self
				.corners()
				.into_iter()
				.map(|corner| transform.transform_point3(corner)),
		)
	}

	/// Squared distance from `point` to the closest point of the box.
	#[inline]
	pub fn distance_squared_to_point(&self, point: Vec3) -> f32 {
		if !self.is_valid() {
			return f32::INFINITY;
		}
		let clamped = point.clamp(self.min, self.max);
		point.distance_squared(clamped)
	}

	/// Sphere centered on the box with the half diagonal as radius.
	///
	/// An empty box yields [`BoundingSphere::EMPTY`], whose radius is negative.
	pub fn bounding_sphere(&self) -> BoundingSphere {
		if !self.is_valid() {
			return BoundingSphere::EMPTY;
		}
		BoundingSphere {
			center: self.center(),
			radius: self.dimensions().length() * 0.5,
		}
	}
}

impl Default for BoundingBox {
	fn default() -> Self {
		Self::EMPTY
	}
}

/// Sphere given by center and radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingSphere {
	pub center: Vec3,
	pub radius: f32,
}

impl BoundingSphere {
	/// Degenerate sphere produced from an empty box.
	pub const EMPTY: Self = Self {
		center: Vec3::ZERO,
		radius: f32::NEG_INFINITY,
	};

	pub fn new(center: Vec3, radius: f32) -> Self {
		Self { center, radius }
	}

	/// A sphere is usable when its radius is a non-negative number.
	#[inline]
	pub fn is_valid(&self) -> bool {
		self.radius >= 0.0 && self.center.is_finite()
	}
}

#[cfg(test)]
#[path = "bounds_test.rs"]
mod bounds_test;
