//! Frustum - six clipping planes plus the eight corner points they meet at.
//!
//! Built by un-projecting the corners of the OpenGL clip cube
//! (z in [-1, 1]) through an inverse view-projection matrix, so it works for
//! perspective and orthographic projections alike.

use glam::{Mat4, Vec3};

use super::{BoundingBox, Plane};

/// Frustum plane indices.
pub const PLANE_NEAR: usize = 0;
pub const PLANE_FAR: usize = 1;
pub const PLANE_LEFT: usize = 2;
pub const PLANE_RIGHT: usize = 3;
pub const PLANE_TOP: usize = 4;
pub const PLANE_BOTTOM: usize = 5;

/// Clip-space corners: near quad then far quad, counter-clockwise from
/// bottom-left.
const CLIP_SPACE_POINTS: [Vec3; 8] = [
	Vec3::new(-1.0, -1.0, -1.0),
	Vec3::new(1.0, -1.0, -1.0),
	Vec3::new(1.0, 1.0, -1.0),
	Vec3::new(-1.0, 1.0, -1.0),
	Vec3::new(-1.0, -1.0, 1.0),
	Vec3::new(1.0, -1.0, 1.0),
	Vec3::new(1.0, 1.0, 1.0),
	Vec3::new(-1.0, 1.0, 1.0),
];

/// Corner triples spanning each plane, indexed like the `PLANE_*` constants.
const PLANE_CORNERS: [[usize; 3]; 6] = [
	[0, 1, 2], // near
	[4, 5, 6], // far
	[0, 4, 3], // left
	[1, 5, 2], // right
	[2, 3, 6], // top
	[0, 1, 4], // bottom
];

/// View volume with inward-facing planes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frustum {
	pub planes: [Plane; 6],
	pub plane_points: [Vec3; 8],
}

impl Frustum {
	/// Build from the inverse of a combined projection * view matrix.
	pub fn from_inverse_view_projection(inv_projection_view: &Mat4) -> Self {
		let plane_points = CLIP_SPACE_POINTS.map(|p| inv_projection_view.project_point3(p));
		let centroid = plane_points.iter().copied().sum::<Vec3>() / 8.0;

		let planes = PLANE_CORNERS.map(|[a, b, c]| {
			let plane = Plane::from_points(plane_points[a], plane_points[b], plane_points[c]);
			// Winding flips with handedness of the projection; orient by centroid.
			if plane.distance(centroid) < 0.0 {
				plane.flipped()
			} else {
				plane
			}
		});

		Self {
			planes,
			plane_points,
		}
	}

	/// Build from a combined projection * view matrix.
	pub fn from_view_projection(projection_view: &Mat4) -> Self {
		Self::from_inverse_view_projection(&projection_view.inverse())
	}

	/// Check if a point lies inside or on the frustum.
	pub fn point_in_frustum(&self, point: Vec3) -> bool {
		self.planes.iter().all(|plane| plane.distance(point) >= 0.0)
	}

	/// Check if a sphere is at least partially inside.
	pub fn sphere_in_frustum(&self, center: Vec3, radius: f32) -> bool {
		self
			.planes
			.iter()
			.all(|plane| plane.distance(center) >= -radius)
	}

	/// Test a box against all six planes.
	///
	/// Uses the positive-vertex test: for each plane, take the box corner
	/// furthest along the plane normal. If even that corner is behind the
	/// plane, the whole box is outside. Conservative: may accept boxes that
	/// sit just outside a frustum edge, never rejects a visible one.
	pub fn bounds_in_frustum(&self, bounds: &BoundingBox) -> bool {
		if !bounds.is_valid() {
			return false;
		}
		self.planes.iter().all(|plane| {
			let normal = plane.normal;
			let p_vertex = Vec3::new(
				if normal.x >= 0.0 { bounds.max.x } else { bounds.min.x },
				if normal.y >= 0.0 { bounds.max.y } else { bounds.min.y },
				if normal.z >= 0.0 { bounds.max.z } else { bounds.min.z },
			);
			plane.distance(p_vertex) >= 0.0
		})
	}

	/// Bounds of the eight corner points.
	pub fn bounding_box(&self) -> BoundingBox {
		BoundingBox::from_points(self.plane_points)
	}
}

impl Default for Frustum {
	/// The clip cube itself.
	fn default() -> Self {
		Self::from_inverse_view_projection(&Mat4::IDENTITY)
	}
}

#[cfg(test)]
#[path = "frustum_test.rs"]
mod frustum_test;
