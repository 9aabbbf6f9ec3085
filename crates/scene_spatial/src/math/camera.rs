//! Camera with perspective or orthographic projection and a cached frustum.
//!
//! Fields are public and mutable; call [`Camera::update`] after changing any
//! of them so the matrices and frustum catch up.

use glam::{Mat4, Vec3};

use super::Frustum;

/// Projection model of a [`Camera`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
	/// Perspective projection with a vertical field of view.
	Perspective { fov_y_degrees: f32 },
	/// Orthographic projection; `zoom` scales the viewport.
	Orthographic { zoom: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
	pub position: Vec3,
	/// Unit view direction.
	pub direction: Vec3,
	/// Unit up vector, orthogonal to `direction`.
	pub up: Vec3,
	/// Distance to the near clipping plane.
	pub near: f32,
	/// Distance to the far clipping plane.
	pub far: f32,
	pub viewport_width: f32,
	pub viewport_height: f32,
	pub projection: Projection,

	view: Mat4,
	projection_matrix: Mat4,
	combined: Mat4,
	inv_projection_view: Mat4,
	frustum: Frustum,
}

impl Camera {
	/// Perspective camera at the origin looking down -Z.
	pub fn perspective(fov_y_degrees: f32, viewport_width: f32, viewport_height: f32) -> Self {
		Self::with_projection(
			Projection::Perspective { fov_y_degrees },
			1.0,
			viewport_width,
			viewport_height,
		)
	}

	/// Orthographic camera at the origin looking down -Z.
	pub fn orthographic(viewport_width: f32, viewport_height: f32) -> Self {
		Self::with_projection(
			Projection::Orthographic { zoom: 1.0 },
			0.0,
			viewport_width,
			viewport_height,
		)
	}

	fn with_projection(
		projection: Projection,
		near: f32,
		viewport_width: f32,
		viewport_height: f32,
	) -> Self {
		let mut camera = Self {
			position: Vec3::ZERO,
			direction: Vec3::NEG_Z,
			up: Vec3::Y,
			near,
			far: 100.0,
			viewport_width,
			viewport_height,
			projection,
			view: Mat4::IDENTITY,
			projection_matrix: Mat4::IDENTITY,
			combined: Mat4::IDENTITY,
			inv_projection_view: Mat4::IDENTITY,
			frustum: Frustum::default(),
		};
		camera.update();
		camera
	}

	/// Recompute the matrices and the frustum from the public fields.
	pub fn update(&mut self) {
		self.projection_matrix = match self.projection {
			Projection::Perspective { fov_y_degrees } => {
				let aspect = self.viewport_width / self.viewport_height;
				Mat4::perspective_rh_gl(
					fov_y_degrees.to_radians(),
					aspect,
					self.near.abs(),
					self.far.abs(),
				)
			}
			Projection::Orthographic { zoom } => {
				let half_w = zoom * self.viewport_width * 0.5;
				let half_h = zoom * self.viewport_height * 0.5;
				Mat4::orthographic_rh_gl(-half_w, half_w, -half_h, half_h, self.near, self.far)
			}
		};
		self.view = Mat4::look_to_rh(self.position, self.direction, self.up);
		self.combined = self.projection_matrix * self.view;
		self.inv_projection_view = self.combined.inverse();
		self.frustum = Frustum::from_inverse_view_projection(&self.inv_projection_view);
	}

	/// Aim the camera at `target`, keeping `up` orthogonal to the new direction.
	///
	/// Does not call [`Camera::update`].
	pub fn look_at(&mut self, target: Vec3) {
		let dir = (target - self.position).normalize_or_zero();
		if dir == Vec3::ZERO {
			return;
		}
		let dot = dir.dot(self.up);
		if (dot - 1.0).abs() < 1e-6 {
			self.up = -self.direction;
		} else if (dot + 1.0).abs() < 1e-6 {
			self.up = self.direction;
		}
		self.direction = dir;
		self.normalize_up();
	}

	/// Re-orthogonalise `up` against `direction`.
	pub fn normalize_up(&mut self) {
		let right = self.direction.cross(self.up).normalize_or_zero();
		if right != Vec3::ZERO {
			self.up = right.cross(self.direction).normalize();
		}
	}

	#[inline]
	pub fn frustum(&self) -> &Frustum {
		&self.frustum
	}

	#[inline]
	pub fn view(&self) -> &Mat4 {
		&self.view
	}

	#[inline]
	pub fn projection_matrix(&self) -> &Mat4 {
		&self.projection_matrix
	}

	/// projection * view.
	#[inline]
	pub fn combined(&self) -> &Mat4 {
		&self.combined
	}

	#[inline]
	pub fn inv_projection_view(&self) -> &Mat4 {
		&self.inv_projection_view
	}
}

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;
