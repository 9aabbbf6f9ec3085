use glam::{Mat4, Vec3};

use super::*;

/// Perspective frustum at the origin looking down -Z, near 1, far 100.
fn perspective_frustum() -> Frustum {
	let projection = Mat4::perspective_rh_gl(90f32.to_radians(), 1.0, 1.0, 100.0);
	let view = Mat4::look_to_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
	Frustum::from_view_projection(&(projection * view))
}

#[test]
fn test_default_is_clip_cube() {
	let frustum = Frustum::default();
	let bounds = frustum.bounding_box();
	assert_eq!(bounds.min, Vec3::splat(-1.0));
	assert_eq!(bounds.max, Vec3::splat(1.0));
	assert!(frustum.point_in_frustum(Vec3::ZERO));
	assert!(!frustum.point_in_frustum(Vec3::new(0.0, 2.0, 0.0)));
}

#[test]
fn test_plane_points_lie_on_near_and_far() {
	let frustum = perspective_frustum();
	for point in &frustum.plane_points[..4] {
		assert!((point.z + 1.0).abs() < 1e-4, "near corner {point} at z = -1");
	}
	for point in &frustum.plane_points[4..] {
		assert!((point.z + 100.0).abs() < 1e-2, "far corner {point} at z = -100");
	}
}

#[test]
fn test_planes_face_inward() {
	let frustum = perspective_frustum();
	let inside = Vec3::new(0.0, 0.0, -10.0);
	for (i, plane) in frustum.planes.iter().enumerate() {
		assert!(plane.distance(inside) > 0.0, "plane {i} should face the interior");
	}
	assert!(frustum.planes[PLANE_NEAR].normal.z < 0.0);
	assert!(frustum.planes[PLANE_FAR].normal.z > 0.0);
}

#[test]
fn test_point_in_frustum() {
	let frustum = perspective_frustum();
	assert!(frustum.point_in_frustum(Vec3::new(0.0, 0.0, -50.0)));
	assert!(!frustum.point_in_frustum(Vec3::new(0.0, 0.0, 5.0)), "behind camera");
	assert!(!frustum.point_in_frustum(Vec3::new(0.0, 0.0, -0.5)), "before near plane");
	assert!(!frustum.point_in_frustum(Vec3::new(0.0, 0.0, -150.0)), "past far plane");
	assert!(!frustum.point_in_frustum(Vec3::new(30.0, 0.0, -10.0)), "outside 90 deg fov");
}

#[test]
fn test_bounds_in_frustum() {
	let frustum = perspective_frustum();

	let inside = BoundingBox::new(Vec3::new(-1.0, -1.0, -12.0), Vec3::new(1.0, 1.0, -10.0));
	assert!(frustum.bounds_in_frustum(&inside));

	let behind = BoundingBox::new(Vec3::new(-1.0, -1.0, 5.0), Vec3::new(1.0, 1.0, 7.0));
	assert!(!frustum.bounds_in_frustum(&behind));

	// Straddles the left plane: partially visible counts as inside.
	let straddling = BoundingBox::new(Vec3::new(-15.0, -1.0, -11.0), Vec3::new(-5.0, 1.0, -9.0));
	assert!(frustum.bounds_in_frustum(&straddling));

	let enclosing = BoundingBox::new(Vec3::splat(-500.0), Vec3::splat(500.0));
	assert!(frustum.bounds_in_frustum(&enclosing));

	assert!(!frustum.bounds_in_frustum(&BoundingBox::empty()));
}

#[test]
fn test_sphere_in_frustum() {
	let frustum = perspective_frustum();
	assert!(frustum.sphere_in_frustum(Vec3::new(0.0, 0.0, -20.0), 1.0));
	assert!(frustum.sphere_in_frustum(Vec3::new(0.0, 0.0, 0.5), 2.0), "overlaps near plane");
	assert!(!frustum.sphere_in_frustum(Vec3::new(0.0, 0.0, 10.0), 2.0));
}

#[test]
fn test_orthographic_frustum_is_a_box() {
	let projection = Mat4::orthographic_rh_gl(-5.0, 5.0, -2.0, 2.0, 0.0, 10.0);
	let view = Mat4::look_to_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
	let frustum = Frustum::from_view_projection(&(projection * view));
	let bounds = frustum.bounding_box();
	assert!((bounds.min - Vec3::new(-5.0, -2.0, -10.0)).length() < 1e-4);
	assert!((bounds.max - Vec3::new(5.0, 2.0, 0.0)).length() < 1e-4);
}
