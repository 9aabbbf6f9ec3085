use glam::Vec3;

use super::*;

#[test]
fn test_perspective_defaults() {
	let camera = Camera::perspective(67.0, 16.0, 9.0);
	assert_eq!(camera.position, Vec3::ZERO);
	assert_eq!(camera.direction, Vec3::NEG_Z);
	assert_eq!(camera.up, Vec3::Y);
	assert_eq!(camera.near, 1.0);
	assert_eq!(camera.far, 100.0);
}

#[test]
fn test_update_moves_frustum() {
	let mut camera = Camera::perspective(67.0, 1.0, 1.0);
	assert!(camera.frustum().point_in_frustum(Vec3::new(0.0, 0.0, -10.0)));

	camera.position = Vec3::new(0.0, 0.0, -50.0);
	camera.update();
	assert!(!camera.frustum().point_in_frustum(Vec3::new(0.0, 0.0, -10.0)));
	assert!(camera.frustum().point_in_frustum(Vec3::new(0.0, 0.0, -70.0)));
}

#[test]
fn test_near_far_reflected_in_frustum() {
	let mut camera = Camera::perspective(67.0, 1.0, 1.0);
	camera.near = 10.0;
	camera.far = 20.0;
	camera.update();
	assert!(!camera.frustum().point_in_frustum(Vec3::new(0.0, 0.0, -5.0)));
	assert!(camera.frustum().point_in_frustum(Vec3::new(0.0, 0.0, -15.0)));
	assert!(!camera.frustum().point_in_frustum(Vec3::new(0.0, 0.0, -25.0)));
}

#[test]
fn test_look_at_keeps_up_orthogonal() {
	let mut camera = Camera::perspective(67.0, 1.0, 1.0);
	camera.position = Vec3::new(0.0, 10.0, 10.0);
	camera.look_at(Vec3::ZERO);

	let expected = Vec3::new(0.0, -1.0, -1.0).normalize();
	assert!((camera.direction - expected).length() < 1e-5);
	assert!(camera.direction.dot(camera.up).abs() < 1e-5);
	assert!((camera.up.length() - 1.0).abs() < 1e-5);
	assert!(camera.up.y > 0.0);
}

#[test]
fn test_look_at_straight_down() {
	let mut camera = Camera::perspective(67.0, 1.0, 1.0);
	camera.position = Vec3::new(0.0, 10.0, 0.0);
	camera.look_at(Vec3::ZERO);
	assert!((camera.direction - Vec3::NEG_Y).length() < 1e-5);
	assert!(camera.up.is_finite());
	assert!(camera.direction.dot(camera.up).abs() < 1e-5);
}

#[test]
fn test_orthographic_extent() {
	let mut camera = Camera::orthographic(10.0, 4.0);
	camera.far = 10.0;
	camera.update();
	let bounds = camera.frustum().bounding_box();
	assert!((bounds.min - Vec3::new(-5.0, -2.0, -10.0)).length() < 1e-4);
	assert!((bounds.max - Vec3::new(5.0, 2.0, 0.0)).length() < 1e-4);
}
