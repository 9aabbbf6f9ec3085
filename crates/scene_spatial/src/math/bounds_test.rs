use glam::{Mat4, Vec3};

use super::*;

fn unit_box() -> BoundingBox {
	BoundingBox::new(Vec3::ZERO, Vec3::ONE)
}

// =========================================================================
// Containment (half-open point test, closed box test)
// =========================================================================

#[test]
fn test_contains_origin() {
	assert!(unit_box().contains_point(Vec3::ZERO), "min corner is inclusive");
}

/// The max side is exclusive. This mirrors the 2D stage hit-test convention
/// and must not be "fixed" to inclusive.
#[test]
fn test_max_corner_is_exclusive() {
	let b = unit_box();
	assert!(!b.contains_point(Vec3::ONE));
	assert!(!b.contains_point(Vec3::new(0.5, 0.5, 1.0)));
	assert!(b.contains_point(Vec3::splat(0.999)));
}

#[test]
fn test_contains_itself() {
	let b = unit_box();
	assert!(b.contains_box(&b));
}

#[test]
fn test_does_not_contain_adjacent_box() {
	let b1 = unit_box();
	let b2 = BoundingBox::new(Vec3::ONE, Vec3::splat(2.0));
	assert!(!b1.contains_box(&b2));
	assert!(!b2.contains_box(&b1));
}

#[test]
fn test_empty_box_contains_nothing() {
	let empty = BoundingBox::empty();
	assert!(!empty.contains_point(Vec3::ZERO));
	assert!(!empty.contains_box(&unit_box()));
	assert!(!unit_box().contains_box(&empty));
}

// =========================================================================
// Accumulation
// =========================================================================

#[test]
fn test_inf_is_union_identity() {
	let mut acc = BoundingBox::new(Vec3::splat(-5.0), Vec3::splat(5.0));
	acc.inf();
	assert!(!acc.is_valid());

	acc.ext_box(&unit_box());
	assert_eq!(acc, unit_box());
}

#[test]
fn test_ext_box_ignores_invalid() {
	let mut acc = unit_box();
	acc.ext_box(&BoundingBox::empty());
	assert_eq!(acc, unit_box());
}

#[test]
fn test_from_points() {
	let b = BoundingBox::from_points([
		Vec3::new(1.0, -2.0, 3.0),
		Vec3::new(-1.0, 4.0, 0.0),
		Vec3::new(0.0, 0.0, -7.0),
	]);
	assert_eq!(b.min, Vec3::new(-1.0, -2.0, -7.0));
	assert_eq!(b.max, Vec3::new(1.0, 4.0, 3.0));
}

#[test]
fn test_intersects_touching() {
	let a = unit_box();
	let b = BoundingBox::new(Vec3::ONE, Vec3::splat(2.0));
	let c = BoundingBox::new(Vec3::splat(1.5), Vec3::splat(2.0));
	assert!(a.intersects(&b), "touching boxes overlap");
	assert!(!a.intersects(&c));
}

// =========================================================================
// Derived volumes
// =========================================================================

#[test]
fn test_bounding_sphere() {
	let b = BoundingBox::new(Vec3::new(-1.0, -2.0, -2.0), Vec3::new(1.0, 2.0, 2.0));
	let sphere = b.bounding_sphere();
	assert_eq!(sphere.center, Vec3::ZERO);
	assert!((sphere.radius - 3.0).abs() < 1e-6, "half of diagonal 6");
	assert!(sphere.is_valid());
}

/// inf() followed by bounding_sphere() is a documented degenerate result,
/// not a panic.
#[test]
fn test_empty_box_sphere_is_degenerate() {
	let mut b = unit_box();
	b.inf();
	let sphere = b.bounding_sphere();
	assert!(sphere.radius <= 0.0);
	assert!(!sphere.is_valid());
}

#[test]
fn test_corners_cover_box() {
	let b = BoundingBox::new(Vec3::new(-1.0, 0.0, 2.0), Vec3::new(1.0, 3.0, 4.0));
	let corners = b.corners();
	assert_eq!(corners[0], b.min);
	assert_eq!(corners[7], b.max);
	assert_eq!(BoundingBox::from_points(corners), b);
}

#[test]
fn test_transformed_by_translation_and_rotation() {
	let b = unit_box();
	let moved = b.transformed(&Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)));
	assert_eq!(moved.min, Vec3::new(10.0, 0.0, 0.0));
	assert_eq!(moved.max, Vec3::new(11.0, 1.0, 1.0));

	let rotated = b.transformed(&Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2));
	assert!((rotated.min - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
	assert!((rotated.max - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-5);
}

#[test]
fn test_distance_squared_to_point() {
	let b = unit_box();
	assert_eq!(b.distance_squared_to_point(Vec3::splat(0.5)), 0.0);
	assert_eq!(b.distance_squared_to_point(Vec3::new(3.0, 0.5, 0.5)), 4.0);
}
