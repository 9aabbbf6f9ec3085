//! Scene instances - the only view of the scene the analyzers need.
//!
//! An instance is anything with a stable identity that can report its
//! world-space bounds. [`ModelInstance`] is a ready-made implementation for
//! meshes described by node-local part bounds and a world transform.

use std::sync::atomic::{AtomicU64, Ordering};

use glam::Mat4;
use smallvec::SmallVec;

use crate::math::BoundingBox;

// =============================================================================
// InstanceId - identity key
// =============================================================================

/// Atomic counter for generating unique InstanceIds.
static INSTANCE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque instance identifier.
///
/// Used as the identity key by caches; two instances with the same id are
/// treated as the same object.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct InstanceId(u64);

impl InstanceId {
	/// Generate a new unique InstanceId.
	///
	/// Each call advances a global counter, so there is no `Default`.
	#[allow(clippy::new_without_default)]
	pub fn new() -> Self {
		Self(INSTANCE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
	}

	/// Wrap an id assigned by the caller.
	pub const fn from_raw(raw: u64) -> Self {
		Self(raw)
	}

	/// Get the raw ID value.
	pub fn raw(&self) -> u64 {
		self.0
	}
}

// =============================================================================
// SceneInstance - bounds provider
// =============================================================================

/// Something placed in the scene with computable world-space bounds.
pub trait SceneInstance {
	/// Identity of this instance.
	fn id(&self) -> InstanceId;

	/// Union this instance's bounds into `out`.
	fn extend_bounding_box(&self, out: &mut BoundingBox);

	/// Overwrite `out` with this instance's bounds.
	fn calculate_bounding_box(&self, out: &mut BoundingBox) {
		out.inf();
		self.extend_bounding_box(out);
	}

	/// This instance's bounds as a new box.
	fn bounding_box(&self) -> BoundingBox {
		let mut out = BoundingBox::empty();
		self.extend_bounding_box(&mut out);
		out
	}
}

impl<T: SceneInstance + ?Sized> SceneInstance for &T {
	fn id(&self) -> InstanceId {
		(**self).id()
	}

	fn extend_bounding_box(&self, out: &mut BoundingBox) {
		(**self).extend_bounding_box(out)
	}
}

impl<T: SceneInstance + ?Sized> SceneInstance for Box<T> {
	fn id(&self) -> InstanceId {
		(**self).id()
	}

	fn extend_bounding_box(&self, out: &mut BoundingBox) {
		(**self).extend_bounding_box(out)
	}
}

// =============================================================================
// ModelInstance
// =============================================================================

/// A model placed in the world: node-local part bounds plus a transform.
#[derive(Clone, Debug)]
pub struct ModelInstance {
	pub id: InstanceId,
	/// Local-to-world transform applied to every part.
	pub transform: Mat4,
	/// Bounds of each mesh part in model space.
	pub parts: SmallVec<[BoundingBox; 4]>,
}

impl ModelInstance {
	/// Create an instance with a fresh id and identity transform.
	pub fn new(parts: impl IntoIterator<Item = BoundingBox>) -> Self {
		Self {
			id: InstanceId::new(),
			transform: Mat4::IDENTITY,
			parts: parts.into_iter().collect(),
		}
	}

	pub fn with_transform(mut self, transform: Mat4) -> Self {
		self.transform = transform;
		self
	}

	pub fn with_id(mut self, id: InstanceId) -> Self {
		self.id = id;
		self
	}
}

impl SceneInstance for ModelInstance {
	fn id(&self) -> InstanceId {
		self.id
	}

	fn extend_bounding_box(&self, out: &mut BoundingBox) {
		for part in &self.parts {
			out.ext_box(&part.transformed(&self.transform));
		}
	}
}

#[cfg(test)]
mod tests {
	use glam::Vec3;

	use super::*;

	#[test]
	fn test_ids_are_unique() {
		let a = InstanceId::new();
		let b = InstanceId::new();
		assert_ne!(a, b);
		assert_eq!(InstanceId::from_raw(a.raw()), a);
	}

	#[test]
	fn test_copies_share_id() {
		let instance = ModelInstance::new([BoundingBox::new(Vec3::ZERO, Vec3::ONE)]);
		let copy = instance.clone();
		assert_eq!(copy.id, instance.id);

		let pinned = copy.with_id(InstanceId::from_raw(7));
		assert_eq!(pinned.id.raw(), 7);
	}

	#[test]
	fn test_model_instance_bounds_follow_transform() {
		let instance = ModelInstance::new([
			BoundingBox::new(Vec3::splat(-1.0), Vec3::splat(1.0)),
			BoundingBox::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.5, 3.0, 0.5)),
		])
		.with_transform(Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)));

		let mut out = BoundingBox::new(Vec3::splat(-100.0), Vec3::splat(100.0));
		instance.calculate_bounding_box(&mut out);
		assert_eq!(out.min, Vec3::new(9.0, -1.0, -1.0));
		assert_eq!(out.max, Vec3::new(11.0, 3.0, 1.0));
	}

	#[test]
	fn test_extend_accumulates() {
		let a = ModelInstance::new([BoundingBox::new(Vec3::ZERO, Vec3::ONE)]);
		let b = ModelInstance::new([BoundingBox::new(Vec3::splat(4.0), Vec3::splat(5.0))]);

		let mut acc = BoundingBox::empty();
		a.extend_bounding_box(&mut acc);
		b.extend_bounding_box(&mut acc);
		assert_eq!(acc, BoundingBox::new(Vec3::ZERO, Vec3::splat(5.0)));
	}

	#[test]
	fn test_instance_without_parts_is_empty() {
		let instance = ModelInstance::new([]);
		assert!(!instance.bounding_box().is_valid());
	}

	#[test]
	fn test_dyn_instances() {
		let boxed: Vec<Box<dyn SceneInstance>> = vec![Box::new(ModelInstance::new([
			BoundingBox::new(Vec3::ZERO, Vec3::ONE),
		]))];
		assert!(boxed[0].bounding_box().is_valid());
	}
}
