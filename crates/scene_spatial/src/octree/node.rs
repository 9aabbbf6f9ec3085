//! OctreeNode - one cubic cell of the arena.

use glam::Vec3;
use smallvec::SmallVec;

use crate::math::BoundingBox;

/// Index of a node in the octree arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeIndex(pub(crate) u32);

impl NodeIndex {
	#[inline]
	pub fn index(self) -> usize {
		self.0 as usize
	}
}

/// Octant containing `point` relative to `center`.
///
/// Octant: 0-7 where bits represent +X, +Y, +Z halves:
/// - bit 0: X (point.x >= center.x)
/// - bit 1: Y
/// - bit 2: Z
#[inline]
pub fn octant_of(center: Vec3, point: Vec3) -> u8 {
	(point.x >= center.x) as u8 | ((point.y >= center.y) as u8) << 1 | ((point.z >= center.z) as u8) << 2
}

/// Center of child `octant` of a cell at `center` with `half_extent`.
#[inline]
pub fn child_center(center: Vec3, half_extent: f32, octant: u8) -> Vec3 {
	let q = half_extent * 0.5;
	center
		+ Vec3::new(
			if octant & 1 != 0 { q } else { -q },
			if octant & 2 != 0 { q } else { -q },
			if octant & 4 != 0 { q } else { -q },
		)
}

/// Cubic cell. Only leaves hold items; children lie inside their parent.
#[derive(Clone, Debug)]
pub struct OctreeNode<K> {
	pub(crate) center: Vec3,
	pub(crate) half_extent: f32,
	pub(crate) children: Option<[NodeIndex; 8]>,
	pub(crate) items: SmallVec<[(K, Vec3); 8]>,
}

impl<K> OctreeNode<K> {
	pub(crate) fn new(center: Vec3, half_extent: f32) -> Self {
		Self {
			center,
			half_extent,
			children: None,
			items: SmallVec::new(),
		}
	}

	#[inline]
	pub fn center(&self) -> Vec3 {
		self.center
	}

	#[inline]
	pub fn half_extent(&self) -> f32 {
		self.half_extent
	}

	pub fn bounds(&self) -> BoundingBox {
		BoundingBox::from_center_half_extents(self.center, Vec3::splat(self.half_extent))
	}

	/// Half-open containment, `min <= p < max`, matching [`octant_of`] routing.
	#[inline]
	pub fn covers(&self, point: Vec3) -> bool {
		let offset = point - self.center;
		offset.cmpge(Vec3::splat(-self.half_extent)).all()
			&& offset.cmplt(Vec3::splat(self.half_extent)).all()
	}

	#[inline]
	pub fn is_leaf(&self) -> bool {
		self.children.is_none()
	}

	#[inline]
	pub fn children(&self) -> Option<&[NodeIndex; 8]> {
		self.children.as_ref()
	}

	/// Keys and positions stored directly in this node.
	#[inline]
	pub fn items(&self) -> &[(K, Vec3)] {
		&self.items
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	/// All 8 octants map back to themselves through child_center.
	#[test]
	fn test_octant_child_center_roundtrip() {
		let center = Vec3::new(3.0, -4.0, 5.0);
		for octant in 0u8..8 {
			let child = child_center(center, 8.0, octant);
			assert_eq!(
				octant_of(center, child),
				octant,
				"Octant {} center {:?} maps to the wrong octant",
				octant,
				child
			);
			assert_eq!((child - center).abs(), Vec3::splat(4.0));
		}
	}

	#[test]
	fn test_octant_bits() {
		assert_eq!(octant_of(Vec3::ZERO, Vec3::new(-1.0, -1.0, -1.0)), 0);
		assert_eq!(octant_of(Vec3::ZERO, Vec3::new(1.0, -1.0, -1.0)), 1);
		assert_eq!(octant_of(Vec3::ZERO, Vec3::new(-1.0, 1.0, -1.0)), 2);
		assert_eq!(octant_of(Vec3::ZERO, Vec3::new(-1.0, -1.0, 1.0)), 4);
		assert_eq!(octant_of(Vec3::ZERO, Vec3::ZERO), 7, "center goes to the high octant");
	}

	#[test]
	fn test_covers_is_half_open() {
		let node: OctreeNode<u32> = OctreeNode::new(Vec3::ZERO, 2.0);
		assert!(node.covers(Vec3::splat(-2.0)));
		assert!(node.covers(Vec3::splat(1.99)));
		assert!(!node.covers(Vec3::new(2.0, 0.0, 0.0)), "max face belongs to the neighbour");
		assert!(!node.covers(Vec3::new(2.01, 0.0, 0.0)));
		assert_eq!(node.bounds().min, Vec3::splat(-2.0));
	}
}
