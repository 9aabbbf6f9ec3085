//! OctreeConfig - subdivision and growth limits for [`super::Octree`].

use crate::error::{Result, SpatialError};

/// Configuration for octree subdivision and root growth.
#[derive(Clone, Debug, PartialEq)]
pub struct OctreeConfig {
	/// Items a leaf may hold before it splits into eight octants.
	pub split_threshold: usize,

	/// Leaves at or below this half extent never split.
	/// Bounds tree depth when many items share a position.
	pub min_half_extent: f32,

	/// Half extent of the root cube created by the first insert.
	pub initial_half_extent: f32,

	/// Maximum root doublings a single insert may trigger.
	pub max_grow_steps: u32,
}

impl OctreeConfig {
	/// Check all values are in range.
	pub fn validate(&self) -> Result<()> {
		if self.split_threshold == 0 {
			return Err(SpatialError::InvalidConfig(
				"octree split_threshold must be at least 1".into(),
			));
		}
		if !(self.min_half_extent.is_finite() && self.min_half_extent > 0.0) {
			return Err(SpatialError::InvalidConfig(format!(
				"octree min_half_extent must be positive, got {}",
				self.min_half_extent
			)));
		}
		if !(self.initial_half_extent.is_finite() && self.initial_half_extent > 0.0) {
			return Err(SpatialError::InvalidConfig(format!(
				"octree initial_half_extent must be positive, got {}",
				self.initial_half_extent
			)));
		}
		Ok(())
	}

	/// Whether a leaf of `half_extent` holding `item_count` items should split.
	#[inline]
	pub fn should_split(&self, item_count: usize, half_extent: f32) -> bool {
		item_count > self.split_threshold && half_extent > self.min_half_extent
	}
}

impl Default for OctreeConfig {
	fn default() -> Self {
		Self {
			split_threshold: 8,
			min_half_extent: 0.5,
			initial_half_extent: 16.0,
			max_grow_steps: 64,
		}
	}
}
