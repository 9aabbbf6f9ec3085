//! Shadow atlas allocation.
//!
//! Every shadow-casting light gets a square region of one shared atlas
//! texture. Regions are handed out per frame between `begin` and `end`.
//!
//! # Grid layout
//!
//! ```text
//! nb_maps = 4, size = 1024 -> cells = 2, cell = 512
//!
//!   y
//!  512 +-----+-----+
//!      |  2  |  3  |
//!    0 +-----+-----+
//!      |  0  |  1  |
//!      0    512   1024 x
//! ```

use tracing::trace;

use crate::error::{Result, SpatialError};
use crate::math::Camera;

/// Atlas region in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AllocatorResult {
	pub x: u32,
	pub y: u32,
	pub width: u32,
	pub height: u32,
}

impl AllocatorResult {
	/// Whether the two regions share any pixel.
	pub fn overlaps(&self, other: &AllocatorResult) -> bool {
		self.x < other.x + other.width
			&& other.x < self.x + self.width
			&& self.y < other.y + other.height
			&& other.y < self.y + self.height
	}
}

/// Hands out atlas regions for shadow cameras, one frame at a time.
pub trait ShadowMapAllocator {
	/// Start a frame; previous allocations are forgotten.
	fn begin(&mut self);

	/// Region for the shadow map rendered by `camera`.
	fn next_result(&mut self, camera: &Camera) -> AllocatorResult;

	/// Close the frame.
	fn end(&mut self);

	/// Atlas edge length in pixels.
	fn size(&self) -> u32;

	/// Distinct regions available per frame.
	fn capacity(&self) -> u32;
}

/// Splits the atlas into a fixed square grid of equal cells.
///
/// The grid has `ceil(sqrt(nb_maps))` cells per edge. Rounding to nearest
/// would leave too few cells for counts such as 2 or 5, placing later regions
/// outside the atlas. Requests past `nb_maps` in one frame wrap around and
/// reuse earlier regions.
#[derive(Clone, Debug)]
pub struct FixedShadowMapAllocator {
	size: u32,
	nb_maps: u32,
	cells: u32,
	cell_size: u32,
	cursor: u32,
	in_frame: bool,
}

impl FixedShadowMapAllocator {
	pub fn new(size: u32, nb_maps: u32) -> Result<Self> {
		if size == 0 || nb_maps == 0 {
			return Err(SpatialError::InvalidConfig(format!(
				"atlas size ({}) and map count ({}) must be non-zero",
				size, nb_maps
			)));
		}
		let cells = (nb_maps as f64).sqrt().ceil() as u32;
		let cell_size = size / cells;
		if cell_size == 0 {
			return Err(SpatialError::InvalidConfig(format!(
				"atlas of {} px cannot fit a {}x{} grid",
				size, cells, cells
			)));
		}
		Ok(Self {
			size,
			nb_maps,
			cells,
			cell_size,
			cursor: 0,
			in_frame: false,
		})
	}

	/// Cells per atlas edge.
	pub fn cells_per_edge(&self) -> u32 {
		self.cells
	}

	/// Edge length of one region in pixels.
	pub fn cell_size(&self) -> u32 {
		self.cell_size
	}

	/// Regions requested since the last `begin`.
	pub fn allocated(&self) -> u32 {
		self.cursor
	}

	/// Whether this frame requested more regions than there are cells.
	pub fn overflowed(&self) -> bool {
		self.cursor > self.nb_maps
	}

	/// Region `index` of the grid, row-major from the atlas origin.
	pub fn region(&self, index: u32) -> AllocatorResult {
		let index = index % self.nb_maps;
		AllocatorResult {
			x: (index % self.cells) * self.cell_size,
			y: (index / self.cells) * self.cell_size,
			width: self.cell_size,
			height: self.cell_size,
		}
	}
}

impl ShadowMapAllocator for FixedShadowMapAllocator {
	fn begin(&mut self) {
		debug_assert!(!self.in_frame, "begin called twice without end");
		self.cursor = 0;
		self.in_frame = true;
	}

	fn next_result(&mut self, _camera: &Camera) -> AllocatorResult {
		debug_assert!(self.in_frame, "next_result called outside begin/end");
		let result = self.region(self.cursor);
		self.cursor = self.cursor.saturating_add(1);
		result
	}

	fn end(&mut self) {
		debug_assert!(self.in_frame, "end called without begin");
		self.in_frame = false;
		trace!(allocated = self.cursor, capacity = self.nb_maps, "atlas frame closed");
	}

	fn size(&self) -> u32 {
		self.size
	}

	fn capacity(&self) -> u32 {
		self.nb_maps
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn camera() -> Camera {
		Camera::orthographic(10.0, 10.0)
	}

	#[test]
	fn test_four_maps_tile_two_by_two() {
		let mut allocator = FixedShadowMapAllocator::new(1024, 4).unwrap();
		let camera = camera();

		allocator.begin();
		let regions: Vec<_> = (0..4).map(|_| allocator.next_result(&camera)).collect();
		let fifth = allocator.next_result(&camera);
		allocator.end();

		assert_eq!(
			regions,
			vec![
				AllocatorResult { x: 0, y: 0, width: 512, height: 512 },
				AllocatorResult { x: 512, y: 0, width: 512, height: 512 },
				AllocatorResult { x: 0, y: 512, width: 512, height: 512 },
				AllocatorResult { x: 512, y: 512, width: 512, height: 512 },
			]
		);
		for (i, a) in regions.iter().enumerate() {
			for b in &regions[i + 1..] {
				assert!(!a.overlaps(b), "{:?} overlaps {:?}", a, b);
			}
		}
		assert_eq!(fifth, regions[0], "wraps to the first region");
		assert!(allocator.overflowed());
	}

	#[test]
	fn test_begin_resets_cursor() {
		let mut allocator = FixedShadowMapAllocator::new(1024, 4).unwrap();
		let camera = camera();

		allocator.begin();
		allocator.next_result(&camera);
		let second = allocator.next_result(&camera);
		allocator.end();
		assert_eq!(allocator.allocated(), 2);
		assert!(!allocator.overflowed());

		allocator.begin();
		assert_eq!(allocator.allocated(), 0);
		assert_ne!(allocator.next_result(&camera), second);
		allocator.end();
	}

	/// Non-square counts round the grid up so every map gets its own cell.
	#[test]
	fn test_non_square_count_rounds_grid_up() {
		let allocator = FixedShadowMapAllocator::new(900, 5).unwrap();
		assert_eq!(allocator.cells_per_edge(), 3);
		assert_eq!(allocator.cell_size(), 300);

		let camera = camera();
		for (nb_maps, edge) in [(2, 2), (3, 2), (5, 3), (7, 3)] {
			let mut allocator = FixedShadowMapAllocator::new(900, nb_maps).unwrap();
			assert_eq!(allocator.cells_per_edge(), edge, "{} maps", nb_maps);

			allocator.begin();
			let regions: Vec<_> = (0..nb_maps).map(|_| allocator.next_result(&camera)).collect();
			allocator.end();

			for (i, a) in regions.iter().enumerate() {
				assert!(
					a.x + a.width <= 900 && a.y + a.height <= 900,
					"{} maps: region {:?} leaves the atlas",
					nb_maps,
					a
				);
				for b in &regions[i + 1..] {
					assert!(!a.overlaps(b));
				}
			}
		}
	}

	#[test]
	fn test_single_map_uses_whole_atlas() {
		let allocator = FixedShadowMapAllocator::new(2048, 1).unwrap();
		assert_eq!(
			allocator.region(0),
			AllocatorResult { x: 0, y: 0, width: 2048, height: 2048 }
		);
		assert_eq!(allocator.size(), 2048);
		assert_eq!(allocator.capacity(), 1);
	}

	#[test]
	fn test_rejects_zero() {
		assert!(FixedShadowMapAllocator::new(0, 4).is_err());
		assert!(FixedShadowMapAllocator::new(1024, 0).is_err());
		assert!(FixedShadowMapAllocator::new(2, 16).is_err(), "cells would be 0 px");
	}
}
