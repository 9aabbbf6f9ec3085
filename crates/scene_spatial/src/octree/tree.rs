//! Octree - arena-indexed point index with lazy subdivision and root growth.

use std::collections::HashMap;
use std::hash::Hash;

use glam::Vec3;
use tracing::trace;

use super::node::{child_center, octant_of, NodeIndex, OctreeNode};
use super::OctreeConfig;
use crate::error::{Result, SpatialError};
use crate::math::{BoundingBox, Frustum, Ray};

/// Where a key currently lives.
#[derive(Clone, Copy, Debug)]
struct Location {
	node: NodeIndex,
	point: Vec3,
}

/// Loose point octree keyed by identity.
///
/// Parents store their eight children as indices into a flat node arena. A
/// leaf splits once it holds more than `split_threshold` items. The root is
/// created on first insert and grows by re-rooting: a new root twice the size
/// adopts the old one as an octant, until the inserted point is covered.
/// Nodes are only freed by [`Octree::clear`].
#[derive(Clone, Debug)]
pub struct Octree<K> {
	config: OctreeConfig,
	nodes: Vec<OctreeNode<K>>,
	root: Option<NodeIndex>,
	locations: HashMap<K, Location>,
}

impl<K: Copy + Eq + Hash> Octree<K> {
	/// Create an empty octree.
	pub fn new(config: OctreeConfig) -> Result<Self> {
		config.validate()?;
		Ok(Self {
			config,
			nodes: Vec::new(),
			root: None,
			locations: HashMap::new(),
		})
	}

	pub fn config(&self) -> &OctreeConfig {
		&self.config
	}

	/// Insert `key` at `point`.
	///
	/// Re-inserting a key moves it; the previous position is returned.
	pub fn insert(&mut self, key: K, point: Vec3) -> Result<Option<Vec3>> {
		if !point.is_finite() {
			return Err(SpatialError::NonFinitePoint(point));
		}

		let root = match self.root {
			Some(root) => self.grow_to_cover(root, point)?,
			None => {
				let root = self.alloc(OctreeNode::new(point, self.config.initial_half_extent));
				self.root = Some(root);
				root
			}
		};

		let previous = self.remove(&key);
		let leaf = self.leaf_for(root, point);
		self.push_item(leaf, key, point);
		Ok(previous)
	}

	/// Remove `key`. Unknown keys are a no-op returning `None`.
	pub fn remove(&mut self, key: &K) -> Option<Vec3> {
		let location = self.locations.remove(key)?;
		let items = &mut self.nodes[location.node.index()].items;
		if let Some(pos) = items.iter().position(|(k, _)| k == key) {
			items.swap_remove(pos);
		}
		Some(location.point)
	}

	/// Keys in the leaf region containing `point`.
	///
	/// Empty when `point` lies outside the root.
	pub fn query_near(&self, point: Vec3) -> Vec<K> {
		let Some(root) = self.root else {
			return Vec::new();
		};
		if !self.node(root).covers(point) {
			return Vec::new();
		}
		let leaf = self.leaf_for(root, point);
		self.node(leaf).items.iter().map(|(k, _)| *k).collect()
	}

	/// Keys in every leaf region that overlaps `frustum`.
	///
	/// Region-level and conservative: keys near but outside the frustum may be
	/// returned when they share a cell with visible space.
	pub fn query_frustum(&self, frustum: &Frustum) -> Vec<K> {
		let mut out = Vec::new();
		self.visit_leaves(
			|node| frustum.bounds_in_frustum(&node.bounds()),
			|node| out.extend(node.items.iter().map(|(k, _)| *k)),
		);
		out
	}

	/// Keys whose point lies within `radius` of `center`.
	pub fn query_radius(&self, center: Vec3, radius: f32) -> Vec<K> {
		let radius_sq = radius * radius;
		let mut out = Vec::new();
		self.visit_leaves(
			|node| node.bounds().distance_squared_to_point(center) <= radius_sq,
			|node| {
				out.extend(
					node
						.items
						.iter()
						.filter(|(_, p)| p.distance_squared(center) <= radius_sq)
						.map(|(k, _)| *k),
				)
			},
		);
		out
	}

	/// Keys in leaf regions crossed by `ray` within `max_distance`.
	pub fn query_ray(&self, ray: &Ray, max_distance: f32) -> Vec<K> {
		let mut out = Vec::new();
		self.visit_leaves(
			|node| {
				ray
					.intersect_bounds(&node.bounds())
					.is_some_and(|t| t <= max_distance)
			},
			|node| out.extend(node.items.iter().map(|(k, _)| *k)),
		);
		out
	}

	/// Closest stored key to `point`, with its position.
	pub fn nearest(&self, point: Vec3) -> Option<(K, Vec3)> {
		let root = self.root?;
		let mut best: Option<(K, Vec3, f32)> = None;
		let mut stack = vec![root];

		while let Some(index) = stack.pop() {
			let node = self.node(index);
			let bound_dist = node.bounds().distance_squared_to_point(point);
			if best.is_some_and(|(_, _, d)| bound_dist > d) {
				continue;
			}

			match node.children {
				None => {
					for &(key, pos) in &node.items {
						let d = pos.distance_squared(point);
						if best.map_or(true, |(_, _, best_d)| d < best_d) {
							best = Some((key, pos, d));
						}
					}
				}
				Some(mut children) => {
					// Farthest first so the closest child is popped next.
					children.sort_by(|a, b| {
						let da = self.node(*a).bounds().distance_squared_to_point(point);
						let db = self.node(*b).bounds().distance_squared_to_point(point);
						db.total_cmp(&da)
					});
					stack.extend(children);
				}
			}
		}

		best.map(|(key, pos, _)| (key, pos))
	}

	/// Current position of `key`.
	pub fn position(&self, key: &K) -> Option<Vec3> {
		self.locations.get(key).map(|loc| loc.point)
	}

	pub fn contains_key(&self, key: &K) -> bool {
		self.locations.contains_key(key)
	}

	/// Number of stored keys.
	pub fn len(&self) -> usize {
		self.locations.len()
	}

	pub fn is_empty(&self) -> bool {
		self.locations.is_empty()
	}

	/// Region covered by the root, if anything was ever inserted.
	pub fn bounds(&self) -> Option<BoundingBox> {
		self.root.map(|root| self.node(root).bounds())
	}

	pub fn root(&self) -> Option<&OctreeNode<K>> {
		self.root.map(|root| self.node(root))
	}

	pub fn node(&self, index: NodeIndex) -> &OctreeNode<K> {
		&self.nodes[index.index()]
	}

	/// Total nodes in the arena.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	pub fn leaf_count(&self) -> usize {
		self.nodes.iter().filter(|n| n.is_leaf()).count()
	}

	/// All keys with their positions, in no particular order.
	pub fn iter(&self) -> impl Iterator<Item = (K, Vec3)> + '_ {
		self.locations.iter().map(|(k, loc)| (*k, loc.point))
	}

	/// Drop every node and key.
	pub fn clear(&mut self) {
		self.nodes.clear();
		self.root = None;
		self.locations.clear();
	}

	// -------------------------------------------------------------------------
	// Internals
	// -------------------------------------------------------------------------

	fn alloc(&mut self, node: OctreeNode<K>) -> NodeIndex {
		let index = NodeIndex(self.nodes.len() as u32);
		self.nodes.push(node);
		index
	}

	fn leaf_for(&self, mut index: NodeIndex, point: Vec3) -> NodeIndex {
		while let Some(children) = self.node(index).children {
			index = children[octant_of(self.node(index).center, point) as usize];
		}
		index
	}

	fn push_item(&mut self, leaf: NodeIndex, key: K, point: Vec3) {
		let node = &mut self.nodes[leaf.index()];
		node.items.push((key, point));
		let should_split = self.config.should_split(node.items.len(), node.half_extent);
		self.locations.insert(key, Location { node: leaf, point });

		if should_split {
			self.split(leaf);
		}
	}

	fn split(&mut self, index: NodeIndex) {
		let (center, half_extent) = {
			let node = self.node(index);
			(node.center, node.half_extent)
		};
		let children: [NodeIndex; 8] = std::array::from_fn(|octant| {
			self.alloc(OctreeNode::new(
				child_center(center, half_extent, octant as u8),
				half_extent * 0.5,
			))
		});

		let items = std::mem::take(&mut self.nodes[index.index()].items);
		self.nodes[index.index()].children = Some(children);
		trace!(half_extent, items = items.len(), "octree leaf split");

		for (key, point) in items {
			// A child may already have split during this loop.
			let leaf = self.leaf_for(index, point);
			self.push_item(leaf, key, point);
		}
	}

	fn grow_to_cover(&mut self, mut root: NodeIndex, point: Vec3) -> Result<NodeIndex> {
		let mut steps = 0;
		while !self.node(root).covers(point) {
			if steps >= self.config.max_grow_steps {
				return Err(SpatialError::OutOfRange(point));
			}
			root = self.grow_root(root, point);
			steps += 1;
		}
		Ok(root)
	}

	/// Wrap `old_root` in a root twice its size, extended toward `point`.
	fn grow_root(&mut self, old_root: NodeIndex, point: Vec3) -> NodeIndex {
		let (old_center, half_extent) = {
			let node = self.node(old_root);
			(node.center, node.half_extent)
		};
		let offset = Vec3::select(
			point.cmplt(old_center),
			Vec3::splat(-half_extent),
			Vec3::splat(half_extent),
		);
		let center = old_center + offset;
		let new_half = half_extent * 2.0;
		let old_octant = octant_of(center, old_center);

		let new_root = self.alloc(OctreeNode::new(center, new_half));
		let children: [NodeIndex; 8] = std::array::from_fn(|octant| {
			if octant as u8 == old_octant {
				old_root
			} else {
				self.alloc(OctreeNode::new(
					child_center(center, new_half, octant as u8),
					half_extent,
				))
			}
		});
		self.nodes[new_root.index()].children = Some(children);
		self.root = Some(new_root);
		trace!(half_extent = new_half, "octree root grown");
		new_root
	}

	/// Depth-first walk descending into nodes accepted by `enter`, calling
	/// `leaf` on every accepted leaf.
	fn visit_leaves(
		&self,
		mut enter: impl FnMut(&OctreeNode<K>) -> bool,
		mut leaf: impl FnMut(&OctreeNode<K>),
	) {
		let Some(root) = self.root else {
			return;
		};
		let mut stack = vec![root];
		while let Some(index) = stack.pop() {
			let node = self.node(index);
			if !enter(node) {
				continue;
			}
			match node.children {
				None => leaf(node),
				Some(children) => stack.extend(children),
			}
		}
	}
}

impl<K: Copy + Eq + Hash> Default for Octree<K> {
	fn default() -> Self {
		Self {
			config: OctreeConfig::default(),
			nodes: Vec::new(),
			root: None,
			locations: HashMap::new(),
		}
	}
}
