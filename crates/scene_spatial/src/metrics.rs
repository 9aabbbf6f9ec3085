//! Engine-agnostic metrics for shadow planning.
//!
//! Feature-gated and runtime-toggled so disabled builds pay nothing.
//!
//! # Usage
//!
//! ```ignore
//! use scene_spatial::metrics::{ShadowMetrics, COLLECT_METRICS};
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! let plan = system.plan_frame(&mut camera, &instances, &lights)?;
//! println!("{:.1} us avg", system.metrics().avg_plan_timing_us());
//! ```

use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;

/// Runtime toggle for metrics collection.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
	#[cfg(feature = "metrics")]
	{
		COLLECT_METRICS.load(Ordering::Relaxed)
	}
	#[cfg(not(feature = "metrics"))]
	{
		false
	}
}

/// Fixed-capacity history of recent values.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
	buffer: VecDeque<T>,
	capacity: usize,
}

impl<T> RollingWindow<T> {
	pub fn new(capacity: usize) -> Self {
		Self {
			buffer: VecDeque::with_capacity(capacity),
			capacity,
		}
	}

	/// Push a new value, evicting the oldest if at capacity.
	pub fn push(&mut self, value: T) {
		if self.capacity == 0 {
			return;
		}
		if self.buffer.len() >= self.capacity {
			self.buffer.pop_front();
		}
		self.buffer.push_back(value);
	}

	pub fn len(&self) -> usize {
		self.buffer.len()
	}

	pub fn is_empty(&self) -> bool {
		self.buffer.is_empty()
	}

	pub fn clear(&mut self) {
		self.buffer.clear();
	}

	/// Oldest to newest.
	pub fn iter(&self) -> impl Iterator<Item = &T> {
		self.buffer.iter()
	}

	pub fn last(&self) -> Option<&T> {
		self.buffer.back()
	}
}

impl RollingWindow<u64> {
	pub fn sum(&self) -> u64 {
		self.buffer.iter().sum()
	}

	pub fn average(&self) -> f64 {
		if self.buffer.is_empty() {
			0.0
		} else {
			self.sum() as f64 / self.buffer.len() as f64
		}
	}

	pub fn min_max(&self) -> Option<(u64, u64)> {
		let min = *self.buffer.iter().min()?;
		let max = *self.buffer.iter().max()?;
		Some((min, max))
	}
}

impl Default for RollingWindow<u64> {
	fn default() -> Self {
		Self::new(128) // ~2 seconds at 60fps
	}
}

/// Per-frame shadow planning statistics.
#[derive(Debug, Clone, Default)]
pub struct ShadowMetrics {
	/// Rolling window of `plan_frame` durations in microseconds.
	pub plan_timings: RollingWindow<u64>,
	pub last_plan_us: u64,

	// Last frame snapshot
	/// Lights that received a shadow map.
	pub lights_planned: u32,
	/// Lights dropped by the light filter.
	pub lights_filtered: u32,

	// Cumulative
	pub frames_planned: u64,
	/// Frames where the atlas ran out of regions.
	pub atlas_overflows: u64,
	/// Frames without instances, where near/far was skipped.
	pub near_far_skipped: u64,
}

impl ShadowMetrics {
	pub fn new() -> Self {
		Self::default()
	}

	/// Record one planned frame.
	pub fn record_frame(
		&mut self,
		timing_us: u64,
		lights_planned: u32,
		lights_filtered: u32,
		overflowed: bool,
		near_far_skipped: bool,
	) {
		if !is_enabled() {
			return;
		}
		self.plan_timings.push(timing_us);
		self.last_plan_us = timing_us;
		self.lights_planned = lights_planned;
		self.lights_filtered = lights_filtered;
		self.frames_planned += 1;
		self.atlas_overflows += overflowed as u64;
		self.near_far_skipped += near_far_skipped as u64;
	}

	pub fn avg_plan_timing_us(&self) -> f64 {
		self.plan_timings.average()
	}

	/// Reset everything, cumulative counters included.
	pub fn reset(&mut self) {
		*self = Self::default();
	}
}
