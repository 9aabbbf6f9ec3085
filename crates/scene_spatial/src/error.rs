//! Error type shared by the fallible operations of this crate.
//!
//! Most of the crate is geometry over in-memory data and clamps degenerate
//! inputs instead of failing. Errors are reserved for inputs that cannot be
//! clamped into something meaningful.

use glam::Vec3;
use thiserror::Error;

/// Errors returned by octree, analyzer, allocator and config operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpatialError {
	/// A point with NaN or infinite components was given to the octree.
	#[error("point {0} is not finite")]
	NonFinitePoint(Vec3),

	/// The octree root would have to grow past its configured step limit.
	#[error("octree cannot grow to cover {0}")]
	OutOfRange(Vec3),

	/// A light direction was zero-length or not finite.
	#[error("light direction must be a finite, non-zero vector")]
	ZeroDirection,

	/// The frustum corners do not span a volume with a positive radius.
	#[error("frustum bounds are degenerate")]
	DegenerateFrustum,

	/// The requested algorithm exists only as a placeholder.
	#[error("{0} is not implemented")]
	Unimplemented(&'static str),

	/// A configuration value is out of range.
	#[error("invalid config: {0}")]
	InvalidConfig(String),
}

/// Shorthand result alias.
pub type Result<T, E = SpatialError> = std::result::Result<T, E>;
