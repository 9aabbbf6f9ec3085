//! Plain-text report of one planned frame.

use std::fmt::Write;

use glam::Vec3;
use scene_spatial::{Camera, FramePlan, Light, Octree};

/// Result of one `[[queries]]` entry.
#[derive(Debug)]
pub struct QueryReport {
	pub point: Vec3,
	pub radius: f32,
	pub nearest: Option<usize>,
	pub within: Vec<usize>,
}

pub fn run_query(octree: &Octree<usize>, point: Vec3, radius: f32) -> QueryReport {
	let mut within = octree.query_radius(point, radius);
	within.sort_unstable();
	QueryReport {
		point,
		radius,
		nearest: octree.nearest(point).map(|(key, _)| key),
		within,
	}
}

fn light_kind(light: &Light) -> &'static str {
	match light {
		Light::Directional(_) => "directional",
		Light::Spot(_) => "spot",
	}
}

/// Render the frame plan, octree statistics and query results.
pub fn render(
	camera: &Camera,
	plan: &FramePlan,
	lights: &[Light],
	names: &[String],
	octree: &Octree<usize>,
	visible: &[usize],
	queries: &[QueryReport],
) -> String {
	let mut out = String::new();
	let name = |key: usize| names.get(key).map_or("?", String::as_str);

	// Writing into a String cannot fail.
	let _ = writeln!(out, "camera");
	match plan.near_far {
		Some(near_far) => {
			let _ = writeln!(out, "  near/far  {:.3} .. {:.3}", near_far.near, near_far.far);
		}
		None => {
			let _ = writeln!(
				out,
				"  near/far  skipped (no instances), {:.3} .. {:.3}",
				camera.near, camera.far
			);
		}
	}

	let _ = writeln!(
		out,
		"shadows    {} planned, {} filtered{}",
		plan.shadows.len(),
		plan.filtered_out,
		if plan.overflowed { ", ATLAS OVERFLOW" } else { "" }
	);
	for shadow in &plan.shadows {
		let region = shadow.region;
		let _ = writeln!(
			out,
			"  light {:<2} {:<11} region {}x{} @ ({}, {})  near {:.3} far {:.3}",
			shadow.light_index,
			light_kind(&lights[shadow.light_index]),
			region.width,
			region.height,
			region.x,
			region.y,
			shadow.camera.near,
			shadow.camera.far,
		);
	}

	let _ = writeln!(
		out,
		"octree     {} keys, {} nodes, {} leaves",
		octree.len(),
		octree.node_count(),
		octree.leaf_count()
	);
	let visible_names: Vec<&str> = visible.iter().map(|&k| name(k)).collect();
	let _ = writeln!(out, "  in view  [{}]", visible_names.join(", "));

	for query in queries {
		let within: Vec<&str> = query.within.iter().map(|&k| name(k)).collect();
		let _ = writeln!(
			out,
			"query      {} r={}  nearest {}  within [{}]",
			query.point,
			query.radius,
			query.nearest.map_or("-", name),
			within.join(", ")
		);
	}
	out
}
