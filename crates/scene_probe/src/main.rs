//! Scene probe.
//!
//! Loads a TOML scene, plans one frame of shadows for it and prints what was
//! decided: fitted near/far planes, shadow cameras with their atlas regions,
//! and the answers to the octree queries listed in the scene.

mod config;
mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use scene_spatial::{Octree, SceneInstance, ShadowSystem};
use tracing::level_filters::LevelFilter;
use tracing::info;

use config::SceneConfig;

/// Shadow planning probe for scene_spatial.
#[derive(Parser, Debug)]
#[command(name = "scene_probe")]
#[command(about = "Plans one frame of shadows for a TOML scene and prints the result")]
struct Args {
	/// Path to the scene TOML file.
	#[arg(short, long)]
	scene: PathBuf,

	/// Increase log verbosity (-v info, -vv debug, -vvv trace).
	#[arg(short, long, action = clap::ArgAction::Count)]
	verbose: u8,
}

fn verbosity_level(verbose: u8) -> LevelFilter {
	match verbose {
		0 => LevelFilter::WARN,
		1 => LevelFilter::INFO,
		2 => LevelFilter::DEBUG,
		_ => LevelFilter::TRACE,
	}
}

fn main() -> Result<()> {
	let args = Args::parse();

	tracing_subscriber::fmt()
		.with_max_level(verbosity_level(args.verbose))
		.with_writer(std::io::stderr)
		.init();

	let scene = SceneConfig::load(&args.scene)?;
	info!(path = %args.scene.display(), "scene loaded");

	let mut camera = scene.camera();
	let instances = scene.instances();
	let lights = scene.lights();
	let names: Vec<String> = scene.instances.iter().map(|i| i.name.clone()).collect();

	let mut octree = Octree::new(scene.octree_config()).context("Invalid octree config")?;
	for (key, instance) in instances.iter().enumerate() {
		let center = instance.bounding_box().center();
		octree
			.insert(key, center)
			.with_context(|| format!("Failed to index instance '{}'", names[key]))?;
	}

	let mut system = ShadowSystem::from_config(scene.shadow_system_config())
		.context("Invalid shadow config")?;
	let plan = system
		.plan_frame(&mut camera, &instances, &lights)
		.context("Shadow planning failed")?;

	let mut visible = octree.query_frustum(camera.frustum());
	visible.sort_unstable();

	let queries: Vec<_> = scene
		.queries
		.iter()
		.map(|q| report::run_query(&octree, q.point.into(), q.radius))
		.collect();

	print!(
		"{}",
		report::render(&camera, &plan, &lights, &names, &octree, &visible, &queries)
	);
	Ok(())
}
