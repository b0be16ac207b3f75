// src/main.rs
//
// Headless patrol demo: agents wander a waypoint graph while a camera flies a
// looping spline over it. Run with RUST_LOG=info (or debug) to watch.

mod runner;

use std::path::PathBuf;
use clap::Parser;
use glam::Vec3;
use zap_nav::{NavConfig, OcclusionQuery, OpenSky, WaypointId, WaypointMeta, WaypointStore};
use runner::NavRunner;

#[derive(Parser)]
#[command(author, version, about = "Drive waypoint followers over a graph", long_about = None)]
struct Args {
    /// Waypoint graph (JSON). A built-in grid is used when omitted.
    #[arg(long)]
    graph: Option<PathBuf>,
    /// Navigation config (JSON). Defaults apply to missing fields.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of wandering agents.
    #[arg(long, default_value_t = 4)]
    agents: u32,
    /// Frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u32,
    /// Frame delta in seconds.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    frame_dt: f32,
    /// Seed for goal selection.
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Write the graph in use to this path and exit.
    #[arg(long)]
    dump_graph: Option<PathBuf>,
}

/// Side of the built-in grid, in waypoints.
const GRID_SIDE: u32 = 5;
/// Spacing between grid waypoints.
const GRID_SPACING: f32 = 2.0;
/// Radius of the pillar standing in the middle of the grid.
const PILLAR_RADIUS: f32 = 1.2;

/// Square grid with 4-neighbour links and the center waypoint removed.
fn grid_store() -> Result<WaypointStore, zap_nav::NavError> {
    let mut store = WaypointStore::with_capacity((GRID_SIDE * GRID_SIDE) as usize);
    for y in 0..GRID_SIDE {
        for x in 0..GRID_SIDE {
            let position = Vec3::new(x as f32, y as f32, 0.0) * GRID_SPACING;
            store.add_waypoint(position, WaypointMeta::new())?;
        }
    }
    for i in 0..GRID_SIDE * GRID_SIDE {
        if i % GRID_SIDE + 1 < GRID_SIDE {
            store.connect(WaypointId(i), WaypointId(i + 1), None)?;
        }
        if i + GRID_SIDE < GRID_SIDE * GRID_SIDE {
            store.connect(WaypointId(i), WaypointId(i + GRID_SIDE), None)?;
        }
    }
    store.remove_waypoint(WaypointId(GRID_SIDE * GRID_SIDE / 2))?;
    Ok(store)
}

/// Blocks any segment passing within `PILLAR_RADIUS` of the pillar at `center`.
fn pillar(center: Vec3) -> impl Fn(Vec3, Vec3) -> bool {
    move |from: Vec3, to: Vec3| {
        let seg = to - from;
        let t = if seg.length_squared() > 0.0 {
            ((center - from).dot(seg) / seg.length_squared()).clamp(0.0, 1.0)
        } else {
            0.0
        };
        (from + seg * t).distance(center) < PILLAR_RADIUS
    }
}

/// The pillar only stands in the built-in grid; loaded graphs get open sky.
fn occluder(custom_graph: bool) -> Box<dyn OcclusionQuery> {
    if custom_graph {
        return Box::new(OpenSky);
    }
    let center = Vec3::splat((GRID_SIDE - 1) as f32 * GRID_SPACING / 2.0) * Vec3::new(1.0, 1.0, 0.0);
    Box::new(pillar(center))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => NavConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => NavConfig::default(),
    };
    let store = match &args.graph {
        Some(path) => WaypointStore::from_json(&std::fs::read_to_string(path)?)?,
        None => grid_store()?,
    };
    log::info!("graph: {} waypoints, {} edges", store.len(), store.edge_count());

    if let Some(path) = &args.dump_graph {
        std::fs::write(path, store.to_json()?)?;
        log::info!("graph written to {}", path.display());
        return Ok(());
    }

    let mut runner = NavRunner::new(store, config, occluder(args.graph.is_some()));
    runner.spawn_agents(args.agents, args.seed)?;
    runner.attach_camera()?;
    log::info!("{} agents following", runner.navigator().len());

    for _ in 0..args.frames {
        runner.tick(args.frame_dt);
    }

    let stats = runner.stats();
    log::info!("{stats:?}");
    for body in runner.scene().iter() {
        println!("{:>10} at ({:6.2}, {:6.2}, {:6.2})", body.tag, body.position.x, body.position.y, body.position.z);
    }
    println!(
        "{} ticks: {} waypoints reached, {} goals, {} plans, {} unreachable, {} skipped, {} errors",
        stats.ticks,
        stats.waypoints_reached,
        stats.goals_reached,
        stats.paths_planned,
        stats.unreachable,
        stats.skipped,
        stats.errors
    );
    Ok(())
}
