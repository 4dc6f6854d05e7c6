//! A headless demo of the road network. Builds a small network through the same api an editor
//! would use, saves it, loads it back and logs what was generated.
mod config;

use curves::Spline;
use glam::Vec3;
use utils::math::Loc;
use world::World;
use world_api::{
    EntityId, Endpoint, IntersectionKind, NetworkManipulator, RoadEnd, RoadParams, SnapOutcome,
    TerrainParams,
};

/// Gentle rolling hills that roads are laid onto when terrain is enabled.
fn hills(x: f32, z: f32) -> f32 {
    (x * 0.05).sin() * (z * 0.05).cos() * 2.0
}

fn build_network(world: &mut World, config: &config::Config) -> anyhow::Result<()> {
    let params = RoadParams {
        terrain: TerrainParams {
            snap_to_terrain: config.terrain.enabled,
            clearance: config.terrain.clearance,
        },
        ..config.generation.road
    };
    let width = params.width;

    let main = world.add_road(
        Spline::straight(Vec3::ZERO, Vec3::new(width * 4.0, 0.0, 0.0)),
        params,
    )?;
    world.append_segment(main, RoadEnd::Negative)?;
    let crossing = world.attach_intersection(main, RoadEnd::Negative, 4)?;
    for slot in 1..4 {
        world.attach_road(Endpoint::slot(crossing, slot))?;
    }

    // A loose road whose start is dragged close to the start of the main road.
    let loose = world.add_road(
        Spline::straight(
            Vec3::new(-width * 6.0, 0.0, width),
            Vec3::new(-width * 2.0, 0.0, width),
        ),
        params,
    )?;
    let last = world
        .graph()
        .road(loose)?
        .spline()
        .last_index();
    let outcome = world.set_control_point(loose, last, Vec3::new(0.1, 0.0, 0.1))?;
    match outcome {
        SnapOutcome::Snapped(target) => log::info!("loose road snapped to {target:?}"),
        outcome => log::info!("loose road did not snap: {outcome:?}"),
    }

    world.add_intersection(
        Loc::at(Vec3::new(0.0, 0.0, -width * 8.0)),
        IntersectionKind::dynamic(6),
        config.generation.intersection,
    )?;
    Ok(())
}

fn log_meshes(world: &World) -> anyhow::Result<()> {
    for (id, _) in world.graph().roads() {
        let (vertices, triangles) = world.generate_road_mesh(id)?.size();
        let lanes = world.lane_waypoints(id, 0)?.len();
        log::info!(
            "road {id}: {vertices} vertices, {triangles} triangles, {lanes} waypoints per lane"
        );
    }
    for (id, _) in world.graph().intersections() {
        let mesh = world.generate_intersection_mesh(id)?;
        let (vertices, triangles) = mesh.size();
        let connected = world
            .snap_points(EntityId::Intersection(id))?
            .iter()
            .enumerate()
            .filter(|(slot, _)| world.connection(Endpoint::slot(id, *slot)).is_some())
            .count();
        log::info!(
            "intersection {id}: {vertices} vertices, {triangles} triangles, {connected} connected"
        );
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = config::load_config()?;
    log::debug!("loaded config {config:?}");

    let mut world = World::new();
    world.set_spacing_factor(config.generation.spacing_factor);
    if config.terrain.enabled {
        world.set_terrain(Box::new(hills));
    }

    build_network(&mut world, &config)?;
    world.validate()?;
    log_meshes(&world)?;

    world.save(&config.save_path)?;
    world.reload(&config.save_path)?;
    log::info!(
        "reloaded {} edges from {}",
        world.graph().edges().count() / 2,
        config.save_path
    );
    Ok(())
}
