//! scenenode2d entry point.
//!
//! Loads a scene file describing a hierarchy of 2D transform nodes, builds it
//! in a `bevy_ecs` world and prints every node's local and world transform.
//!
//! # Flow
//!
//! 1. Parse the INI scene file into a [`SceneDescription`]
//! 2. Build the nodes into a [`TransformTree`] resource
//! 3. Spawn one entity per node with [`SceneNode`] + [`GlobalTransform2D`]
//! 4. Run the world-transform sync once, as a renderer frame would
//! 5. Print the hierarchy as an outline or as JSON
//!
//! # Running
//!
//! ```sh
//! cargo run -- assets/scene.ini --json
//! ```

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use clap::Parser;

use scenenode2d::components::globaltransform2d::GlobalTransform2D;
use scenenode2d::components::scenenode::SceneNode;
use scenenode2d::resources::scenedescription::{DEFAULT_SCENE_PATH, SceneDescription};
use scenenode2d::resources::snapshot::TreeSnapshot;
use scenenode2d::resources::transformtree::TransformTree;
use scenenode2d::systems::scenenode::release_scene_node;
use scenenode2d::systems::worldtransform::sync_world_transforms;

/// Inspect a 2D transform hierarchy described in an INI scene file.
#[derive(Parser)]
#[command(version)]
struct Cli {
    /// Scene file to load (default: ./scene.ini).
    #[arg(value_name = "SCENE")]
    scene: Option<PathBuf>,

    /// Print the hierarchy as JSON instead of an indented outline.
    #[arg(long)]
    json: bool,

    /// Write the output to a file instead of stdout.
    #[arg(long, short, value_name = "PATH")]
    output: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let path = cli
        .scene
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SCENE_PATH));
    let scene = SceneDescription::load_from_file(&path)?;

    let mut tree = TransformTree::new();
    let nodes = scene.build(&mut tree)?;

    // --------------- ECS world ---------------
    let mut world = World::new();
    world.add_observer(release_scene_node);
    world.insert_resource(tree);
    for (name, id) in nodes.iter() {
        let entity = world
            .spawn((SceneNode(id), GlobalTransform2D::default()))
            .id();
        log::debug!("Spawned {:?} for node '{}' ({})", entity, name, id);
    }

    let mut schedule = Schedule::default();
    schedule.add_systems(sync_world_transforms);
    schedule.run(&mut world);

    for (node, global) in world
        .query::<(&SceneNode, &GlobalTransform2D)>()
        .iter(&world)
    {
        log::debug!(
            "{} world=({}, {}) {}deg",
            node.id(),
            global.position.x,
            global.position.y,
            global.rotation_degrees
        );
    }

    let tree = world.resource::<TransformTree>();
    let snapshot = TreeSnapshot::capture(tree, &nodes);
    let output = if cli.json {
        snapshot.to_json()?
    } else {
        snapshot.to_text()
    };

    match &cli.output {
        Some(out_path) => {
            std::fs::write(out_path, output)?;
            log::info!("Hierarchy written to {}", out_path.display());
        }
        None => print!("{}", output),
    }
    Ok(())
}
