//! Hopper: a headless 3D platformer driving the object layer
//!
//! Builds a course out of templates and clones, wires kill and goal zones
//! as trigger volumes, and runs a fixed-timestep loop until the player
//! reaches the goal or runs out of lives.

mod config;
mod prototypes;
mod spawner;
mod state;

use config::GameConfig;
use platform_engine::foundation::logging;
use platform_engine::prelude::*;
use prototypes::{CollectibleProto, PlatformProto, RockProto};
use spawner::{spawn_wave, Placement};
use state::{GameState, Phase};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

/// Top of the ground slab; the hop controller lands here
const GROUND_TOP: f32 = 0.0;
/// Vertical launch speed of a hop
const HOP_SPEED: f32 = 5.0;
/// Staging position for template nodes, outside every play volume
const STAGING: Vec3 = Vec3::new(0.0, 0.0, 50.0);

fn main() {
    logging::init();
    if let Err(error) = run(&GameConfig::default()) {
        log::error!("run failed: {error}");
        std::process::exit(1);
    }
}

struct Level {
    player: NodeKey,
    rock_template: NodeKey,
    collectible_template: NodeKey,
}

fn build_level(world: &mut World, game: &GameConfig) -> Result<Level, SceneError> {
    let course = game.level.course_length;

    let ground_mesh = world.meshes_mut().insert(
        "ground",
        Mesh::cuboid(Vec3::new(course / 2.0 + 5.0, 0.5, 10.0)),
    );
    let player_mesh = world
        .meshes_mut()
        .insert("player", Mesh::cuboid(Vec3::new(0.4, 0.9, 0.4)));
    let rock_mesh = world
        .meshes_mut()
        .insert("rock", Mesh::cuboid(Vec3::new(0.6, 0.6, 0.6)));
    let coin_mesh = world
        .meshes_mut()
        .insert("coin", Mesh::cuboid(Vec3::new(0.3, 0.3, 0.1)));

    let ground = world.spawn(
        NodeDesc::new(NodeKind::Platform)
            .named("ground")
            .with_mesh(MeshSource::Handle(ground_mesh))
            .with_physics()
            .at_position(Vec3::new(course / 2.0, GROUND_TOP - 0.5, 0.0))
            .with_layers(CollisionLayers::ENVIRONMENT, CollisionLayers::ALL)
            .with_response(ContactResponse::None),
    )?;
    world.set_prototype(ground, Arc::new(PlatformProto))?;

    let player = world.spawn(
        NodeDesc::new(NodeKind::Player)
            .named("hopper")
            .with_mesh(MeshSource::Handle(player_mesh))
            .with_physics()
            .non_kinematic()
            .with_gravity()
            .at_position(Vec3::new(0.0, GROUND_TOP + 0.9, 0.0))
            .with_layers(CollisionLayers::PLAYER, CollisionLayers::ENVIRONMENT),
    )?;

    let rock_template = world.spawn(
        NodeDesc::new(NodeKind::Rock)
            .named("rock_template")
            .with_mesh(MeshSource::Handle(rock_mesh))
            .with_physics()
            .with_gravity()
            .perishable()
            .at_position(STAGING)
            .with_layers(CollisionLayers::DEBRIS, CollisionLayers::NONE)
            .with_response(ContactResponse::None),
    )?;
    world.set_prototype(rock_template, RockProto::seeded(game.level.seed))?;

    let collectible_template = world.spawn(
        NodeDesc::new(NodeKind::Collectible)
            .named("coin_template")
            .with_mesh(MeshSource::Handle(coin_mesh))
            .with_physics()
            .perishable()
            .at_position(STAGING)
            .with_layers(CollisionLayers::PICKUP, CollisionLayers::NONE)
            .with_response(ContactResponse::None),
    )?;
    world.set_prototype(collectible_template, Arc::new(CollectibleProto { hover: 0.5 }))?;

    Ok(Level {
        player,
        rock_template,
        collectible_template,
    })
}

fn wire_zones(
    world: &mut World,
    game: &GameConfig,
    shared: &Rc<RefCell<GameState>>,
) -> Result<(), SceneError> {
    let course = game.level.course_length;

    // Everything that falls off the course lands in here
    let kill_zone = world.add_trigger(
        TriggerDesc::new(
            Vec3::new(course / 2.0, game.level.kill_depth - 5.0, 0.0),
            Vec3::new(course, 5.0, 25.0),
        )
        .named("kill_zone"),
    )?;
    let state = Rc::clone(shared);
    world.on_trigger_enter(
        kill_zone,
        NodeKind::Player,
        Box::new(move |world, member, _trigger| {
            state.borrow_mut().lose_life();
            if let Err(error) = world.reset_node(member) {
                log::warn!("could not reset player: {error}");
            }
        }),
    )?;
    world.on_trigger_enter(
        kill_zone,
        NodeKind::Rock,
        Box::new(|world, member, _trigger| {
            if let Some(node) = world.node_mut(member) {
                node.kill();
            }
        }),
    )?;

    let goal_zone = world.add_trigger(
        TriggerDesc::new(
            Vec3::new(course, GROUND_TOP + 3.0, 0.0),
            Vec3::new(2.0, 5.0, 10.0),
        )
        .named("goal_zone"),
    )?;
    let state = Rc::clone(shared);
    world.on_trigger_enter(
        goal_zone,
        NodeKind::Player,
        Box::new(move |_world, _member, _trigger| {
            log::info!("goal reached");
            state.borrow_mut().win();
        }),
    )?;
    Ok(())
}

fn populate(world: &mut World, game: &GameConfig, level: &Level) -> Result<(), SceneError> {
    let course = game.level.course_length;
    // One long row of coins down the middle of the course
    let coins = Placement::Grid {
        origin: Vec3::new(5.0, GROUND_TOP + 0.5, 0.0),
        columns: game.level.collectible_count,
        spacing: (course - 10.0) / game.level.collectible_count as f32,
    };
    spawn_wave(
        world,
        level.collectible_template,
        &coins,
        game.level.collectible_count,
    )?;

    let rocks = Placement::Random {
        center: Vec3::new(course / 2.0, 12.0, 0.0),
        half_extents: Vec3::new(course / 2.0 - 2.0, 3.0, 6.0),
        seed: game.level.seed,
    };
    spawn_wave(world, level.rock_template, &rocks, game.level.rock_count)?;
    Ok(())
}

/// Hop-and-run controller: forward at constant speed, relaunch on landing
fn drive_player(world: &mut World, player: NodeKey, speed: f32) {
    let Some(node) = world.node_mut(player) else {
        return;
    };
    let feet = node.transform.position.y - 0.9;
    let grounded = feet <= GROUND_TOP + 0.05 && node.velocity.y <= 0.0;
    node.velocity.x = speed;
    if grounded {
        node.velocity.y = HOP_SPEED;
        node.transform.position.y = GROUND_TOP + 0.9;
    }
    let velocity = node.velocity;
    let position = node.transform.position;
    if let Some(proxy) = node.proxy() {
        world.physics_mut().set_linear_velocity(proxy, velocity);
        world.physics_mut().set_position(proxy, position);
    }
}

/// Pickups are a plain category sweep against the player's proxy
fn collect_pickups(world: &mut World, player: NodeKey, shared: &Rc<RefCell<GameState>>) {
    let Some(player_proxy) = world.node(player).and_then(SpatialNode::proxy) else {
        return;
    };
    let members: Vec<NodeKey> = world.registry().members(NodeKind::Collectible).to_vec();
    for member in members {
        // Killed but not yet reaped coins must not count twice
        let Some(node) = world.node(member) else {
            continue;
        };
        if node.is_dead() {
            continue;
        }
        let Some(proxy) = node.proxy() else {
            continue;
        };
        if world.physics().overlaps(player_proxy, proxy) {
            if let Some(node) = world.node_mut(member) {
                node.kill();
            }
            shared.borrow_mut().collect();
        }
    }
}

fn run(game: &GameConfig) -> Result<(), SceneError> {
    let mut world = World::new(EngineConfig::default());
    let shared = GameState::shared(game.gameplay.starting_lives);

    let level = build_level(&mut world, game)?;
    wire_zones(&mut world, game, &shared)?;
    populate(&mut world, game, &level)?;
    log::info!(
        "level ready: {} nodes, {} proxies",
        world.node_count(),
        world.physics().proxy_count()
    );

    let dt = game.gameplay.timestep;
    let mut ticks = 0;
    while ticks < game.gameplay.max_ticks && shared.borrow().running() {
        drive_player(&mut world, level.player, game.gameplay.player_speed);
        world.update(dt);
        collect_pickups(&mut world, level.player, &shared);
        ticks += 1;
    }

    let state = shared.borrow();
    match state.phase {
        Phase::Won => log::info!(
            "won in {ticks} ticks with score {} and {} lives left",
            state.score,
            state.lives
        ),
        Phase::GameOver => log::info!("game over after {ticks} ticks, score {}", state.score),
        Phase::Playing => log::info!("tick budget exhausted, score {}", state.score),
    }
    Ok(())
}
