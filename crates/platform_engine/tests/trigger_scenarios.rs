//! End-to-end scenarios across cloning, categories, and trigger volumes

use platform_engine::prelude::*;
use platform_engine::scene::Occupancy;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

fn world() -> World {
    World::new(EngineConfig::default())
}

fn spawn_cube(world: &mut World, kind: NodeKind, position: Vec3) -> NodeKey {
    let mesh = world
        .meshes_mut()
        .insert("unit_cube", Mesh::cuboid(Vec3::new(0.5, 0.5, 0.5)));
    world
        .spawn(
            NodeDesc::new(kind)
                .with_mesh(MeshSource::Handle(mesh))
                .with_physics()
                .at_position(position),
        )
        .unwrap()
}

/// Counts enter events; shared into the callback and inspected afterwards
fn counting_callback(counter: &Rc<RefCell<u32>>) -> TriggerCallback {
    let counter = Rc::clone(counter);
    Box::new(move |_world, _member, _trigger| {
        *counter.borrow_mut() += 1;
    })
}

#[test]
fn enter_fires_once_while_the_node_stays_inside() {
    let mut w = world();
    let rock = spawn_cube(&mut w, NodeKind::Rock, Vec3::zeros());
    let zone = w
        .add_trigger(TriggerDesc::new(Vec3::zeros(), Vec3::new(5.0, 5.0, 5.0)))
        .unwrap();
    let fired = Rc::new(RefCell::new(0));
    w.on_trigger_enter(zone, NodeKind::Rock, counting_callback(&fired))
        .unwrap();

    for _ in 0..10 {
        w.update(1.0 / 60.0);
    }

    assert_eq!(*fired.borrow(), 1);
    let volume = w.trigger(zone).unwrap();
    assert_eq!(volume.occupancy(rock), Occupancy::Inside);
    assert_eq!(volume.tracked_count(), 1);
}

#[test]
fn leaving_and_returning_fires_again_with_no_exit_event() {
    // A trigger of dimension 10 centered at the origin; the node starts
    // inside, is teleported far away for a tick, then comes back.
    let mut w = world();
    let rock = spawn_cube(&mut w, NodeKind::Rock, Vec3::zeros());
    let zone = w
        .add_trigger(TriggerDesc::new(Vec3::zeros(), Vec3::new(5.0, 5.0, 5.0)))
        .unwrap();
    let fired = Rc::new(RefCell::new(0));
    w.on_trigger_enter(zone, NodeKind::Rock, counting_callback(&fired))
        .unwrap();

    w.update(1.0 / 60.0);
    assert_eq!(*fired.borrow(), 1);

    w.set_position(rock, Vec3::new(100.0, 0.0, 0.0)).unwrap();
    w.update(1.0 / 60.0);
    assert_eq!(*fired.borrow(), 1, "no event of any kind on exit");

    w.set_position(rock, Vec3::zeros()).unwrap();
    w.update(1.0 / 60.0);
    assert_eq!(*fired.borrow(), 2, "a fresh entry fires again");
}

#[test]
fn category_with_no_members_is_not_an_error() {
    let mut w = world();
    let zone = w
        .add_trigger(TriggerDesc::new(Vec3::zeros(), Vec3::new(5.0, 5.0, 5.0)))
        .unwrap();
    let fired = Rc::new(RefCell::new(0));
    w.on_trigger_enter(zone, NodeKind::Rock, counting_callback(&fired))
        .unwrap();

    for _ in 0..3 {
        w.update(1.0 / 60.0);
    }

    assert_eq!(*fired.borrow(), 0);
}

#[test]
fn despawning_a_member_inside_the_volume_allows_a_replacement_to_fire() {
    let mut w = world();
    let first = spawn_cube(&mut w, NodeKind::Collectible, Vec3::zeros());
    let zone = w
        .add_trigger(TriggerDesc::new(Vec3::zeros(), Vec3::new(5.0, 5.0, 5.0)))
        .unwrap();
    let fired = Rc::new(RefCell::new(0));
    w.on_trigger_enter(zone, NodeKind::Collectible, counting_callback(&fired))
        .unwrap();

    w.update(1.0 / 60.0);
    assert_eq!(*fired.borrow(), 1);

    // Destroy the occupant; its key goes stale and stops overlapping
    w.despawn(first);
    w.update(1.0 / 60.0);

    // A new collectible in the same spot is a fresh enter
    spawn_cube(&mut w, NodeKind::Collectible, Vec3::zeros());
    w.update(1.0 / 60.0);
    assert_eq!(*fired.borrow(), 2);
}

#[test]
fn callbacks_may_despawn_the_member_they_were_called_for() {
    let mut w = world();
    spawn_cube(&mut w, NodeKind::Collectible, Vec3::zeros());
    let zone = w
        .add_trigger(TriggerDesc::new(Vec3::zeros(), Vec3::new(5.0, 5.0, 5.0)))
        .unwrap();
    w.on_trigger_enter(
        zone,
        NodeKind::Collectible,
        Box::new(|world, member, _trigger| {
            world.despawn(member);
        }),
    )
    .unwrap();

    w.update(1.0 / 60.0);
    assert_eq!(w.registry().count(NodeKind::Collectible), 0);

    // Nothing left to enter; later ticks are quiet
    w.update(1.0 / 60.0);
}

#[test]
fn a_callback_may_despawn_the_trigger_it_fired_from() {
    let mut w = world();
    spawn_cube(&mut w, NodeKind::Player, Vec3::zeros());
    let zone = w
        .add_trigger(TriggerDesc::new(Vec3::zeros(), Vec3::new(5.0, 5.0, 5.0)))
        .unwrap();
    w.on_trigger_enter(
        zone,
        NodeKind::Player,
        Box::new(|world, _member, trigger| {
            world.despawn(trigger);
        }),
    )
    .unwrap();

    w.update(1.0 / 60.0);

    // Both the node and its volume are gone, not just the node
    assert!(!w.contains(zone));
    assert!(w.trigger(zone).is_none());

    // Later ticks run without the orphaned volume resurfacing
    w.update(1.0 / 60.0);
    w.update(1.0 / 60.0);
}

struct HeavyRock;

impl Prototype for HeavyRock {
    fn specialize(
        &self,
        world: &mut World,
        _template: NodeKey,
        copy: NodeKey,
    ) -> Result<(), SceneError> {
        let proxy = world
            .node(copy)
            .and_then(SpatialNode::proxy)
            .ok_or(SceneError::NodeNotFound)?;
        world.physics_mut().set_mass(proxy, 8.0);
        world.physics_mut().set_kinematic(proxy, false);
        Ok(())
    }
}

#[test]
fn clones_share_the_mesh_and_carry_the_prototype_across_generations() {
    let mut w = world();
    let template = spawn_cube(&mut w, NodeKind::Rock, Vec3::zeros());
    w.set_prototype(template, Arc::new(HeavyRock)).unwrap();

    let first = w.clone_node(template, Vec3::new(3.0, 0.0, 0.0)).unwrap();
    // Clone of a clone: specialization travels without re-installation
    let second = w.clone_node(first, Vec3::new(6.0, 0.0, 0.0)).unwrap();

    for &key in &[first, second] {
        let node = w.node(key).unwrap();
        let proxy = node.proxy().unwrap();
        assert_eq!(w.physics().mass(proxy), Some(8.0));
        assert_eq!(w.physics().is_kinematic(proxy), Some(false));
        assert!(Arc::ptr_eq(
            node.mesh().unwrap(),
            w.node(template).unwrap().mesh().unwrap()
        ));
    }
    assert_eq!(w.registry().count(NodeKind::Rock), 3);
}

/// Repositions its copies during specialization, like a hovering pickup
struct HoverCoin;

impl Prototype for HoverCoin {
    fn specialize(
        &self,
        world: &mut World,
        _template: NodeKey,
        copy: NodeKey,
    ) -> Result<(), SceneError> {
        let position = world
            .world_position(copy)
            .ok_or(SceneError::NodeNotFound)?;
        world.set_position(copy, position + Vec3::new(0.0, 0.5, 0.0))
    }
}

#[test]
fn clone_start_position_is_the_post_specialization_position() {
    let mut w = world();
    let template = spawn_cube(&mut w, NodeKind::Collectible, Vec3::zeros());
    w.set_prototype(template, Arc::new(HoverCoin)).unwrap();

    let copy = w.clone_node(template, Vec3::new(2.0, 1.0, 0.0)).unwrap();

    let node = w.node(copy).unwrap();
    assert_eq!(node.transform.position, Vec3::new(2.0, 1.5, 0.0));
    assert_eq!(node.start_position, Vec3::new(2.0, 1.5, 0.0));

    // Reset goes back to where specialization left the copy, not to the
    // position the clone was requested at
    w.set_position(copy, Vec3::new(50.0, -3.0, 0.0)).unwrap();
    w.reset_node(copy).unwrap();
    assert_eq!(
        w.node(copy).unwrap().transform.position,
        Vec3::new(2.0, 1.5, 0.0)
    );
}

#[test]
fn cloned_members_participate_in_triggers_immediately() {
    let mut w = world();
    let template = spawn_cube(&mut w, NodeKind::Rock, Vec3::new(100.0, 0.0, 0.0));
    let zone = w
        .add_trigger(TriggerDesc::new(Vec3::zeros(), Vec3::new(5.0, 5.0, 5.0)))
        .unwrap();
    let fired = Rc::new(RefCell::new(0));
    w.on_trigger_enter(zone, NodeKind::Rock, counting_callback(&fired))
        .unwrap();

    w.update(1.0 / 60.0);
    assert_eq!(*fired.borrow(), 0, "template is far outside");

    w.clone_node(template, Vec3::zeros()).unwrap();
    w.update(1.0 / 60.0);
    assert_eq!(*fired.borrow(), 1, "the clone registered and was detected");
}

#[test]
fn trigger_volumes_ignore_other_categories() {
    let mut w = world();
    spawn_cube(&mut w, NodeKind::Player, Vec3::zeros());
    let zone = w
        .add_trigger(TriggerDesc::new(Vec3::zeros(), Vec3::new(5.0, 5.0, 5.0)))
        .unwrap();
    let fired = Rc::new(RefCell::new(0));
    w.on_trigger_enter(zone, NodeKind::Rock, counting_callback(&fired))
        .unwrap();

    w.update(1.0 / 60.0);
    assert_eq!(*fired.borrow(), 0);
}

#[test]
fn two_triggers_track_occupancy_independently() {
    let mut w = world();
    let rock = spawn_cube(&mut w, NodeKind::Rock, Vec3::zeros());
    let near = w
        .add_trigger(TriggerDesc::new(Vec3::zeros(), Vec3::new(2.0, 2.0, 2.0)))
        .unwrap();
    let far = w
        .add_trigger(TriggerDesc::new(
            Vec3::new(20.0, 0.0, 0.0),
            Vec3::new(2.0, 2.0, 2.0),
        ))
        .unwrap();
    let near_hits = Rc::new(RefCell::new(0));
    let far_hits = Rc::new(RefCell::new(0));
    w.on_trigger_enter(near, NodeKind::Rock, counting_callback(&near_hits))
        .unwrap();
    w.on_trigger_enter(far, NodeKind::Rock, counting_callback(&far_hits))
        .unwrap();

    w.update(1.0 / 60.0);
    w.set_position(rock, Vec3::new(20.0, 0.0, 0.0)).unwrap();
    w.update(1.0 / 60.0);

    assert_eq!(*near_hits.borrow(), 1);
    assert_eq!(*far_hits.borrow(), 1);
}
