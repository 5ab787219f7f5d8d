//! The world context: node arena, registry, physics, assets, triggers
//!
//! One explicitly constructed object owns all shared state of the object
//! layer; there are no ambient globals. Created at level setup, dropped at
//! teardown. Single-threaded and tick-driven: every operation runs to
//! completion within the calling frame.

use super::node::{Lifetime, MeshSource, NodeDesc, NodeKind, SpatialNode};
use super::trigger::{TriggerCallback, TriggerDesc, TriggerVolume};
use super::{NodeKey, Prototype, SceneError};
use crate::assets::MeshLibrary;
use crate::core::config::EngineConfig;
use crate::foundation::math::{Point3, Transform, Vec3};
use crate::physics::shapes::AABB;
use crate::physics::{CollisionLayers, ContactResponse, PhysicsWorld, ProxyDesc};
use crate::scene::CategoryRegistry;
use log::{debug, trace};
use slotmap::SlotMap;
use std::sync::Arc;

/// Owner of all run-time object state for one level
pub struct World {
    config: EngineConfig,
    nodes: SlotMap<NodeKey, SpatialNode>,
    registry: CategoryRegistry,
    physics: PhysicsWorld,
    meshes: MeshLibrary,
    triggers: Vec<TriggerVolume>,
    anon_counter: u64,
}

impl World {
    /// Create an empty world with the given configuration
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            nodes: SlotMap::with_key(),
            registry: CategoryRegistry::new(),
            physics: PhysicsWorld::new(),
            meshes: MeshLibrary::new(),
            triggers: Vec::new(),
            anon_counter: 0,
        }
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The category registry
    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    /// The physics collaborator
    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    /// Mutable access to the physics collaborator
    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    /// The mesh library
    pub fn meshes(&self) -> &MeshLibrary {
        &self.meshes
    }

    /// Mutable access to the mesh library
    pub fn meshes_mut(&mut self) -> &mut MeshLibrary {
        &mut self.meshes
    }

    /// Borrow a node; `None` for stale keys
    pub fn node(&self, key: NodeKey) -> Option<&SpatialNode> {
        self.nodes.get(key)
    }

    /// Mutably borrow a node; `None` for stale keys
    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut SpatialNode> {
        self.nodes.get_mut(key)
    }

    /// Whether the key refers to a live node
    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Number of live nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate all live nodes
    pub fn nodes(&self) -> impl Iterator<Item = (NodeKey, &SpatialNode)> {
        self.nodes.iter()
    }

    /// Find a node by name (linear scan; setup/debug convenience)
    pub fn find_node(&self, name: &str) -> Option<NodeKey> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name == name)
            .map(|(key, _)| key)
    }

    fn generate_name(&mut self, kind: NodeKind) -> String {
        self.anon_counter += 1;
        format!("{}_{:03}", kind.as_str(), self.anon_counter)
    }

    /// Create a node from a description
    ///
    /// Resolves the mesh source through the library (cache-or-load), builds
    /// a physics proxy from the mesh geometry when `physics` is set, and
    /// registers the node under the category equal to its kind. Mesh
    /// resolution failure is fatal to the node's construction and is
    /// propagated; nothing is left behind.
    pub fn spawn(&mut self, desc: NodeDesc) -> Result<NodeKey, SceneError> {
        // Resolve the mesh before allocating anything, so failure is clean
        let mesh = match desc.mesh {
            None => None,
            Some(MeshSource::Handle(handle)) => Some(handle),
            Some(MeshSource::Named(name)) => Some(self.meshes.import_or_get(&name, &name)?),
        };

        if let Some(parent) = desc.parent {
            if !self.nodes.contains_key(parent) {
                return Err(SceneError::NodeNotFound);
            }
        }

        let name = match desc.name {
            Some(name) => name,
            None => self.generate_name(desc.kind),
        };
        let transform = Transform {
            position: desc.position,
            rotation: desc.rotation,
            scale: desc.scale,
        };
        let key = self.nodes.insert(SpatialNode::new(
            name,
            desc.kind,
            transform,
            desc.gravity,
            desc.lifetime,
        ));

        if let Some(parent) = desc.parent {
            self.nodes[parent].children.push(key);
            self.nodes[key].parent = Some(parent);
        }

        if let Some(mesh) = mesh {
            // Collision geometry is derived from the mesh once, here; the
            // mesh itself is shared and never mutated by the physics side.
            if desc.physics {
                let bounds = mesh.local_bounds().scaled(desc.scale);
                let position = self.world_position(key).unwrap_or(desc.position);
                let proxy = self.physics.create_proxy(
                    ProxyDesc {
                        owner: Some(key),
                        bounds,
                        kinematic: desc.kinematic,
                        query_only: false,
                        mass: desc.mass,
                        layer: desc.layer,
                        mask: desc.mask,
                        response: desc.response,
                    },
                    position,
                );
                self.nodes[key].proxy = Some(proxy);
            }
            self.nodes[key].mesh = Some(mesh);
        }

        self.registry.register(desc.kind, key);
        debug!(
            "spawned '{}' ({}) at {:?}",
            self.nodes[key].name, desc.kind, desc.position
        );
        Ok(key)
    }

    /// Destroy a node and its children
    ///
    /// Synchronously unregisters from the category registry, removes the
    /// physics proxy, detaches from the parent, and forgets the node in
    /// every trigger's tracked set before the slot is freed. Safe to call
    /// with a stale key.
    pub fn despawn(&mut self, key: NodeKey) {
        let Some(node) = self.nodes.get(key) else {
            return;
        };
        let children = node.children.clone();
        for child in children {
            self.despawn(child);
        }

        let Some(node) = self.nodes.remove(key) else {
            return;
        };
        self.registry.unregister(node.kind, key);
        if let Some(proxy) = node.proxy {
            self.physics.remove_proxy(proxy);
        }
        if let Some(parent) = node.parent {
            if let Some(parent_node) = self.nodes.get_mut(parent) {
                parent_node.children.retain(|&child| child != key);
            }
        }
        self.triggers.retain(|trigger| trigger.node() != key);
        for trigger in &mut self.triggers {
            trigger.forget(key);
        }
        debug!("despawned '{}'", node.name);
    }

    /// Replicate a template node at a new position
    ///
    /// The base copy takes the template's transform, shared mesh handle,
    /// physics construction parameters, gravity flag, and lifetime; a fresh
    /// proxy is derived from the mesh. The template's prototype is installed
    /// on the copy first and then invoked to add subtype-specific state, so
    /// the caller never needs to know the concrete subtype and clones of
    /// clones specialize identically. `start_position` is snapshotted from
    /// the post-specialization position.
    pub fn clone_node(&mut self, template: NodeKey, position: Vec3) -> Result<NodeKey, SceneError> {
        let template_node = self.nodes.get(template).ok_or(SceneError::NodeNotFound)?;
        let kind = template_node.kind;
        let mut transform = template_node.transform.clone();
        transform.position = position;
        let mesh = template_node.mesh.clone();
        let gravity = template_node.gravity;
        let lifetime = template_node.lifetime.reset();
        let prototype = template_node.prototype.clone();
        let parent = template_node.parent;
        let proxy_desc = template_node.proxy.and_then(|p| self.physics.proxy_desc(p));

        let name = self.generate_name(kind);
        let key = self
            .nodes
            .insert(SpatialNode::new(name, kind, transform, gravity, lifetime));

        if let Some(parent) = parent {
            if let Some(parent_node) = self.nodes.get_mut(parent) {
                parent_node.children.push(key);
                self.nodes[key].parent = Some(parent);
            }
        }

        if let Some(mesh) = mesh {
            if let Some(desc) = proxy_desc {
                let bounds = mesh.local_bounds().scaled(self.nodes[key].transform.scale);
                let world_position = self.world_position(key).unwrap_or(position);
                let proxy = self.physics.create_proxy(
                    ProxyDesc {
                        owner: Some(key),
                        bounds,
                        ..desc
                    },
                    world_position,
                );
                self.nodes[key].proxy = Some(proxy);
            }
            self.nodes[key].mesh = Some(mesh);
        }

        // Specialization travels with the copy by construction
        self.nodes[key].prototype = prototype.clone();
        self.registry.register(kind, key);

        if let Some(prototype) = prototype {
            if let Err(error) = prototype.specialize(self, template, key) {
                self.despawn(key);
                return Err(error);
            }
        }

        if let Some(node) = self.nodes.get_mut(key) {
            node.start_position = node.transform.position;
            trace!("cloned '{}' from template", node.name);
        }
        Ok(key)
    }

    /// Install or replace the prototype that specializes clones of a node
    pub fn set_prototype(
        &mut self,
        key: NodeKey,
        prototype: Arc<dyn Prototype>,
    ) -> Result<(), SceneError> {
        let node = self.nodes.get_mut(key).ok_or(SceneError::NodeNotFound)?;
        node.prototype = Some(prototype);
        Ok(())
    }

    /// Register a node under a category
    ///
    /// The category must equal the node's kind; a mismatch is an error, not
    /// a silent assumption. The world already does this at spawn time, so
    /// this is only needed after a manual unregister.
    pub fn register_category(
        &mut self,
        category: NodeKind,
        key: NodeKey,
    ) -> Result<(), SceneError> {
        let node = self.nodes.get(key).ok_or(SceneError::NodeNotFound)?;
        if node.kind != category {
            return Err(SceneError::CategoryMismatch {
                category,
                kind: node.kind,
            });
        }
        self.registry.register(category, key);
        Ok(())
    }

    /// World-space transform derived through the parent chain
    pub fn world_transform(&self, key: NodeKey) -> Option<Transform> {
        let node = self.nodes.get(key)?;
        let mut transform = node.transform.clone();
        let mut current = node.parent;
        while let Some(parent_key) = current {
            let parent = self.nodes.get(parent_key)?;
            transform = parent.transform.combine(&transform);
            current = parent.parent;
        }
        Some(transform)
    }

    /// World-space position derived through the parent chain
    pub fn world_position(&self, key: NodeKey) -> Option<Vec3> {
        self.world_transform(key).map(|t| t.position)
    }

    /// Move a node (local position) and push the change into the physics
    /// proxies of the node and its whole subtree
    pub fn set_position(&mut self, key: NodeKey, position: Vec3) -> Result<(), SceneError> {
        let node = self.nodes.get_mut(key).ok_or(SceneError::NodeNotFound)?;
        node.transform.position = position;
        self.sync_subtree_proxies(key);
        Ok(())
    }

    /// Restore a node to its start position
    ///
    /// Clears the cached velocity and pushes position and velocity into the
    /// physics proxy if one exists. Used when gameplay state resets.
    pub fn reset_node(&mut self, key: NodeKey) -> Result<(), SceneError> {
        let node = self.nodes.get_mut(key).ok_or(SceneError::NodeNotFound)?;
        node.transform.position = node.start_position;
        node.velocity = Vec3::zeros();
        let proxy = node.proxy;
        self.sync_subtree_proxies(key);
        if let Some(proxy) = proxy {
            self.physics.set_linear_velocity(proxy, Vec3::zeros());
        }
        Ok(())
    }

    fn sync_subtree_proxies(&mut self, key: NodeKey) {
        let Some(node) = self.nodes.get(key) else {
            return;
        };
        let children = node.children.clone();
        if let Some(proxy) = node.proxy {
            if let Some(position) = self.world_position(key) {
                self.physics.set_position(proxy, position);
            }
        }
        for child in children {
            self.sync_subtree_proxies(child);
        }
    }

    /// Create a trigger volume: a non-rendering node with a query-only
    /// kinematic proxy sized by `half_extents`
    ///
    /// Returns the trigger's node key; register callbacks with
    /// [`World::on_trigger_enter`]. Triggers are created once at level
    /// setup and are not cloned.
    pub fn add_trigger(&mut self, desc: TriggerDesc) -> Result<NodeKey, SceneError> {
        let name = match desc.name {
            Some(name) => name,
            None => self.generate_name(NodeKind::Trigger),
        };
        let key = self.nodes.insert(SpatialNode::new(
            name,
            NodeKind::Trigger,
            Transform::from_position(desc.position),
            false,
            Lifetime::Persistent,
        ));
        let proxy = self.physics.create_proxy(
            ProxyDesc {
                owner: Some(key),
                bounds: AABB::from_center_extents(Vec3::zeros(), desc.half_extents),
                kinematic: true,
                query_only: true,
                mass: 0.0,
                layer: CollisionLayers::TRIGGER,
                mask: CollisionLayers::ALL,
                response: ContactResponse::None,
            },
            desc.position,
        );
        self.nodes[key].proxy = Some(proxy);
        self.registry.register(NodeKind::Trigger, key);
        self.triggers.push(TriggerVolume::new(key));
        debug!("added trigger '{}' at {:?}", self.nodes[key].name, desc.position);
        Ok(key)
    }

    /// Register the enter callback a trigger fires for one category
    pub fn on_trigger_enter(
        &mut self,
        trigger: NodeKey,
        category: NodeKind,
        callback: TriggerCallback,
    ) -> Result<(), SceneError> {
        let volume = self
            .triggers
            .iter_mut()
            .find(|t| t.node() == trigger)
            .ok_or(SceneError::TriggerNotFound)?;
        volume.on_enter(category, callback);
        Ok(())
    }

    /// Borrow the trigger volume attached to a node
    pub fn trigger(&self, node: NodeKey) -> Option<&TriggerVolume> {
        self.triggers.iter().find(|t| t.node() == node)
    }

    /// Advance the world by one tick
    ///
    /// Order within the tick: gravity accumulation into cached velocities,
    /// trigger sweeps (exit before enter, per volume), physics stepping,
    /// write-back of integrated proxy state, then reaping of nodes marked
    /// dead during the tick.
    pub fn update(&mut self, dt: f32) {
        self.accumulate_gravity(dt);

        // Volumes are detached during dispatch so callbacks get the world
        let mut triggers = std::mem::take(&mut self.triggers);
        for trigger in &mut triggers {
            trigger.update(self);
        }
        let mut added = std::mem::replace(&mut self.triggers, triggers);
        self.triggers.append(&mut added);

        // A callback may have despawned a trigger's own node while its
        // volume was detached; such volumes are orphaned and must go.
        let nodes = &self.nodes;
        self.triggers.retain(|t| nodes.contains_key(t.node()));

        self.physics.step(dt);
        self.write_back_proxies();
        self.reap_dead();
    }

    fn accumulate_gravity(&mut self, dt: f32) {
        let gravity = self.config.gravity;
        let keys: Vec<NodeKey> = self.nodes.keys().collect();
        for key in keys {
            let Some(node) = self.nodes.get_mut(key) else {
                continue;
            };
            if !node.gravity {
                continue;
            }
            let Some(proxy) = node.proxy else {
                continue;
            };
            node.velocity += gravity * dt;
            let velocity = node.velocity;
            self.physics.set_linear_velocity(proxy, velocity);
        }
    }

    fn write_back_proxies(&mut self) {
        let keys: Vec<NodeKey> = self.nodes.keys().collect();
        for key in keys {
            let Some(node) = self.nodes.get(key) else {
                continue;
            };
            let Some(proxy) = node.proxy else {
                continue;
            };
            if self.physics.is_kinematic(proxy) != Some(false) {
                continue;
            }
            let parent = node.parent;
            if let Some(position) = self.physics.position(proxy) {
                let local = match parent.and_then(|p| self.world_transform(p)) {
                    Some(parent_transform) => parent_transform
                        .inverse()
                        .transform_point(Point3::from(position))
                        .coords,
                    None => position,
                };
                self.nodes[key].transform.position = local;
            }
            if let Some(velocity) = self.physics.linear_velocity(proxy) {
                self.nodes[key].velocity = velocity;
            }
        }
    }

    fn reap_dead(&mut self) {
        let dead: Vec<NodeKey> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.is_dead())
            .map(|(key, _)| key)
            .collect();
        for key in dead {
            self.despawn(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Mesh;

    fn test_world() -> World {
        World::new(EngineConfig::default())
    }

    fn cube_desc(kind: NodeKind, world: &mut World) -> NodeDesc {
        let mesh = world
            .meshes_mut()
            .insert("cube", Mesh::cuboid(Vec3::new(0.5, 0.5, 0.5)));
        NodeDesc::new(kind)
            .with_mesh(MeshSource::Handle(mesh))
            .with_physics()
    }

    #[test]
    fn test_spawn_registers_and_builds_proxy() {
        let mut world = test_world();
        let desc = cube_desc(NodeKind::Rock, &mut world).at_position(Vec3::new(1.0, 2.0, 3.0));
        let key = world.spawn(desc).unwrap();

        let node = world.node(key).unwrap();
        assert!(node.proxy().is_some());
        assert!(node.mesh().is_some());
        assert_eq!(node.start_position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(world.registry().members(NodeKind::Rock), &[key]);
        assert_eq!(
            world.physics().position(node.proxy().unwrap()).unwrap(),
            Vec3::new(1.0, 2.0, 3.0)
        );
    }

    #[test]
    fn test_spawn_without_mesh_has_no_proxy() {
        let mut world = test_world();
        let key = world
            .spawn(NodeDesc::new(NodeKind::Platform).with_physics())
            .unwrap();
        assert!(world.node(key).unwrap().proxy().is_none());
    }

    #[test]
    fn test_spawn_unknown_named_mesh_fails_fast() {
        let mut world = test_world();
        let result = world.spawn(
            NodeDesc::new(NodeKind::Rock)
                .with_mesh(MeshSource::Named("no/such/model.obj".to_string()))
                .with_physics(),
        );
        assert!(result.is_err());
        assert_eq!(world.node_count(), 0);
    }

    #[test]
    fn test_generated_names_are_unique() {
        let mut world = test_world();
        let a = world.spawn(NodeDesc::new(NodeKind::Rock)).unwrap();
        let b = world.spawn(NodeDesc::new(NodeKind::Rock)).unwrap();
        assert_ne!(world.node(a).unwrap().name, world.node(b).unwrap().name);
    }

    #[test]
    fn test_despawn_unregisters_everywhere() {
        let mut world = test_world();
        let desc = cube_desc(NodeKind::Rock, &mut world);
        let key = world.spawn(desc).unwrap();
        let proxy = world.node(key).unwrap().proxy().unwrap();

        world.despawn(key);

        assert!(!world.contains(key));
        assert!(world.registry().members(NodeKind::Rock).is_empty());
        assert!(!world.physics().contains(proxy));
        // Stale key is harmless everywhere
        world.despawn(key);
        assert!(world.node(key).is_none());
    }

    #[test]
    fn test_despawn_takes_children_along() {
        let mut world = test_world();
        let parent = world.spawn(NodeDesc::new(NodeKind::Platform)).unwrap();
        let child = world
            .spawn(NodeDesc::new(NodeKind::Collectible).with_parent(parent))
            .unwrap();

        world.despawn(parent);
        assert!(!world.contains(child));
    }

    #[test]
    fn test_world_position_follows_parent_chain() {
        let mut world = test_world();
        let parent = world
            .spawn(NodeDesc::new(NodeKind::Platform).at_position(Vec3::new(10.0, 0.0, 0.0)))
            .unwrap();
        let child = world
            .spawn(
                NodeDesc::new(NodeKind::Collectible)
                    .with_parent(parent)
                    .at_position(Vec3::new(0.0, 2.0, 0.0)),
            )
            .unwrap();

        assert_eq!(
            world.world_position(child).unwrap(),
            Vec3::new(10.0, 2.0, 0.0)
        );
    }

    #[test]
    fn test_reset_restores_start_position_and_velocity() {
        let mut world = test_world();
        let desc = cube_desc(NodeKind::Player, &mut world)
            .at_position(Vec3::new(0.0, 5.0, 0.0))
            .with_gravity()
            .non_kinematic();
        let key = world.spawn(desc).unwrap();

        // Fall for a few ticks, then move away
        for _ in 0..5 {
            world.update(1.0 / 60.0);
        }
        world.set_position(key, Vec3::new(50.0, -20.0, 0.0)).unwrap();

        world.reset_node(key).unwrap();

        let node = world.node(key).unwrap();
        assert_eq!(node.transform.position, Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(node.velocity, Vec3::zeros());
        let proxy = node.proxy().unwrap();
        assert_eq!(world.physics().position(proxy).unwrap(), Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(world.physics().linear_velocity(proxy).unwrap(), Vec3::zeros());
    }

    #[test]
    fn test_gravity_accumulates_into_cached_velocity() {
        let mut world = test_world();
        let desc = cube_desc(NodeKind::Rock, &mut world)
            .at_position(Vec3::new(0.0, 10.0, 0.0))
            .with_gravity()
            .non_kinematic()
            .with_layers(CollisionLayers::DEBRIS, CollisionLayers::NONE);
        let key = world.spawn(desc).unwrap();

        world.update(0.1);

        let node = world.node(key).unwrap();
        assert!(node.velocity.y < 0.0);
        // The integrated position came back from the proxy
        assert!(node.transform.position.y < 10.0);
    }

    #[test]
    fn test_perishable_nodes_are_reaped_at_end_of_tick() {
        let mut world = test_world();
        let key = world
            .spawn(NodeDesc::new(NodeKind::Collectible).perishable())
            .unwrap();

        world.node_mut(key).unwrap().kill();
        assert!(world.contains(key));

        world.update(1.0 / 60.0);
        assert!(!world.contains(key));
        assert!(world.registry().members(NodeKind::Collectible).is_empty());
    }

    #[test]
    fn test_register_category_enforces_kind_match() {
        let mut world = test_world();
        let key = world.spawn(NodeDesc::new(NodeKind::Rock)).unwrap();

        assert!(world.register_category(NodeKind::Rock, key).is_ok());
        assert!(matches!(
            world.register_category(NodeKind::Player, key),
            Err(SceneError::CategoryMismatch { .. })
        ));
    }
}
