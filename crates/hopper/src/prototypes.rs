//! Prototypes that specialize clones of the level's template nodes
//!
//! The spawner clones templates without knowing their subtype; each
//! prototype here adds whatever the base clone cannot copy, typically
//! physics tuning on the fresh proxy.

use platform_engine::prelude::*;
use rand::Rng;
use std::sync::{Arc, Mutex};

fn proxy_of(world: &World, key: NodeKey) -> Result<ProxyKey, SceneError> {
    world
        .node(key)
        .and_then(SpatialNode::proxy)
        .ok_or(SceneError::NodeNotFound)
}

/// Static solid geometry; clones stay kinematic and immovable
pub struct PlatformProto;

impl Prototype for PlatformProto {
    fn specialize(
        &self,
        world: &mut World,
        _template: NodeKey,
        copy: NodeKey,
    ) -> Result<(), SceneError> {
        let proxy = proxy_of(world, copy)?;
        world.physics_mut().set_kinematic(proxy, true);
        world
            .physics_mut()
            .set_response(proxy, ContactResponse::None);
        Ok(())
    }
}

/// Falling debris with a per-clone randomized mass
pub struct RockProto {
    rng: Mutex<rand::rngs::StdRng>,
}

impl RockProto {
    /// Seeded so a run's rock field is reproducible
    pub fn seeded(seed: u64) -> Arc<Self> {
        use rand::SeedableRng;
        Arc::new(Self {
            rng: Mutex::new(rand::rngs::StdRng::seed_from_u64(seed)),
        })
    }
}

impl Prototype for RockProto {
    fn specialize(
        &self,
        world: &mut World,
        _template: NodeKey,
        copy: NodeKey,
    ) -> Result<(), SceneError> {
        let proxy = proxy_of(world, copy)?;
        let mass = self
            .rng
            .lock()
            .map_or(5.0, |mut rng| rng.gen_range(2.0..10.0));
        world.physics_mut().set_mass(proxy, mass);
        world.physics_mut().set_kinematic(proxy, false);
        Ok(())
    }
}

/// Hovering pickup; clones float slightly above their placement point
pub struct CollectibleProto {
    /// Hover height above the requested spawn position
    pub hover: f32,
}

impl Prototype for CollectibleProto {
    fn specialize(
        &self,
        world: &mut World,
        _template: NodeKey,
        copy: NodeKey,
    ) -> Result<(), SceneError> {
        let position = world
            .world_position(copy)
            .ok_or(SceneError::NodeNotFound)?;
        world.set_position(copy, position + Vec3::new(0.0, self.hover, 0.0))
    }
}
