//! # Platform Engine
//!
//! The run-time object layer of a small 3D platformer engine: a spatial
//! node hierarchy, a category registry, prototype-based cloning, and
//! edge-triggered trigger volumes, driven by a fixed-timestep tick.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use platform_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut world = World::new(EngineConfig::default());
//!
//!     let mesh = world
//!         .meshes_mut()
//!         .insert("coin", Mesh::cuboid(Vec3::new(0.25, 0.25, 0.05)));
//!     let coin = world.spawn(
//!         NodeDesc::new(NodeKind::Collectible)
//!             .with_mesh(MeshSource::Handle(mesh))
//!             .with_physics()
//!             .perishable(),
//!     )?;
//!
//!     let zone = world.add_trigger(TriggerDesc::new(
//!         Vec3::zeros(),
//!         Vec3::new(5.0, 5.0, 5.0),
//!     ))?;
//!     world.on_trigger_enter(
//!         zone,
//!         NodeKind::Collectible,
//!         Box::new(|world, member, _trigger| {
//!             if let Some(node) = world.node_mut(member) {
//!                 node.kill();
//!             }
//!         }),
//!     )?;
//!
//!     let _clone = world.clone_node(coin, Vec3::new(2.0, 0.0, 0.0))?;
//!     world.update(1.0 / 60.0);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::must_use_candidate)]

pub mod assets;
pub mod core;
pub mod foundation;
pub mod physics;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{AssetError, Mesh, MeshLibrary},
        core::config::{ConfigError, EngineConfig},
        foundation::math::{Transform, Vec3},
        physics::{CollisionLayers, ContactResponse, PhysicsWorld, ProxyKey},
        scene::{
            Lifetime, MeshSource, NodeDesc, NodeKey, NodeKind, Prototype, SceneError,
            SpatialNode, TriggerCallback, TriggerDesc, World,
        },
    };
}
