//! Run-time object layer
//!
//! Every placed object is a [`SpatialNode`] living in a generation-counted
//! arena owned by the [`World`] context. Nodes are indexed by category
//! through the [`CategoryRegistry`], mass-produced from templates via
//! [`Prototype`] specialization, and observed by [`TriggerVolume`]s that
//! turn point-in-time overlap queries into edge-triggered enter events.

mod node;
mod prototype;
mod registry;
mod trigger;
mod world;

pub use node::{Lifetime, MeshSource, NodeDesc, NodeKind, SpatialNode};
pub use prototype::Prototype;
pub use registry::CategoryRegistry;
pub use trigger::{Occupancy, TriggerCallback, TriggerDesc, TriggerVolume};
pub use world::World;

use crate::assets::AssetError;
use thiserror::Error;

slotmap::new_key_type! {
    /// Generation-counted handle to a scene node
    ///
    /// Keys go stale when the node is destroyed; dereferencing a stale key
    /// is a detectable `None`/error, never undefined behavior.
    pub struct NodeKey;
}

/// Scene layer errors
#[derive(Debug, Error)]
pub enum SceneError {
    /// A node handle was stale or never valid
    #[error("node not found: handle is stale or the node was destroyed")]
    NodeNotFound,

    /// Mesh resolution failed; fatal to the object's construction
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// A node may only register under the category matching its own kind
    #[error("node of kind {kind} cannot register under category {category}")]
    CategoryMismatch {
        /// Category that was requested
        category: NodeKind,
        /// The node's actual kind
        kind: NodeKind,
    },

    /// The node key does not belong to any trigger volume
    #[error("no trigger volume is attached to that node")]
    TriggerNotFound,
}
