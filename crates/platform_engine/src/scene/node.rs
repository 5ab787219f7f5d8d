//! Spatial nodes and their construction parameters

use super::{NodeKey, Prototype};
use crate::assets::Mesh;
use crate::foundation::math::{Quat, Transform, Vec3};
use crate::physics::{CollisionLayers, ContactResponse, ProxyKey};
use std::fmt;
use std::sync::Arc;

/// Closed set of entity kinds known to the object layer
///
/// The kind doubles as the node's category tag: a node always registers
/// under the category equal to its kind, so the "category name selects both
/// the member set and the callback" duality is checkable at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The player character
    Player,
    /// Static or moving platform geometry
    Platform,
    /// Loose physics debris
    Rock,
    /// Perishable pickup
    Collectible,
    /// Non-rendering overlap volume
    Trigger,
}

impl NodeKind {
    /// All kinds, in a stable order
    pub const ALL: [NodeKind; 5] = [
        NodeKind::Player,
        NodeKind::Platform,
        NodeKind::Rock,
        NodeKind::Collectible,
        NodeKind::Trigger,
    ];

    /// Lowercase tag used for generated names and diagnostics
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Player => "player",
            NodeKind::Platform => "platform",
            NodeKind::Rock => "rock",
            NodeKind::Collectible => "collectible",
            NodeKind::Trigger => "trigger",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a node outlives the tick that marks it dead
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// Destroyed only by an explicit despawn
    Persistent,
    /// Can be marked dead during a tick and is reaped at the end of it
    Perishable {
        /// Set by [`SpatialNode::kill`]; the world reaps dead nodes
        dead: bool,
    },
}

impl Lifetime {
    /// A perishable lifetime that has not been killed yet
    pub fn perishable() -> Self {
        Lifetime::Perishable { dead: false }
    }

    pub(crate) fn reset(self) -> Self {
        match self {
            Lifetime::Persistent => Lifetime::Persistent,
            Lifetime::Perishable { .. } => Lifetime::Perishable { dead: false },
        }
    }
}

/// Where a node's mesh comes from
#[derive(Debug, Clone)]
pub enum MeshSource {
    /// A pre-resolved shared mesh handle
    Handle(Arc<Mesh>),
    /// A name resolved through the mesh library: reuse if cached, otherwise
    /// import an OBJ file at that path and cache it under the name
    Named(String),
}

/// Construction parameters for [`World::spawn`](super::World::spawn)
#[derive(Debug, Clone)]
pub struct NodeDesc {
    /// Explicit name; anonymous spawns get a generated suffix
    pub name: Option<String>,
    /// Entity kind (also the category the node registers under)
    pub kind: NodeKind,
    /// Parent node, `None` for world root
    pub parent: Option<NodeKey>,
    /// Local position
    pub position: Vec3,
    /// Local rotation
    pub rotation: Quat,
    /// Local scale
    pub scale: Vec3,
    /// Optional mesh
    pub mesh: Option<MeshSource>,
    /// Build a physics proxy from the mesh geometry
    pub physics: bool,
    /// Kinematic proxies are driven by the scene, not by integration
    pub kinematic: bool,
    /// Accumulate gravity into the node's cached velocity each tick
    pub gravity: bool,
    /// Proxy mass
    pub mass: f32,
    /// Collision layer for the proxy
    pub layer: u32,
    /// Collision mask for the proxy
    pub mask: u32,
    /// Contact response for the proxy
    pub response: ContactResponse,
    /// Node lifetime
    pub lifetime: Lifetime,
}

impl NodeDesc {
    /// Start a description for a node of the given kind
    pub fn new(kind: NodeKind) -> Self {
        Self {
            name: None,
            kind,
            parent: None,
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            mesh: None,
            physics: false,
            kinematic: true,
            gravity: false,
            mass: 1.0,
            layer: CollisionLayers::ALL,
            mask: CollisionLayers::ALL,
            response: ContactResponse::StopOnContact,
            lifetime: Lifetime::Persistent,
        }
    }

    /// Set an explicit name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach under a parent node
    pub fn with_parent(mut self, parent: NodeKey) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set the local position
    pub fn at_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set the local scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Attach a mesh source
    pub fn with_mesh(mut self, mesh: MeshSource) -> Self {
        self.mesh = Some(mesh);
        self
    }

    /// Enable physics proxy construction (requires a mesh)
    pub fn with_physics(mut self) -> Self {
        self.physics = true;
        self
    }

    /// Let the proxy be moved by velocity integration
    pub fn non_kinematic(mut self) -> Self {
        self.kinematic = false;
        self
    }

    /// Enable per-tick gravity accumulation
    pub fn with_gravity(mut self) -> Self {
        self.gravity = true;
        self
    }

    /// Set the proxy mass
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Set collision layer and mask
    pub fn with_layers(mut self, layer: u32, mask: u32) -> Self {
        self.layer = layer;
        self.mask = mask;
        self
    }

    /// Set the proxy's contact response
    pub fn with_response(mut self, response: ContactResponse) -> Self {
        self.response = response;
        self
    }

    /// Mark the node perishable
    pub fn perishable(mut self) -> Self {
        self.lifetime = Lifetime::perishable();
        self
    }
}

/// A node in the spatial hierarchy
///
/// Owned by the world's node arena. Parent and child links are keys into
/// that arena, so destroying a node invalidates every reference to it
/// atomically through the generation bump.
pub struct SpatialNode {
    /// Display name, unique per instance
    pub name: String,
    /// Entity kind (and category tag)
    pub kind: NodeKind,
    /// Local transform; world transform is derived through the parent chain
    pub transform: Transform,
    /// Position snapshot used by reset-to-origin
    pub start_position: Vec3,
    /// Whether gravity accumulates into the cached velocity each tick
    pub gravity: bool,
    /// Cached velocity pushed into the physics proxy
    pub velocity: Vec3,
    /// Lifetime policy
    pub lifetime: Lifetime,

    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
    pub(crate) mesh: Option<Arc<Mesh>>,
    pub(crate) proxy: Option<ProxyKey>,
    pub(crate) prototype: Option<Arc<dyn Prototype>>,
}

impl SpatialNode {
    pub(crate) fn new(
        name: String,
        kind: NodeKind,
        transform: Transform,
        gravity: bool,
        lifetime: Lifetime,
    ) -> Self {
        let start_position = transform.position;
        Self {
            name,
            kind,
            transform,
            start_position,
            gravity,
            velocity: Vec3::zeros(),
            lifetime,
            parent: None,
            children: Vec::new(),
            mesh: None,
            proxy: None,
            prototype: None,
        }
    }

    /// The node's parent, `None` at world root
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Keys of the node's children
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// Shared mesh resource, if any
    pub fn mesh(&self) -> Option<&Arc<Mesh>> {
        self.mesh.as_ref()
    }

    /// Physics proxy handle, if the node has a physical presence
    pub fn proxy(&self) -> Option<ProxyKey> {
        self.proxy
    }

    /// The prototype that specializes clones of this node
    pub fn prototype(&self) -> Option<&Arc<dyn Prototype>> {
        self.prototype.as_ref()
    }

    /// Mark a perishable node dead; it is reaped at the end of the tick
    ///
    /// A no-op for persistent nodes.
    pub fn kill(&mut self) {
        match &mut self.lifetime {
            Lifetime::Perishable { dead } => *dead = true,
            Lifetime::Persistent => {
                log::debug!("kill() ignored for persistent node '{}'", self.name);
            }
        }
    }

    /// Whether the node has been marked dead
    pub fn is_dead(&self) -> bool {
        matches!(self.lifetime, Lifetime::Perishable { dead: true })
    }
}

impl fmt::Debug for SpatialNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialNode")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("position", &self.transform.position)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("proxy", &self.proxy)
            .field("has_mesh", &self.mesh.is_some())
            .field("has_prototype", &self.prototype.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kill_only_affects_perishable_nodes() {
        let mut coin = SpatialNode::new(
            "coin".to_string(),
            NodeKind::Collectible,
            Transform::identity(),
            false,
            Lifetime::perishable(),
        );
        let mut floor = SpatialNode::new(
            "floor".to_string(),
            NodeKind::Platform,
            Transform::identity(),
            false,
            Lifetime::Persistent,
        );

        coin.kill();
        floor.kill();

        assert!(coin.is_dead());
        assert!(!floor.is_dead());
    }

    #[test]
    fn test_lifetime_reset_revives_perishable() {
        let dead = Lifetime::Perishable { dead: true };
        assert_eq!(dead.reset(), Lifetime::perishable());
        assert_eq!(Lifetime::Persistent.reset(), Lifetime::Persistent);
    }
}
