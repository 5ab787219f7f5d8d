//! Physics proxy arena and overlap/contact sweeps
//!
//! Split into two phases per tick, mirroring a broad-phase/narrow-phase
//! collision pipeline: integration of non-kinematic proxies, then a pairwise
//! contact sweep over solid proxies with layer filtering. The pairwise sweep
//! is linear; sufficient for the small scenes the object layer targets and
//! replaceable behind the same interface.

use super::collision_layers::CollisionLayers;
use super::shapes::AABB;
use crate::foundation::math::Vec3;
use crate::scene::NodeKey;
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Generation-counted handle to a physics proxy
    pub struct ProxyKey;
}

/// What a proxy does about contacts it participates in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContactResponse {
    /// Zero the proxy's horizontal and forward velocity on any contact
    /// ("stop on hit"); the default for mesh-backed nodes
    #[default]
    StopOnContact,

    /// Ignore contacts entirely
    None,
}

/// Construction parameters for a physics proxy
#[derive(Debug, Clone)]
pub struct ProxyDesc {
    /// Scene node the proxy belongs to, if any
    pub owner: Option<NodeKey>,

    /// Collision geometry in local space, centered on the proxy position
    pub bounds: AABB,

    /// Kinematic proxies are positioned by the scene, not by integration
    pub kinematic: bool,

    /// Query-only proxies answer overlap tests but never generate contacts
    pub query_only: bool,

    /// Proxy mass
    pub mass: f32,

    /// Collision layer this proxy is on
    pub layer: u32,

    /// Collision layers this proxy collides with
    pub mask: u32,

    /// Response applied when a contact involves this proxy
    pub response: ContactResponse,
}

impl Default for ProxyDesc {
    fn default() -> Self {
        Self {
            owner: None,
            bounds: AABB::from_center_extents(Vec3::zeros(), Vec3::new(0.5, 0.5, 0.5)),
            kinematic: true,
            query_only: false,
            mass: 1.0,
            layer: CollisionLayers::ALL,
            mask: CollisionLayers::ALL,
            response: ContactResponse::StopOnContact,
        }
    }
}

/// A contact between two solid proxies reported by [`PhysicsWorld::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    /// First proxy (smaller key, for a stable pair identity)
    pub a: ProxyKey,
    /// Second proxy
    pub b: ProxyKey,
    /// Owner node of proxy `a`
    pub owner_a: Option<NodeKey>,
    /// Owner node of proxy `b`
    pub owner_b: Option<NodeKey>,
}

#[derive(Debug, Clone)]
struct Proxy {
    desc: ProxyDesc,
    position: Vec3,
    velocity: Vec3,
}

impl Proxy {
    fn world_bounds(&self) -> AABB {
        self.desc.bounds.translated(self.position)
    }
}

/// Arena of physics proxies with overlap queries and a contact sweep
#[derive(Debug, Default)]
pub struct PhysicsWorld {
    proxies: SlotMap<ProxyKey, Proxy>,
}

impl PhysicsWorld {
    /// Create an empty physics world
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a proxy at the given world position
    pub fn create_proxy(&mut self, desc: ProxyDesc, position: Vec3) -> ProxyKey {
        self.proxies.insert(Proxy {
            desc,
            position,
            velocity: Vec3::zeros(),
        })
    }

    /// Remove a proxy; safe to call with a stale key
    pub fn remove_proxy(&mut self, key: ProxyKey) {
        self.proxies.remove(key);
    }

    /// Whether the key refers to a live proxy
    pub fn contains(&self, key: ProxyKey) -> bool {
        self.proxies.contains_key(key)
    }

    /// Number of live proxies
    pub fn proxy_count(&self) -> usize {
        self.proxies.len()
    }

    /// Push a new world position into a proxy
    pub fn set_position(&mut self, key: ProxyKey, position: Vec3) {
        if let Some(proxy) = self.proxies.get_mut(key) {
            proxy.position = position;
        }
    }

    /// Current world position of a proxy
    pub fn position(&self, key: ProxyKey) -> Option<Vec3> {
        self.proxies.get(key).map(|p| p.position)
    }

    /// Set a proxy's linear velocity
    pub fn set_linear_velocity(&mut self, key: ProxyKey, velocity: Vec3) {
        if let Some(proxy) = self.proxies.get_mut(key) {
            proxy.velocity = velocity;
        }
    }

    /// Current linear velocity of a proxy
    pub fn linear_velocity(&self, key: ProxyKey) -> Option<Vec3> {
        self.proxies.get(key).map(|p| p.velocity)
    }

    /// Switch a proxy between kinematic and integrated motion
    pub fn set_kinematic(&mut self, key: ProxyKey, kinematic: bool) {
        if let Some(proxy) = self.proxies.get_mut(key) {
            proxy.desc.kinematic = kinematic;
        }
    }

    /// Whether a proxy is kinematic
    pub fn is_kinematic(&self, key: ProxyKey) -> Option<bool> {
        self.proxies.get(key).map(|p| p.desc.kinematic)
    }

    /// Set a proxy's mass
    pub fn set_mass(&mut self, key: ProxyKey, mass: f32) {
        if let Some(proxy) = self.proxies.get_mut(key) {
            proxy.desc.mass = mass;
        }
    }

    /// A proxy's mass
    pub fn mass(&self, key: ProxyKey) -> Option<f32> {
        self.proxies.get(key).map(|p| p.desc.mass)
    }

    /// Override a proxy's contact response
    pub fn set_response(&mut self, key: ProxyKey, response: ContactResponse) {
        if let Some(proxy) = self.proxies.get_mut(key) {
            proxy.desc.response = response;
        }
    }

    /// The scene node owning a proxy
    pub fn owner(&self, key: ProxyKey) -> Option<NodeKey> {
        self.proxies.get(key).and_then(|p| p.desc.owner)
    }

    /// A copy of the proxy's construction parameters
    ///
    /// Used when cloning a node to rebuild an equivalent proxy for the copy.
    pub fn proxy_desc(&self, key: ProxyKey) -> Option<ProxyDesc> {
        self.proxies.get(key).map(|p| p.desc.clone())
    }

    /// A proxy's current bounds in world space
    pub fn world_bounds(&self, key: ProxyKey) -> Option<AABB> {
        self.proxies.get(key).map(Proxy::world_bounds)
    }

    /// Point-in-time overlap query between two proxies
    ///
    /// Either key being stale yields `false`, so destroyed objects simply
    /// stop overlapping instead of becoming an error.
    pub fn overlaps(&self, a: ProxyKey, b: ProxyKey) -> bool {
        match (self.proxies.get(a), self.proxies.get(b)) {
            (Some(pa), Some(pb)) => pa.world_bounds().intersects(&pb.world_bounds()),
            _ => false,
        }
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// Integrates non-kinematic proxies, sweeps contacts between solid
    /// proxies honoring layer masks, applies contact responses, and returns
    /// the contacts found this step.
    pub fn step(&mut self, dt: f32) -> Vec<Contact> {
        for proxy in self.proxies.values_mut() {
            if !proxy.desc.kinematic {
                proxy.position += proxy.velocity * dt;
            }
        }

        let contacts = self.sweep_contacts();
        for contact in &contacts {
            self.apply_response(contact.a);
            self.apply_response(contact.b);
        }
        contacts
    }

    fn sweep_contacts(&self) -> Vec<Contact> {
        let keys: Vec<ProxyKey> = self
            .proxies
            .iter()
            .filter(|(_, p)| !p.desc.query_only)
            .map(|(k, _)| k)
            .collect();

        let mut contacts = Vec::new();
        for (i, &a) in keys.iter().enumerate() {
            for &b in &keys[i + 1..] {
                let pa = &self.proxies[a];
                let pb = &self.proxies[b];
                if !CollisionLayers::should_collide(
                    pa.desc.layer,
                    pa.desc.mask,
                    pb.desc.layer,
                    pb.desc.mask,
                ) {
                    continue;
                }
                if pa.world_bounds().intersects(&pb.world_bounds()) {
                    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
                    contacts.push(Contact {
                        a: lo,
                        b: hi,
                        owner_a: self.proxies[lo].desc.owner,
                        owner_b: self.proxies[hi].desc.owner,
                    });
                }
            }
        }
        contacts
    }

    fn apply_response(&mut self, key: ProxyKey) {
        if let Some(proxy) = self.proxies.get_mut(key) {
            match proxy.desc.response {
                ContactResponse::StopOnContact => {
                    proxy.velocity.x = 0.0;
                    proxy.velocity.z = 0.0;
                }
                ContactResponse::None => {}
            }
        }
    }

    /// Remove every proxy
    pub fn clear(&mut self) {
        self.proxies.clear();
    }
}
