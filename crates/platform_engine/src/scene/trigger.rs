//! Trigger volumes: category-indexed, edge-triggered enter events
//!
//! A trigger volume is a non-rendering node whose query-only proxy is used
//! purely for overlap testing. Per tick it re-tests everything it considers
//! inside (exit sweep), then tests the members of each configured category
//! for fresh overlaps (enter sweep) and fires that category's callback once
//! per enter transition. The `tracked` set is the only persistent
//! cross-frame state in the object layer.

use super::{NodeKey, NodeKind, World};
use crate::foundation::math::Vec3;
use log::{debug, warn};
use std::collections::HashSet;
use std::fmt;

/// Callback invoked on an enter transition with `(world, member, trigger)`
///
/// Invocation is synchronous and may mutate global game state — despawn the
/// member, reset the player, end the run. It fires at most once per
/// uninterrupted occupancy.
pub type TriggerCallback = Box<dyn FnMut(&mut World, NodeKey, NodeKey)>;

/// Construction parameters for [`World::add_trigger`](super::World::add_trigger)
#[derive(Debug, Clone)]
pub struct TriggerDesc {
    /// Explicit name; anonymous triggers get a generated suffix
    pub name: Option<String>,
    /// World position of the volume's center
    pub position: Vec3,
    /// Half-extents of the overlap volume
    pub half_extents: Vec3,
}

impl TriggerDesc {
    /// A trigger volume at `position` spanning `position ± half_extents`
    pub fn new(position: Vec3, half_extents: Vec3) -> Self {
        Self {
            name: None,
            position,
            half_extents,
        }
    }

    /// Set an explicit name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Per-pair occupancy state of a trigger against one node
///
/// `Outside` is the untracked default; a node is `Inside` exactly while its
/// key is in the trigger's `tracked` set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupancy {
    /// Not currently overlapping the volume
    Outside,
    /// Overlapping; the enter callback has already fired for this stay
    Inside,
}

/// An edge-triggered overlap volume with per-category callbacks
pub struct TriggerVolume {
    node: NodeKey,
    /// Insertion-ordered category → callback mapping
    callbacks: Vec<(NodeKind, TriggerCallback)>,
    tracked: HashSet<NodeKey>,
}

impl TriggerVolume {
    pub(crate) fn new(node: NodeKey) -> Self {
        Self {
            node,
            callbacks: Vec::new(),
            tracked: HashSet::new(),
        }
    }

    /// The trigger's own scene node
    pub fn node(&self) -> NodeKey {
        self.node
    }

    /// Register the enter callback for a category
    ///
    /// Replaces any callback previously registered for the same category.
    pub fn on_enter(&mut self, category: NodeKind, callback: TriggerCallback) {
        if let Some(entry) = self.callbacks.iter_mut().find(|(kind, _)| *kind == category) {
            warn!("replacing enter callback for category '{category}'");
            entry.1 = callback;
        } else {
            self.callbacks.push((category, callback));
        }
    }

    /// Occupancy state of a node relative to this trigger
    pub fn occupancy(&self, node: NodeKey) -> Occupancy {
        if self.tracked.contains(&node) {
            Occupancy::Inside
        } else {
            Occupancy::Outside
        }
    }

    /// Number of nodes currently considered inside
    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    pub(crate) fn forget(&mut self, node: NodeKey) {
        self.tracked.remove(&node);
    }

    /// Run one tick of edge detection: exit sweep, then enter sweep
    ///
    /// Exit-before-enter guarantees a member that leaves and re-enters
    /// within the same tick is re-detected as a fresh enter rather than
    /// skipped. No callback ever fires on exit.
    pub(crate) fn update(&mut self, world: &mut World) {
        let Some(own_proxy) = world.node(self.node).and_then(|n| n.proxy()) else {
            debug!("trigger volume node is gone, skipping sweep");
            self.tracked.clear();
            return;
        };

        // Exit sweep: destroyed members stop overlapping via the stale-key
        // rule, so despawns issued by last tick's callbacks unwind here.
        self.tracked.retain(|&member| {
            world
                .node(member)
                .and_then(|n| n.proxy())
                .is_some_and(|proxy| world.physics().overlaps(own_proxy, proxy))
        });

        // Enter sweep, in callback registration order
        for index in 0..self.callbacks.len() {
            let category = self.callbacks[index].0;
            if !world.registry().has_category(category) {
                warn!("trigger category '{category}' has no registry entry this tick");
                continue;
            }
            // Snapshot the member list: callbacks may mutate the registry
            let members: Vec<NodeKey> = world.registry().members(category).to_vec();

            for member in members {
                if member == self.node || self.tracked.contains(&member) {
                    continue;
                }
                let Some(node) = world.node(member) else {
                    continue;
                };
                if node.kind != category {
                    warn!(
                        "node '{}' of kind {} found under category '{category}', skipping",
                        node.name, node.kind
                    );
                    continue;
                }
                let Some(proxy) = node.proxy() else {
                    debug!("category member '{}' has no physics proxy", node.name);
                    continue;
                };
                if world.physics().overlaps(own_proxy, proxy) {
                    self.tracked.insert(member);
                    (self.callbacks[index].1)(world, member, self.node);
                }
            }
        }
    }
}

impl fmt::Debug for TriggerVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerVolume")
            .field("node", &self.node)
            .field(
                "categories",
                &self.callbacks.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
            )
            .field("tracked", &self.tracked)
            .finish()
    }
}
