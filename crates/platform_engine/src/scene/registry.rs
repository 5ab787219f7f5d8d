//! Category registry: kind-indexed sets of live node references

use super::{NodeKey, NodeKind};
use log::debug;
use std::collections::HashMap;

/// Name → ordered set of non-owning node references
///
/// Answers "give me all live nodes tagged as category X". Membership is
/// maintained by the world: nodes register at construction and unregister
/// when destroyed, so a key obtained here may only go stale between a
/// despawn call issued by a callback and the end of the current sweep —
/// and stale keys are detectable, never dereferenced blindly.
#[derive(Debug, Default)]
pub struct CategoryRegistry {
    categories: HashMap<NodeKind, Vec<NodeKey>>,
}

impl CategoryRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to a category; idempotent
    ///
    /// Returns `true` if the node was newly added, `false` if it was
    /// already a member.
    pub fn register(&mut self, category: NodeKind, node: NodeKey) -> bool {
        let members = self.categories.entry(category).or_default();
        if members.contains(&node) {
            return false;
        }
        members.push(node);
        true
    }

    /// Remove a node from a category
    ///
    /// Safe to call even if the node was never registered.
    pub fn unregister(&mut self, category: NodeKind, node: NodeKey) {
        if let Some(members) = self.categories.get_mut(&category) {
            members.retain(|&member| member != node);
        }
    }

    /// Members of a category, in registration order
    ///
    /// An unknown category yields an empty slice with a diagnostic; callers
    /// treat "not found" identically to "empty".
    pub fn members(&self, category: NodeKind) -> &[NodeKey] {
        match self.categories.get(&category) {
            Some(members) => members,
            None => {
                debug!("category '{category}' has no registry entry");
                &[]
            }
        }
    }

    /// Whether the category has ever had a member registered
    pub fn has_category(&self, category: NodeKind) -> bool {
        self.categories.contains_key(&category)
    }

    /// Number of members currently registered under a category
    pub fn count(&self, category: NodeKind) -> usize {
        self.categories.get(&category).map_or(0, Vec::len)
    }

    /// Drop all categories and members
    pub fn clear(&mut self) {
        self.categories.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn keys(n: usize) -> Vec<NodeKey> {
        let mut arena: SlotMap<NodeKey, ()> = SlotMap::with_key();
        (0..n).map(|_| arena.insert(())).collect()
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = CategoryRegistry::new();
        let k = keys(1);

        assert!(registry.register(NodeKind::Rock, k[0]));
        assert!(!registry.register(NodeKind::Rock, k[0]));
        assert_eq!(registry.count(NodeKind::Rock), 1);
    }

    #[test]
    fn test_members_preserve_registration_order() {
        let mut registry = CategoryRegistry::new();
        let k = keys(3);

        registry.register(NodeKind::Collectible, k[2]);
        registry.register(NodeKind::Collectible, k[0]);
        registry.register(NodeKind::Collectible, k[1]);

        assert_eq!(registry.members(NodeKind::Collectible), &[k[2], k[0], k[1]]);
    }

    #[test]
    fn test_unregister_unknown_is_safe() {
        let mut registry = CategoryRegistry::new();
        let k = keys(1);

        registry.unregister(NodeKind::Player, k[0]);
        assert_eq!(registry.count(NodeKind::Player), 0);
    }

    #[test]
    fn test_unknown_category_yields_empty_slice() {
        let registry = CategoryRegistry::new();
        assert!(registry.members(NodeKind::Rock).is_empty());
        assert!(!registry.has_category(NodeKind::Rock));
    }

    #[test]
    fn test_registry_matches_register_unregister_history() {
        let mut registry = CategoryRegistry::new();
        let k = keys(4);

        for &key in &k {
            registry.register(NodeKind::Rock, key);
        }
        registry.unregister(NodeKind::Rock, k[1]);
        registry.unregister(NodeKind::Rock, k[3]);
        registry.register(NodeKind::Rock, k[1]);

        assert_eq!(registry.members(NodeKind::Rock), &[k[0], k[2], k[1]]);
    }
}
