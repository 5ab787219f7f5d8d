//! Prototype cloning: specialization of cloned nodes
//!
//! A generic spawner replicates templates through
//! [`World::clone_node`](super::World::clone_node) without knowing the
//! concrete subtype. The base clone copies transform, mesh handle, and
//! physics construction parameters; everything subtype-specific (a heavier
//! proxy, extra state, a non-kinematic body) is added by the template's
//! [`Prototype`] — a manually-dispatched virtual constructor.
//!
//! The prototype is held behind an `Arc` that the base clone installs into
//! every copy before specialization runs. Clones of clones therefore carry
//! the same specialization by construction; it is not a value a hook has to
//! remember to re-install into each generation.

use super::{NodeKey, SceneError, World};

/// Subtype specialization invoked after the base clone of a template
pub trait Prototype: Send + Sync {
    /// Specialize `copy`, a fresh base clone of `template`
    ///
    /// Runs after the copy has its transform, mesh, physics proxy, category
    /// registration, and prototype installed. May reposition the copy; the
    /// world snapshots `start_position` from the post-specialization
    /// position. Errors abort the clone and tear the copy down.
    fn specialize(
        &self,
        world: &mut World,
        template: NodeKey,
        copy: NodeKey,
    ) -> Result<(), SceneError>;
}
