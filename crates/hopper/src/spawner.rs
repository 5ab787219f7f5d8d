//! Wave spawning: mass-produces clones of a template node
//!
//! The spawner never learns a template's subtype; it only asks the world to
//! clone, and the template's prototype fills in the rest.

use platform_engine::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Where a wave of clones goes
#[derive(Debug, Clone)]
pub enum Placement {
    /// Row-major grid in the XZ plane starting at `origin`
    Grid {
        /// Position of the first cell
        origin: Vec3,
        /// Cells per row before wrapping to the next z row
        columns: u32,
        /// Distance between adjacent cells
        spacing: f32,
    },
    /// Uniformly scattered inside an axis-aligned box
    Random {
        /// Center of the scatter volume
        center: Vec3,
        /// Half-extents of the scatter volume
        half_extents: Vec3,
        /// Placement seed
        seed: u64,
    },
}

impl Placement {
    fn positions(&self, count: u32) -> Vec<Vec3> {
        match *self {
            Placement::Grid {
                origin,
                columns,
                spacing,
            } => {
                let columns = columns.max(1);
                (0..count)
                    .map(|i| {
                        let column = i % columns;
                        let row = i / columns;
                        origin
                            + Vec3::new(
                                spacing * column as f32,
                                0.0,
                                spacing * row as f32,
                            )
                    })
                    .collect()
            }
            Placement::Random {
                center,
                half_extents,
                seed,
            } => {
                let mut rng = StdRng::seed_from_u64(seed);
                (0..count)
                    .map(|_| {
                        center
                            + Vec3::new(
                                rng.gen_range(-half_extents.x..=half_extents.x),
                                rng.gen_range(-half_extents.y..=half_extents.y),
                                rng.gen_range(-half_extents.z..=half_extents.z),
                            )
                    })
                    .collect()
            }
        }
    }
}

/// Clone `template` `count` times at the placement's positions
///
/// Stops at the first failed clone and propagates the error; clones made
/// before the failure stay in the world.
pub fn spawn_wave(
    world: &mut World,
    template: NodeKey,
    placement: &Placement,
    count: u32,
) -> Result<Vec<NodeKey>, SceneError> {
    let mut spawned = Vec::with_capacity(count as usize);
    for position in placement.positions(count) {
        spawned.push(world.clone_node(template, position)?);
    }
    log::debug!("spawned wave of {} clones", spawned.len());
    Ok(spawned)
}
