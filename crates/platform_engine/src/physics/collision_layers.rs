//! Collision layer system for filtering collision detection
//!
//! Proxies carry a layer (what they are) and a mask (what they collide
//! with); two proxies only generate contacts when each one's layer is in the
//! other's mask.

/// Collision layer definitions for efficient filtering
pub struct CollisionLayers;

impl CollisionLayers {
    /// No collision layer
    pub const NONE: u32 = 0;

    /// All collision layers
    pub const ALL: u32 = 0xFFFF_FFFF;

    /// Player character layer
    pub const PLAYER: u32 = 1 << 0;

    /// Static environment geometry (platforms, ground)
    pub const ENVIRONMENT: u32 = 1 << 1;

    /// Trigger volumes (overlap queries only, no physical response)
    pub const TRIGGER: u32 = 1 << 2;

    /// Debris and small physics objects (rocks)
    pub const DEBRIS: u32 = 1 << 3;

    /// Pickups and collectibles
    pub const PICKUP: u32 = 1 << 4;

    /// Check if two proxies should collide based on their layers and masks
    ///
    /// A's layer must be in B's mask and B's layer must be in A's mask.
    pub fn should_collide(layer_a: u32, mask_a: u32, layer_b: u32, mask_b: u32) -> bool {
        (layer_a & mask_b) != 0 && (layer_b & mask_a) != 0
    }

    /// Helper to create a mask from multiple layers
    pub fn mask(layers: &[u32]) -> u32 {
        layers.iter().fold(0, |acc, &layer| acc | layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_collide_mutual() {
        let player_layer = CollisionLayers::PLAYER;
        let player_mask = CollisionLayers::ENVIRONMENT;

        let ground_layer = CollisionLayers::ENVIRONMENT;
        let ground_mask = CollisionLayers::PLAYER;

        assert!(CollisionLayers::should_collide(
            player_layer,
            player_mask,
            ground_layer,
            ground_mask
        ));
    }

    #[test]
    fn test_should_not_collide_one_way() {
        // Player wants to hit debris, but debris only collides with environment
        let player_layer = CollisionLayers::PLAYER;
        let player_mask = CollisionLayers::DEBRIS;

        let debris_layer = CollisionLayers::DEBRIS;
        let debris_mask = CollisionLayers::ENVIRONMENT;

        assert!(!CollisionLayers::should_collide(
            player_layer,
            player_mask,
            debris_layer,
            debris_mask
        ));
    }

    #[test]
    fn test_mask_creation() {
        let mask = CollisionLayers::mask(&[
            CollisionLayers::PLAYER,
            CollisionLayers::DEBRIS,
            CollisionLayers::ENVIRONMENT,
        ]);

        assert_eq!(
            mask,
            CollisionLayers::PLAYER | CollisionLayers::DEBRIS | CollisionLayers::ENVIRONMENT
        );
    }
}
