//! Game configuration

/// Tunables for one run
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Gameplay settings
    pub gameplay: GameplayConfig,
    /// Level layout settings
    pub level: LevelConfig,
}

/// Gameplay configuration
#[derive(Debug, Clone)]
pub struct GameplayConfig {
    /// Starting lives
    pub starting_lives: u32,

    /// Player run speed toward the goal (units/second)
    pub player_speed: f32,

    /// Fixed physics timestep (seconds)
    pub timestep: f32,

    /// Safety cap on simulated ticks per run
    pub max_ticks: u32,
}

/// Level layout configuration
#[derive(Debug, Clone)]
pub struct LevelConfig {
    /// Number of collectibles laid out along the course
    pub collectible_count: u32,

    /// Number of rocks scattered over the course
    pub rock_count: u32,

    /// Distance from spawn to the goal zone along +x
    pub course_length: f32,

    /// Height below which anything falling is considered lost
    pub kill_depth: f32,

    /// Seed for rock placement
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            gameplay: GameplayConfig::default(),
            level: LevelConfig::default(),
        }
    }
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            starting_lives: 3,
            player_speed: 6.0,
            timestep: 1.0 / 60.0,
            max_ticks: 60 * 120,
        }
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            collectible_count: 8,
            rock_count: 5,
            course_length: 60.0,
            kill_depth: -10.0,
            seed: 0x6a0_17,
        }
    }
}
