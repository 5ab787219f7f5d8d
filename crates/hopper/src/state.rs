//! Mutable run state shared between the tick loop and trigger callbacks

use std::cell::RefCell;
use std::rc::Rc;

/// Where the run currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The run is in progress
    Playing,
    /// The player reached the goal zone
    Won,
    /// The player ran out of lives
    GameOver,
}

/// Score, lives, and phase for one run
#[derive(Debug)]
pub struct GameState {
    /// Collectibles picked up so far
    pub score: u32,
    /// Remaining lives
    pub lives: u32,
    /// Current phase
    pub phase: Phase,
}

impl GameState {
    /// A fresh run with the given number of lives
    pub fn new(lives: u32) -> Self {
        Self {
            score: 0,
            lives,
            phase: Phase::Playing,
        }
    }

    /// Shared handle usable from trigger callbacks
    pub fn shared(lives: u32) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new(lives)))
    }

    /// Award one pickup
    pub fn collect(&mut self) {
        self.score += 1;
        log::info!("collected! score: {}", self.score);
    }

    /// Lose one life; at zero the run ends
    pub fn lose_life(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        self.lives = self.lives.saturating_sub(1);
        log::info!("fell! lives left: {}", self.lives);
        if self.lives == 0 {
            self.phase = Phase::GameOver;
        }
    }

    /// Mark the run won
    pub fn win(&mut self) {
        if self.phase == Phase::Playing {
            self.phase = Phase::Won;
        }
    }

    /// Whether the tick loop should keep running
    pub fn running(&self) -> bool {
        self.phase == Phase::Playing
    }
}
