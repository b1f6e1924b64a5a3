//! Basket Run - a tile-based arcade game
//!
//! Core modules:
//! - `sim`: Grid, actor motion, collision and the session state machine
//! - `game`: Session lifecycle (new game, round carry-over, score submission)
//! - `platform`: Session driver thread, terminal input, text rendering
//! - `highscores`: Bounded top-N leaderboard
//! - `persistence`: JSON file backing for the leaderboard
//! - `settings`: Timing and storage configuration

pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use game::{Command, Game, Update};
pub use highscores::{HighScores, LeaderboardStore};
pub use settings::{Difficulty, Settings};

use glam::IVec2;

/// Game configuration constants
pub mod consts {
    /// Playfield side length in cells
    pub const GRID_SIZE: i32 = 15;

    /// Health at the start of a fresh game
    pub const STARTING_HEALTH: u8 = 3;

    /// Cadence defaults (milliseconds)
    pub const PATROL_PERIOD_MS: u64 = 400;
    pub const COLLISION_PERIOD_MS: u64 = 10;
    pub const DISPLAY_PERIOD_MS: u64 = 10;

    /// Number of entries kept on the leaderboard
    pub const LEADERBOARD_CAPACITY: usize = 10;

    /// Number of candidate layouts a round is drawn from
    pub const LAYOUT_POOL_SIZE: usize = 10;
}

/// Chebyshev (king-move) distance between two cells
#[inline]
pub fn chebyshev(a: IVec2, b: IVec2) -> i32 {
    let d = (a - b).abs();
    d.x.max(d.y)
}

/// Whether a cell lies on the playfield
#[inline]
pub fn in_bounds(pos: IVec2) -> bool {
    use consts::GRID_SIZE;
    pos.x >= 0 && pos.y >= 0 && pos.x < GRID_SIZE && pos.y < GRID_SIZE
}
