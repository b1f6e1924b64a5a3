//! Platform layer
//!
//! Everything between the game and the outside world:
//! - Session driver thread (wall clock, command channel)
//! - Terminal input parsing
//! - Text rendering of frames, status and the leaderboard

pub mod driver;
pub mod input;
pub mod text;

pub use driver::{DriverHandle, Input, spawn_driver};
pub use input::parse_line;
pub use text::{render_leaderboard, render_snapshot, render_update};
