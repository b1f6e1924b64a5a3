//! Deterministic simulation module
//!
//! All gameplay rules live here. This module must stay free of I/O:
//! - Time comes in as milliseconds from the caller
//! - Seeded RNG only (layout selection)
//! - Stable iteration order (patrols by creation id)
//! - No rendering, threading or storage dependencies

pub mod actors;
pub mod clock;
pub mod collision;
pub mod grid;
pub mod map;
pub mod state;
pub mod tick;

#[cfg(test)]
pub(crate) mod test_support;

pub use actors::{Axis, Direction, MoveOutcome, Patrol, PatrolStep, Player};
pub use clock::{Schedule, Timing};
pub use collision::{CONTACT_RANGE, CollisionOutcome, first_contact};
pub use grid::{Grid, Terrain, Tile};
pub use map::{LayoutPool, MapError, MapLayout, load, select_random_layout};
pub use state::{Carry, GameEvent, GamePhase, GameState, Snapshot};
pub use tick::{TickKind, apply_move, tick};
