//! Player/patrol contact detection
//!
//! Contact is proximity, not tile overlap: a patrol anywhere in the player's
//! 3x3 neighbourhood (diagonals and the same cell included) counts as a hit.

use glam::IVec2;

use super::actors::{Patrol, Player};
use crate::chebyshev;

/// Largest Chebyshev distance that still counts as contact
pub const CONTACT_RANGE: i32 = 1;

/// Result of one collision check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOutcome {
    Clear,
    /// Lost a health point and was sent back to the origin
    Hit { patrol_id: u32, health_left: u8 },
    /// Lost the last health point
    Fatal { patrol_id: u32 },
}

/// Index of the first patrol, in creation order, within reach of `player`
pub fn first_contact(player: IVec2, patrols: &[Patrol]) -> Option<usize> {
    patrols
        .iter()
        .position(|p| chebyshev(p.position(), player) <= CONTACT_RANGE)
}

/// Apply at most one hit. Only the first patrol in reach counts, so standing
/// next to two patrols still costs a single health point per check.
pub fn resolve(player: &mut Player, patrols: &[Patrol]) -> CollisionOutcome {
    let Some(index) = first_contact(player.position(), patrols) else {
        return CollisionOutcome::Clear;
    };
    let patrol_id = patrols[index].id;

    let health_left = player.take_hit();
    if health_left > 0 {
        player.reset_to_origin();
        CollisionOutcome::Hit {
            patrol_id,
            health_left,
        }
    } else {
        CollisionOutcome::Fatal { patrol_id }
    }
}
