//! Per-cadence session updates
//!
//! Each update stream has its own entry point. Callers serialize them: no
//! two of these ever run at the same time against one `GameState`.

use super::actors::{Direction, MoveOutcome};
use super::collision::{self, CollisionOutcome};
use super::state::{GameEvent, GameState};

/// The three independent update streams of a running session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TickKind {
    /// Step every patrol (~400 ms)
    Patrol,
    /// Player/patrol proximity check (~10 ms)
    Collision,
    /// Elapsed time, status readout and round-complete poll (~10 ms)
    Display,
}

/// Run one update of the given stream. Does nothing unless the round is active.
pub fn tick(state: &mut GameState, kind: TickKind, elapsed_ms: u64) {
    if !state.is_active() {
        return;
    }
    match kind {
        TickKind::Patrol => step_patrols(state),
        TickKind::Collision => {
            check_collision(state);
        }
        TickKind::Display => {
            state.elapsed_ms = elapsed_ms;
            state.check_round_complete();
        }
    }
}

/// Step each patrol once, in creation order
pub fn step_patrols(state: &mut GameState) {
    let GameState {
        grid,
        player,
        patrols,
        ..
    } = state;
    for patrol in patrols.iter_mut() {
        patrol.step(grid, player);
    }
}

/// Proximity check; a fatal hit ends the session exactly once
pub fn check_collision(state: &mut GameState) -> CollisionOutcome {
    if !state.is_active() {
        return CollisionOutcome::Clear;
    }
    let outcome = collision::resolve(&mut state.player, &state.patrols);
    match outcome {
        CollisionOutcome::Clear => {}
        CollisionOutcome::Hit {
            patrol_id,
            health_left,
        } => {
            log::debug!("Patrol {patrol_id} caught the player, {health_left} health left");
            state.push_event(GameEvent::PlayerHit {
                patrol_id,
                health_left,
            });
        }
        CollisionOutcome::Fatal { patrol_id } => {
            state.push_event(GameEvent::PlayerHit {
                patrol_id,
                health_left: 0,
            });
            state.enter_game_over();
        }
    }
    outcome
}

/// Apply a move command from the input collaborator
pub fn apply_move(state: &mut GameState, direction: Direction) -> MoveOutcome {
    if !state.is_active() {
        return MoveOutcome::Blocked;
    }
    let outcome = state.player.try_move(direction, &mut state.grid);
    if outcome == MoveOutcome::Collected {
        state.push_event(GameEvent::BasketCollected {
            pos: state.player.position(),
            score: state.player.score,
        });
        state.check_round_complete();
    }
    outcome
}
