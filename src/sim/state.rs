//! Session state and core simulation types
//!
//! A `GameState` is one round: the grid, the player, the patrols and the
//! elapsed-time counter. It is replaced wholesale on a new round or game.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::actors::{Patrol, Player};
use super::grid::{CELL_COUNT, Grid, Tile};
use super::map::MapLayout;
use crate::consts::GRID_SIZE;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Round in progress
    Active,
    /// Every basket collected; a carry-over round follows
    RoundComplete,
    /// Health exhausted
    GameOver,
}

/// Things that happened during a tick or move, drained by the owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    BasketCollected { pos: IVec2, score: u32 },
    PlayerHit { patrol_id: u32, health_left: u8 },
    RoundComplete { score: u32 },
    GameOver { score: u32 },
}

/// Score and health taken from a completed round into the next one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carry {
    pub score: u32,
    pub health: u8,
}

/// One round of play
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed of the run this round belongs to
    pub seed: u64,
    /// Which pool layout the grid came from
    pub layout_index: usize,
    /// 1-based round number within the current game
    pub round: u32,
    pub phase: GamePhase,
    pub grid: Grid,
    pub player: Player,
    /// Sorted by id (creation order)
    pub patrols: Vec<Patrol>,
    /// Milliseconds since the round started, as of the last display tick
    pub elapsed_ms: u64,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Build a round from a freshly loaded layout
    pub fn from_layout(
        layout: MapLayout,
        seed: u64,
        layout_index: usize,
        round: u32,
        starting_health: u8,
        carry: Option<Carry>,
    ) -> Self {
        let remaining = layout.basket_count() as u32;
        let mut player = Player::new(layout.player_start, starting_health, remaining);
        if let Some(carry) = carry {
            player.score = carry.score;
            player.health = carry.health;
        }

        let patrols = layout
            .patrols
            .iter()
            .enumerate()
            .map(|(i, start)| Patrol::new(i as u32 + 1, start.pos, start.axis))
            .collect();

        Self {
            seed,
            layout_index,
            round,
            phase: GamePhase::Active,
            grid: layout.grid,
            player,
            patrols,
            elapsed_ms: 0,
            events: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == GamePhase::Active
    }

    /// Composed tile at `pos`
    pub fn tile(&self, pos: IVec2) -> Tile {
        self.grid
            .tile(pos, self.player.position(), self.player.origin())
    }

    pub fn carry(&self) -> Carry {
        Carry {
            score: self.player.score,
            health: self.player.health,
        }
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Active -> RoundComplete once no baskets remain
    pub(crate) fn check_round_complete(&mut self) -> bool {
        if self.phase == GamePhase::Active && self.player.remaining == 0 {
            self.phase = GamePhase::RoundComplete;
            self.push_event(GameEvent::RoundComplete {
                score: self.player.score,
            });
            return true;
        }
        false
    }

    /// Active -> GameOver; only the first call has any effect
    pub(crate) fn enter_game_over(&mut self) {
        if self.phase == GamePhase::Active {
            self.phase = GamePhase::GameOver;
            self.push_event(GameEvent::GameOver {
                score: self.player.score,
            });
        }
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_ms / 1000
    }

    /// Status readout shown above the playfield
    pub fn status_line(&self) -> String {
        match self.phase {
            GamePhase::GameOver => format!(
                "Score: {}    Game Over!    Health: {}",
                self.player.score, self.player.health
            ),
            _ => format!(
                "Score: {}    Time: {} seconds    Health: {}",
                self.player.score,
                self.elapsed_secs(),
                self.player.health
            ),
        }
    }

    /// Read-only copy for the rendering collaborator
    pub fn snapshot(&self) -> Snapshot {
        let mut tiles = Vec::with_capacity(CELL_COUNT);
        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                tiles.push(self.tile(IVec2::new(x, y)));
            }
        }
        Snapshot {
            tiles,
            score: self.player.score,
            health: self.player.health,
            remaining: self.player.remaining,
            elapsed_secs: self.elapsed_secs(),
            round: self.round,
            phase: self.phase,
        }
    }
}

/// Frozen view of a round, safe to hand to another thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Row-major, `GRID_SIZE * GRID_SIZE` entries
    pub tiles: Vec<Tile>,
    pub score: u32,
    pub health: u8,
    pub remaining: u32,
    pub elapsed_secs: u64,
    pub round: u32,
    pub phase: GamePhase,
}

impl Snapshot {
    pub fn tile(&self, pos: IVec2) -> Option<Tile> {
        crate::in_bounds(pos)
            .then(|| self.tiles[(pos.y * GRID_SIZE + pos.x) as usize])
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|t| **t == tile).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::test_support::layout_from_rows;

    #[test]
    fn test_from_layout_counts() {
        let layout = layout_from_rows(&["y..b", "....", "..v.b", "h.b"]);
        let state = GameState::from_layout(layout, 42, 0, 1, 3, None);

        assert_eq!(state.phase, GamePhase::Active);
        assert_eq!(state.player.remaining, 3);
        assert_eq!(state.player.health, 3);
        assert_eq!(state.player.score, 0);
        assert_eq!(state.patrols.len(), 2);
        assert_eq!(state.patrols[0].id, 1);
        assert_eq!(state.patrols[1].id, 2);

        let snap = state.snapshot();
        assert_eq!(snap.count(Tile::Player), 1);
        assert_eq!(snap.count(Tile::Basket), 3);
        assert_eq!(
            snap.count(Tile::PatrolVertical) + snap.count(Tile::PatrolHorizontal),
            2
        );
        assert_eq!(snap.tile(IVec2::new(0, 0)), Some(Tile::Player));
        assert_eq!(snap.tile(IVec2::new(15, 0)), None);
    }

    #[test]
    fn test_carry_over_keeps_score_and_health() {
        let layout = layout_from_rows(&["y.b"]);
        let carry = Carry {
            score: 12,
            health: 1,
        };
        let state = GameState::from_layout(layout, 1, 3, 2, 3, Some(carry));
        assert_eq!(state.player.score, 12);
        assert_eq!(state.player.health, 1);
        assert_eq!(state.player.remaining, 1);
        assert_eq!(state.elapsed_ms, 0);
        assert_eq!(state.round, 2);
    }

    #[test]
    fn test_game_over_fires_once() {
        let layout = layout_from_rows(&["y.b"]);
        let mut state = GameState::from_layout(layout, 1, 0, 1, 3, None);
        state.enter_game_over();
        state.enter_game_over();
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.drain_events(), vec![GameEvent::GameOver { score: 0 }]);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_status_line() {
        let layout = layout_from_rows(&["y.b"]);
        let mut state = GameState::from_layout(layout, 1, 0, 1, 3, None);
        state.elapsed_ms = 5_999;
        assert_eq!(state.status_line(), "Score: 0    Time: 5 seconds    Health: 3");
        state.player.health = 0;
        state.enter_game_over();
        assert_eq!(state.status_line(), "Score: 0    Game Over!    Health: 0");
    }
}
