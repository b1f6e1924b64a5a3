//! Actor motion rules
//!
//! Patrols sweep back and forth along one axis; the player moves one cell
//! at a time in four directions. Both read and write the shared grid.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::grid::{Grid, Tile};

/// Axis a patrol is locked to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Moves along its column (changes row)
    Vertical,
    /// Moves along its row (changes column)
    Horizontal,
}

impl Axis {
    /// Unit step in the positive direction
    pub fn unit(self) -> IVec2 {
        match self {
            Axis::Vertical => IVec2::Y,
            Axis::Horizontal => IVec2::X,
        }
    }

    pub fn tile(self) -> Tile {
        match self {
            Axis::Vertical => Tile::PatrolVertical,
            Axis::Horizontal => Tile::PatrolHorizontal,
        }
    }
}

/// Four-directional player movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::NEG_Y,
            Direction::Down => IVec2::Y,
            Direction::Left => IVec2::NEG_X,
            Direction::Right => IVec2::X,
        }
    }

    /// WASD key mapping
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'w' => Some(Direction::Up),
            's' => Some(Direction::Down),
            'a' => Some(Direction::Left),
            'd' => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Result of one patrol step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatrolStep {
    Advanced,
    Reversed,
}

/// An autonomous hazard sweeping one axis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patrol {
    /// Creation order; collision checks walk patrols by id
    pub id: u32,
    pos: IVec2,
    axis: Axis,
    /// +1 or -1 along `axis`
    direction: i32,
}

impl Patrol {
    /// New patrols head in the positive direction
    pub fn new(id: u32, pos: IVec2, axis: Axis) -> Self {
        Self {
            id,
            pos,
            axis,
            direction: 1,
        }
    }

    pub fn position(&self) -> IVec2 {
        self.pos
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn direction(&self) -> i32 {
        self.direction
    }

    /// Cell the patrol would enter on its next step
    pub fn candidate(&self) -> IVec2 {
        self.pos + self.axis.unit() * self.direction
    }

    /// Whether the candidate cell turns this patrol around
    pub fn is_blocked(&self, grid: &Grid, player: &Player) -> bool {
        let next = self.candidate();
        match grid.terrain(next) {
            None => true,
            Some(terrain) if terrain.is_obstacle() => true,
            Some(_) => player.gate_visible_at(next) || grid.patrol_at(next).is_some(),
        }
    }

    /// Advance one cell along the axis, or reverse and stay put.
    ///
    /// Baskets and the player do not block. A basket the patrol walks onto
    /// is gone for good, without touching score or remaining count; the
    /// player is left to the proximity check.
    pub fn step(&mut self, grid: &mut Grid, player: &Player) -> PatrolStep {
        if self.is_blocked(grid, player) {
            self.direction = -self.direction;
            return PatrolStep::Reversed;
        }
        let next = self.candidate();
        if grid.move_patrol(self.pos, next, self.axis) {
            log::debug!("Patrol {} overran the basket at {}", self.id, next);
        }
        self.pos = next;
        PatrolStep::Advanced
    }
}

/// Result of a player move request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Off-grid, obstacle or patrol; nothing changed
    Blocked,
    Moved,
    /// Moved onto a basket and picked it up
    Collected,
}

/// The player and their run statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    origin: IVec2,
    pos: IVec2,
    pub score: u32,
    pub health: u8,
    /// Baskets still on the grid this round
    pub remaining: u32,
}

impl Player {
    pub fn new(origin: IVec2, health: u8, remaining: u32) -> Self {
        Self {
            origin,
            pos: origin,
            score: 0,
            health,
            remaining,
        }
    }

    pub fn position(&self) -> IVec2 {
        self.pos
    }

    pub fn origin(&self) -> IVec2 {
        self.origin
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// The origin reads as a gate only while the player is away from it
    pub fn gate_visible_at(&self, pos: IVec2) -> bool {
        pos == self.origin && self.pos != self.origin
    }

    /// Step one cell. Invalid targets are ignored without error.
    pub fn try_move(&mut self, direction: Direction, grid: &mut Grid) -> MoveOutcome {
        let target = self.pos + direction.delta();
        let passable = matches!(grid.terrain(target), Some(t) if !t.is_obstacle());
        if !passable || grid.patrol_at(target).is_some() {
            return MoveOutcome::Blocked;
        }

        let collected = grid.take_basket(target);
        if collected {
            self.score += 1;
            self.remaining = self.remaining.saturating_sub(1);
        }
        self.pos = target;

        if collected {
            MoveOutcome::Collected
        } else {
            MoveOutcome::Moved
        }
    }

    /// Send the player back to the origin after a non-fatal hit
    pub fn reset_to_origin(&mut self) {
        self.pos = self.origin;
    }

    /// Lose one health point; returns what is left
    pub fn take_hit(&mut self) -> u8 {
        self.health = self.health.saturating_sub(1);
        self.health
    }
}
