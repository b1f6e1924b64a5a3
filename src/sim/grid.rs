//! Playfield cell state
//!
//! The grid keeps two layers. Terrain is fixed once a layout is loaded;
//! the occupancy layer (baskets and patrol markers) changes as the round
//! plays out. The player's marker is composed in from `Player` at query
//! time, which is also how the gate shows up on a vacated origin.
//!
//! Positions are `IVec2` with `x` as the column and `y` as the row.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::actors::Axis;
use crate::consts::GRID_SIZE;
use crate::in_bounds;

/// Number of cells on the playfield
pub const CELL_COUNT: usize = (GRID_SIZE * GRID_SIZE) as usize;

/// Immutable ground type of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Terrain {
    #[default]
    Open,
    Tree,
    Mountain,
}

impl Terrain {
    /// Trees and mountains are impassable for everyone
    pub fn is_obstacle(self) -> bool {
        !matches!(self, Terrain::Open)
    }
}

/// Composed view of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    Empty,
    Tree,
    Mountain,
    Player,
    Basket,
    PatrolVertical,
    PatrolHorizontal,
    Gate,
}

impl Tile {
    pub fn is_patrol(self) -> bool {
        matches!(self, Tile::PatrolVertical | Tile::PatrolHorizontal)
    }

    /// Single-character form, matching the layout file tokens
    pub fn glyph(self) -> char {
        match self {
            Tile::Empty => '.',
            Tile::Tree => 't',
            Tile::Mountain => 'm',
            Tile::Player => 'y',
            Tile::Basket => 'b',
            Tile::PatrolVertical => 'v',
            Tile::PatrolHorizontal => 'h',
            Tile::Gate => 'g',
        }
    }
}

/// The playfield
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    terrain: Vec<Terrain>,
    baskets: Vec<bool>,
    patrols: Vec<Option<Axis>>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// An all-open grid with nothing on it
    pub fn new() -> Self {
        Self {
            terrain: vec![Terrain::Open; CELL_COUNT],
            baskets: vec![false; CELL_COUNT],
            patrols: vec![None; CELL_COUNT],
        }
    }

    #[inline]
    fn index(pos: IVec2) -> Option<usize> {
        in_bounds(pos).then(|| (pos.y * GRID_SIZE + pos.x) as usize)
    }

    /// Terrain at `pos`, or `None` off the grid
    pub fn terrain(&self, pos: IVec2) -> Option<Terrain> {
        Self::index(pos).map(|i| self.terrain[i])
    }

    pub fn is_obstacle(&self, pos: IVec2) -> bool {
        self.terrain(pos).is_some_and(Terrain::is_obstacle)
    }

    /// Axis of the patrol standing on `pos`, if any
    pub fn patrol_at(&self, pos: IVec2) -> Option<Axis> {
        Self::index(pos).and_then(|i| self.patrols[i])
    }

    pub fn basket_count(&self) -> usize {
        self.baskets.iter().filter(|b| **b).count()
    }

    pub fn patrol_count(&self) -> usize {
        self.patrols.iter().filter(|p| p.is_some()).count()
    }

    /// Only the layout loader shapes terrain
    pub(crate) fn set_terrain(&mut self, pos: IVec2, terrain: Terrain) {
        if let Some(i) = Self::index(pos) {
            self.terrain[i] = terrain;
        }
    }

    pub(crate) fn place_basket(&mut self, pos: IVec2) {
        if let Some(i) = Self::index(pos) {
            self.baskets[i] = true;
        }
    }

    /// Remove the basket at `pos`; returns whether there was one
    pub(crate) fn take_basket(&mut self, pos: IVec2) -> bool {
        match Self::index(pos) {
            Some(i) => std::mem::replace(&mut self.baskets[i], false),
            None => false,
        }
    }

    pub(crate) fn place_patrol(&mut self, pos: IVec2, axis: Axis) {
        if let Some(i) = Self::index(pos) {
            self.patrols[i] = Some(axis);
        }
    }

    /// Vacate `from` and occupy `to` as a single update. A basket on `to`
    /// is overwritten; returns whether one was.
    pub(crate) fn move_patrol(&mut self, from: IVec2, to: IVec2, axis: Axis) -> bool {
        match (Self::index(from), Self::index(to)) {
            (Some(a), Some(b)) => {
                self.patrols[a] = None;
                self.patrols[b] = Some(axis);
                std::mem::replace(&mut self.baskets[b], false)
            }
            _ => false,
        }
    }

    /// Compose the visible tile at `pos`.
    ///
    /// Precedence: patrol, player, basket, obstacle, gate (the origin while
    /// the player is elsewhere), empty. Off-grid positions read as empty.
    pub fn tile(&self, pos: IVec2, player: IVec2, origin: IVec2) -> Tile {
        let Some(i) = Self::index(pos) else {
            return Tile::Empty;
        };
        if let Some(axis) = self.patrols[i] {
            return axis.tile();
        }
        if pos == player {
            return Tile::Player;
        }
        if self.baskets[i] {
            return Tile::Basket;
        }
        match self.terrain[i] {
            Terrain::Tree => Tile::Tree,
            Terrain::Mountain => Tile::Mountain,
            Terrain::Open if pos == origin => Tile::Gate,
            Terrain::Open => Tile::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_open() {
        let grid = Grid::new();
        assert_eq!(grid.terrain(IVec2::new(7, 7)), Some(Terrain::Open));
        assert_eq!(grid.basket_count(), 0);
        assert_eq!(grid.patrol_count(), 0);
        assert_eq!(grid.terrain(IVec2::new(-1, 0)), None);
    }

    #[test]
    fn test_tile_precedence() {
        let mut grid = Grid::new();
        let origin = IVec2::new(0, 0);
        let cell = IVec2::new(2, 2);
        grid.place_basket(cell);
        assert_eq!(grid.tile(cell, origin, origin), Tile::Basket);

        // Player standing on the basket cell hides it
        assert_eq!(grid.tile(cell, cell, origin), Tile::Player);

        // Patrol hides both
        grid.place_patrol(cell, Axis::Horizontal);
        assert_eq!(grid.tile(cell, cell, origin), Tile::PatrolHorizontal);

        grid.set_terrain(IVec2::new(5, 5), Terrain::Mountain);
        assert_eq!(grid.tile(IVec2::new(5, 5), origin, origin), Tile::Mountain);
    }

    #[test]
    fn test_origin_reads_as_gate_once_vacated() {
        let grid = Grid::new();
        let origin = IVec2::new(4, 0);
        assert_eq!(grid.tile(origin, origin, origin), Tile::Player);
        assert_eq!(grid.tile(origin, IVec2::new(5, 0), origin), Tile::Gate);
    }

    #[test]
    fn test_move_patrol_vacates_and_occupies() {
        let mut grid = Grid::new();
        let from = IVec2::new(3, 3);
        let to = IVec2::new(3, 4);
        grid.place_patrol(from, Axis::Vertical);
        assert!(!grid.move_patrol(from, to, Axis::Vertical));
        assert_eq!(grid.patrol_at(from), None);
        assert_eq!(grid.patrol_at(to), Some(Axis::Vertical));
        assert_eq!(grid.patrol_count(), 1);
    }

    #[test]
    fn test_move_patrol_overwrites_basket() {
        let mut grid = Grid::new();
        let from = IVec2::new(3, 3);
        let to = IVec2::new(4, 3);
        grid.place_basket(to);
        grid.place_patrol(from, Axis::Horizontal);

        assert!(grid.move_patrol(from, to, Axis::Horizontal));
        assert_eq!(grid.basket_count(), 0);
        grid.move_patrol(to, from, Axis::Horizontal);
        assert_eq!(grid.tile(to, IVec2::ZERO, IVec2::ZERO), Tile::Empty);
    }

    #[test]
    fn test_take_basket_only_once() {
        let mut grid = Grid::new();
        let cell = IVec2::new(1, 0);
        grid.place_basket(cell);
        assert!(grid.take_basket(cell));
        assert!(!grid.take_basket(cell));
        assert!(!grid.take_basket(IVec2::new(99, 0)));
    }
}
