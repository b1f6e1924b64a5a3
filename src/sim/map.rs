//! Layout loading and the layout pool
//!
//! A layout is 15 lines of 15 space-separated tokens:
//! `t` tree, `m` mountain, `y` player start, `b` basket,
//! `v`/`h` vertical/horizontal patrol start. Any other token is open ground.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use glam::IVec2;
use rand::Rng;

use super::actors::Axis;
use super::grid::{Grid, Terrain};
use crate::consts::{GRID_SIZE, LAYOUT_POOL_SIZE};

/// Why a layout could not be turned into a grid
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("layout has {found} rows, expected {expected}")]
    RowCount { expected: usize, found: usize },
    #[error("layout row {row} has {found} columns, expected {expected}")]
    ColumnCount {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("layout has no player start")]
    MissingPlayer,
    #[error("layout has a second player start at row {row}, column {col}")]
    DuplicatePlayer { row: usize, col: usize },
    #[error("layout has no baskets to collect")]
    NoBaskets,
    #[error("failed to read layout {path}: {message}")]
    Unreadable { path: PathBuf, message: String },
    #[error("no layouts available")]
    EmptyPool,
}

/// Where a patrol starts and which axis it sweeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatrolStart {
    pub pos: IVec2,
    pub axis: Axis,
}

/// A freshly parsed layout: the grid plus actor placements
#[derive(Debug, Clone)]
pub struct MapLayout {
    pub grid: Grid,
    pub player_start: IVec2,
    /// In reading order (row by row, left to right)
    pub patrols: Vec<PatrolStart>,
}

impl MapLayout {
    pub fn basket_count(&self) -> usize {
        self.grid.basket_count()
    }
}

/// Parse a layout. Dimensions are validated before any cell is read, so a
/// malformed source never yields a partial grid.
///
/// Beyond the 15x15 shape, a layout must also hold exactly one `y` and at
/// least one `b`; a well-shaped source without them is rejected with
/// `MissingPlayer`, `DuplicatePlayer` or `NoBaskets`. Parsing then
/// reproduces every cell only for layouts that pass those checks.
pub fn load(source: &str) -> Result<MapLayout, MapError> {
    let size = GRID_SIZE as usize;
    let rows: Vec<Vec<&str>> = source
        .lines()
        .map(|line| line.split_whitespace().collect())
        .collect();

    if rows.len() != size {
        return Err(MapError::RowCount {
            expected: size,
            found: rows.len(),
        });
    }
    if let Some((row, tokens)) = rows.iter().enumerate().find(|(_, t)| t.len() != size) {
        return Err(MapError::ColumnCount {
            row,
            expected: size,
            found: tokens.len(),
        });
    }

    let mut grid = Grid::new();
    let mut player_start = None;
    let mut patrols = Vec::new();

    for (row, tokens) in rows.iter().enumerate() {
        for (col, token) in tokens.iter().enumerate() {
            let pos = IVec2::new(col as i32, row as i32);
            match *token {
                "t" => grid.set_terrain(pos, Terrain::Tree),
                "m" => grid.set_terrain(pos, Terrain::Mountain),
                "b" => grid.place_basket(pos),
                "v" | "h" => {
                    let axis = if *token == "v" {
                        Axis::Vertical
                    } else {
                        Axis::Horizontal
                    };
                    grid.place_patrol(pos, axis);
                    patrols.push(PatrolStart { pos, axis });
                }
                "y" => {
                    if player_start.is_some() {
                        return Err(MapError::DuplicatePlayer { row, col });
                    }
                    player_start = Some(pos);
                }
                _ => {}
            }
        }
    }

    let player_start = player_start.ok_or(MapError::MissingPlayer)?;
    if grid.basket_count() == 0 {
        return Err(MapError::NoBaskets);
    }

    Ok(MapLayout {
        grid,
        player_start,
        patrols,
    })
}

/// Uniformly pick a layout index in `0..pool_size`.
///
/// `pool_size` must be non-zero; `LayoutPool` never hands out an empty size.
pub fn select_random_layout<R: Rng + ?Sized>(rng: &mut R, pool_size: usize) -> usize {
    rng.random_range(0..pool_size)
}

const BUILTIN_LAYOUTS: [&str; LAYOUT_POOL_SIZE] = [
    include_str!("../../maps/map1.txt"),
    include_str!("../../maps/map2.txt"),
    include_str!("../../maps/map3.txt"),
    include_str!("../../maps/map4.txt"),
    include_str!("../../maps/map5.txt"),
    include_str!("../../maps/map6.txt"),
    include_str!("../../maps/map7.txt"),
    include_str!("../../maps/map8.txt"),
    include_str!("../../maps/map9.txt"),
    include_str!("../../maps/map10.txt"),
];

/// One candidate layout
#[derive(Debug, Clone)]
pub enum LayoutSource {
    Text(Cow<'static, str>),
    File(PathBuf),
}

impl LayoutSource {
    fn read(&self) -> Result<Cow<'_, str>, MapError> {
        match self {
            LayoutSource::Text(text) => Ok(Cow::Borrowed(text.as_ref())),
            LayoutSource::File(path) => {
                fs::read_to_string(path)
                    .map(Cow::Owned)
                    .map_err(|e| MapError::Unreadable {
                        path: path.clone(),
                        message: e.to_string(),
                    })
            }
        }
    }
}

/// The fixed set of layouts a round is drawn from
#[derive(Debug, Clone)]
pub struct LayoutPool {
    sources: Vec<LayoutSource>,
}

impl LayoutPool {
    /// The ten layouts shipped with the game
    pub fn builtin() -> Self {
        Self {
            sources: BUILTIN_LAYOUTS
                .iter()
                .map(|text| LayoutSource::Text(Cow::Borrowed(*text)))
                .collect(),
        }
    }

    /// Layouts given as text
    pub fn from_texts(texts: Vec<String>) -> Result<Self, MapError> {
        Self::from_sources(
            texts
                .into_iter()
                .map(|t| LayoutSource::Text(Cow::Owned(t)))
                .collect(),
        )
    }

    /// `map1.txt` .. `map10.txt` from a directory; missing files are skipped
    pub fn from_dir(dir: &Path) -> Result<Self, MapError> {
        let sources = (1..=LAYOUT_POOL_SIZE)
            .map(|n| dir.join(format!("map{n}.txt")))
            .filter(|path| path.is_file())
            .map(LayoutSource::File)
            .collect();
        Self::from_sources(sources)
    }

    pub fn from_sources(sources: Vec<LayoutSource>) -> Result<Self, MapError> {
        if sources.is_empty() {
            return Err(MapError::EmptyPool);
        }
        Ok(Self { sources })
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Parse the layout at `index`
    pub fn load(&self, index: usize) -> Result<MapLayout, MapError> {
        let source = self.sources.get(index).ok_or(MapError::EmptyPool)?;
        load(&source.read()?)
    }

    /// Pick a layout at random. If the pick is malformed, fall back to the
    /// following layouts (wrapping) and report the first error only when
    /// none of them loads.
    pub fn load_random<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<(usize, MapLayout), MapError> {
        let first = select_random_layout(rng, self.len());
        let mut first_error = None;

        for offset in 0..self.len() {
            let index = (first + offset) % self.len();
            match self.load(index) {
                Ok(layout) => return Ok((index, layout)),
                Err(e) => {
                    log::warn!("Layout {} rejected: {}", index + 1, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        Err(first_error.unwrap_or(MapError::EmptyPool))
    }
}
