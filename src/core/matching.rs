//! Matching strategies - scan a grid and report matched groups
//!
//! The two games share one strategy surface: Tetris asks for full rows,
//! gem crash asks for connected same-color components. The strategy is
//! picked once at engine construction.
//!
//! Flood fill is iterative (explicit stack + visited set), so board size
//! never threatens the call stack.

use crate::core::grid::Grid;
use crate::core::tile::Tile;
use crate::types::{GameKind, TileColor, TileKind, MATCH_MIN};

/// One matched group of cells, (col, row) pairs.
///
/// Line groups span exactly one full row and carry no color; flood groups
/// carry the component color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchGroup {
    pub cells: Vec<(u8, u8)>,
    pub color: Option<TileColor>,
}

impl MatchGroup {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Pluggable matching algorithm, selected per game at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Full-row scan (Tetris)
    LineFill,
    /// 4-directional connected-color components of size >= 3 (gem crash)
    ColorFlood,
}

impl MatchStrategy {
    pub fn for_game(kind: GameKind) -> Self {
        match kind {
            GameKind::Tetris => MatchStrategy::LineFill,
            GameKind::GemCrash => MatchStrategy::ColorFlood,
        }
    }

    /// Scan the whole grid and return every matched group
    pub fn find_matches(&self, grid: &Grid) -> Vec<MatchGroup> {
        match self {
            MatchStrategy::LineFill => full_rows(grid),
            MatchStrategy::ColorFlood => color_groups(grid),
        }
    }
}

/// One group per full row, cells ordered by column, rows top-to-bottom
fn full_rows(grid: &Grid) -> Vec<MatchGroup> {
    let mut groups = Vec::new();
    for row in 0..grid.rows() {
        if grid.is_row_full(row) {
            let cells = (0..grid.cols()).map(|col| (col, row)).collect();
            groups.push(MatchGroup { cells, color: None });
        }
    }
    groups
}

/// Row-major scan from the top left; every unvisited gem seeds a flood.
/// Visited marking guarantees no cell lands in two groups.
fn color_groups(grid: &Grid) -> Vec<MatchGroup> {
    let mut visited = vec![false; grid.rows() as usize * grid.cols() as usize];
    let mut groups = Vec::new();

    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            if visited[flat(grid, row, col)] {
                continue;
            }
            let Some(tile) = grid.get(row as i16, col as i16) else {
                continue;
            };
            if !seeds_flood(tile) {
                continue;
            }
            let group = flood(grid, row, col, tile.color, &mut visited);
            if group.len() >= MATCH_MIN {
                groups.push(group);
            }
        }
    }

    groups
}

/// The connected component containing (row, col), if that cell can seed one.
///
/// No size filter is applied; callers decide whether the component is a
/// match. Used by the gem engine to check the cells a locked pair settled
/// into.
pub fn color_component(grid: &Grid, row: u8, col: u8) -> Option<MatchGroup> {
    let tile = grid.get(row as i16, col as i16)?;
    if !seeds_flood(tile) {
        return None;
    }
    let mut visited = vec![false; grid.rows() as usize * grid.cols() as usize];
    Some(flood(grid, row, col, tile.color, &mut visited))
}

/// Only plain gems seed a flood; power gems and blocks are absorbed (or
/// not) purely by color during expansion.
fn seeds_flood(tile: &Tile) -> bool {
    tile.kind == TileKind::Gem
}

#[inline]
fn flat(grid: &Grid, row: u8, col: u8) -> usize {
    row as usize * grid.cols() as usize + col as usize
}

/// Iterative 4-directional flood restricted to `color`
fn flood(grid: &Grid, row: u8, col: u8, color: TileColor, visited: &mut [bool]) -> MatchGroup {
    let mut cells = Vec::new();
    let mut stack = vec![(col, row)];
    visited[flat(grid, row, col)] = true;

    while let Some((c, r)) = stack.pop() {
        cells.push((c, r));
        for (dc, dr) in [(0i16, 1i16), (1, 0), (0, -1), (-1, 0)] {
            let nc = c as i16 + dc;
            let nr = r as i16 + dr;
            let Some(tile) = grid.get(nr, nc) else {
                continue;
            };
            if tile.color != color {
                continue;
            }
            let idx = flat(grid, nr as u8, nc as u8);
            if visited[idx] {
                continue;
            }
            visited[idx] = true;
            stack.push((nc as u8, nr as u8));
        }
    }

    MatchGroup {
        cells,
        color: Some(color),
    }
}
