//! Snapshot module - read-only views handed to rendering and persistence
//!
//! Engines publish plain data; nothing here knows how to draw. With the
//! `serde` feature the whole tree serializes, so a collaborator can ship
//! or store frames.

use crate::core::grid::Grid;
use crate::types::{GameKind, PlayerId, TileColor, TileKind};

/// One occupied board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellSnapshot {
    pub kind: TileKind,
    pub color: TileColor,
}

/// A player's settled board, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoardSnapshot {
    pub rows: u8,
    pub cols: u8,
    pub cells: Vec<Option<CellSnapshot>>,
}

impl From<&Grid> for BoardSnapshot {
    fn from(grid: &Grid) -> Self {
        let cells = grid
            .cells()
            .iter()
            .map(|cell| {
                cell.as_ref().map(|tile| CellSnapshot {
                    kind: tile.kind,
                    color: tile.color,
                })
            })
            .collect();
        Self {
            rows: grid.rows(),
            cols: grid.cols(),
            cells,
        }
    }
}

/// One cell of the active falling piece; `row` may be negative while a
/// piece still pokes above the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveCell {
    pub col: i16,
    pub row: i16,
    pub kind: TileKind,
    pub color: TileColor,
}

/// Everything a front end needs about one player
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerSnapshot {
    pub board: BoardSnapshot,
    pub active: Vec<ActiveCell>,
    pub score: u32,
    pub combo: u32,
    pub lines: u32,
    pub pending_attacks: usize,
    pub game_over: bool,
}

/// Full duel state for one frame
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DuelSnapshot {
    pub game: GameKind,
    pub players: [PlayerSnapshot; 2],
    pub paused: bool,
    pub round_over: bool,
    pub winner: Option<PlayerId>,
}
