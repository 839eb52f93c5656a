//! Grid module - bounds-checked cell store shared by both games
//!
//! Storage is a flat row-major Vec for cache locality; dimensions are fixed
//! at construction. Public coordinates are (row, col) and signed so callers
//! can probe positions above the board without pre-checking. Out-of-bounds
//! reads return None and out-of-bounds writes are no-ops; nothing panics.

use std::fmt;

use crate::core::tile::Tile;

/// Construction-time failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    InvalidDimensions { rows: u8, cols: u8 },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::InvalidDimensions { rows, cols } => {
                write!(f, "grid dimensions must be positive, got {}x{}", rows, cols)
            }
        }
    }
}

impl std::error::Error for GridError {}

/// A rows x cols board of optional tiles
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: u8,
    cols: u8,
    /// Flat cells, row-major (row * cols + col)
    cells: Vec<Option<Tile>>,
}

impl Grid {
    /// Create an empty grid. Fails if either dimension is zero.
    pub fn new(rows: u8, cols: u8) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::InvalidDimensions { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            cells: vec![None; rows as usize * cols as usize],
        })
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// Flat index for (row, col), None when out of bounds
    #[inline]
    fn index(&self, row: i16, col: i16) -> Option<usize> {
        if row < 0 || row >= self.rows as i16 || col < 0 || col >= self.cols as i16 {
            return None;
        }
        Some(row as usize * self.cols as usize + col as usize)
    }

    /// Tile at (row, col); None for out-of-bounds or empty cells
    pub fn get(&self, row: i16, col: i16) -> Option<&Tile> {
        self.index(row, col)
            .and_then(|idx| self.cells[idx].as_ref())
    }

    /// Store a tile at (row, col), stamping its position.
    /// Overwrites any occupant; returns false without touching anything
    /// when the coordinates are out of bounds.
    pub fn place(&mut self, mut tile: Tile, row: i16, col: i16) -> bool {
        match self.index(row, col) {
            Some(idx) => {
                tile.position = (col as u8, row as u8);
                self.cells[idx] = Some(tile);
                true
            }
            None => false,
        }
    }

    /// Remove and return the tile at (row, col)
    pub fn take(&mut self, row: i16, col: i16) -> Option<Tile> {
        self.index(row, col).and_then(|idx| self.cells[idx].take())
    }

    /// Whether (row, col) is in bounds and holds a tile
    pub fn is_occupied(&self, row: i16, col: i16) -> bool {
        self.get(row, col).is_some()
    }

    /// Whether every cell of a row holds a tile; false for rows outside
    /// the board
    pub fn is_row_full(&self, row: u8) -> bool {
        if row >= self.rows {
            return false;
        }
        let start = row as usize * self.cols as usize;
        let end = start + self.cols as usize;
        self.cells[start..end].iter().all(|cell| cell.is_some())
    }

    /// Whether a tile's whole occupancy mask, anchored at (row, col), lands
    /// on in-bounds empty cells
    pub fn fits(&self, tile: &Tile, row: i16, col: i16) -> bool {
        for dy in 0..tile.shape.height() {
            for dx in 0..tile.shape.width() {
                if !tile.shape.covers(dx, dy) {
                    continue;
                }
                let r = row + dy as i16;
                let c = col + dx as i16;
                match self.index(r, c) {
                    Some(idx) if self.cells[idx].is_none() => {}
                    _ => return false,
                }
            }
        }
        true
    }

    /// Remove a row: every row above shifts down one, the top row clears.
    /// Rows below are untouched, so callers may collapse a top-to-bottom
    /// list of full rows without re-indexing.
    pub fn collapse_row(&mut self, row: u8) {
        if row >= self.rows {
            return;
        }
        let cols = self.cols as usize;
        for r in (1..=row as usize).rev() {
            for c in 0..cols {
                let moved = self.cells[(r - 1) * cols + c].take();
                let dst = r * cols + c;
                self.cells[dst] = moved;
                if let Some(tile) = self.cells[dst].as_mut() {
                    tile.position = (c as u8, r as u8);
                }
            }
        }
        for c in 0..cols {
            self.cells[c] = None;
        }
    }

    /// Gravity for gems: per column, move tiles to the bottom preserving
    /// order. Returns whether anything moved.
    pub fn compact_columns(&mut self) -> bool {
        let cols = self.cols as usize;
        let mut moved = false;
        for col in 0..cols {
            let mut write = self.rows as i32 - 1;
            for read in (0..self.rows as i32).rev() {
                let read_idx = read as usize * cols + col;
                if self.cells[read_idx].is_some() {
                    if write != read {
                        let write_idx = write as usize * cols + col;
                        self.cells[write_idx] = self.cells[read_idx].take();
                        if let Some(tile) = self.cells[write_idx].as_mut() {
                            tile.position = (col as u8, write as u8);
                        }
                        moved = true;
                    }
                    write -= 1;
                }
            }
        }
        moved
    }

    /// Shift the whole board up one row, discarding the old top row and
    /// leaving the bottom row empty (attack-row insertion makes room with
    /// this before filling the bottom).
    pub fn shift_up(&mut self) {
        let cols = self.cols as usize;
        let rows = self.rows as usize;
        for r in 0..rows - 1 {
            for c in 0..cols {
                let moved = self.cells[(r + 1) * cols + c].take();
                let dst = r * cols + c;
                self.cells[dst] = moved;
                if let Some(tile) = self.cells[dst].as_mut() {
                    tile.position = (c as u8, r as u8);
                }
            }
        }
        for c in 0..cols {
            self.cells[(rows - 1) * cols + c] = None;
        }
    }

    /// Raw cells, row-major (snapshot building)
    pub fn cells(&self) -> &[Option<Tile>] {
        &self.cells
    }
}
