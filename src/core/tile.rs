//! Tile module - the value stored in a grid cell
//!
//! A tile knows its kind, color, lifecycle state, occupancy shape, and the
//! cell it currently sits in. Both games produce 1x1 tiles; the shape mask
//! exists so larger footprints stay representable without changing the grid.

use crate::types::{TileColor, TileKind, TileState};

/// Occupancy pattern: width x height boolean mask, bit `y * width + x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileShape {
    width: u8,
    height: u8,
    mask: u16,
}

impl TileShape {
    /// A single-cell shape
    pub fn single() -> Self {
        Self {
            width: 1,
            height: 1,
            mask: 1,
        }
    }

    /// Build a shape from explicit dimensions and mask bits.
    /// Bits outside `width * height` are ignored.
    pub fn new(width: u8, height: u8, mask: u16) -> Self {
        Self {
            width,
            height,
            mask,
        }
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Whether the mask covers the local offset (dx, dy)
    pub fn covers(&self, dx: u8, dy: u8) -> bool {
        if dx >= self.width || dy >= self.height {
            return false;
        }
        let bit = dy as u16 * self.width as u16 + dx as u16;
        self.mask & (1 << bit) != 0
    }
}

/// A single tile value. `position` is (col, row) and is stamped by the grid
/// whenever the tile is placed or moved, so a stored tile always knows the
/// cell it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub kind: TileKind,
    pub color: TileColor,
    pub state: TileState,
    pub shape: TileShape,
    pub position: (u8, u8),
}

impl Tile {
    fn new(kind: TileKind, color: TileColor, state: TileState) -> Self {
        Self {
            kind,
            color,
            state,
            shape: TileShape::single(),
            position: (0, 0),
        }
    }

    /// A plain gem, active until committed
    pub fn gem(color: TileColor) -> Self {
        Self::new(TileKind::Gem, color, TileState::Active)
    }

    /// A power gem, active until committed
    pub fn power(color: TileColor) -> Self {
        Self::new(TileKind::Power, color, TileState::Active)
    }

    /// An attack block; these only ever exist locked in the grid
    pub fn block(color: TileColor) -> Self {
        Self::new(TileKind::Block, color, TileState::Locked)
    }

    /// A frozen tetromino cell
    pub fn line_cell(color: TileColor) -> Self {
        Self::new(TileKind::LineCell, color, TileState::Locked)
    }

    /// The same tile committed into the grid
    pub fn locked(self) -> Self {
        Self {
            state: TileState::Locked,
            ..self
        }
    }

    /// Two tiles match iff same kind and same color
    pub fn matches(&self, other: &Tile) -> bool {
        self.kind == other.kind && self.color == other.color
    }

    /// Whether this tile, anchored at its stamped position, covers (row, col)
    pub fn occupies_at(&self, row: u8, col: u8) -> bool {
        let (px, py) = self.position;
        if col < px || row < py {
            return false;
        }
        self.shape.covers(col - px, row - py)
    }
}
