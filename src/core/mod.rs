//! Core module - grid, tiles, matching, and randomness
//!
//! Pure framework logic shared by both game engines. It has zero
//! dependencies on UI, input, or I/O.

pub mod grid;
pub mod matching;
pub mod rng;
pub mod tile;

// Re-export commonly used types
pub use grid::{Grid, GridError};
pub use matching::{color_component, MatchGroup, MatchStrategy};
pub use rng::SimpleRng;
pub use tile::{Tile, TileShape};
