//! Tile Duel - a local two-player duel framework for tile-matching games.
//!
//! One grid abstraction hosts two engines: line-clearing Tetris and a
//! gem crash game with flood-fill matching, cascades, and cross-board
//! gray-row attacks. `duel::Duel` drives whichever engine was selected;
//! the terminal front end only ever sees `snapshot::DuelSnapshot`.

pub mod core;
pub mod duel;
pub mod games;
pub mod input;
pub mod snapshot;
pub mod term;
pub mod types;

pub use duel::Duel;
pub use games::{GemCrashGame, TetrisGame, TileGame};
pub use types::{GameKind, PlayerAction, PlayerId};
