//! Game engines and the capability surface the duel driver speaks

pub mod gemcrash;
pub mod tetris;

pub use gemcrash::GemCrashGame;
pub use tetris::TetrisGame;

use crate::snapshot::DuelSnapshot;
use crate::types::{GameEvent, PlayerAction, PlayerId};

/// What a hosted game exposes to the driver: a tick, per-player input,
/// read-only views, and round evaluation.
pub trait TileGame {
    /// Advance time. Elapsed milliseconds accumulate toward each player's
    /// fall interval; a zero-elapsed call changes nothing.
    fn update(&mut self, elapsed_ms: u32);

    /// Route one action to one player. Input for a game-over player is
    /// ignored.
    fn apply(&mut self, player: PlayerId, action: PlayerAction);

    /// Read-only view for rendering or persistence
    fn snapshot(&self) -> DuelSnapshot;

    fn score(&self, player: PlayerId) -> u32;

    fn is_game_over(&self, player: PlayerId) -> bool;

    /// Drain accumulated events
    fn take_events(&mut self) -> Vec<GameEvent>;

    /// The round ends when every player is game over
    fn is_round_over(&self) -> bool {
        self.is_game_over(PlayerId::One) && self.is_game_over(PlayerId::Two)
    }

    /// Higher score once the round is over; ties favor player one
    fn winner(&self) -> Option<PlayerId> {
        if !self.is_round_over() {
            return None;
        }
        if self.score(PlayerId::One) >= self.score(PlayerId::Two) {
            Some(PlayerId::One)
        } else {
            Some(PlayerId::Two)
        }
    }
}
