//! Duel driver - owns the selected engine and the pause switch
//!
//! The driver is the only thing the front end talks to: it picks the
//! engine for the requested game, feeds it time and player actions, and
//! hands back snapshots for drawing.

use crate::games::{GemCrashGame, TetrisGame, TileGame};
use crate::snapshot::DuelSnapshot;
use crate::types::{GameEvent, GameKind, PlayerAction, PlayerId};

/// A running two-player match of the selected game
pub struct Duel {
    game: Box<dyn TileGame>,
    kind: GameKind,
    paused: bool,
}

impl Duel {
    pub fn new(kind: GameKind, seed: u32) -> Self {
        let game: Box<dyn TileGame> = match kind {
            GameKind::Tetris => Box::new(TetrisGame::new(seed)),
            GameKind::GemCrash => Box::new(GemCrashGame::new(seed)),
        };
        Self {
            game,
            kind,
            paused: false,
        }
    }

    pub fn kind(&self) -> GameKind {
        self.kind
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    /// Advance time; a paused duel holds still
    pub fn update(&mut self, elapsed_ms: u32) {
        if self.paused {
            return;
        }
        self.game.update(elapsed_ms);
    }

    /// Route a player action; ignored while paused
    pub fn apply(&mut self, player: PlayerId, action: PlayerAction) {
        if self.paused {
            return;
        }
        self.game.apply(player, action);
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn snapshot(&self) -> DuelSnapshot {
        let mut snap = self.game.snapshot();
        snap.paused = self.paused;
        snap
    }

    pub fn is_round_over(&self) -> bool {
        self.game.is_round_over()
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.game.winner()
    }

    pub fn score(&self, player: PlayerId) -> u32 {
        self.game.score(player)
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.game.take_events()
    }
}
