//! Shared types for the duel framework
//! This module contains pure data types with no external dependencies

/// Board dimensions per game
pub const TETRIS_ROWS: u8 = 20;
pub const TETRIS_COLS: u8 = 10;
pub const GEM_ROWS: u8 = 12;
pub const GEM_COLS: u8 = 6;

/// Game timing constants (in milliseconds)
pub const TICK_MS: u32 = 16;
pub const FALL_INTERVAL_MS: u32 = 500;

/// Matching and scoring constants
pub const MATCH_MIN: usize = 3;
pub const LINE_SCORES: [u32; 4] = [100, 300, 500, 800];
pub const GEM_SCORE_BASE: u32 = 100;

/// Attack tuning: threshold of cleared gems that dispatches an attack,
/// and the cap on rows sent from one resolution
pub const ATTACK_THRESHOLD: u32 = 4;
pub const ATTACK_ROW_CAP: u32 = 3;

/// Chance (percent) that a gem pair's main gem spawns as a power gem
pub const POWER_GEM_PERCENT: u32 = 10;

/// Horizontal wall-kick offsets tried after a rejected rotation
pub const TETRIS_KICKS: [i16; 4] = [-1, 1, -2, 2];
pub const PAIR_KICKS: [i16; 2] = [-1, 1];

/// Player slot in a duel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    /// Index into two-element player arrays
    pub fn index(&self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    /// The other player
    pub fn opponent(&self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Short display label
    pub fn label(&self) -> &'static str {
        match self {
            PlayerId::One => "P1",
            PlayerId::Two => "P2",
        }
    }
}

/// What a tile is: a loose gem, a power gem, an attack block, or a
/// frozen tetromino cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileKind {
    Gem,
    Power,
    Block,
    LineCell,
}

/// Tile colors; Gray is reserved for attack blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileColor {
    Red,
    Blue,
    Green,
    Yellow,
    Gray,
}

/// Colors a spawned gem may take
pub const GEM_COLORS: [TileColor; 4] = [
    TileColor::Red,
    TileColor::Blue,
    TileColor::Green,
    TileColor::Yellow,
];

/// Tile lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileState {
    Active,
    Locked,
    Cleared,
}

/// Tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    L,
    J,
    S,
    Z,
}

impl PieceKind {
    /// All kinds, in spawn-table order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::L,
        PieceKind::J,
        PieceKind::S,
        PieceKind::Z,
    ];
}

/// Connector gem position relative to the main gem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkDir {
    Right,
    Down,
    Left,
    Up,
}

impl LinkDir {
    /// Next position clockwise
    pub fn rotated_cw(&self) -> Self {
        match self {
            LinkDir::Right => LinkDir::Down,
            LinkDir::Down => LinkDir::Left,
            LinkDir::Left => LinkDir::Up,
            LinkDir::Up => LinkDir::Right,
        }
    }

    /// Offset of the connector cell from the main cell
    pub fn offset(&self) -> (i16, i16) {
        match self {
            LinkDir::Right => (1, 0),
            LinkDir::Down => (0, 1),
            LinkDir::Left => (-1, 0),
            LinkDir::Up => (0, -1),
        }
    }
}

/// Per-player game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateCw,
    RotateCcw,
}

/// Which game a duel runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameKind {
    Tetris,
    GemCrash,
}

impl GameKind {
    /// Parse from a CLI argument (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tetris" => Some(GameKind::Tetris),
            "gems" | "gemcrash" => Some(GameKind::GemCrash),
            _ => None,
        }
    }

    /// Display name
    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Tetris => "tetris",
            GameKind::GemCrash => "gem crash",
        }
    }
}

/// Events accumulated by an engine and drained by the driver.
///
/// This is the observability surface: instead of a process-wide logger,
/// each engine queues what happened and the caller decides what to do
/// with it (status line, discard, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PieceLocked { player: PlayerId },
    LinesCleared { player: PlayerId, count: u8 },
    GemsCleared { player: PlayerId, count: u8, combo: u32 },
    PowerGemFired { player: PlayerId, color: TileColor },
    AttackQueued { attacker: PlayerId, rows: u8 },
    AttackRowInserted { player: PlayerId },
    PlayerLost { player: PlayerId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_id_opponent_round_trips() {
        assert_eq!(PlayerId::One.opponent(), PlayerId::Two);
        assert_eq!(PlayerId::Two.opponent(), PlayerId::One);
        assert_eq!(PlayerId::One.opponent().opponent(), PlayerId::One);
    }

    #[test]
    fn link_dir_cycle_is_four_steps() {
        let mut dir = LinkDir::Right;
        for _ in 0..4 {
            dir = dir.rotated_cw();
        }
        assert_eq!(dir, LinkDir::Right);

        assert_eq!(LinkDir::Right.rotated_cw(), LinkDir::Down);
        assert_eq!(LinkDir::Down.rotated_cw(), LinkDir::Left);
        assert_eq!(LinkDir::Left.rotated_cw(), LinkDir::Up);
        assert_eq!(LinkDir::Up.rotated_cw(), LinkDir::Right);
    }

    #[test]
    fn game_kind_parses_cli_names() {
        assert_eq!(GameKind::from_str("tetris"), Some(GameKind::Tetris));
        assert_eq!(GameKind::from_str("GEMS"), Some(GameKind::GemCrash));
        assert_eq!(GameKind::from_str("gemcrash"), Some(GameKind::GemCrash));
        assert_eq!(GameKind::from_str("pong"), None);
    }
}
