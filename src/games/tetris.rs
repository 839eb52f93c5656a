//! Tetris engine - two independent boards racing on one drop clock
//!
//! Each player owns a 20x10 grid and an active tetromino. A rejected
//! downward move freezes the piece, full rows collapse via the line
//! strategy, and a blocked spawn ends that player's run. The round ends
//! when both players are done.

use arrayvec::ArrayVec;

use crate::core::{Grid, MatchStrategy, SimpleRng, Tile};
use crate::games::TileGame;
use crate::snapshot::{ActiveCell, BoardSnapshot, DuelSnapshot, PlayerSnapshot};
use crate::types::{
    GameEvent, GameKind, PieceKind, PlayerAction, PlayerId, TileColor, TileKind, FALL_INTERVAL_MS,
    LINE_SCORES, TETRIS_COLS, TETRIS_KICKS, TETRIS_ROWS,
};

/// Local cell offsets per kind, anchored at the piece origin
fn shape_for(kind: PieceKind) -> [(i16, i16); 4] {
    match kind {
        PieceKind::I => [(0, 0), (0, 1), (0, 2), (0, 3)],
        PieceKind::O => [(0, 0), (1, 0), (0, 1), (1, 1)],
        PieceKind::T => [(0, 0), (1, 0), (2, 0), (1, 1)],
        PieceKind::L => [(0, 0), (0, 1), (0, 2), (1, 2)],
        PieceKind::J => [(1, 0), (1, 1), (1, 2), (0, 2)],
        PieceKind::S => [(0, 1), (1, 1), (1, 0), (2, 0)],
        PieceKind::Z => [(0, 0), (1, 0), (1, 1), (2, 1)],
    }
}

fn color_for(kind: PieceKind) -> TileColor {
    match kind {
        PieceKind::I | PieceKind::J => TileColor::Blue,
        PieceKind::O | PieceKind::L => TileColor::Yellow,
        PieceKind::T | PieceKind::Z => TileColor::Red,
        PieceKind::S => TileColor::Green,
    }
}

/// Active falling tetromino
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TetrisPiece {
    pub kind: PieceKind,
    cells: [(i16, i16); 4],
    pub x: i16,
    pub y: i16,
}

impl TetrisPiece {
    /// New piece at the spawn anchor (board center, top row)
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            cells: shape_for(kind),
            x: 4,
            y: 0,
        }
    }

    pub fn color(&self) -> TileColor {
        color_for(self.kind)
    }

    /// Absolute board cells
    pub fn cells(&self) -> [(i16, i16); 4] {
        let mut out = self.cells;
        for cell in &mut out {
            cell.0 += self.x;
            cell.1 += self.y;
        }
        out
    }

    /// Clockwise quarter turn around the local origin: (x, y) -> (y, -x)
    pub fn rotate_cw(&mut self) {
        for cell in &mut self.cells {
            *cell = (cell.1, -cell.0);
        }
    }
}

/// One player's slot
#[derive(Debug, Clone)]
pub struct TetrisPlayer {
    grid: Grid,
    piece: TetrisPiece,
    score: u32,
    lines: u32,
    game_over: bool,
    fall_timer_ms: u32,
}

impl TetrisPlayer {
    fn new(rng: &mut SimpleRng) -> Self {
        Self {
            // Dimensions are positive constants
            grid: Grid::new(TETRIS_ROWS, TETRIS_COLS).expect("tetris board dimensions"),
            piece: random_piece(rng),
            score: 0,
            lines: 0,
            game_over: false,
            fall_timer_ms: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn piece(&self) -> &TetrisPiece {
        &self.piece
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }
}

fn random_piece(rng: &mut SimpleRng) -> TetrisPiece {
    let kind = PieceKind::ALL[rng.next_range(PieceKind::ALL.len() as u32) as usize];
    TetrisPiece::new(kind)
}

/// Every cell inside horizontal bounds and above the floor; cells that
/// have entered the board must land on empty space. Rows above the top
/// are legal, pieces slide in from there.
fn piece_fits(grid: &Grid, piece: &TetrisPiece) -> bool {
    piece.cells().iter().all(|&(x, y)| {
        x >= 0 && x < grid.cols() as i16 && y < grid.rows() as i16 && (y < 0 || !grid.is_occupied(y, x))
    })
}

/// The two-player Tetris engine
#[derive(Debug, Clone)]
pub struct TetrisGame {
    players: [TetrisPlayer; 2],
    strategy: MatchStrategy,
    rng: SimpleRng,
    events: Vec<GameEvent>,
}

impl TetrisGame {
    /// Create a duel; both players draw pieces from one seeded stream
    pub fn new(seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let players = [TetrisPlayer::new(&mut rng), TetrisPlayer::new(&mut rng)];
        Self {
            players,
            strategy: MatchStrategy::for_game(GameKind::Tetris),
            rng,
            events: Vec::new(),
        }
    }

    pub fn player(&self, player: PlayerId) -> &TetrisPlayer {
        &self.players[player.index()]
    }

    /// Translate the active piece; a rejected downward move locks it
    fn try_move(&mut self, idx: usize, dx: i16, dy: i16) -> bool {
        {
            let p = &mut self.players[idx];
            if p.game_over {
                return false;
            }
            p.piece.x += dx;
            p.piece.y += dy;
            if piece_fits(&p.grid, &p.piece) {
                return true;
            }
            p.piece.x -= dx;
            p.piece.y -= dy;
        }
        if dy > 0 {
            self.lock(idx);
        }
        false
    }

    /// Clockwise rotation with horizontal wall kicks; reverts exactly
    /// when nothing fits (three more clockwise turns cancel one)
    fn rotate(&mut self, idx: usize) {
        let p = &mut self.players[idx];
        p.piece.rotate_cw();
        if piece_fits(&p.grid, &p.piece) {
            return;
        }
        for dx in TETRIS_KICKS {
            p.piece.x += dx;
            if piece_fits(&p.grid, &p.piece) {
                return;
            }
            p.piece.x -= dx;
        }
        for _ in 0..3 {
            p.piece.rotate_cw();
        }
    }

    fn hard_drop(&mut self, idx: usize) {
        while self.try_move(idx, 0, 1) {}
    }

    /// Commit the piece, collapse full rows, score, spawn the next piece
    fn lock(&mut self, idx: usize) {
        let player = if idx == 0 { PlayerId::One } else { PlayerId::Two };
        let color = self.players[idx].piece.color();
        for (x, y) in self.players[idx].piece.cells() {
            if y >= 0 {
                self.players[idx].grid.place(Tile::line_cell(color), y, x);
            }
        }
        self.events.push(GameEvent::PieceLocked { player });

        // Full rows come back top-to-bottom; collapsing one never moves
        // rows below it, so the remaining indices stay valid
        let groups = self.strategy.find_matches(&self.players[idx].grid);
        let mut rows: ArrayVec<u8, 4> = ArrayVec::new();
        for group in &groups {
            if let Some(&(_, row)) = group.cells.first() {
                rows.push(row);
            }
        }
        for &row in &rows {
            self.players[idx].grid.collapse_row(row);
        }
        if !rows.is_empty() {
            let p = &mut self.players[idx];
            p.lines += rows.len() as u32;
            p.score += LINE_SCORES[rows.len() - 1];
            self.events.push(GameEvent::LinesCleared {
                player,
                count: rows.len() as u8,
            });
        }

        let piece = random_piece(&mut self.rng);
        let p = &mut self.players[idx];
        p.piece = piece;
        if !piece_fits(&p.grid, &p.piece) {
            p.game_over = true;
            self.events.push(GameEvent::PlayerLost { player });
        }
    }

    fn player_snapshot(&self, idx: usize) -> PlayerSnapshot {
        let p = &self.players[idx];
        let color = p.piece.color();
        let active = p
            .piece
            .cells()
            .iter()
            .map(|&(x, y)| ActiveCell {
                col: x,
                row: y,
                kind: TileKind::LineCell,
                color,
            })
            .collect();
        PlayerSnapshot {
            board: BoardSnapshot::from(&p.grid),
            active,
            score: p.score,
            combo: 0,
            lines: p.lines,
            pending_attacks: 0,
            game_over: p.game_over,
        }
    }
}

impl TileGame for TetrisGame {
    fn update(&mut self, elapsed_ms: u32) {
        for idx in 0..2 {
            if self.players[idx].game_over {
                continue;
            }
            self.players[idx].fall_timer_ms += elapsed_ms;
            while self.players[idx].fall_timer_ms >= FALL_INTERVAL_MS {
                self.players[idx].fall_timer_ms -= FALL_INTERVAL_MS;
                self.try_move(idx, 0, 1);
                if self.players[idx].game_over {
                    break;
                }
            }
        }
    }

    fn apply(&mut self, player: PlayerId, action: PlayerAction) {
        let idx = player.index();
        if self.players[idx].game_over {
            return;
        }
        match action {
            PlayerAction::MoveLeft => {
                self.try_move(idx, -1, 0);
            }
            PlayerAction::MoveRight => {
                self.try_move(idx, 1, 0);
            }
            PlayerAction::SoftDrop => {
                self.try_move(idx, 0, 1);
            }
            PlayerAction::HardDrop => self.hard_drop(idx),
            PlayerAction::RotateCw => self.rotate(idx),
            // Not part of this game's controls
            PlayerAction::RotateCcw => {}
        }
    }

    fn snapshot(&self) -> DuelSnapshot {
        DuelSnapshot {
            game: GameKind::Tetris,
            players: [self.player_snapshot(0), self.player_snapshot(1)],
            paused: false,
            round_over: self.is_round_over(),
            winner: self.winner(),
        }
    }

    fn score(&self, player: PlayerId) -> u32 {
        self.players[player.index()].score
    }

    fn is_game_over(&self, player: PlayerId) -> bool {
        self.players[player.index()].game_over
    }

    fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
