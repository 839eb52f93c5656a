//! Gem crash engine - falling pairs, flood matches, and gray-row attacks
//!
//! Each player drops two-gem pairs onto a 12x6 board. Locking a pair
//! settles loose tiles, detonates power gems, flood-fills color groups
//! seeded at the landed cells, and cascades until the board is stable.
//! Clearing enough gems in one resolution queues gray rows that rise
//! from the bottom of the opponent's board.

use std::collections::VecDeque;

use arrayvec::ArrayVec;

use crate::core::{color_component, Grid, MatchGroup, MatchStrategy, SimpleRng, Tile};
use crate::games::TileGame;
use crate::snapshot::{ActiveCell, BoardSnapshot, DuelSnapshot, PlayerSnapshot};
use crate::types::{
    GameEvent, GameKind, LinkDir, PlayerAction, PlayerId, TileColor, TileKind, ATTACK_ROW_CAP,
    ATTACK_THRESHOLD, FALL_INTERVAL_MS, GEM_COLORS, GEM_COLS, GEM_ROWS, GEM_SCORE_BASE, MATCH_MIN,
    PAIR_KICKS, POWER_GEM_PERCENT,
};

/// Active falling pair: a main gem with a connector gem linked to one side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GemPair {
    pub main_kind: TileKind,
    pub main_color: TileColor,
    pub sub_color: TileColor,
    pub link: LinkDir,
    pub x: i16,
    pub y: i16,
}

impl GemPair {
    /// Roll a new pair at the spawn anchor; the main gem has a small
    /// chance to come up as a power gem, the connector never does
    pub fn new(rng: &mut SimpleRng) -> Self {
        let main_kind = if rng.chance(POWER_GEM_PERCENT) {
            TileKind::Power
        } else {
            TileKind::Gem
        };
        let main_color = GEM_COLORS[rng.next_range(GEM_COLORS.len() as u32) as usize];
        let sub_color = GEM_COLORS[rng.next_range(GEM_COLORS.len() as u32) as usize];
        Self {
            main_kind,
            main_color,
            sub_color,
            link: LinkDir::Right,
            x: 3,
            y: 0,
        }
    }

    /// Main cell then connector cell, in absolute coordinates
    pub fn cells(&self) -> [(i16, i16); 2] {
        let (dx, dy) = self.link.offset();
        [(self.x, self.y), (self.x + dx, self.y + dy)]
    }

    /// Swing the connector one step clockwise around the main gem
    pub fn rotate_cw(&mut self) {
        self.link = self.link.rotated_cw();
    }

    pub fn main_tile(&self) -> Tile {
        match self.main_kind {
            TileKind::Power => Tile::power(self.main_color),
            _ => Tile::gem(self.main_color),
        }
    }

    pub fn sub_tile(&self) -> Tile {
        Tile::gem(self.sub_color)
    }
}

/// One player's slot
#[derive(Debug, Clone)]
pub struct GemPlayer {
    grid: Grid,
    pair: GemPair,
    score: u32,
    combo: u32,
    game_over: bool,
    attack_queue: VecDeque<TileColor>,
    fall_timer_ms: u32,
}

impl GemPlayer {
    fn new(rng: &mut SimpleRng) -> Self {
        Self {
            // Dimensions are positive constants
            grid: Grid::new(GEM_ROWS, GEM_COLS).expect("gem board dimensions"),
            pair: GemPair::new(rng),
            score: 0,
            combo: 0,
            game_over: false,
            attack_queue: VecDeque::new(),
            fall_timer_ms: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn pair(&self) -> &GemPair {
        &self.pair
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// Gray rows waiting to rise from the bottom
    pub fn pending_attacks(&self) -> usize {
        self.attack_queue.len()
    }
}

fn player_of(idx: usize) -> PlayerId {
    if idx == 0 {
        PlayerId::One
    } else {
        PlayerId::Two
    }
}

/// Row-major scan for the next undetonated power gem
fn first_power_color(grid: &Grid) -> Option<TileColor> {
    for row in 0..grid.rows() as i16 {
        for col in 0..grid.cols() as i16 {
            if let Some(tile) = grid.get(row, col) {
                if tile.kind == TileKind::Power {
                    return Some(tile.color);
                }
            }
        }
    }
    None
}

/// Every tile of the given color, regardless of adjacency
fn color_sweep(grid: &Grid, color: TileColor) -> MatchGroup {
    let mut cells = Vec::new();
    for row in 0..grid.rows() as i16 {
        for col in 0..grid.cols() as i16 {
            if let Some(tile) = grid.get(row, col) {
                if tile.color == color {
                    cells.push((col as u8, row as u8));
                }
            }
        }
    }
    MatchGroup {
        cells,
        color: Some(color),
    }
}

/// Both cells inside the walls and above the floor; cells that have
/// entered the board must land on empty space. Rows above the top are
/// legal, the connector may trail off-screen.
fn pair_fits(grid: &Grid, pair: &GemPair) -> bool {
    pair.cells().iter().all(|&(x, y)| {
        x >= 0 && x < grid.cols() as i16 && y < grid.rows() as i16 && (y < 0 || !grid.is_occupied(y, x))
    })
}

/// The two-player gem crash engine
#[derive(Debug, Clone)]
pub struct GemCrashGame {
    players: [GemPlayer; 2],
    strategy: MatchStrategy,
    rng: SimpleRng,
    events: Vec<GameEvent>,
}

impl GemCrashGame {
    /// Create a duel; both players draw pairs from one seeded stream
    pub fn new(seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let players = [GemPlayer::new(&mut rng), GemPlayer::new(&mut rng)];
        Self {
            players,
            strategy: MatchStrategy::for_game(GameKind::GemCrash),
            rng,
            events: Vec::new(),
        }
    }

    pub fn player(&self, player: PlayerId) -> &GemPlayer {
        &self.players[player.index()]
    }

    /// Translate the pair; a rejected downward move locks it
    fn try_move(&mut self, idx: usize, dx: i16, dy: i16) -> bool {
        {
            let p = &mut self.players[idx];
            if p.game_over {
                return false;
            }
            p.pair.x += dx;
            p.pair.y += dy;
            if pair_fits(&p.grid, &p.pair) {
                return true;
            }
            p.pair.x -= dx;
            p.pair.y -= dy;
        }
        if dy > 0 {
            self.lock(idx);
        }
        false
    }

    /// Swing the connector with horizontal kicks. An impossible turn
    /// reverts by completing the four-step cycle.
    fn rotate(&mut self, idx: usize, clockwise: bool) {
        let p = &mut self.players[idx];
        let turns = if clockwise { 1 } else { 3 };
        for _ in 0..turns {
            p.pair.rotate_cw();
        }
        if pair_fits(&p.grid, &p.pair) {
            return;
        }
        for dx in PAIR_KICKS {
            p.pair.x += dx;
            if pair_fits(&p.grid, &p.pair) {
                return;
            }
            p.pair.x -= dx;
        }
        for _ in 0..(4 - turns) {
            p.pair.rotate_cw();
        }
    }

    /// Commit the pair, run the resolution pipeline, then spawn the
    /// next pair. One lock dispatches at most one attack.
    fn lock(&mut self, idx: usize) {
        let player = player_of(idx);
        self.players[idx].combo = 0;

        let pair = self.players[idx].pair;
        let [main_cell, sub_cell] = pair.cells();
        let committed = [(main_cell, pair.main_tile()), (sub_cell, pair.sub_tile())];
        for ((x, y), tile) in committed {
            if y >= 0 {
                self.players[idx].grid.place(tile.locked(), y, x);
            }
        }
        self.events.push(GameEvent::PieceLocked { player });

        // Where each committed cell will sit once loose tiles settle:
        // a cell drops one row per empty cell currently below it
        let mut seeds: ArrayVec<(u8, u8), 2> = ArrayVec::new();
        for ((x, y), _) in committed {
            if y < 0 {
                continue;
            }
            let grid = &self.players[idx].grid;
            let mut row = y;
            for below in (y + 1)..grid.rows() as i16 {
                if grid.get(below, x).is_none() {
                    row += 1;
                }
            }
            seeds.push((row as u8, x as u8));
        }
        self.players[idx].grid.compact_columns();

        let mut cleared = self.fire_power_gems(idx);

        // Power detonations leave the board fully cascaded, so any
        // seed they invalidated can no longer reach the match minimum
        let mut groups: Vec<MatchGroup> = Vec::new();
        for &(row, col) in &seeds {
            if groups.iter().any(|g| g.cells.contains(&(col, row))) {
                continue;
            }
            if let Some(group) = color_component(&self.players[idx].grid, row, col) {
                if group.len() >= MATCH_MIN {
                    groups.push(group);
                }
            }
        }
        if !groups.is_empty() {
            cleared += self.resolve(idx, groups);
        }

        if cleared >= ATTACK_THRESHOLD {
            let combo = self.players[idx].combo;
            let rows = (cleared / 5 + combo / 3).min(ATTACK_ROW_CAP);
            if rows > 0 {
                let target = 1 - idx;
                for _ in 0..rows {
                    self.players[target].attack_queue.push_back(TileColor::Gray);
                }
                self.events.push(GameEvent::AttackQueued {
                    attacker: player,
                    rows: rows as u8,
                });
            }
        }

        let next = GemPair::new(&mut self.rng);
        let p = &mut self.players[idx];
        p.pair = next;
        if !pair_fits(&p.grid, &p.pair) {
            p.game_over = true;
            self.events.push(GameEvent::PlayerLost { player });
        }
    }

    /// Detonate power gems until none remain. Each detonation takes
    /// every tile of its color with it and cascades like a normal clear.
    fn fire_power_gems(&mut self, idx: usize) -> u32 {
        let player = player_of(idx);
        let mut cleared = 0;
        while let Some(color) = first_power_color(&self.players[idx].grid) {
            self.events.push(GameEvent::PowerGemFired { player, color });
            let group = color_sweep(&self.players[idx].grid, color);
            cleared += self.resolve(idx, vec![group]);
        }
        cleared
    }

    /// Clear groups, let the board settle, rescan, repeat until stable.
    /// Every pass bumps the combo shared by all groups cleared in it.
    fn resolve(&mut self, idx: usize, mut groups: Vec<MatchGroup>) -> u32 {
        let player = player_of(idx);
        let mut cleared = 0;
        while !groups.is_empty() {
            self.players[idx].combo += 1;
            let combo = self.players[idx].combo;
            for group in &groups {
                let count = group.len() as u32;
                self.players[idx].score += GEM_SCORE_BASE * count * combo;
                cleared += count;
                for &(col, row) in &group.cells {
                    self.players[idx].grid.take(row as i16, col as i16);
                }
                self.events.push(GameEvent::GemsCleared {
                    player,
                    count: count as u8,
                    combo,
                });
            }
            self.players[idx].grid.compact_columns();
            groups = self.strategy.find_matches(&self.players[idx].grid);
        }
        cleared
    }

    /// Pull one queued gray row under the board, pushing the stack up.
    /// A stack already touching the top row has nowhere to go and ends
    /// the run; the queue entry stays unconsumed.
    fn consume_attack(&mut self, idx: usize) {
        if self.players[idx].attack_queue.is_empty() {
            return;
        }
        let player = player_of(idx);
        let cols = self.players[idx].grid.cols() as i16;
        if (0..cols).any(|col| self.players[idx].grid.is_occupied(0, col)) {
            self.players[idx].game_over = true;
            self.events.push(GameEvent::PlayerLost { player });
            return;
        }
        let Some(color) = self.players[idx].attack_queue.pop_front() else {
            return;
        };
        self.players[idx].grid.shift_up();
        let gap = self.rng.next_range(cols as u32) as i16;
        let bottom = self.players[idx].grid.rows() as i16 - 1;
        for col in 0..cols {
            if col != gap {
                self.players[idx].grid.place(Tile::block(color), bottom, col);
            }
        }
        self.events.push(GameEvent::AttackRowInserted { player });
    }

    fn player_snapshot(&self, idx: usize) -> PlayerSnapshot {
        let p = &self.players[idx];
        let [main_cell, sub_cell] = p.pair.cells();
        let active = vec![
            ActiveCell {
                col: main_cell.0,
                row: main_cell.1,
                kind: p.pair.main_kind,
                color: p.pair.main_color,
            },
            ActiveCell {
                col: sub_cell.0,
                row: sub_cell.1,
                kind: TileKind::Gem,
                color: p.pair.sub_color,
            },
        ];
        PlayerSnapshot {
            board: BoardSnapshot::from(&p.grid),
            active,
            score: p.score,
            combo: p.combo,
            lines: 0,
            pending_attacks: p.attack_queue.len(),
            game_over: p.game_over,
        }
    }
}

impl TileGame for GemCrashGame {
    fn update(&mut self, elapsed_ms: u32) {
        // A zero-length tick must not consume queued attacks
        if elapsed_ms == 0 {
            return;
        }
        for idx in 0..2 {
            if self.players[idx].game_over {
                continue;
            }
            self.consume_attack(idx);
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
            PlayerAction::RotateCw => self.rotate(idx, true),
            PlayerAction::RotateCcw => self.rotate(idx, false),
            // Pairs only ever drop one row at a time
            PlayerAction::HardDrop => {}
        }
    }

    fn snapshot(&self) -> DuelSnapshot {
        DuelSnapshot {
            game: GameKind::GemCrash,
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

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> GemCrashGame {
        GemCrashGame::new(42)
    }

    /// A plain pair at the spawn anchor with chosen colors
    fn pair(main_color: TileColor, sub_color: TileColor) -> GemPair {
        GemPair {
            main_kind: TileKind::Gem,
            main_color,
            sub_color,
            link: LinkDir::Right,
            x: 3,
            y: 0,
        }
    }

    fn put_gem(grid: &mut Grid, row: i16, col: i16, color: TileColor) {
        grid.place(Tile::gem(color).locked(), row, col);
    }

    /// Drop the active pair straight down until it locks
    fn drop_pair(game: &mut GemCrashGame, idx: usize) {
        while game.try_move(idx, 0, 1) {}
    }

    #[test]
    fn new_game_spawns_pair_at_top_center() {
        let game = game();
        for player in [PlayerId::One, PlayerId::Two] {
            let pair = game.player(player).pair();
            assert_eq!((pair.x, pair.y), (3, 0));
            assert_eq!(pair.link, LinkDir::Right);
            assert_eq!(game.score(player), 0);
            assert!(!game.is_game_over(player));
        }
    }

    #[test]
    fn connector_swings_clockwise_around_the_main_gem() {
        let mut p = pair(TileColor::Red, TileColor::Blue);
        p.y = 5;
        assert_eq!(p.cells(), [(3, 5), (4, 5)]);

        p.rotate_cw();
        assert_eq!(p.cells(), [(3, 5), (3, 6)]);
        p.rotate_cw();
        assert_eq!(p.cells(), [(3, 5), (2, 5)]);
        p.rotate_cw();
        assert_eq!(p.cells(), [(3, 5), (3, 4)]);
        p.rotate_cw();
        assert_eq!(p.link, LinkDir::Right);
    }

    #[test]
    fn counter_clockwise_undoes_clockwise() {
        let mut game = game();
        game.players[0].pair = pair(TileColor::Red, TileColor::Blue);

        game.apply(PlayerId::One, PlayerAction::RotateCcw);
        assert_eq!(game.player(PlayerId::One).pair().link, LinkDir::Up);

        game.apply(PlayerId::One, PlayerAction::RotateCw);
        assert_eq!(game.player(PlayerId::One).pair().link, LinkDir::Right);
    }

    #[test]
    fn rotation_against_the_wall_kicks_sideways() {
        let mut game = game();
        let mut p = pair(TileColor::Red, TileColor::Blue);
        p.x = 0;
        p.y = 5;
        p.link = LinkDir::Down;
        game.players[0].pair = p;

        // Down -> Left puts the connector at column -1; only the +1
        // kick can rescue it
        game.apply(PlayerId::One, PlayerAction::RotateCw);

        let after = game.player(PlayerId::One).pair();
        assert_eq!(after.link, LinkDir::Left);
        assert_eq!(after.x, 1);
    }

    #[test]
    fn impossible_rotation_reverts_exactly() {
        let mut game = game();
        let mut p = pair(TileColor::Red, TileColor::Blue);
        p.x = 0;
        p.y = 5;
        p.link = LinkDir::Down;
        game.players[0].pair = p;
        // Block the kick target so neither offset helps
        game.players[0]
            .grid
            .place(Tile::block(TileColor::Gray), 5, 1);

        game.apply(PlayerId::One, PlayerAction::RotateCw);

        let after = game.player(PlayerId::One).pair();
        assert_eq!(after.link, LinkDir::Down);
        assert_eq!((after.x, after.y), (0, 5));
    }

    #[test]
    fn landing_pair_locks_both_cells() {
        let mut game = game();
        game.players[0].pair = pair(TileColor::Red, TileColor::Blue);

        drop_pair(&mut game, 0);

        let grid = game.player(PlayerId::One).grid();
        let main = grid.get(11, 3).unwrap();
        assert_eq!(main.kind, TileKind::Gem);
        assert_eq!(main.color, TileColor::Red);
        let sub = grid.get(11, 4).unwrap();
        assert_eq!(sub.color, TileColor::Blue);
        assert_eq!(game.score(PlayerId::One), 0);

        // A fresh pair spawned at the anchor
        assert_eq!(game.player(PlayerId::One).pair().y, 0);
        assert!(game
            .take_events()
            .contains(&GameEvent::PieceLocked { player: PlayerId::One }));
    }

    #[test]
    fn pair_splits_across_uneven_columns() {
        let mut game = game();
        put_gem(&mut game.players[0].grid, 11, 3, TileColor::Green);
        let mut p = pair(TileColor::Red, TileColor::Blue);
        p.x = 2;
        game.players[0].pair = p;

        drop_pair(&mut game, 0);

        let grid = game.player(PlayerId::One).grid();
        // Main fell to the floor, the connector rests on the stack
        assert_eq!(grid.get(11, 2).unwrap().color, TileColor::Red);
        assert_eq!(grid.get(10, 3).unwrap().color, TileColor::Blue);
        assert_eq!(grid.get(11, 3).unwrap().color, TileColor::Green);
    }

    #[test]
    fn vertical_triple_clears_and_scores() {
        let mut game = game();
        put_gem(&mut game.players[0].grid, 10, 0, TileColor::Red);
        put_gem(&mut game.players[0].grid, 11, 0, TileColor::Red);
        let mut p = pair(TileColor::Red, TileColor::Blue);
        p.x = 0;
        game.players[0].pair = p;

        drop_pair(&mut game, 0);

        let grid = game.player(PlayerId::One).grid();
        assert!(grid.get(9, 0).is_none());
        assert!(grid.get(10, 0).is_none());
        assert!(grid.get(11, 0).is_none());
        // The connector settled alone and survived
        assert_eq!(grid.get(11, 1).unwrap().color, TileColor::Blue);
        assert_eq!(game.score(PlayerId::One), 300);
        assert_eq!(game.player(PlayerId::One).combo(), 1);
        assert_eq!(game.player(PlayerId::Two).pending_attacks(), 0);
        assert!(game.take_events().contains(&GameEvent::GemsCleared {
            player: PlayerId::One,
            count: 3,
            combo: 1,
        }));
    }

    #[test]
    fn cascade_raises_combo_and_multiplies_score() {
        let mut game = game();
        let grid = &mut game.players[0].grid;
        put_gem(grid, 11, 1, TileColor::Red);
        put_gem(grid, 11, 2, TileColor::Red);
        put_gem(grid, 10, 1, TileColor::Green);
        put_gem(grid, 10, 2, TileColor::Green);
        put_gem(grid, 11, 3, TileColor::Green);
        let mut p = pair(TileColor::Red, TileColor::Yellow);
        p.x = 0;
        game.players[0].pair = p;

        // Main settles to the floor completing the red row; the greens
        // fall onto the bottom row and match on the rebound
        drop_pair(&mut game, 0);

        assert_eq!(game.score(PlayerId::One), 300 + 600);
        assert_eq!(game.player(PlayerId::One).combo(), 2);
        assert_eq!(game.player(PlayerId::Two).pending_attacks(), 1);

        let events = game.take_events();
        assert!(events.contains(&GameEvent::GemsCleared {
            player: PlayerId::One,
            count: 3,
            combo: 1,
        }));
        assert!(events.contains(&GameEvent::GemsCleared {
            player: PlayerId::One,
            count: 3,
            combo: 2,
        }));
        assert!(events.contains(&GameEvent::AttackQueued {
            attacker: PlayerId::One,
            rows: 1,
        }));
    }

    #[test]
    fn five_then_three_cascade_scores_the_second_at_double() {
        let mut game = game();
        let grid = &mut game.players[0].grid;
        put_gem(grid, 10, 0, TileColor::Red);
        put_gem(grid, 11, 0, TileColor::Red);
        put_gem(grid, 11, 1, TileColor::Red);
        put_gem(grid, 11, 2, TileColor::Red);
        put_gem(grid, 9, 2, TileColor::Green);
        put_gem(grid, 10, 2, TileColor::Green);
        put_gem(grid, 11, 3, TileColor::Green);
        let mut p = pair(TileColor::Red, TileColor::Yellow);
        p.x = 0;
        game.players[0].pair = p;

        // Main completes an L of five reds; the greens drop different
        // distances and only align after the clear
        drop_pair(&mut game, 0);

        assert_eq!(game.score(PlayerId::One), 500 + 600);
        assert_eq!(game.player(PlayerId::One).combo(), 2);
        assert_eq!(game.player(PlayerId::Two).pending_attacks(), 1);

        let events = game.take_events();
        assert!(events.contains(&GameEvent::GemsCleared {
            player: PlayerId::One,
            count: 5,
            combo: 1,
        }));
        assert!(events.contains(&GameEvent::GemsCleared {
            player: PlayerId::One,
            count: 3,
            combo: 2,
        }));
    }

    #[test]
    fn five_gem_clear_sends_one_attack_row() {
        let mut game = game();
        for col in 0..4 {
            put_gem(&mut game.players[0].grid, 11, col, TileColor::Red);
        }
        let mut p = pair(TileColor::Red, TileColor::Yellow);
        p.x = 4;
        game.players[0].pair = p;

        drop_pair(&mut game, 0);

        assert_eq!(game.score(PlayerId::One), 500);
        assert_eq!(game.player(PlayerId::Two).pending_attacks(), 1);
        assert!(game.take_events().contains(&GameEvent::AttackQueued {
            attacker: PlayerId::One,
            rows: 1,
        }));
    }

    #[test]
    fn four_cleared_at_low_combo_sends_nothing() {
        let mut game = game();
        for col in 0..3 {
            put_gem(&mut game.players[0].grid, 11, col, TileColor::Red);
        }
        game.players[0].pair = pair(TileColor::Red, TileColor::Yellow);

        drop_pair(&mut game, 0);

        assert_eq!(game.score(PlayerId::One), 400);
        assert_eq!(game.player(PlayerId::Two).pending_attacks(), 0);
        assert!(!game
            .take_events()
            .iter()
            .any(|e| matches!(e, GameEvent::AttackQueued { .. })));
    }

    #[test]
    fn power_gem_sweeps_its_color_from_the_whole_board() {
        let mut game = game();
        let grid = &mut game.players[0].grid;
        put_gem(grid, 11, 0, TileColor::Red);
        put_gem(grid, 11, 1, TileColor::Red);
        put_gem(grid, 11, 5, TileColor::Red);
        put_gem(grid, 10, 5, TileColor::Red);
        let mut p = pair(TileColor::Red, TileColor::Yellow);
        p.main_kind = TileKind::Power;
        p.x = 2;
        game.players[0].pair = p;

        drop_pair(&mut game, 0);

        let grid = game.player(PlayerId::One).grid();
        assert!(grid.get(11, 0).is_none());
        assert!(grid.get(11, 1).is_none());
        assert!(grid.get(11, 2).is_none());
        assert!(grid.get(10, 5).is_none());
        assert!(grid.get(11, 5).is_none());
        assert_eq!(grid.get(11, 3).unwrap().color, TileColor::Yellow);

        // Five of a color in one shot scores and attacks like a clear
        assert_eq!(game.score(PlayerId::One), 500);
        assert_eq!(game.player(PlayerId::One).combo(), 1);
        assert_eq!(game.player(PlayerId::Two).pending_attacks(), 1);
        assert!(game.take_events().contains(&GameEvent::PowerGemFired {
            player: PlayerId::One,
            color: TileColor::Red,
        }));
    }

    #[test]
    fn gray_rows_rise_from_the_bottom_with_one_gap() {
        let mut game = game();
        put_gem(&mut game.players[1].grid, 11, 0, TileColor::Green);
        game.players[1].attack_queue.push_back(TileColor::Gray);

        game.update(1);

        let grid = game.player(PlayerId::Two).grid();
        // The marker rode the stack up one row
        assert_eq!(grid.get(10, 0).unwrap().color, TileColor::Green);

        let blocks = (0..GEM_COLS as i16)
            .filter(|&col| grid.get(11, col).map_or(false, |t| t.kind == TileKind::Block))
            .count();
        let gaps = (0..GEM_COLS as i16)
            .filter(|&col| grid.get(11, col).is_none())
            .count();
        assert_eq!(blocks, GEM_COLS as usize - 1);
        assert_eq!(gaps, 1);
        assert_eq!(game.player(PlayerId::Two).pending_attacks(), 0);
        assert!(game
            .take_events()
            .contains(&GameEvent::AttackRowInserted { player: PlayerId::Two }));
    }

    #[test]
    fn attack_with_blocked_top_row_ends_the_run() {
        let mut game = game();
        game.players[1]
            .grid
            .place(Tile::block(TileColor::Gray), 0, 0);
        game.players[1].attack_queue.push_back(TileColor::Gray);

        game.update(1);

        assert!(game.is_game_over(PlayerId::Two));
        assert!(!game.is_game_over(PlayerId::One));
        // The fatal row was never inserted
        assert_eq!(game.player(PlayerId::Two).pending_attacks(), 1);
        assert!(game
            .take_events()
            .contains(&GameEvent::PlayerLost { player: PlayerId::Two }));
    }

    #[test]
    fn blocked_spawn_ends_the_run() {
        let mut game = game();
        game.players[0]
            .grid
            .place(Tile::block(TileColor::Gray), 0, 3);
        let mut p = pair(TileColor::Red, TileColor::Blue);
        p.x = 0;
        game.players[0].pair = p;

        drop_pair(&mut game, 0);

        assert!(game.is_game_over(PlayerId::One));
        assert!(!game.is_game_over(PlayerId::Two));
        assert!(game
            .take_events()
            .contains(&GameEvent::PlayerLost { player: PlayerId::One }));
    }

    #[test]
    fn connector_above_the_top_is_discarded() {
        let mut game = game();
        game.players[0]
            .grid
            .place(Tile::block(TileColor::Gray), 1, 0);
        let mut p = pair(TileColor::Red, TileColor::Blue);
        p.x = 0;
        p.link = LinkDir::Up;
        game.players[0].pair = p;

        // The first downward step collides and locks at the top; the
        // connector sits above the board and vanishes
        game.apply(PlayerId::One, PlayerAction::SoftDrop);

        let grid = game.player(PlayerId::One).grid();
        assert_eq!(grid.get(10, 0).unwrap().color, TileColor::Red);
        assert_eq!(grid.get(11, 0).unwrap().kind, TileKind::Block);
        assert!(grid.get(0, 0).is_none());
        assert_eq!(grid.cells().iter().flatten().count(), 2);
    }

    #[test]
    fn hard_drop_is_not_part_of_this_game() {
        let mut game = game();
        game.players[0].pair = pair(TileColor::Red, TileColor::Blue);

        game.apply(PlayerId::One, PlayerAction::HardDrop);

        assert_eq!(game.player(PlayerId::One).pair().y, 0);
        assert!(game.take_events().is_empty());
    }

    #[test]
    fn game_over_player_ignores_input_and_gravity() {
        let mut game = game();
        game.players[0].game_over = true;
        let before = *game.player(PlayerId::One).pair();

        game.apply(PlayerId::One, PlayerAction::MoveLeft);
        game.apply(PlayerId::One, PlayerAction::RotateCw);
        game.update(FALL_INTERVAL_MS * 2);

        assert_eq!(*game.player(PlayerId::One).pair(), before);
        assert_eq!(game.score(PlayerId::One), 0);
    }

    #[test]
    fn zero_elapsed_update_changes_nothing() {
        let mut game = game();
        game.players[1].attack_queue.push_back(TileColor::Gray);
        game.update(FALL_INTERVAL_MS / 2);
        let before = game.snapshot();

        for _ in 0..5 {
            game.update(0);
        }

        assert_eq!(game.snapshot(), before);
        assert_eq!(game.player(PlayerId::Two).pending_attacks(), 0);
    }

    #[test]
    fn gravity_steps_once_per_interval() {
        let mut game = game();
        let start_y = game.player(PlayerId::One).pair().y;

        game.update(FALL_INTERVAL_MS - 1);
        assert_eq!(game.player(PlayerId::One).pair().y, start_y);

        game.update(1);
        assert_eq!(game.player(PlayerId::One).pair().y, start_y + 1);
    }

    #[test]
    fn winner_takes_higher_score_and_ties_favor_player_one() {
        let mut game = game();
        assert_eq!(game.winner(), None);

        game.players[0].game_over = true;
        game.players[1].game_over = true;
        game.players[0].score = 700;
        game.players[1].score = 900;
        assert_eq!(game.winner(), Some(PlayerId::Two));

        game.players[0].score = 900;
        assert_eq!(game.winner(), Some(PlayerId::One));
    }

    #[test]
    fn snapshot_shows_pending_attacks_and_combo() {
        let mut game = game();
        game.players[1].attack_queue.push_back(TileColor::Gray);
        game.players[1].attack_queue.push_back(TileColor::Gray);
        game.players[0].combo = 3;

        let snap = game.snapshot();
        assert_eq!(snap.game, GameKind::GemCrash);
        assert_eq!(snap.players[1].pending_attacks, 2);
        assert_eq!(snap.players[0].combo, 3);
        assert_eq!(snap.players[0].active.len(), 2);
        assert_eq!(snap.players[0].board.rows, GEM_ROWS);
        assert_eq!(snap.players[0].board.cols, GEM_COLS);
    }

    #[test]
    fn same_seed_same_opening_pairs() {
        let a = GemCrashGame::new(7);
        let b = GemCrashGame::new(7);
        assert_eq!(a.player(PlayerId::One).pair(), b.player(PlayerId::One).pair());
        assert_eq!(a.player(PlayerId::Two).pair(), b.player(PlayerId::Two).pair());
    }
}
