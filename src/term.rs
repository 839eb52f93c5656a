//! Terminal front end - raw mode session and side-by-side board drawing
//!
//! Drawing is a full-frame redraw queued into one buffer and flushed per
//! frame. The helpers that produce text are pure so they can be tested.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal, QueueableCommand,
};

use crate::snapshot::{DuelSnapshot, PlayerSnapshot};
use crate::types::{GameKind, PlayerId, TileColor, TileKind};

const BORDER: Color = Color::Rgb {
    r: 200,
    g: 200,
    b: 200,
};
const TEXT: Color = Color::Rgb {
    r: 220,
    g: 220,
    b: 220,
};
const EMPTY: Color = Color::Rgb {
    r: 90,
    g: 90,
    b: 100,
};

pub struct TermRenderer {
    stdout: io::Stdout,
    buf: Vec<u8>,
}

impl TermRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Queue a full redraw of both boards and flush it
    pub fn draw(&mut self, snap: &DuelSnapshot) -> Result<()> {
        self.buf.clear();
        self.buf.queue(terminal::Clear(terminal::ClearType::All))?;

        let rows = snap.players[0].board.rows as u16;
        let cols = snap.players[0].board.cols as u16;
        let frame_w = cols * 2 + 2;
        let panels = [(2u16, PlayerId::One), (2 + frame_w + 6, PlayerId::Two)];

        for (x, id) in panels {
            self.draw_player(&snap.players[id.index()], x, id, snap.game)?;
        }

        let status_y = rows + 4;
        self.buf.queue(cursor::MoveTo(2, status_y))?;
        self.buf.queue(SetForegroundColor(TEXT))?;
        self.buf.queue(Print(status_line(snap)))?;
        self.buf.queue(cursor::MoveTo(2, status_y + 1))?;
        self.buf.queue(SetAttribute(Attribute::Dim))?;
        self.buf.queue(Print(help_line(snap.game)))?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(ResetColor)?;
        self.flush_buf()?;
        Ok(())
    }

    fn draw_player(
        &mut self,
        player: &PlayerSnapshot,
        x: u16,
        id: PlayerId,
        game: GameKind,
    ) -> Result<()> {
        let rows = player.board.rows as u16;
        let cols = player.board.cols as usize;

        self.buf.queue(cursor::MoveTo(x, 0))?;
        self.buf.queue(SetForegroundColor(TEXT))?;
        self.buf
            .queue(Print(player_header(id.label(), player, game)))?;

        let bar = "─".repeat(cols * 2);
        self.buf.queue(cursor::MoveTo(x, 1))?;
        self.buf.queue(SetForegroundColor(BORDER))?;
        self.buf.queue(Print(format!("┌{}┐", bar)))?;

        for row in 0..rows {
            self.buf.queue(cursor::MoveTo(x, 2 + row))?;
            self.buf.queue(SetForegroundColor(BORDER))?;
            self.buf.queue(Print('│'))?;
            for col in 0..cols {
                match self.cell_at(player, row as i16, col as i16) {
                    Some((kind, color)) => {
                        self.buf.queue(SetForegroundColor(tile_rgb(color)))?;
                        self.buf.queue(Print(cell_glyph(kind)))?;
                    }
                    None => {
                        self.buf.queue(SetForegroundColor(EMPTY))?;
                        self.buf.queue(Print("· "))?;
                    }
                }
            }
            self.buf.queue(SetForegroundColor(BORDER))?;
            self.buf.queue(Print('│'))?;
        }

        self.buf.queue(cursor::MoveTo(x, 2 + rows))?;
        self.buf.queue(SetForegroundColor(BORDER))?;
        self.buf.queue(Print(format!("└{}┘", bar)))?;
        Ok(())
    }

    /// The active piece draws over the settled board; a finished player
    /// shows only the stack
    fn cell_at(&self, player: &PlayerSnapshot, row: i16, col: i16) -> Option<(TileKind, TileColor)> {
        if !player.game_over {
            if let Some(cell) = player
                .active
                .iter()
                .find(|c| c.row == row && c.col == col)
            {
                return Some((cell.kind, cell.color));
            }
        }
        let idx = row as usize * player.board.cols as usize + col as usize;
        player.board.cells[idx].map(|c| (c.kind, c.color))
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

fn tile_rgb(color: TileColor) -> Color {
    match color {
        TileColor::Red => Color::Rgb {
            r: 220,
            g: 80,
            b: 80,
        },
        TileColor::Blue => Color::Rgb {
            r: 80,
            g: 120,
            b: 220,
        },
        TileColor::Green => Color::Rgb {
            r: 100,
            g: 220,
            b: 120,
        },
        TileColor::Yellow => Color::Rgb {
            r: 240,
            g: 220,
            b: 80,
        },
        TileColor::Gray => Color::Rgb {
            r: 140,
            g: 140,
            b: 140,
        },
    }
}

fn cell_glyph(kind: TileKind) -> &'static str {
    match kind {
        TileKind::Power => "◆◆",
        _ => "██",
    }
}

fn player_header(label: &str, player: &PlayerSnapshot, game: GameKind) -> String {
    let mut header = format!("{}  {:>6}", label, player.score);
    match game {
        GameKind::Tetris => {
            header.push_str(&format!("  lines {}", player.lines));
        }
        GameKind::GemCrash => {
            header.push_str(&format!(
                "  combo {}  inbox {}",
                player.combo, player.pending_attacks
            ));
        }
    }
    if player.game_over {
        header.push_str("  OVER");
    }
    header
}

fn status_line(snap: &DuelSnapshot) -> String {
    if snap.paused {
        return "PAUSED".to_string();
    }
    if snap.round_over {
        return match snap.winner {
            Some(id) => format!("{} wins the {} duel", id.label(), snap.game.as_str()),
            None => "round over".to_string(),
        };
    }
    format!("{} duel", snap.game.as_str())
}

fn help_line(game: GameKind) -> &'static str {
    match game {
        GameKind::Tetris => {
            "P1 a/s/d move  w rotate  space drop | P2 arrows move  up rotate  enter drop | p pause  esc quit"
        }
        GameKind::GemCrash => {
            "P1 a/s/d move  w/q spin | P2 arrows move  up/del spin | p pause  esc quit"
        }
    }
}
