//! Two-player duel runner (default binary).
//!
//! Picks the game from the command line, drives the duel on a fixed
//! tick, and draws both boards with the crossterm renderer.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Context, Result};
use crossterm::event::{self, Event, KeyEventKind};

use tile_duel::duel::Duel;
use tile_duel::input::{handle_key_event, should_quit, KeyCommand};
use tile_duel::term::TermRenderer;
use tile_duel::types::{GameKind, TICK_MS};

fn main() -> Result<()> {
    let (kind, seed) = parse_args()?;

    let mut term = TermRenderer::new();
    term.enter()?;

    let result = run(&mut term, kind, seed);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// `tile-duel [tetris|gems] [--seed N]`
fn parse_args() -> Result<(GameKind, u32)> {
    let mut kind = GameKind::Tetris;
    let mut seed = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let value = args.next().context("--seed needs a value")?;
                seed = Some(value.parse().context("--seed needs a number")?);
            }
            name => {
                kind = GameKind::from_str(name)
                    .ok_or_else(|| anyhow!("unknown game {:?}, expected tetris or gems", name))?;
            }
        }
    }

    Ok((kind, seed.unwrap_or_else(default_seed)))
}

fn default_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u32)
        .unwrap_or(1)
}

fn run(term: &mut TermRenderer, kind: GameKind, seed: u32) -> Result<()> {
    let mut duel = Duel::new(kind, seed);

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        term.draw(&duel.snapshot())?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                    if should_quit(key) {
                        return Ok(());
                    }
                    match handle_key_event(key) {
                        Some(KeyCommand::Action(player, action)) => duel.apply(player, action),
                        Some(KeyCommand::TogglePause) => duel.toggle_pause(),
                        None => {}
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            duel.update(TICK_MS);
            // The renderer works from snapshots; drain the event queue
            // so a long duel does not accumulate it
            duel.take_events();
        }
    }
}
