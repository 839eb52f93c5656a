//! Key mapping from terminal events to duel commands.
//!
//! Both players share one keyboard: player one plays on the letter
//! cluster, player two on the arrow cluster.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::types::{PlayerAction, PlayerId};

/// A routed input: one player's action or a duel-level control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Action(PlayerId, PlayerAction),
    TogglePause,
}

/// Map keyboard input to duel commands.
pub fn handle_key_event(key: KeyEvent) -> Option<KeyCommand> {
    match key.code {
        // Player one
        KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(KeyCommand::Action(PlayerId::One, PlayerAction::MoveLeft))
        }
        KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(KeyCommand::Action(PlayerId::One, PlayerAction::MoveRight))
        }
        KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(KeyCommand::Action(PlayerId::One, PlayerAction::SoftDrop))
        }
        KeyCode::Char('w') | KeyCode::Char('W') => {
            Some(KeyCommand::Action(PlayerId::One, PlayerAction::RotateCw))
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(KeyCommand::Action(PlayerId::One, PlayerAction::RotateCcw))
        }
        KeyCode::Char(' ') => Some(KeyCommand::Action(PlayerId::One, PlayerAction::HardDrop)),

        // Player two
        KeyCode::Left => Some(KeyCommand::Action(PlayerId::Two, PlayerAction::MoveLeft)),
        KeyCode::Right => Some(KeyCommand::Action(PlayerId::Two, PlayerAction::MoveRight)),
        KeyCode::Down => Some(KeyCommand::Action(PlayerId::Two, PlayerAction::SoftDrop)),
        KeyCode::Up => Some(KeyCommand::Action(PlayerId::Two, PlayerAction::RotateCw)),
        KeyCode::Delete => Some(KeyCommand::Action(PlayerId::Two, PlayerAction::RotateCcw)),
        KeyCode::Enter => Some(KeyCommand::Action(PlayerId::Two, PlayerAction::HardDrop)),

        // Duel controls
        KeyCode::Char('p') | KeyCode::Char('P') => Some(KeyCommand::TogglePause),

        _ => None,
    }
}

/// Check if key should quit the duel.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
