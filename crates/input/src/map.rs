//! Key mapping from terminal events to game commands.

use crate::types::{Command, Phase};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map keyboard input to a command for a game currently in `phase`.
///
/// Key releases are ignored, so terminals that report them don't double every move.
pub fn handle_key_event(key: KeyEvent, phase: Phase) -> Option<Command> {
    if key.kind == KeyEventKind::Release || key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        // Movement
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(Command::MoveLeft)
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(Command::MoveRight)
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(Command::MoveDown)
        }

        // Rotation
        KeyCode::Up
        | KeyCode::Char('k')
        | KeyCode::Char('K')
        | KeyCode::Char('w')
        | KeyCode::Char('W') => Some(Command::Rotate),

        KeyCode::Char(' ') => Some(Command::HardDrop),

        // Lifecycle
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc => match phase {
            Phase::Running => Some(Command::Pause),
            Phase::Paused => Some(Command::Resume),
            Phase::Ready | Phase::GameOver => None,
        },
        KeyCode::Enter => match phase {
            Phase::Ready => Some(Command::Start),
            Phase::Paused => Some(Command::Resume),
            Phase::Running | Phase::GameOver => None,
        },
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Reset),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
