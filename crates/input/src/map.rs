//! Key mapping from terminal events to gameplay signals and commands.

use crate::types::{Command, Signal};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map a key to a gameplay signal.
pub fn signal_for(key: KeyEvent) -> Option<Signal> {
    match key.code {
        // Movement
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Signal::MoveLeft),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Signal::MoveRight),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Signal::SoftDrop),

        // Rotation
        KeyCode::Up | KeyCode::Char('x') | KeyCode::Char('X') => Some(Signal::RotateCw),
        KeyCode::Char('z') | KeyCode::Char('Z') => Some(Signal::RotateCcw),

        _ => None,
    }
}

/// Map a key to a start or audio command.
pub fn command_for(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Enter => Some(Command::Launch),
        KeyCode::Char('m') | KeyCode::Char('M') => Some(Command::ToggleMute),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Command::VolumeUp),
        KeyCode::Char('-') | KeyCode::Char('_') => Some(Command::VolumeDown),
        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
