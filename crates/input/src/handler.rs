//! Held-key tracking for terminal environments.
//!
//! Supports terminals that do not emit key release events by using a timeout:
//! a level signal counts as held for a short while after its last press or
//! auto-repeat event.

use crossterm::event::{KeyEvent, KeyEventKind};

use crate::map::{command_for, signal_for};
use crate::types::{Command, InputFrame, Signal};

// In terminals without key-release events, a short timeout stops a single tap
// from turning into a sustained "held" state.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

/// One level-triggered signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Level {
    /// Milliseconds since the key was last seen, `None` when released.
    age_ms: Option<u32>,
    /// Released before any frame saw the press; reported once, then dropped.
    release_pending: bool,
}

impl Level {
    fn press(&mut self) {
        self.age_ms = Some(0);
        self.release_pending = false;
    }

    fn release(&mut self) {
        if self.age_ms == Some(0) {
            self.release_pending = true;
        } else {
            *self = Level::default();
        }
    }

    fn sample(&mut self, elapsed_ms: u32, timeout_ms: u32) -> bool {
        let Some(age) = self.age_ms.as_mut() else {
            return false;
        };
        *age = age.saturating_add(elapsed_ms);
        let held = self.release_pending || *age <= timeout_ms;
        if self.release_pending || !held {
            *self = Level::default();
        }
        held
    }
}

/// Folds key events into one [`InputFrame`] per simulation tick.
#[derive(Debug, Clone)]
pub struct InputHandler {
    left: Level,
    right: Level,
    down: Level,
    /// Rotation presses not yet handed out in a frame.
    rotate_cw: bool,
    rotate_ccw: bool,
    key_release_timeout_ms: u32,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            left: Level::default(),
            right: Level::default(),
            down: Level::default(),
            rotate_cw: false,
            rotate_ccw: false,
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    /// Feed one key event. Returns the command it maps to, if any.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<Command> {
        match key.kind {
            KeyEventKind::Release => {
                if let Some(signal) = signal_for(key) {
                    self.release(signal);
                }
                None
            }
            KeyEventKind::Press | KeyEventKind::Repeat => {
                if let Some(signal) = signal_for(key) {
                    // Auto-repeat keeps a level held but never re-fires a rotation.
                    if key.kind == KeyEventKind::Press || !signal.is_edge() {
                        self.press(signal);
                    }
                    return None;
                }
                if key.kind == KeyEventKind::Press {
                    command_for(key)
                } else {
                    None
                }
            }
        }
    }

    pub fn press(&mut self, signal: Signal) {
        match signal {
            Signal::RotateCw => self.rotate_cw = true,
            Signal::RotateCcw => self.rotate_ccw = true,
            Signal::MoveLeft => {
                self.left.press();
                self.right = Level::default();
            }
            Signal::MoveRight => {
                self.right.press();
                self.left = Level::default();
            }
            Signal::SoftDrop => self.down.press(),
        }
    }

    pub fn release(&mut self, signal: Signal) {
        match signal {
            Signal::MoveLeft => self.left.release(),
            Signal::MoveRight => self.right.release(),
            Signal::SoftDrop => self.down.release(),
            Signal::RotateCw | Signal::RotateCcw => {}
        }
    }

    /// Build the frame for a tick of `elapsed_ms` and consume pending rotations.
    pub fn frame(&mut self, elapsed_ms: u32) -> InputFrame {
        let timeout = self.key_release_timeout_ms;
        let frame = InputFrame {
            rotate_cw: self.rotate_cw,
            rotate_ccw: self.rotate_ccw,
            left: self.left.sample(elapsed_ms, timeout),
            right: self.right.sample(elapsed_ms, timeout),
            soft_drop: self.down.sample(elapsed_ms, timeout),
        };
        self.rotate_cw = false;
        self.rotate_ccw = false;
        frame
    }

    /// Drop every held key and pending press.
    pub fn reset(&mut self) {
        *self = Self::new().with_key_release_timeout_ms(self.key_release_timeout_ms);
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_rotation_is_edge_triggered() {
        let mut input = InputHandler::new();
        input.handle_key_event(key(KeyCode::Char('x'), KeyEventKind::Press));
        assert!(input.frame(16).rotate_cw);
        assert!(!input.frame(16).rotate_cw);

        input.handle_key_event(key(KeyCode::Char('x'), KeyEventKind::Repeat));
        assert!(!input.frame(16).rotate_cw);
    }

    #[test]
    fn test_held_key_times_out() {
        let mut input = InputHandler::new();
        input.handle_key_event(key(KeyCode::Left, KeyEventKind::Press));
        for _ in 0..9 {
            assert!(input.frame(16).left);
        }
        // 160ms without a repeat
        assert!(!input.frame(16).left);
    }

    #[test]
    fn test_repeat_keeps_key_held() {
        let mut input = InputHandler::new();
        input.handle_key_event(key(KeyCode::Down, KeyEventKind::Press));
        for _ in 0..20 {
            input.handle_key_event(key(KeyCode::Down, KeyEventKind::Repeat));
            assert!(input.frame(50).soft_drop);
        }
    }

    #[test]
    fn test_release_event_clears_level() {
        let mut input = InputHandler::new();
        input.handle_key_event(key(KeyCode::Right, KeyEventKind::Press));
        assert!(input.frame(16).right);
        input.handle_key_event(key(KeyCode::Right, KeyEventKind::Release));
        assert!(!input.frame(16).right);
    }

    #[test]
    fn test_quick_tap_still_reaches_one_frame() {
        let mut input = InputHandler::new();
        input.handle_key_event(key(KeyCode::Left, KeyEventKind::Press));
        input.handle_key_event(key(KeyCode::Left, KeyEventKind::Release));
        assert!(input.frame(16).left);
        assert!(!input.frame(16).left);
    }

    #[test]
    fn test_opposite_direction_replaces() {
        let mut input = InputHandler::new();
        input.handle_key_event(key(KeyCode::Left, KeyEventKind::Press));
        input.handle_key_event(key(KeyCode::Right, KeyEventKind::Press));
        let frame = input.frame(16);
        assert!(frame.right);
        assert!(!frame.left);
    }

    #[test]
    fn test_commands_only_on_press() {
        let mut input = InputHandler::new();
        assert_eq!(
            input.handle_key_event(key(KeyCode::Enter, KeyEventKind::Press)),
            Some(Command::Launch)
        );
        assert_eq!(
            input.handle_key_event(key(KeyCode::Enter, KeyEventKind::Repeat)),
            None
        );
        assert_eq!(
            input.handle_key_event(key(KeyCode::Left, KeyEventKind::Press)),
            None
        );
    }
}
