//! Input tests - key events folded into per-tick frames, then fed to a stage.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

use shiftris::core::{Shape, Stage, StageConfig};
use shiftris::input::InputHandler;
use shiftris::types::{Cell, Command, ShapeKind, TICK_MS};

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }
}

fn release(code: KeyCode) -> KeyEvent {
    KeyEvent {
        kind: KeyEventKind::Release,
        ..press(code)
    }
}

#[test]
fn test_tap_moves_exactly_once() {
    let mut stage = Stage::new(StageConfig::default().without_effects());
    stage.launch();
    stage.replace_active(Shape::new(ShapeKind::O).at(Cell::new(5, 8)));

    let mut input = InputHandler::new();
    input.handle_key_event(press(KeyCode::Right));
    input.handle_key_event(release(KeyCode::Right));
    for _ in 0..10 {
        let frame = input.frame(TICK_MS);
        stage.tick(TICK_MS, &frame);
    }
    assert_eq!(stage.active().map(|p| p.shape.origin.x), Some(6));

    // Without a release event the key counts as held until the timeout and
    // repeats every 100ms.
    input.handle_key_event(press(KeyCode::Right));
    for _ in 0..10 {
        let frame = input.frame(TICK_MS);
        stage.tick(TICK_MS, &frame);
    }
    assert_eq!(stage.active().map(|p| p.shape.origin.x), Some(8));
}

#[test]
fn test_rotation_fires_once_per_press() {
    let mut stage = Stage::new(StageConfig::default().without_effects());
    stage.launch();
    stage.replace_active(Shape::new(ShapeKind::T).at(Cell::new(4, 8)));
    let upright = stage.active().map(|p| p.shape.clone());

    let mut input = InputHandler::new();
    input.handle_key_event(press(KeyCode::Char('x')));
    for _ in 0..5 {
        let frame = input.frame(TICK_MS);
        stage.tick(TICK_MS, &frame);
    }
    let mut expected = upright.clone();
    if let Some(shape) = expected.as_mut() {
        shape.rotate_cw();
    }
    assert_eq!(stage.active().map(|p| p.shape.clone()), expected);

    input.handle_key_event(press(KeyCode::Char('z')));
    let frame = input.frame(TICK_MS);
    stage.tick(TICK_MS, &frame);
    assert_eq!(stage.active().map(|p| p.shape.clone()), upright);
}

#[test]
fn test_commands_reach_the_stage() {
    let mut stage = Stage::default();
    let mut input = InputHandler::new();

    for code in [KeyCode::Enter, KeyCode::Char('m')] {
        if let Some(command) = input.handle_key_event(press(code)) {
            stage.command(command);
        }
    }
    assert!(stage.active().is_some());
    assert!(stage.volume().is_muted());

    let command = input.handle_key_event(press(KeyCode::Char('-')));
    assert_eq!(command, Some(Command::VolumeDown));
    if let Some(command) = command {
        stage.command(command);
    }
    assert!(!stage.volume().is_muted());
    assert!((stage.volume().volume() - 0.9).abs() < 1e-6);
}

#[test]
fn test_reset_drops_held_keys() {
    let mut input = InputHandler::new();
    input.handle_key_event(press(KeyCode::Down));
    input.handle_key_event(press(KeyCode::Up));
    input.reset();
    let frame = input.frame(TICK_MS);
    assert!(!frame.soft_drop);
    assert!(!frame.rotate_cw);
}
