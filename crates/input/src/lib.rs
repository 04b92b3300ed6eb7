//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events onto the stage's input contract: two
//! edge-triggered rotations and three level-triggered signals, collected into one
//! [`crate::types::InputFrame`] per tick. Start and audio keys come out as
//! [`crate::types::Command`]s.

pub mod handler;
pub mod map;

pub use shiftris_types as types;

pub use handler::InputHandler;
pub use map::{command_for, should_quit, signal_for};
