//! Terminal front-end for the stage.
//!
//! A small, game-oriented rendering layer: the stage snapshot is drawn into a
//! plain framebuffer which is then diffed and flushed to the terminal. No widget
//! toolkit, no layout engine.
//!
//! - [`game_view`]: snapshot to framebuffer, with a y-up board and a side panel
//! - [`presenter`]: stage callbacks to timed highlights
//! - [`renderer`]: framebuffer to terminal escape sequences

pub mod fb;
pub mod game_view;
pub mod presenter;
pub mod renderer;

pub use shiftris_core as core;
pub use shiftris_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, Viewport};
pub use presenter::{Flash, Fx, TermPresenter};
pub use renderer::{changed_runs, encode_diff_into, encode_full_into, Run, TerminalRenderer};
