//! Core game logic module - pure, deterministic, and testable
//!
//! This crate holds the board simulation and the effect engine. It has **no
//! dependencies** on terminals, audio or I/O; everything it wants shown is pushed
//! through the [`Presenter`] trait.
//!
//! - **Deterministic**: the same seed and the same inputs replay the same game
//! - **Testable**: animation waits are plain numbers, a headless presenter makes them instant
//! - **Portable**: runs in a terminal, a test, or a benchmark loop alike
//!
//! # Module Structure
//!
//! - [`board`]: 11x13 grid, space checks, full-row compaction, row wrap-shifts
//! - [`shape`]: the seven tetrominoes and nudge-compensated rotation
//! - [`rng`]: seeded LCG and the next-shape queue
//! - [`scoring`]: `10·k²` line clears and the speed-up ratchet
//! - [`trigger`]: bomb and magnet attachments that fire on lock
//! - [`effects`]: row shifts and trigger attachment rolled by the countdown
//! - [`stage`]: the fixed-timestep state machine tying it all together
//! - [`presenter`]: callbacks and animation descriptions for the front-end
//!
//! # Rules
//!
//! - A piece falls one row per gravity interval (1000ms, 20% faster at every
//!   speed point) or every 50ms while soft drop is held
//! - A piece that cannot fall locks; if it still pokes above the board the game ends
//! - Every ten seconds of play an effect shifts rows or arms the falling piece
//!   with a bomb or a magnet
//!
//! # Example
//!
//! ```
//! use shiftris_core::{Stage, StageConfig};
//! use shiftris_types::InputFrame;
//!
//! let mut stage = Stage::new(StageConfig::default().with_seed(7));
//! stage.launch();
//!
//! // Hold soft drop until the first piece lands.
//! while stage.board().occupied().next().is_none() {
//!     stage.tick(16, &InputFrame::soft_drop());
//! }
//! assert_eq!(stage.board().occupied().count(), 4);
//! assert_eq!(stage.score(), 0);
//! ```

pub mod board;
pub mod config;
pub mod effects;
pub mod event;
pub mod piece;
pub mod presenter;
pub mod rng;
pub mod scoring;
pub mod shape;
pub mod snapshot;
pub mod stage;
pub mod trigger;
pub mod volume;

pub use shiftris_types as types;

// Re-export commonly used types for convenience
pub use board::{Block, BlockMove, Board, Slot};
pub use config::StageConfig;
pub use effects::{Effect, EffectOutcome, EffectTarget, ShiftRows};
pub use event::StageEvent;
pub use piece::ActivePiece;
pub use presenter::{Animation, NullPresenter, Presenter, RecordingPresenter};
pub use rng::{Preview, ShapeQueue, SimpleRng};
pub use scoring::{line_clear_score, SpeedCurve};
pub use shape::Shape;
pub use snapshot::{PhaseSnapshot, StageSnapshot};
pub use stage::{Phase, Stage};
pub use trigger::PlacementAware;
pub use volume::VolumeControl;
