//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! Everything here is plain data, usable from the simulation core, the input
//! mapper and the terminal renderer alike.
//!
//! # Board Geometry
//!
//! - **Width**: 11 columns (indexed 0-10, left to right)
//! - **Height**: 13 rows (indexed 0-12, **bottom to top**)
//! - **Spawn origin**: (5, 13), one row above the visible board
//!
//! Cells with `y >= BOARD_HEIGHT` are legal positions for a falling shape; they
//! only matter for the game-over (ceiling) check.
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `BASE_GRAVITY_MS` | 1000 | Gravity interval at the start of a game |
//! | `SOFT_DROP_MS` | 50 | Gravity interval while soft drop is held |
//! | `NUDGE_REPEAT_MS` | 100 | Minimum interval between horizontal nudges |
//! | `COUNTDOWN_MS` | 1000 | Length of one countdown tick |
//! | `EFFECT_PERIOD_TICKS` | 10 | Countdown ticks between two effects |
//!
//! # Examples
//!
//! ```
//! use shiftris_types::{Cell, ShapeKind, Signal, BOARD_HEIGHT, BOARD_WIDTH, SPAWN_ORIGIN};
//!
//! let kind = ShapeKind::from_str("l").unwrap();
//! assert_eq!(kind, ShapeKind::L);
//!
//! let below = SPAWN_ORIGIN + Cell::new(0, -1);
//! assert_eq!(below, Cell::new(5, 12));
//!
//! assert_eq!(Signal::from_str("rotateCw"), Some(Signal::RotateCw));
//! assert_eq!((BOARD_WIDTH, BOARD_HEIGHT), (11, 13));
//! ```

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Board width in cells (11 columns)
pub const BOARD_WIDTH: u8 = 11;

/// Board height in cells (13 rows)
pub const BOARD_HEIGHT: u8 = 13;

/// Size of one block in presentation units. Only used for visual offsets.
pub const BLOCK_SIZE: u16 = 48;

/// Where a freshly spawned shape's origin is placed.
pub const SPAWN_ORIGIN: Cell = Cell::new(BOARD_WIDTH as i8 / 2, BOARD_HEIGHT as i8);

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Gravity interval when a game starts (one row per second)
pub const BASE_GRAVITY_MS: u32 = 1000;

/// Gravity interval while soft drop is held.
pub const SOFT_DROP_MS: u32 = 50;

/// Minimum time between two horizontal nudges while a direction is held.
pub const NUDGE_REPEAT_MS: u32 = 100;

/// One countdown tick.
pub const COUNTDOWN_MS: u32 = 1000;

/// Countdown ticks between two effect rounds.
pub const EFFECT_PERIOD_TICKS: u32 = 10;

/// Upper bound on effect re-rolls within one round.
pub const MAX_EFFECT_ROLLS: u32 = 16;

/// Points per cleared row, multiplied by the square of the rows cleared at once.
pub const LINE_SCORE_BASE: u32 = 10;

/// Score that triggers the first speed-up.
pub const INITIAL_SPEED_POINT: u32 = 60;

/// Gravity interval multiplier on speed-up (4/5).
pub const SPEED_UP_NUMERATOR: u32 = 4;
pub const SPEED_UP_DENOMINATOR: u32 = 5;

/// Threshold multiplier on speed-up (9/5).
pub const SPEED_POINT_NUMERATOR: u32 = 9;
pub const SPEED_POINT_DENOMINATOR: u32 = 5;

/// Bomb scan radius (square half-width) in cells.
pub const BOMB_RADIUS: i8 = 2;

/// Bomb blast reach: cells with Euclidean distance up to this are destroyed.
pub const BOMB_REACH: f32 = 2.4;

/// How far a magnet reaches in each cardinal direction.
pub const MAGNET_DISTANCE: i8 = 3;

/// Nominal animation durations (milliseconds).
pub const ROW_SHIFT_MS: u32 = 300;
pub const CLEAR_FLICKER_MS: u32 = 1200;
pub const BOMB_BURN_MS: u32 = 500;
pub const MAGNET_SETTLE_MS: u32 = 150;

/// Upper bound on any single wait for the presenter.
pub const DEFAULT_MAX_ANIMATION_MS: u32 = 5000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_origin_sits_above_the_board() {
        assert_eq!(SPAWN_ORIGIN, Cell::new(5, 13));
        assert_eq!(SPAWN_ORIGIN.y, BOARD_HEIGHT as i8);
    }

    #[test]
    fn bomb_reach_covers_radius() {
        assert!(BOMB_REACH >= BOMB_RADIUS as f32);
        assert!(BOMB_REACH < (BOMB_RADIUS as f32) + 0.5);
    }
}

/// A board coordinate. `y = 0` is the bottom row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub x: i8,
    pub y: i8,
}

impl Cell {
    pub const ZERO: Cell = Cell::new(0, 0);
    pub const LEFT: Cell = Cell::new(-1, 0);
    pub const RIGHT: Cell = Cell::new(1, 0);
    pub const UP: Cell = Cell::new(0, 1);
    pub const DOWN: Cell = Cell::new(0, -1);

    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Whether the cell lies on the visible board.
    pub fn in_bounds(self) -> bool {
        self.x >= 0 && self.x < BOARD_WIDTH as i8 && self.y >= 0 && self.y < BOARD_HEIGHT as i8
    }

    /// Scale by an integer factor.
    pub fn scale(self, factor: i8) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Quarter turn clockwise about the origin: `(x, y) -> (y, -x)`.
    pub fn turn_cw(self) -> Self {
        Self::new(self.y, -self.x)
    }

    /// Quarter turn counter-clockwise about the origin: `(x, y) -> (-y, x)`.
    pub fn turn_ccw(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Euclidean length of the vector.
    pub fn length(self) -> f32 {
        let (x, y) = (self.x as f32, self.y as f32);
        (x * x + y * y).sqrt()
    }
}

impl Add for Cell {
    type Output = Cell;

    fn add(self, rhs: Cell) -> Cell {
        Cell::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Cell {
    type Output = Cell;

    fn sub(self, rhs: Cell) -> Cell {
        Cell::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Cell {
    type Output = Cell;

    fn neg(self) -> Cell {
        Cell::new(-self.x, -self.y)
    }
}

impl AddAssign for Cell {
    fn add_assign(&mut self, rhs: Cell) {
        *self = *self + rhs;
    }
}

impl SubAssign for Cell {
    fn sub_assign(&mut self, rhs: Cell) {
        *self = *self - rhs;
    }
}

/// 24-bit colour of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a colour from hue/saturation/value, each in `[0, 1]`.
    pub fn from_hsv(h: f32, s: f32, v: f32) -> Self {
        let h = (h.clamp(0.0, 1.0) * 6.0) % 6.0;
        let s = s.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);
        let c = v * s;
        let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
        let m = v - c;
        let (r, g, b) = match h as u8 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let to_u8 = |f: f32| ((f + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::new(to_u8(r), to_u8(g), to_u8(b))
    }
}

/// The seven library shapes.
///
/// With `y` growing upward:
/// - **I**: vertical bar
/// - **Z**: upper pair left, lower pair right
/// - **S**: upper pair right, lower pair left
/// - **L**: bar with foot to the right
/// - **J**: bar with foot to the left
/// - **O**: 2x2 square
/// - **T**: three wide with a nub on top
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    I,
    Z,
    S,
    L,
    J,
    O,
    T,
}

impl ShapeKind {
    /// Every kind, in library order.
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::I,
        ShapeKind::Z,
        ShapeKind::S,
        ShapeKind::L,
        ShapeKind::J,
        ShapeKind::O,
        ShapeKind::T,
    ];

    /// Parse shape kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use shiftris_types::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::from_str("i"), Some(ShapeKind::I));
    /// assert_eq!(ShapeKind::from_str("O"), Some(ShapeKind::O));
    /// assert_eq!(ShapeKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(ShapeKind::I),
            "z" => Some(ShapeKind::Z),
            "s" => Some(ShapeKind::S),
            "l" => Some(ShapeKind::L),
            "j" => Some(ShapeKind::J),
            "o" => Some(ShapeKind::O),
            "t" => Some(ShapeKind::T),
            _ => None,
        }
    }
}

/// Direction of a quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Turn {
    Cw,
    Ccw,
}

impl Turn {
    pub fn opposite(self) -> Self {
        match self {
            Turn::Cw => Turn::Ccw,
            Turn::Ccw => Turn::Cw,
        }
    }
}

/// Result of checking whether a cell can hold a falling block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpaceCheck {
    Valid,
    /// Outside the left or right wall.
    Side,
    /// Below the board or on an occupied cell.
    Floor,
    /// Above the visible board (only reported when asked for).
    Ceiling,
}

impl SpaceCheck {
    pub fn is_valid(self) -> bool {
        self == SpaceCheck::Valid
    }
}

/// Placement-aware attachments a block can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    Bomb,
    Magnet,
}

/// Board-altering effects rolled by the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    ShiftRows,
    AddBomb,
    AddMagnet,
}

impl EffectKind {
    pub const ALL: [EffectKind; 3] = [EffectKind::ShiftRows, EffectKind::AddBomb, EffectKind::AddMagnet];
}

/// Gameplay input signals.
///
/// Rotations are edge-triggered (once per press); the others are level-triggered
/// (active while held).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    RotateCw,
    RotateCcw,
    MoveLeft,
    MoveRight,
    SoftDrop,
}

impl Signal {
    /// Parse a signal name (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rotatecw" => Some(Signal::RotateCw),
            "rotateccw" => Some(Signal::RotateCcw),
            "moveleft" => Some(Signal::MoveLeft),
            "moveright" => Some(Signal::MoveRight),
            "softdrop" => Some(Signal::SoftDrop),
            _ => None,
        }
    }

    /// Whether the signal fires once per press rather than while held.
    pub fn is_edge(&self) -> bool {
        matches!(self, Signal::RotateCw | Signal::RotateCcw)
    }
}

/// Non-gameplay commands (start control, audio controls).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Launch,
    ToggleMute,
    VolumeUp,
    VolumeDown,
}

/// Input sampled for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputFrame {
    /// Rotate clockwise pressed since the previous frame.
    pub rotate_cw: bool,
    /// Rotate counter-clockwise pressed since the previous frame.
    pub rotate_ccw: bool,
    pub left: bool,
    pub right: bool,
    pub soft_drop: bool,
}

impl InputFrame {
    pub const IDLE: InputFrame = InputFrame {
        rotate_cw: false,
        rotate_ccw: false,
        left: false,
        right: false,
        soft_drop: false,
    };

    /// A frame with only soft drop held.
    pub fn soft_drop() -> Self {
        Self {
            soft_drop: true,
            ..Self::IDLE
        }
    }

    /// Mark a signal as active in this frame.
    pub fn set(&mut self, signal: Signal) {
        match signal {
            Signal::RotateCw => self.rotate_cw = true,
            Signal::RotateCcw => self.rotate_ccw = true,
            Signal::MoveLeft => self.left = true,
            Signal::MoveRight => self.right = true,
            Signal::SoftDrop => self.soft_drop = true,
        }
    }

    pub fn with(mut self, signal: Signal) -> Self {
        self.set(signal);
        self
    }
}
