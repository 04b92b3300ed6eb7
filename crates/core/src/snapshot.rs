use serde::Serialize;

use crate::types::{Cell, Color, ShapeKind, TriggerKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Render-facing view of one board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct CellSnapshot {
    pub color: Option<Color>,
    pub trigger: Option<TriggerKind>,
}

impl CellSnapshot {
    pub const EMPTY: CellSnapshot = CellSnapshot {
        color: None,
        trigger: None,
    };

    pub fn is_filled(&self) -> bool {
        self.color.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActiveCellSnapshot {
    pub cell: Cell,
    pub color: Color,
    pub trigger: Option<TriggerKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NextSnapshot {
    pub kind: ShapeKind,
    /// Offsets shifted so the bounding box starts at (0, 0).
    pub offsets: [Cell; 4],
    pub color: Color,
}

/// Externally visible phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseSnapshot {
    #[default]
    Idle,
    Falling,
    Locking,
    Clearing,
    Effect,
    GameOver,
}

/// Everything a renderer needs, in fixed-size storage so it can be refilled
/// every frame without allocating.
///
/// `board[y][x]` with `y = 0` the bottom row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StageSnapshot {
    pub board: [[CellSnapshot; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub active: Option<[ActiveCellSnapshot; 4]>,
    pub next: Option<NextSnapshot>,
    /// Rows currently flickering before a clear.
    pub flicker_rows: [bool; BOARD_HEIGHT as usize],
    pub score: u32,
    pub timer_label: u32,
    pub gravity_ms: u32,
    pub phase: PhaseSnapshot,
    pub volume: f32,
    pub muted: bool,
}

impl Default for StageSnapshot {
    fn default() -> Self {
        Self {
            board: [[CellSnapshot::EMPTY; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            next: None,
            flicker_rows: [false; BOARD_HEIGHT as usize],
            score: 0,
            timer_label: 0,
            gravity_ms: 0,
            phase: PhaseSnapshot::Idle,
            volume: 0.0,
            muted: false,
        }
    }
}

impl StageSnapshot {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn game_over(&self) -> bool {
        self.phase == PhaseSnapshot::GameOver
    }

    pub fn playable(&self) -> bool {
        self.phase == PhaseSnapshot::Falling
    }

    pub fn filled_cells(&self) -> usize {
        self.board
            .iter()
            .flat_map(|row| row.iter())
            .filter(|c| c.is_filled())
            .count()
    }
}
