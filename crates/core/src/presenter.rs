//! Presenter contract - how the stage talks to whatever draws and plays sound
//!
//! The stage never waits on a presenter directly. Instead `play` returns how long
//! the described animation runs, and the stage stays frozen for that long (capped
//! by [`StageConfig::max_animation_ms`](crate::config::StageConfig)). A presenter
//! that returns 0 makes every wait instant, which is what headless runs and tests
//! use.

use serde::Serialize;

use crate::board::{Block, BlockMove};
use crate::shape::Shape;
use crate::types::{
    Cell, Color, BOMB_BURN_MS, CLEAR_FLICKER_MS, MAGNET_SETTLE_MS, ROW_SHIFT_MS,
};
use crate::volume::VolumeControl;

/// Timed visual that accompanies a board mutation.
///
/// The board has already been changed when an animation is played; the
/// animation only describes how to show the transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Animation {
    /// Rows sliding one cell sideways with wrap-around. `(y, dir)` per row, all
    /// rows slide together.
    RowShift { rows: Vec<(i8, i8)> },
    /// Full rows flickering before they are removed.
    ClearFlicker { rows: Vec<i8> },
    /// A bomb going off at `origin`, burning the listed blocks.
    BombBurn {
        origin: Cell,
        cells: Vec<(Cell, Block)>,
    },
    /// A magnet at `origin` pulling blocks towards itself.
    MagnetSettle { origin: Cell, moves: Vec<BlockMove> },
}

impl Animation {
    /// Duration the game was designed around.
    pub fn nominal_ms(&self) -> u32 {
        match self {
            Animation::RowShift { .. } => ROW_SHIFT_MS,
            Animation::ClearFlicker { .. } => CLEAR_FLICKER_MS,
            Animation::BombBurn { .. } => BOMB_BURN_MS,
            Animation::MagnetSettle { .. } => MAGNET_SETTLE_MS,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Animation::RowShift { .. } => "row_shift",
            Animation::ClearFlicker { .. } => "clear_flicker",
            Animation::BombBurn { .. } => "bomb_burn",
            Animation::MagnetSettle { .. } => "magnet_settle",
        }
    }
}

/// Callbacks from the stage to its presentation collaborator.
///
/// Every method has a no-op default so a presenter only implements what it shows.
pub trait Presenter {
    /// A block was written into the board.
    fn place_block(&mut self, _cell: Cell, _block: &Block) {}

    /// A board block moved without being destroyed.
    fn move_block(&mut self, _from: Cell, _to: Cell, _block: &Block) {}

    /// A board block was destroyed.
    fn remove_block(&mut self, _cell: Cell, _block: &Block) {}

    /// The falling piece changed position, rotation or attachments.
    fn draw_active(&mut self, _cells: &[(Cell, Block)]) {}

    /// A new shape entered the preview slot.
    fn draw_next(&mut self, _shape: &Shape, _color: Color) {}

    /// Start an animation and report how long the stage should wait for it.
    fn play(&mut self, animation: &Animation) -> u32 {
        animation.nominal_ms()
    }

    fn timer_label(&mut self, _value: u32) {}

    fn score_label(&mut self, _value: u32) {}

    /// Show or hide the start/restart control.
    fn restart_visible(&mut self, _visible: bool) {}

    fn volume_changed(&mut self, _volume: &VolumeControl) {}

    fn game_over(&mut self, _score: u32) {}
}

/// Presenter that shows nothing and never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn play(&mut self, _animation: &Animation) -> u32 {
        0
    }
}

/// One recorded presenter call.
#[derive(Debug, Clone, PartialEq)]
pub enum PresenterCall {
    Place(Cell),
    Move(Cell, Cell),
    Remove(Cell),
    DrawActive(Vec<Cell>),
    DrawNext(Shape),
    Play(Animation),
    TimerLabel(u32),
    ScoreLabel(u32),
    RestartVisible(bool),
    Volume { slider: f32, muted_icon: bool },
    GameOver(u32),
}

/// Presenter that records every call, for tests and replays.
///
/// `play` answers with `wait_ms` when set, otherwise with the nominal duration.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    pub calls: Vec<PresenterCall>,
    pub wait_ms: Option<u32>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorder whose animations all report the same duration.
    pub fn with_wait(wait_ms: u32) -> Self {
        Self {
            calls: Vec::new(),
            wait_ms: Some(wait_ms),
        }
    }

    pub fn take(&mut self) -> Vec<PresenterCall> {
        std::mem::take(&mut self.calls)
    }

    /// Animations played so far, in order.
    pub fn animations(&self) -> impl Iterator<Item = &Animation> + '_ {
        self.calls.iter().filter_map(|call| match call {
            PresenterCall::Play(animation) => Some(animation),
            _ => None,
        })
    }

    /// Last timer label shown.
    pub fn last_timer(&self) -> Option<u32> {
        self.calls.iter().rev().find_map(|call| match call {
            PresenterCall::TimerLabel(value) => Some(*value),
            _ => None,
        })
    }

    /// Last score label shown.
    pub fn last_score(&self) -> Option<u32> {
        self.calls.iter().rev().find_map(|call| match call {
            PresenterCall::ScoreLabel(value) => Some(*value),
            _ => None,
        })
    }
}

impl Presenter for RecordingPresenter {
    fn place_block(&mut self, cell: Cell, _block: &Block) {
        self.calls.push(PresenterCall::Place(cell));
    }

    fn move_block(&mut self, from: Cell, to: Cell, _block: &Block) {
        self.calls.push(PresenterCall::Move(from, to));
    }

    fn remove_block(&mut self, cell: Cell, _block: &Block) {
        self.calls.push(PresenterCall::Remove(cell));
    }

    fn draw_active(&mut self, cells: &[(Cell, Block)]) {
        self.calls
            .push(PresenterCall::DrawActive(cells.iter().map(|(c, _)| *c).collect()));
    }

    fn draw_next(&mut self, shape: &Shape, _color: Color) {
        self.calls.push(PresenterCall::DrawNext(shape.clone()));
    }

    fn play(&mut self, animation: &Animation) -> u32 {
        self.calls.push(PresenterCall::Play(animation.clone()));
        self.wait_ms.unwrap_or_else(|| animation.nominal_ms())
    }

    fn timer_label(&mut self, value: u32) {
        self.calls.push(PresenterCall::TimerLabel(value));
    }

    fn score_label(&mut self, value: u32) {
        self.calls.push(PresenterCall::ScoreLabel(value));
    }

    fn restart_visible(&mut self, visible: bool) {
        self.calls.push(PresenterCall::RestartVisible(visible));
    }

    fn volume_changed(&mut self, volume: &VolumeControl) {
        self.calls.push(PresenterCall::Volume {
            slider: volume.slider_value(),
            muted_icon: volume.shows_muted_icon(),
        });
    }

    fn game_over(&mut self, score: u32) {
        self.calls.push(PresenterCall::GameOver(score));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nominal_durations() {
        assert_eq!(Animation::RowShift { rows: vec![] }.nominal_ms(), 300);
        assert_eq!(Animation::ClearFlicker { rows: vec![0] }.nominal_ms(), 1200);
        let burn = Animation::BombBurn {
            origin: Cell::ZERO,
            cells: vec![],
        };
        assert_eq!(burn.nominal_ms(), 500);
        assert_eq!(burn.name(), "bomb_burn");
    }

    #[test]
    fn test_null_presenter_never_waits() {
        let mut p = NullPresenter;
        assert_eq!(p.play(&Animation::ClearFlicker { rows: vec![1, 2] }), 0);
    }

    #[test]
    fn test_recording_presenter_wait_override() {
        let mut p = RecordingPresenter::with_wait(7);
        assert_eq!(p.play(&Animation::RowShift { rows: vec![(0, 1)] }), 7);
        assert_eq!(p.animations().count(), 1);

        let mut nominal = RecordingPresenter::new();
        assert_eq!(
            nominal.play(&Animation::MagnetSettle {
                origin: Cell::ZERO,
                moves: vec![]
            }),
            150
        );
    }
}
