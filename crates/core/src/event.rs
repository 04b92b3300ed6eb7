//! Structured stage events
//!
//! The stage queues one event per notable transition. Front-ends drain the queue
//! after each tick and log it (see `shiftris::log::EventLog`).

use serde::Serialize;

use crate::types::{Cell, EffectKind, ShapeKind, TriggerKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StageEvent {
    Launched {
        seed: u32,
    },
    Spawned {
        kind: ShapeKind,
        origin: Cell,
    },
    Locked {
        cells: Vec<Cell>,
        triggers: usize,
    },
    TriggerFired {
        kind: TriggerKind,
        cell: Cell,
        destroyed: usize,
        moved: usize,
    },
    RowsCleared {
        rows: Vec<i8>,
        gained: u32,
        score: u32,
    },
    SpeedUp {
        gravity_ms: u32,
        next_threshold: u32,
    },
    Countdown {
        ticks: u32,
        label: u32,
    },
    EffectApplied {
        kind: EffectKind,
        attempt: u32,
    },
    EffectFailed {
        kind: EffectKind,
        attempt: u32,
    },
    EffectsExhausted {
        attempts: u32,
    },
    GameOver {
        score: u32,
    },
}

impl StageEvent {
    /// Event tag as it appears in the serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            StageEvent::Launched { .. } => "launched",
            StageEvent::Spawned { .. } => "spawned",
            StageEvent::Locked { .. } => "locked",
            StageEvent::TriggerFired { .. } => "trigger_fired",
            StageEvent::RowsCleared { .. } => "rows_cleared",
            StageEvent::SpeedUp { .. } => "speed_up",
            StageEvent::Countdown { .. } => "countdown",
            StageEvent::EffectApplied { .. } => "effect_applied",
            StageEvent::EffectFailed { .. } => "effect_failed",
            StageEvent::EffectsExhausted { .. } => "effects_exhausted",
            StageEvent::GameOver { .. } => "game_over",
        }
    }
}
