//! Stage module - the gravity, lock and effect state machine
//!
//! The stage owns the board, the falling piece and every timer. It is advanced
//! with [`Stage::tick`] at a fixed timestep. Whenever a mutation comes with an
//! animation the stage leaves [`Phase::Falling`], asks the presenter how long the
//! animation runs and stays frozen for that long: no gravity, no input and no
//! countdown effect touches the board until the wait is over.
//!
//! ```text
//! Idle --launch--> Falling --lock--> Locking --(triggers done)--> Clearing --> Falling
//!                     |  ^              \------(no full rows)--------------/
//!                     |  \------ Effect <--countdown
//!                     \--ceiling--> GameOver --launch--> Falling
//! ```

use arrayvec::ArrayVec;

use crate::board::{Block, BlockMove, Board};
use crate::config::StageConfig;
use crate::effects::{self, Effect, EffectOutcome, EffectTarget};
use crate::event::StageEvent;
use crate::piece::ActivePiece;
use crate::presenter::{Animation, NullPresenter, Presenter};
use crate::rng::{Preview, ShapeQueue, SimpleRng};
use crate::scoring::{line_clear_score, SpeedCurve};
use crate::shape::Shape;
use crate::snapshot::{ActiveCellSnapshot, CellSnapshot, NextSnapshot, PhaseSnapshot, StageSnapshot};
use crate::trigger;
use crate::types::{
    Cell, Command, InputFrame, SpaceCheck, TriggerKind, Turn, BOARD_HEIGHT, COUNTDOWN_MS,
    MAX_EFFECT_ROLLS, NUDGE_REPEAT_MS, SOFT_DROP_MS, SPAWN_ORIGIN,
};
use crate::volume::VolumeControl;

/// Volume step for [`Command::VolumeUp`] / [`Command::VolumeDown`].
const VOLUME_STEP: f32 = 0.1;

/// Mixed into the seed so effect rolls do not mirror the shape sequence.
const EFFECT_SEED_SALT: u32 = 0x9E37_79B9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Nothing launched yet.
    Idle,
    /// The only phase in which gravity, input and the countdown act.
    Falling,
    /// Resolving the triggers of the piece that just locked.
    Locking,
    /// Full rows are flickering; they are removed when the wait ends.
    Clearing,
    /// Waiting for an effect animation.
    Effect,
    GameOver,
}

impl From<Phase> for PhaseSnapshot {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Idle => PhaseSnapshot::Idle,
            Phase::Falling => PhaseSnapshot::Falling,
            Phase::Locking => PhaseSnapshot::Locking,
            Phase::Clearing => PhaseSnapshot::Clearing,
            Phase::Effect => PhaseSnapshot::Effect,
            Phase::GameOver => PhaseSnapshot::GameOver,
        }
    }
}

pub struct Stage<P: Presenter = NullPresenter> {
    config: StageConfig,
    presenter: P,
    board: Board,
    active: Option<ActivePiece>,
    queue: ShapeQueue,
    effect_rng: SimpleRng,
    phase: Phase,
    /// Remaining wait of the current frozen phase.
    wait_ms: u32,
    /// Triggers of the last lock still to resolve; popped from the back.
    pending: ArrayVec<(Cell, TriggerKind), 4>,
    clearing: ArrayVec<i8, { BOARD_HEIGHT as usize }>,
    speed: SpeedCurve,
    score: u32,
    ticks: u32,
    timer_label: u32,
    countdown_ms: u32,
    gravity_timer_ms: u32,
    drop_timer_ms: u32,
    soft_dropping: bool,
    since_nudge_ms: u32,
    next_block_id: u32,
    dirty: bool,
    volume: VolumeControl,
    events: Vec<StageEvent>,
}

impl Stage<NullPresenter> {
    /// Headless stage: animations take no time.
    pub fn new(config: StageConfig) -> Self {
        Self::with_presenter(config, NullPresenter)
    }
}

impl Default for Stage<NullPresenter> {
    fn default() -> Self {
        Self::new(StageConfig::default())
    }
}

impl<P: Presenter> Stage<P> {
    pub fn with_presenter(config: StageConfig, presenter: P) -> Self {
        Self {
            config,
            presenter,
            board: Board::new(),
            active: None,
            queue: ShapeQueue::new(config.seed),
            effect_rng: SimpleRng::new(config.seed ^ EFFECT_SEED_SALT),
            phase: Phase::Idle,
            wait_ms: 0,
            pending: ArrayVec::new(),
            clearing: ArrayVec::new(),
            speed: SpeedCurve::new(),
            score: 0,
            ticks: 0,
            timer_label: config.effect_period,
            countdown_ms: 0,
            gravity_timer_ms: 0,
            drop_timer_ms: 0,
            soft_dropping: false,
            since_nudge_ms: NUDGE_REPEAT_MS,
            next_block_id: 0,
            dirty: false,
            volume: VolumeControl::default(),
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access, for scripted setups.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    /// The shape waiting in the preview slot.
    pub fn next(&self) -> &Preview {
        self.queue.peek()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Gravity, input and the countdown are suspended.
    pub fn frozen(&self) -> bool {
        self.phase != Phase::Falling
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn gravity_ms(&self) -> u32 {
        self.speed.gravity_ms()
    }

    pub fn speed_point(&self) -> u32 {
        self.speed.speed_point()
    }

    /// Countdown ticks elapsed this game.
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn timer_label(&self) -> u32 {
        self.timer_label
    }

    /// Remaining wait of the current animation.
    pub fn wait_ms(&self) -> u32 {
        self.wait_ms
    }

    pub fn volume(&self) -> &VolumeControl {
        &self.volume
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Take the events queued since the last call.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, StageEvent> {
        self.events.drain(..)
    }

    /// Start a new game, discarding the current one.
    pub fn launch(&mut self) {
        self.board.clear();
        self.active = None;
        self.pending.clear();
        self.clearing.clear();
        self.speed = SpeedCurve::new();
        self.score = 0;
        self.ticks = 0;
        self.timer_label = self.config.effect_period;
        self.countdown_ms = 0;
        self.drop_timer_ms = 0;
        self.soft_dropping = false;
        self.since_nudge_ms = NUDGE_REPEAT_MS;
        self.wait_ms = 0;

        self.presenter.restart_visible(false);
        self.presenter.score_label(0);
        self.presenter.timer_label(self.timer_label);
        self.events.push(StageEvent::Launched {
            seed: self.config.seed,
        });

        self.spawn();
    }

    /// Handle a non-gameplay command.
    pub fn command(&mut self, command: Command) {
        match command {
            Command::Launch => {
                if matches!(self.phase, Phase::Idle | Phase::GameOver) {
                    self.launch();
                }
            }
            Command::ToggleMute => self.toggle_mute(),
            Command::VolumeUp => self.set_volume(self.volume.volume() + VOLUME_STEP),
            Command::VolumeDown => self.set_volume(self.volume.volume() - VOLUME_STEP),
        }
    }

    pub fn toggle_mute(&mut self) {
        self.volume.toggle();
        self.presenter.volume_changed(&self.volume);
    }

    pub fn set_volume(&mut self, value: f32) {
        self.volume.set_volume(value);
        self.presenter.volume_changed(&self.volume);
    }

    /// Advance the simulation by `elapsed_ms`.
    ///
    /// Returns true when the falling piece was redrawn.
    pub fn tick(&mut self, elapsed_ms: u32, input: &InputFrame) -> bool {
        if matches!(self.phase, Phase::Idle | Phase::GameOver) {
            return false;
        }

        // The countdown keeps accumulating while frozen but only fires in play.
        self.countdown_ms = self.countdown_ms.saturating_add(elapsed_ms);

        if self.frozen() {
            self.wait_ms = self.wait_ms.saturating_sub(elapsed_ms);
            self.settle();
        } else {
            self.step_falling(elapsed_ms, input);
        }

        self.flush()
    }

    fn step_falling(&mut self, elapsed_ms: u32, input: &InputFrame) {
        if self.countdown_ms >= COUNTDOWN_MS {
            // Surplus gathered during a freeze is dropped.
            self.countdown_ms = (self.countdown_ms - COUNTDOWN_MS) % COUNTDOWN_MS;
            self.countdown_tick();
            if self.frozen() {
                return;
            }
        }

        self.since_nudge_ms = self.since_nudge_ms.saturating_add(elapsed_ms);

        if input.soft_drop {
            if !self.soft_dropping {
                self.soft_dropping = true;
                self.drop_timer_ms = 0;
                self.apply_gravity();
            } else {
                self.drop_timer_ms += elapsed_ms;
                if self.drop_timer_ms >= SOFT_DROP_MS {
                    self.drop_timer_ms -= SOFT_DROP_MS;
                    self.apply_gravity();
                }
            }
        } else {
            self.soft_dropping = false;
            self.handle_rotation(input);
            self.handle_nudge(input);
        }

        if self.frozen() {
            return;
        }

        self.gravity_timer_ms += elapsed_ms;
        if self.gravity_timer_ms >= self.speed.gravity_ms() {
            self.gravity_timer_ms = 0;
            if !self.soft_dropping {
                self.apply_gravity();
            }
        }
    }

    fn handle_rotation(&mut self, input: &InputFrame) {
        if input.rotate_cw == input.rotate_ccw {
            return;
        }
        let turn = if input.rotate_cw { Turn::Cw } else { Turn::Ccw };
        self.try_rotate(turn);
    }

    fn handle_nudge(&mut self, input: &InputFrame) {
        if input.left == input.right || self.since_nudge_ms < NUDGE_REPEAT_MS {
            return;
        }
        let step = if input.left { Cell::LEFT } else { Cell::RIGHT };
        if self.try_shift(step) {
            self.since_nudge_ms = 0;
        }
    }

    /// Move the falling piece by `step` if every cell stays valid.
    pub fn try_shift(&mut self, step: Cell) -> bool {
        let Some(piece) = self.active.as_mut() else {
            return false;
        };
        piece.shape.origin += step;
        if self.board.assert_shape(&piece.shape, false).is_valid() {
            self.dirty = true;
            true
        } else {
            piece.shape.origin -= step;
            false
        }
    }

    /// Rotate the falling piece, kicking one cell sideways if needed.
    ///
    /// A clockwise turn tries a kick to the right first, counter-clockwise to the
    /// left. If nothing fits the piece is left exactly as it was.
    pub fn try_rotate(&mut self, turn: Turn) -> bool {
        let Some(piece) = self.active.as_mut() else {
            return false;
        };

        piece.shape.rotate(turn);
        if self.board.assert_shape(&piece.shape, false).is_valid() {
            self.dirty = true;
            return true;
        }

        let kick = match turn {
            Turn::Cw => Cell::RIGHT,
            Turn::Ccw => Cell::LEFT,
        };
        for offset in [kick, -kick] {
            piece.shape.origin += offset;
            if self.board.assert_shape(&piece.shape, false).is_valid() {
                self.dirty = true;
                return true;
            }
            piece.shape.origin -= offset;
        }

        piece.shape.rotate(turn.opposite());
        false
    }

    /// One gravity step: move down, and lock or end the game when blocked.
    pub fn apply_gravity(&mut self) {
        if self.phase != Phase::Falling {
            return;
        }
        let Some(piece) = self.active.as_mut() else {
            return;
        };

        piece.shape.origin += Cell::DOWN;
        if self.board.assert_shape(&piece.shape, false) == SpaceCheck::Floor {
            piece.shape.origin -= Cell::DOWN;
            if self.board.assert_shape(&piece.shape, true) == SpaceCheck::Ceiling {
                self.end_game();
            } else {
                self.lock();
                self.settle();
            }
        }
        self.dirty = true;
    }

    /// Swap the falling piece's geometry, keeping its blocks and triggers.
    pub fn replace_active(&mut self, shape: Shape) -> bool {
        match self.active.as_mut() {
            Some(piece) => {
                piece.shape = shape;
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Run one effect against the live board.
    ///
    /// Only acts while a piece is falling. An applied effect with an animation
    /// freezes the stage for the animation's duration.
    pub fn apply_effect_with(&mut self, effect: &dyn Effect) -> EffectOutcome {
        if self.phase != Phase::Falling {
            return EffectOutcome::NoTarget;
        }
        let outcome = self.try_effect(effect, 1);
        if let EffectOutcome::Applied {
            animation: Some(animation),
            ..
        } = &outcome
        {
            self.phase = Phase::Effect;
            self.wait_ms = self.play(animation);
            self.settle();
        }
        outcome
    }

    fn try_effect(&mut self, effect: &dyn Effect, attempt: u32) -> EffectOutcome {
        let outcome = {
            let mut target = EffectTarget {
                board: &mut self.board,
                active: self.active.as_mut(),
                rng: &mut self.effect_rng,
            };
            effect.apply(&mut target)
        };

        match &outcome {
            EffectOutcome::Applied { moves, .. } => {
                for m in moves {
                    self.presenter.move_block(m.from, m.to, &m.block);
                }
                self.dirty = true;
                self.events.push(StageEvent::EffectApplied {
                    kind: effect.kind(),
                    attempt,
                });
            }
            EffectOutcome::NoTarget => self.events.push(StageEvent::EffectFailed {
                kind: effect.kind(),
                attempt,
            }),
        }
        outcome
    }

    fn countdown_tick(&mut self) {
        let period = self.config.effect_period.max(1);
        self.ticks += 1;
        self.timer_label = period - self.ticks % period;
        self.presenter.timer_label(self.timer_label);
        self.events.push(StageEvent::Countdown {
            ticks: self.ticks,
            label: self.timer_label,
        });

        if self.config.effects_enabled && self.ticks % period == 0 {
            self.run_effect_round();
        }
    }

    /// Roll effects until one applies, at most [`MAX_EFFECT_ROLLS`] times.
    fn run_effect_round(&mut self) {
        self.phase = Phase::Effect;
        self.wait_ms = 0;

        for attempt in 1..=MAX_EFFECT_ROLLS {
            let effect = effects::roll(&mut self.effect_rng);
            if let EffectOutcome::Applied { animation, .. } = self.try_effect(effect, attempt) {
                if let Some(animation) = animation {
                    self.wait_ms = self.play(&animation);
                }
                self.settle();
                return;
            }
        }

        self.events.push(StageEvent::EffectsExhausted {
            attempts: MAX_EFFECT_ROLLS,
        });
        self.settle();
    }

    /// Write the falling piece into the board and queue its triggers.
    fn lock(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };

        self.pending.clear();
        let mut cells = Vec::with_capacity(4);
        for (cell, block) in piece.cells() {
            let placed = Block {
                trigger: None,
                ..block
            };
            self.board.set(cell, Some(placed));
            self.presenter.place_block(cell, &placed);
            if let Some(kind) = block.trigger {
                self.pending.push((cell, kind));
            }
            cells.push(cell);
        }
        self.presenter.draw_active(&[]);

        self.events.push(StageEvent::Locked {
            cells,
            triggers: self.pending.len(),
        });
        self.phase = Phase::Locking;
        self.wait_ms = 0;
    }

    /// Run continuations for as long as no wait is pending.
    fn settle(&mut self) {
        while self.wait_ms == 0 {
            match self.phase {
                Phase::Locking => self.resolve_next_trigger(),
                Phase::Clearing => self.finish_clear(),
                Phase::Effect => self.phase = Phase::Falling,
                Phase::Idle | Phase::Falling | Phase::GameOver => break,
            }
        }
    }

    fn resolve_next_trigger(&mut self) {
        let Some((cell, kind)) = self.pending.pop() else {
            self.check_clears();
            return;
        };

        let animation = trigger::handler(kind).on_placement(&mut self.board, cell);
        let (destroyed, moved) = match &animation {
            Animation::BombBurn { cells, .. } => {
                for (c, block) in cells {
                    self.presenter.remove_block(*c, block);
                }
                (cells.len(), 0)
            }
            Animation::MagnetSettle { moves, .. } => {
                for m in moves {
                    self.presenter.move_block(m.from, m.to, &m.block);
                }
                (0, moves.len())
            }
            _ => (0, 0),
        };

        self.events.push(StageEvent::TriggerFired {
            kind,
            cell,
            destroyed,
            moved,
        });
        self.wait_ms = self.play(&animation);
    }

    fn check_clears(&mut self) {
        let rows = self.board.full_rows();
        if rows.is_empty() {
            self.spawn();
            return;
        }

        let animation = Animation::ClearFlicker {
            rows: rows.to_vec(),
        };
        self.clearing = rows;
        self.phase = Phase::Clearing;
        self.wait_ms = self.play(&animation);
    }

    fn finish_clear(&mut self) {
        let rows = std::mem::take(&mut self.clearing);

        let drops: Vec<BlockMove> = self
            .board
            .occupied()
            .filter(|(cell, _)| !rows.contains(&cell.y))
            .filter_map(|(cell, block)| {
                let below = rows.iter().filter(|&&y| y < cell.y).count() as i8;
                (below > 0).then(|| BlockMove {
                    from: cell,
                    to: cell + Cell::new(0, -below),
                    block: *block,
                })
            })
            .collect();

        for (cell, block) in self.board.clear_rows(&rows) {
            self.presenter.remove_block(cell, &block);
        }
        for m in &drops {
            self.presenter.move_block(m.from, m.to, &m.block);
        }

        let gained = line_clear_score(rows.len());
        self.score = self.score.saturating_add(gained);
        self.events.push(StageEvent::RowsCleared {
            rows: rows.to_vec(),
            gained,
            score: self.score,
        });
        if self.speed.record(self.score) {
            self.events.push(StageEvent::SpeedUp {
                gravity_ms: self.speed.gravity_ms(),
                next_threshold: self.speed.speed_point(),
            });
        }
        self.presenter.score_label(self.score);

        self.spawn();
    }

    fn spawn(&mut self) {
        let Preview { shape, color } = self.queue.draw();
        let shape = shape.at(SPAWN_ORIGIN);
        let next_id = &mut self.next_block_id;
        let blocks = std::array::from_fn(|_| {
            *next_id = next_id.wrapping_add(1);
            Block::new(*next_id, color)
        });

        self.events.push(StageEvent::Spawned {
            kind: shape.kind(),
            origin: shape.origin,
        });
        self.active = Some(ActivePiece::new(shape, blocks));

        let next = self.queue.peek();
        self.presenter.draw_next(&next.shape, next.color);

        self.gravity_timer_ms = 0;
        self.phase = Phase::Falling;
        self.wait_ms = 0;
        self.dirty = true;
    }

    fn end_game(&mut self) {
        self.phase = Phase::GameOver;
        self.wait_ms = 0;
        self.presenter.restart_visible(true);
        self.presenter.game_over(self.score);
        self.events.push(StageEvent::GameOver { score: self.score });
    }

    fn play(&mut self, animation: &Animation) -> u32 {
        self.presenter
            .play(animation)
            .min(self.config.max_animation_ms)
    }

    fn flush(&mut self) -> bool {
        if !self.dirty {
            return false;
        }
        self.dirty = false;
        let cells: ArrayVec<(Cell, Block), 4> =
            self.active.iter().flat_map(|p| p.cells()).collect();
        self.presenter.draw_active(&cells);
        true
    }

    /// Fill a preallocated snapshot.
    pub fn snapshot_into(&self, out: &mut StageSnapshot) {
        out.clear();

        for (cell, block) in self.board.occupied() {
            out.board[cell.y as usize][cell.x as usize] = CellSnapshot {
                color: Some(block.color),
                trigger: block.trigger,
            };
        }

        out.active = self.active.as_ref().map(|piece| {
            let mut cells = [ActiveCellSnapshot {
                cell: Cell::ZERO,
                color: piece.blocks[0].color,
                trigger: None,
            }; 4];
            for (slot, (cell, block)) in cells.iter_mut().zip(piece.cells()) {
                *slot = ActiveCellSnapshot {
                    cell,
                    color: block.color,
                    trigger: block.trigger,
                };
            }
            cells
        });

        if self.phase != Phase::Idle {
            let next = self.queue.peek();
            let (min, _) = next.shape.bounds();
            out.next = Some(NextSnapshot {
                kind: next.shape.kind(),
                offsets: (*next.shape.offsets()).map(|o| o - min),
                color: next.color,
            });
        }

        if self.phase == Phase::Clearing {
            for &y in &self.clearing {
                out.flicker_rows[y as usize] = true;
            }
        }

        out.score = self.score;
        out.timer_label = self.timer_label;
        out.gravity_ms = self.speed.gravity_ms();
        out.phase = self.phase.into();
        out.volume = self.volume.slider_value();
        out.muted = self.volume.shows_muted_icon();
    }

    pub fn snapshot(&self) -> StageSnapshot {
        let mut snap = StageSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }
}
