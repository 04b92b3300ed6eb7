//! Effect engine - board-altering events rolled by the countdown
//!
//! Each effect is a stateless strategy applied to an [`EffectTarget`]. An effect
//! that finds nothing to act on reports [`EffectOutcome::NoTarget`] without
//! touching the board, and the caller rolls again.

use crate::board::{BlockMove, Board};
use crate::piece::ActivePiece;
use crate::presenter::Animation;
use crate::rng::SimpleRng;
use crate::types::{Cell, EffectKind, TriggerKind, BOARD_WIDTH};

/// Everything an effect may touch.
pub struct EffectTarget<'a> {
    pub board: &'a mut Board,
    pub active: Option<&'a mut ActivePiece>,
    pub rng: &'a mut SimpleRng,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EffectOutcome {
    Applied {
        animation: Option<Animation>,
        /// Board blocks that changed cell.
        moves: Vec<BlockMove>,
    },
    NoTarget,
}

impl EffectOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, EffectOutcome::Applied { .. })
    }
}

pub trait Effect {
    fn kind(&self) -> EffectKind;

    fn apply(&self, target: &mut EffectTarget<'_>) -> EffectOutcome;
}

/// Shifts a random span of rows sideways by one cell, wrapping around.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShiftRows;

/// Arms one block of the falling piece with a trigger.
#[derive(Debug, Clone, Copy)]
pub struct AttachTrigger(pub TriggerKind);

pub const ADD_BOMB: AttachTrigger = AttachTrigger(TriggerKind::Bomb);
pub const ADD_MAGNET: AttachTrigger = AttachTrigger(TriggerKind::Magnet);

static SHIFT_ROWS: ShiftRows = ShiftRows;
static ADD_BOMB_EFFECT: AttachTrigger = ADD_BOMB;
static ADD_MAGNET_EFFECT: AttachTrigger = ADD_MAGNET;

/// Effect implementation for a kind.
pub fn effect(kind: EffectKind) -> &'static dyn Effect {
    match kind {
        EffectKind::ShiftRows => &SHIFT_ROWS,
        EffectKind::AddBomb => &ADD_BOMB_EFFECT,
        EffectKind::AddMagnet => &ADD_MAGNET_EFFECT,
    }
}

/// Uniform pick over every effect kind.
pub fn roll(rng: &mut SimpleRng) -> &'static dyn Effect {
    let kind = EffectKind::ALL[rng.next_range(EffectKind::ALL.len() as u32) as usize];
    effect(kind)
}

impl ShiftRows {
    /// Whether shifting row `y` by `dir` would move a board block onto the
    /// falling piece.
    fn collides(board: &Board, active: Option<&ActivePiece>, y: i8, dir: i8) -> bool {
        let Some(piece) = active else {
            return false;
        };
        piece.shape.cells().filter(|c| c.y == y).any(|c| {
            let from = (c.x - dir).rem_euclid(BOARD_WIDTH as i8);
            board.is_occupied(Cell::new(from, y))
        })
    }
}

impl Effect for ShiftRows {
    fn kind(&self) -> EffectKind {
        EffectKind::ShiftRows
    }

    fn apply(&self, target: &mut EffectTarget<'_>) -> EffectOutcome {
        let ceiling = target.board.ceiling_height() as i32;
        if ceiling == 0 {
            return EffectOutcome::NoTarget;
        }

        let rows = target.rng.range(1, ceiling);
        let offset = target.rng.range(0, ceiling - rows);
        let mut start: i8 = if target.rng.next_bool() { -1 } else { 1 };

        let active = target.active.as_deref();
        let mut shifted = Vec::with_capacity(rows as usize);
        let mut moves = Vec::new();

        for y in offset..offset + rows {
            let y = y as i8;
            let dir = [start, -start]
                .into_iter()
                .find(|&d| !Self::collides(&*target.board, active, y, d));
            if let Some(dir) = dir {
                moves.extend(target.board.rotate_row(y, dir));
                shifted.push((y, dir));
            }
            start = -start;
        }

        if shifted.is_empty() {
            return EffectOutcome::NoTarget;
        }
        EffectOutcome::Applied {
            animation: Some(Animation::RowShift { rows: shifted }),
            moves,
        }
    }
}

impl Effect for AttachTrigger {
    fn kind(&self) -> EffectKind {
        match self.0 {
            TriggerKind::Bomb => EffectKind::AddBomb,
            TriggerKind::Magnet => EffectKind::AddMagnet,
        }
    }

    fn apply(&self, target: &mut EffectTarget<'_>) -> EffectOutcome {
        let Some(piece) = target.active.as_deref_mut() else {
            return EffectOutcome::NoTarget;
        };
        let free: arrayvec::ArrayVec<usize, 4> = piece.unarmed().collect();
        if free.is_empty() {
            return EffectOutcome::NoTarget;
        }
        let pick = free[target.rng.next_range(free.len() as u32) as usize];
        piece.arm(pick, self.0);
        EffectOutcome::Applied {
            animation: None,
            moves: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Block;
    use crate::shape::Shape;
    use crate::types::{Color, ShapeKind};

    fn piece_at(kind: ShapeKind, origin: Cell) -> ActivePiece {
        let blocks = [1, 2, 3, 4].map(|id| Block::new(id, Color::WHITE));
        ActivePiece::new(Shape::new(kind).at(origin), blocks)
    }

    #[test]
    fn test_shift_rows_empty_board_is_no_target() {
        let mut board = Board::new();
        let mut rng = SimpleRng::new(3);
        let mut target = EffectTarget {
            board: &mut board,
            active: None,
            rng: &mut rng,
        };
        assert_eq!(ShiftRows.apply(&mut target), EffectOutcome::NoTarget);
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_shift_rows_single_row_board() {
        // ceiling 1: span of one row at offset 0
        let mut board = Board::from_ascii(&["##...#....."]);
        let before = board.occupied().count();
        let mut rng = SimpleRng::new(11);
        let mut target = EffectTarget {
            board: &mut board,
            active: None,
            rng: &mut rng,
        };
        let outcome = ShiftRows.apply(&mut target);
        match outcome {
            EffectOutcome::Applied {
                animation: Some(Animation::RowShift { rows }),
                moves,
            } => {
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].0, 0);
                assert_eq!(moves.len(), 3);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(board.occupied().count(), before);
        let row = &board.to_ascii()[12];
        assert!(row == ".##...#...." || row == "#...#.....#", "{}", row);
    }

    #[test]
    fn test_shift_rows_flips_direction_on_collision() {
        // Piece holds (1,0). A right shift would carry (0,0) onto it, so every
        // seed must end up shifting left.
        let mut piece = piece_at(ShapeKind::I, Cell::new(1, -1));
        assert!(piece.occupies(Cell::new(1, 0)));
        for seed in 1..20 {
            let mut board = Board::from_ascii(&["#.........."]);
            let mut rng = SimpleRng::new(seed);
            let mut target = EffectTarget {
                board: &mut board,
                active: Some(&mut piece),
                rng: &mut rng,
            };
            let outcome = ShiftRows.apply(&mut target);
            assert!(outcome.is_applied());
            assert_eq!(board.to_ascii()[12], "..........#");
        }
    }

    #[test]
    fn test_shift_rows_both_directions_blocked() {
        let mut board = Board::from_ascii(&["#.#........"]);
        let before = board.clone();
        let mut piece = piece_at(ShapeKind::I, Cell::new(1, -1));
        let mut rng = SimpleRng::new(4);
        let mut target = EffectTarget {
            board: &mut board,
            active: Some(&mut piece),
            rng: &mut rng,
        };
        assert_eq!(ShiftRows.apply(&mut target), EffectOutcome::NoTarget);
        assert_eq!(board, before);
    }

    #[test]
    fn test_attach_trigger_targets_falling_piece() {
        let mut board = Board::from_ascii(&["###########"]);
        let mut piece = piece_at(ShapeKind::O, Cell::new(4, 6));
        let mut rng = SimpleRng::new(9);
        let mut target = EffectTarget {
            board: &mut board,
            active: Some(&mut piece),
            rng: &mut rng,
        };
        assert!(ADD_BOMB.apply(&mut target).is_applied());
        assert_eq!(piece.blocks.iter().filter(|b| b.trigger.is_some()).count(), 1);
        assert!(board.occupied().all(|(_, b)| b.trigger.is_none()));
    }

    #[test]
    fn test_attach_trigger_no_target_when_fully_armed() {
        let mut board = Board::new();
        let mut piece = piece_at(ShapeKind::T, Cell::new(4, 6));
        for i in 0..4 {
            piece.arm(i, TriggerKind::Bomb);
        }
        let mut rng = SimpleRng::new(9);
        let mut target = EffectTarget {
            board: &mut board,
            active: Some(&mut piece),
            rng: &mut rng,
        };
        assert_eq!(ADD_MAGNET.apply(&mut target), EffectOutcome::NoTarget);

        let mut target = EffectTarget {
            board: &mut board,
            active: None,
            rng: &mut rng,
        };
        assert_eq!(ADD_BOMB.apply(&mut target), EffectOutcome::NoTarget);
    }

    #[test]
    fn test_roll_covers_all_kinds() {
        let mut rng = SimpleRng::new(1);
        let mut seen = Vec::new();
        for _ in 0..100 {
            let kind = roll(&mut rng).kind();
            if !seen.contains(&kind) {
                seen.push(kind);
            }
        }
        assert_eq!(seen.len(), 3);
    }
}
