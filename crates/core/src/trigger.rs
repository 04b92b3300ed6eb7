//! Placement-aware triggers - attachments that fire when their block locks
//!
//! A trigger mutates the board synchronously and hands back an [`Animation`]
//! describing what happened. The stage plays it and waits before resolving the
//! next trigger, so a later trigger always sees the board an earlier one left.

use crate::board::{Block, BlockMove, Board};
use crate::presenter::Animation;
use crate::types::{Cell, TriggerKind, BOMB_RADIUS, BOMB_REACH, MAGNET_DISTANCE};

/// Behaviour attached to a block that runs once, at the cell the block landed on.
pub trait PlacementAware {
    fn kind(&self) -> TriggerKind;

    fn on_placement(&self, board: &mut Board, cell: Cell) -> Animation;
}

/// Destroys every block within [`BOMB_REACH`] of the landing cell, itself included.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bomb;

/// Pulls blocks in each cardinal direction towards the landing cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct Magnet;

static BOMB: Bomb = Bomb;
static MAGNET: Magnet = Magnet;

/// Handler for a trigger kind.
pub fn handler(kind: TriggerKind) -> &'static dyn PlacementAware {
    match kind {
        TriggerKind::Bomb => &BOMB,
        TriggerKind::Magnet => &MAGNET,
    }
}

impl Bomb {
    /// Cells the blast reaches around `cell`, clipped to the board.
    pub fn blast_cells(cell: Cell) -> impl Iterator<Item = Cell> {
        (-BOMB_RADIUS..=BOMB_RADIUS)
            .flat_map(|dy| (-BOMB_RADIUS..=BOMB_RADIUS).map(move |dx| Cell::new(dx, dy)))
            .filter(|d| d.length() <= BOMB_REACH)
            .map(move |d| cell + d)
            .filter(|c| c.in_bounds())
    }
}

impl PlacementAware for Bomb {
    fn kind(&self) -> TriggerKind {
        TriggerKind::Bomb
    }

    fn on_placement(&self, board: &mut Board, cell: Cell) -> Animation {
        let cells: Vec<(Cell, Block)> = Self::blast_cells(cell)
            .filter_map(|c| board.take(c).map(|block| (c, block)))
            .collect();
        Animation::BombBurn {
            origin: cell,
            cells,
        }
    }
}

impl PlacementAware for Magnet {
    fn kind(&self) -> TriggerKind {
        TriggerKind::Magnet
    }

    fn on_placement(&self, board: &mut Board, cell: Cell) -> Animation {
        let mut moves = Vec::new();

        for dir in [Cell::UP, Cell::DOWN, Cell::RIGHT, Cell::LEFT] {
            let mut pulled = 0;
            for n in 1..=MAGNET_DISTANCE {
                let from = cell + dir.scale(n);
                let Some(block) = board.take(from) else {
                    continue;
                };
                pulled += 1;
                let to = cell + dir.scale(pulled);
                board.set(to, Some(block));
                if to != from {
                    moves.push(BlockMove { from, to, block });
                }
            }
        }

        Animation::MagnetSettle {
            origin: cell,
            moves,
        }
    }
}
