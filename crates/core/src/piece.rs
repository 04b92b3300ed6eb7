//! The falling piece: a shape plus the four blocks it will leave on the board.

use crate::board::Block;
use crate::shape::Shape;
use crate::types::{Cell, TriggerKind};

#[derive(Debug, Clone, PartialEq)]
pub struct ActivePiece {
    pub shape: Shape,
    /// Block `i` sits at `shape.cell(i)`.
    pub blocks: [Block; 4],
}

impl ActivePiece {
    pub fn new(shape: Shape, blocks: [Block; 4]) -> Self {
        Self { shape, blocks }
    }

    /// Absolute cells paired with their blocks, in offset order.
    pub fn cells(&self) -> impl Iterator<Item = (Cell, Block)> + '_ {
        self.shape.cells().zip(self.blocks.iter().copied())
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.shape.cells().any(|c| c == cell)
    }

    /// Indices of blocks that do not carry a trigger yet.
    pub fn unarmed(&self) -> impl Iterator<Item = usize> + '_ {
        self.blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| b.trigger.is_none())
            .map(|(i, _)| i)
    }

    pub fn arm(&mut self, index: usize, trigger: TriggerKind) {
        self.blocks[index].trigger = Some(trigger);
    }
}
