//! Board module - manages the game grid
//!
//! The board is an 11x13 grid where each cell is either empty or holds a [`Block`].
//! Storage is a flat row-major array (no allocation on the hot path).
//! Coordinates: (x, y) where x ranges 0..10 (left to right) and y ranges 0..12
//! (**bottom to top**). Rows at y >= 13 are not stored; falling shapes may occupy
//! them and are checked against them through [`SpaceCheck::Ceiling`].

use arrayvec::ArrayVec;
use serde::Serialize;

use crate::shape::Shape;
use crate::types::{Cell, Color, SpaceCheck, TriggerKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = BOARD_WIDTH as usize * BOARD_HEIGHT as usize;

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

/// One occupied cell.
///
/// `id` is a handle the presenter can key its visuals on; it is unique within a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Block {
    pub id: u32,
    pub color: Color,
    /// Placement-aware attachment. Only blocks of the falling piece carry one;
    /// it is consumed when the piece locks.
    pub trigger: Option<TriggerKind>,
}

impl Block {
    pub fn new(id: u32, color: Color) -> Self {
        Self {
            id,
            color,
            trigger: None,
        }
    }

    pub fn with_trigger(mut self, trigger: TriggerKind) -> Self {
        self.trigger = Some(trigger);
        self
    }
}

/// Board cell content (None = empty)
pub type Slot = Option<Block>;

/// A block that changed position during a board mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockMove {
    pub from: Cell,
    pub to: Cell,
    pub block: Block,
}

/// The game board - 11 columns x 13 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of slots, row-major order (y * WIDTH + x)
    cells: [Slot; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    #[inline(always)]
    fn index(cell: Cell) -> Option<usize> {
        if !cell.in_bounds() {
            return None;
        }
        Some(cell.y as usize * WIDTH + cell.x as usize)
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Slot at `cell`, or None if out of bounds.
    pub fn get(&self, cell: Cell) -> Option<Slot> {
        Self::index(cell).map(|idx| self.cells[idx])
    }

    /// Block at `cell`, if the cell is on the board and occupied.
    pub fn block(&self, cell: Cell) -> Option<&Block> {
        Self::index(cell).and_then(|idx| self.cells[idx].as_ref())
    }

    /// Set slot at `cell`. Returns false if out of bounds.
    pub fn set(&mut self, cell: Cell, slot: Slot) -> bool {
        match Self::index(cell) {
            Some(idx) => {
                self.cells[idx] = slot;
                true
            }
            None => false,
        }
    }

    /// Remove and return the block at `cell`.
    pub fn take(&mut self, cell: Cell) -> Option<Block> {
        Self::index(cell).and_then(|idx| self.cells[idx].take())
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, cell: Cell) -> bool {
        matches!(self.get(cell), Some(Some(_)))
    }

    /// Classify whether a falling block may sit at `cell`.
    ///
    /// Cells above the board are `Valid` unless `check_ceiling` is set, in which
    /// case they report `Ceiling`.
    pub fn assert_space(&self, cell: Cell, check_ceiling: bool) -> SpaceCheck {
        if cell.x < 0 || cell.x >= BOARD_WIDTH as i8 {
            return SpaceCheck::Side;
        }
        if cell.y < 0 {
            return SpaceCheck::Floor;
        }
        if cell.y >= BOARD_HEIGHT as i8 {
            return if check_ceiling {
                SpaceCheck::Ceiling
            } else {
                SpaceCheck::Valid
            };
        }
        if self.is_occupied(cell) {
            SpaceCheck::Floor
        } else {
            SpaceCheck::Valid
        }
    }

    /// Check all cells of a shape.
    ///
    /// A `Ceiling` hit wins immediately; otherwise the last non-valid reason seen
    /// is returned.
    pub fn assert_shape(&self, shape: &Shape, check_ceiling: bool) -> SpaceCheck {
        let mut result = SpaceCheck::Valid;
        for cell in shape.cells() {
            match self.assert_space(cell, check_ceiling) {
                SpaceCheck::Ceiling => return SpaceCheck::Ceiling,
                SpaceCheck::Valid => {}
                reason => result = reason,
            }
        }
        result
    }

    fn row(&self, y: usize) -> &[Slot] {
        &self.cells[y * WIDTH..(y + 1) * WIDTH]
    }

    /// Number of rows holding at least one block.
    pub fn ceiling_height(&self) -> u8 {
        (0..HEIGHT)
            .filter(|&y| self.row(y).iter().any(Option::is_some))
            .count() as u8
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: i8) -> bool {
        if y < 0 || y >= BOARD_HEIGHT as i8 {
            return false;
        }
        self.row(y as usize).iter().all(Option::is_some)
    }

    /// Indices of full rows, ascending (bottom first).
    pub fn full_rows(&self) -> ArrayVec<i8, HEIGHT> {
        (0..BOARD_HEIGHT as i8).filter(|&y| self.is_row_full(y)).collect()
    }

    /// Remove the given rows and let everything above fall into the gaps.
    ///
    /// `rows` must be ascending. Each surviving row drops by the number of removed
    /// rows beneath it, so non-adjacent clears keep the relative order of the rows
    /// between them. Returns the destroyed blocks.
    pub fn clear_rows(&mut self, rows: &[i8]) -> Vec<(Cell, Block)> {
        let mut destroyed = Vec::with_capacity(rows.len() * WIDTH);
        if rows.is_empty() {
            return destroyed;
        }

        let mut pending = rows.iter().copied().peekable();
        let mut write_y = 0usize;

        // Scan from bottom to top
        for read_y in 0..HEIGHT {
            if pending.peek() == Some(&(read_y as i8)) {
                pending.next();
                for x in 0..WIDTH {
                    if let Some(block) = self.cells[read_y * WIDTH + x].take() {
                        destroyed.push((Cell::new(x as i8, read_y as i8), block));
                    }
                }
                continue;
            }

            if write_y != read_y {
                let src = read_y * WIDTH;
                self.cells.copy_within(src..src + WIDTH, write_y * WIDTH);
            }
            write_y += 1;
        }

        // Vacate the rows left at the top
        self.cells[write_y * WIDTH..].fill(None);

        destroyed
    }

    /// Shift row `y` by one cell (`dir` = -1 left, +1 right), wrapping around.
    ///
    /// Returns the moves performed. Out-of-range rows are left untouched.
    pub fn rotate_row(&mut self, y: i8, dir: i8) -> ArrayVec<BlockMove, WIDTH> {
        let mut moves = ArrayVec::new();
        if y < 0 || y >= BOARD_HEIGHT as i8 || dir == 0 {
            return moves;
        }

        let start = y as usize * WIDTH;
        let row = &mut self.cells[start..start + WIDTH];
        for (x, slot) in row.iter().enumerate() {
            if let Some(block) = slot {
                let to_x = (x as i8 + dir).rem_euclid(BOARD_WIDTH as i8);
                moves.push(BlockMove {
                    from: Cell::new(x as i8, y),
                    to: Cell::new(to_x, y),
                    block: *block,
                });
            }
        }

        if dir > 0 {
            row.rotate_right(1);
        } else {
            row.rotate_left(1);
        }
        moves
    }

    /// Iterate over all occupied cells.
    pub fn occupied(&self) -> impl Iterator<Item = (Cell, &Block)> + '_ {
        self.cells.iter().enumerate().filter_map(|(idx, slot)| {
            slot.as_ref().map(|block| {
                let cell = Cell::new((idx % WIDTH) as i8, (idx / WIDTH) as i8);
                (cell, block)
            })
        })
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Build a board from rows written top row first, `#` for a block.
    ///
    /// Handy for describing positions in tests and scripted setups; missing rows
    /// at the bottom are left empty.
    pub fn from_ascii(rows: &[&str]) -> Self {
        let mut board = Self::new();
        let top = rows.len().min(HEIGHT);
        let mut id = 0;
        for (i, line) in rows.iter().take(top).enumerate() {
            let y = (top - 1 - i) as i8;
            for (x, ch) in line.chars().take(WIDTH).enumerate() {
                if ch == '#' {
                    id += 1;
                    board.set(Cell::new(x as i8, y), Some(Block::new(id, Color::WHITE)));
                }
            }
        }
        board
    }

    /// Render as rows top row first, `#` for a block and `.` for empty.
    pub fn to_ascii(&self) -> Vec<String> {
        (0..HEIGHT)
            .rev()
            .map(|y| {
                self.row(y)
                    .iter()
                    .map(|slot| if slot.is_some() { '#' } else { '.' })
                    .collect()
            })
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(id: u32) -> Slot {
        Some(Block::new(id, Color::WHITE))
    }

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(Cell::new(0, 0)), Some(0));
        assert_eq!(Board::index(Cell::new(10, 0)), Some(10));
        assert_eq!(Board::index(Cell::new(0, 1)), Some(11));
        assert_eq!(Board::index(Cell::new(10, 12)), Some(142));
        assert_eq!(Board::index(Cell::new(-1, 0)), None);
        assert_eq!(Board::index(Cell::new(11, 0)), None);
        assert_eq!(Board::index(Cell::new(0, 13)), None);
    }

    #[test]
    fn test_take_empties_cell() {
        let mut board = Board::new();
        board.set(Cell::new(2, 3), block(9));
        assert_eq!(board.take(Cell::new(2, 3)).map(|b| b.id), Some(9));
        assert!(!board.is_occupied(Cell::new(2, 3)));
        assert_eq!(board.take(Cell::new(2, 3)), None);
    }

    #[test]
    fn test_assert_shape_prefers_ceiling() {
        let board = Board::new();
        // One cell off the left wall, one above the board.
        let shape = Shape::new(crate::types::ShapeKind::O).at(Cell::new(-1, 12));
        assert_eq!(board.assert_shape(&shape, false), SpaceCheck::Side);
        assert_eq!(board.assert_shape(&shape, true), SpaceCheck::Ceiling);
    }

    #[test]
    fn test_assert_shape_reports_last_reason() {
        let mut board = Board::new();
        board.set(Cell::new(1, 0), block(1));
        // I piece: cells (0,1)(0,0)(0,2)(0,3) shifted to x=-1 -> side on every cell
        let side = Shape::new(crate::types::ShapeKind::I).at(Cell::new(-1, 0));
        assert_eq!(board.assert_shape(&side, false), SpaceCheck::Side);

        // T piece at origin (0,0): cells (1,0)(0,0)(2,0)(1,1); (1,0) occupied
        let t = Shape::new(crate::types::ShapeKind::T).at(Cell::new(0, 0));
        assert_eq!(board.assert_shape(&t, false), SpaceCheck::Floor);
    }

    #[test]
    fn test_ceiling_height_counts_rows() {
        let mut board = Board::new();
        assert_eq!(board.ceiling_height(), 0);
        board.set(Cell::new(0, 0), block(1));
        board.set(Cell::new(3, 0), block(2));
        board.set(Cell::new(5, 4), block(3));
        assert_eq!(board.ceiling_height(), 2);
    }

    #[test]
    fn test_rotate_row_wraps() {
        let mut board = Board::from_ascii(&["#.........#"]);
        let moves = board.rotate_row(0, 1);
        assert_eq!(board.to_ascii()[12], "##.........");
        assert_eq!(moves.len(), 2);
        assert!(moves
            .iter()
            .any(|m| m.from == Cell::new(10, 0) && m.to == Cell::new(0, 0)));

        board.rotate_row(0, -1);
        board.rotate_row(0, -1);
        assert_eq!(board.to_ascii()[12], ".........##");
    }

    #[test]
    fn test_clear_rows_noop_on_empty_list() {
        let mut board = Board::from_ascii(&["#.#", "###########"]);
        let before = board.clone();
        assert!(board.clear_rows(&[]).is_empty());
        assert_eq!(board, before);
    }

    #[test]
    fn test_ascii_roundtrip_rows() {
        let board = Board::from_ascii(&["#..", "..#"]);
        assert!(board.is_occupied(Cell::new(0, 1)));
        assert!(board.is_occupied(Cell::new(2, 0)));
        assert_eq!(board.to_ascii()[11], "#..........");
        assert_eq!(board.to_ascii()[12], "..#........");
    }
}
