//! Board tests - geometry, space checks, compaction and row shifts

use shiftris::core::{Block, Board};
use shiftris::types::{Cell, Color, SpaceCheck, BOARD_HEIGHT, BOARD_WIDTH};

fn block(id: u32) -> Option<Block> {
    Some(Block::new(id, Color::WHITE))
}

#[test]
fn test_board_new_empty() {
    let board = Board::new();
    assert_eq!(board.width(), BOARD_WIDTH);
    assert_eq!(board.height(), BOARD_HEIGHT);

    for y in 0..BOARD_HEIGHT as i8 {
        for x in 0..BOARD_WIDTH as i8 {
            assert_eq!(board.get(Cell::new(x, y)), Some(None), "cell ({}, {})", x, y);
        }
    }
    assert_eq!(board.ceiling_height(), 0);
}

#[test]
fn test_board_get_out_of_bounds() {
    let board = Board::new();
    assert_eq!(board.get(Cell::new(-1, 0)), None);
    assert_eq!(board.get(Cell::new(0, -1)), None);
    assert_eq!(board.get(Cell::new(BOARD_WIDTH as i8, 0)), None);
    assert_eq!(board.get(Cell::new(0, BOARD_HEIGHT as i8)), None);
}

#[test]
fn test_board_set_and_take() {
    let mut board = Board::new();
    assert!(board.set(Cell::new(5, 10), block(7)));
    assert_eq!(board.block(Cell::new(5, 10)).map(|b| b.id), Some(7));
    assert!(!board.set(Cell::new(11, 0), block(8)));

    assert_eq!(board.take(Cell::new(5, 10)).map(|b| b.id), Some(7));
    assert!(!board.is_occupied(Cell::new(5, 10)));
    assert_eq!(board.take(Cell::new(5, 10)), None);
}

#[test]
fn test_space_classification() {
    let mut board = Board::new();
    board.set(Cell::new(3, 3), block(1));

    assert_eq!(board.assert_space(Cell::new(-1, 5), false), SpaceCheck::Side);
    assert_eq!(board.assert_space(Cell::new(11, 5), true), SpaceCheck::Side);
    assert_eq!(board.assert_space(Cell::new(4, -1), false), SpaceCheck::Floor);
    assert_eq!(board.assert_space(Cell::new(3, 3), false), SpaceCheck::Floor);
    assert_eq!(board.assert_space(Cell::new(5, 13), false), SpaceCheck::Valid);
    assert_eq!(board.assert_space(Cell::new(5, 13), true), SpaceCheck::Ceiling);
    assert_eq!(board.assert_space(Cell::new(5, 12), true), SpaceCheck::Valid);
}

#[test]
fn test_ceiling_height_counts_non_empty_rows() {
    let board = Board::from_ascii(&[
        "#..........",
        "...........",
        "....#......",
        "...........",
    ]);
    // rows 1 and 3 hold blocks; the gap between them is not counted
    assert_eq!(board.ceiling_height(), 2);
}

#[test]
fn test_full_rows_and_compaction() {
    let mut board = Board::from_ascii(&[
        "..#........",
        "###########",
        "#.#........",
        "###########",
    ]);
    assert_eq!(board.full_rows().as_slice(), &[0, 2]);

    let destroyed = board.clear_rows(&[0, 2]);
    assert_eq!(destroyed.len(), 22);

    let rows = board.to_ascii();
    assert_eq!(rows[12], "#.#........");
    assert_eq!(rows[11], "..#........");
    assert_eq!(board.occupied().count(), 3);
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
fn test_rotate_row_ignores_bad_rows() {
    let mut board = Board::from_ascii(&["#.........."]);
    assert!(board.rotate_row(13, 1).is_empty());
    assert!(board.rotate_row(0, 0).is_empty());
    assert_eq!(board.to_ascii()[12], "#..........");
}
