//! Shape tests - library geometry, rotation and the shape queue

use shiftris::core::{Shape, ShapeQueue};
use shiftris::types::{Cell, ShapeKind, Turn};

#[test]
fn test_every_library_shape_has_four_distinct_cells() {
    for kind in ShapeKind::ALL {
        let shape = Shape::new(kind);
        let offsets = shape.offsets();
        for i in 0..4 {
            for j in i + 1..4 {
                assert_ne!(offsets[i], offsets[j], "{:?} repeats a cell", kind);
            }
        }
        assert_eq!(shape.origin, Cell::ZERO);
        assert_eq!(shape.kind(), kind);
    }
}

#[test]
fn test_four_turns_are_identity() {
    for kind in ShapeKind::ALL {
        for turn in [Turn::Cw, Turn::Ccw] {
            let original = Shape::new(kind);
            let mut shape = original.clone();
            for _ in 0..4 {
                shape.rotate(turn);
            }
            assert_eq!(shape, original, "{:?} {:?}", kind, turn);
        }
    }
}

#[test]
fn test_reverse_sequence_restores_shape() {
    let turns = [Turn::Cw, Turn::Cw, Turn::Ccw, Turn::Cw, Turn::Ccw, Turn::Ccw, Turn::Cw];
    for kind in ShapeKind::ALL {
        let original = Shape::new(kind).at(Cell::new(4, 6));
        let mut shape = original.clone();
        for turn in turns {
            shape.rotate(turn);
        }
        for turn in turns.iter().rev() {
            shape.rotate(turn.opposite());
        }
        assert_eq!(shape, original, "{:?}", kind);
    }
}

#[test]
fn test_rotation_keeps_origin() {
    let mut shape = Shape::new(ShapeKind::T).at(Cell::new(5, 5));
    shape.rotate_cw();
    assert_eq!(shape.origin, Cell::new(5, 5));
}

#[test]
fn test_queue_is_deterministic_per_seed() {
    let mut a = ShapeQueue::new(99);
    let mut b = ShapeQueue::new(99);
    for _ in 0..50 {
        let (pa, pb) = (a.draw(), b.draw());
        assert_eq!(pa.shape, pb.shape);
        assert_eq!(pa.color, pb.color);
    }
}

#[test]
fn test_queue_draw_returns_the_previewed_shape() {
    let mut queue = ShapeQueue::new(5);
    for _ in 0..20 {
        let peeked = queue.peek().shape.clone();
        assert_eq!(queue.draw().shape, peeked);
    }
}

#[test]
fn test_queue_covers_the_library() {
    let mut queue = ShapeQueue::new(1);
    let mut seen = std::collections::HashSet::new();
    for _ in 0..500 {
        seen.insert(queue.draw().shape.kind());
    }
    assert_eq!(seen.len(), ShapeKind::ALL.len());
}
