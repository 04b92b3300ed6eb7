//! Shape module - tetromino geometry and nudge-compensated rotation
//!
//! A shape is four cell offsets around an origin. `offsets[0]` is the pivot:
//! a quarter turn rotates the other three offsets about it, then shifts the whole
//! shape by a per-shape nudge vector. The nudges rotate along with the shape, so a
//! turn in one direction followed by a turn in the other lands exactly where it
//! started, and four turns in the same direction are the identity.

use crate::rng::SimpleRng;
use crate::types::{Cell, ShapeKind, Turn};

/// Library entry: offsets plus the clockwise and counter-clockwise nudges.
struct Template {
    offsets: [Cell; 4],
    nudge_cw: Cell,
    nudge_ccw: Cell,
}

const fn c(x: i8, y: i8) -> Cell {
    Cell::new(x, y)
}

const I_TEMPLATE: Template = Template {
    offsets: [c(0, 1), c(0, 0), c(0, 2), c(0, 3)],
    nudge_cw: Cell::ZERO,
    nudge_ccw: Cell::ZERO,
};

const Z_TEMPLATE: Template = Template {
    offsets: [c(0, 0), c(1, 0), c(0, 1), c(-1, 1)],
    nudge_cw: Cell::ZERO,
    nudge_ccw: Cell::ZERO,
};

const S_TEMPLATE: Template = Template {
    offsets: [c(0, 0), c(-1, 0), c(0, 1), c(1, 1)],
    nudge_cw: Cell::ZERO,
    nudge_ccw: Cell::ZERO,
};

const L_TEMPLATE: Template = Template {
    offsets: [c(0, 0), c(0, 1), c(0, 2), c(1, 0)],
    nudge_cw: c(0, 1),
    nudge_ccw: c(1, 0),
};

const J_TEMPLATE: Template = Template {
    offsets: [c(0, 0), c(0, 1), c(0, 2), c(-1, 0)],
    nudge_cw: c(-1, 0),
    nudge_ccw: c(0, 1),
};

const O_TEMPLATE: Template = Template {
    offsets: [c(0, 0), c(0, 1), c(1, 0), c(1, 1)],
    nudge_cw: c(0, 1),
    nudge_ccw: c(1, 0),
};

const T_TEMPLATE: Template = Template {
    offsets: [c(1, 0), c(0, 0), c(2, 0), c(1, 1)],
    nudge_cw: Cell::ZERO,
    nudge_ccw: Cell::ZERO,
};

fn template(kind: ShapeKind) -> &'static Template {
    match kind {
        ShapeKind::I => &I_TEMPLATE,
        ShapeKind::Z => &Z_TEMPLATE,
        ShapeKind::S => &S_TEMPLATE,
        ShapeKind::L => &L_TEMPLATE,
        ShapeKind::J => &J_TEMPLATE,
        ShapeKind::O => &O_TEMPLATE,
        ShapeKind::T => &T_TEMPLATE,
    }
}

/// A tetromino: four offsets from `origin`.
///
/// `Clone` is a deep copy; two shapes never share geometry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    kind: ShapeKind,
    offsets: [Cell; 4],
    nudge_cw: Cell,
    nudge_ccw: Cell,
    /// Absolute board position the offsets are relative to.
    pub origin: Cell,
}

impl Shape {
    /// Fresh copy of a library shape with its origin at (0, 0).
    pub fn new(kind: ShapeKind) -> Self {
        let t = template(kind);
        Self {
            kind,
            offsets: t.offsets,
            nudge_cw: t.nudge_cw,
            nudge_ccw: t.nudge_ccw,
            origin: Cell::ZERO,
        }
    }

    /// Uniform draw over the library.
    pub fn random(rng: &mut SimpleRng) -> Self {
        let kind = ShapeKind::ALL[rng.next_range(ShapeKind::ALL.len() as u32) as usize];
        Self::new(kind)
    }

    /// Same shape placed at `origin`.
    pub fn at(mut self, origin: Cell) -> Self {
        self.origin = origin;
        self
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Relative offset of block `i`.
    pub fn offset(&self, i: usize) -> Cell {
        self.offsets[i]
    }

    pub fn offsets(&self) -> &[Cell; 4] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Current (clockwise, counter-clockwise) nudge vectors.
    pub fn nudges(&self) -> (Cell, Cell) {
        (self.nudge_cw, self.nudge_ccw)
    }

    /// Absolute board cells, in offset order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.offsets.iter().map(move |&o| o + self.origin)
    }

    /// Absolute board cell of block `i`.
    pub fn cell(&self, i: usize) -> Cell {
        self.offsets[i] + self.origin
    }

    pub fn rotate_cw(&mut self) -> &mut Self {
        self.rotate(Turn::Cw)
    }

    pub fn rotate_ccw(&mut self) -> &mut Self {
        self.rotate(Turn::Ccw)
    }

    /// Quarter turn about `offsets[0]`, then apply the matching nudge.
    pub fn rotate(&mut self, turn: Turn) -> &mut Self {
        let (spin, nudge): (fn(Cell) -> Cell, Cell) = match turn {
            Turn::Cw => (Cell::turn_cw, self.nudge_cw),
            Turn::Ccw => (Cell::turn_ccw, self.nudge_ccw),
        };

        let pivot = self.offsets[0];
        for offset in &mut self.offsets[1..] {
            *offset = pivot + spin(*offset - pivot) + nudge;
        }
        self.offsets[0] += nudge;

        self.nudge_cw = spin(self.nudge_cw);
        self.nudge_ccw = spin(self.nudge_ccw);
        self
    }

    /// Bounding box of the offsets as (min, max), ignoring the origin.
    pub fn bounds(&self) -> (Cell, Cell) {
        let mut min = self.offsets[0];
        let mut max = self.offsets[0];
        for o in &self.offsets[1..] {
            min.x = min.x.min(o.x);
            min.y = min.y.min(o.y);
            max.x = max.x.max(o.x);
            max.y = max.y.max(o.y);
        }
        (min, max)
    }
}
