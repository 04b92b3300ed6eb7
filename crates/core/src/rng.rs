//! RNG module - deterministic randomness and the next-shape queue
//!
//! Every random decision in a game (shape, pre-rotation, colour, effect roll,
//! row-shift span) is drawn from a seeded LCG, so the same seed replays the same
//! game given the same inputs.

use crate::shape::Shape;
use crate::types::{Color, Turn};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max). Returns 0 when `max` is 0.
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // High bits of an LCG are far better distributed than the low ones.
        (self.next_u32() >> 8) % max
    }

    /// Integer in `[lo, hi)`, or `lo` when the range is empty.
    pub fn range(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        lo + self.next_range((hi - lo) as u32) as i32
    }

    pub fn next_bool(&mut self) -> bool {
        self.next_range(2) == 0
    }

    /// Float in `[0, 1)`.
    pub fn next_unit(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Float in `[lo, hi)`.
    pub fn next_f32(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_unit()
    }
}

/// A pre-rolled shape waiting in the preview slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub shape: Shape,
    pub color: Color,
}

/// Holds the next shape so it can be shown before it spawns.
#[derive(Debug, Clone)]
pub struct ShapeQueue {
    next: Preview,
    rng: SimpleRng,
}

impl ShapeQueue {
    pub fn new(seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let next = Self::roll(&mut rng);
        Self { next, rng }
    }

    /// Random library shape, turned 0-2 times in one random direction, with a
    /// saturated random colour.
    fn roll(rng: &mut SimpleRng) -> Preview {
        let mut shape = Shape::random(rng);
        let turns = rng.range(0, 3);
        let turn = if rng.next_bool() { Turn::Cw } else { Turn::Ccw };
        for _ in 0..turns {
            shape.rotate(turn);
        }

        let color = Color::from_hsv(
            rng.next_unit(),
            rng.next_f32(0.8, 1.0),
            rng.next_f32(0.8, 1.0),
        );
        Preview { shape, color }
    }

    /// Look at the shape that the next `draw` returns.
    pub fn peek(&self) -> &Preview {
        &self.next
    }

    /// Take the previewed shape and roll a new one into its place.
    pub fn draw(&mut self) -> Preview {
        let fresh = Self::roll(&mut self.rng);
        std::mem::replace(&mut self.next, fresh)
    }
}

impl Default for ShapeQueue {
    fn default() -> Self {
        Self::new(1)
    }
}
