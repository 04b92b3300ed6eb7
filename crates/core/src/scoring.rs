//! Scoring module - line-clear points and the speed-up ratchet
//!
//! Clearing `k` rows at once is worth `10 * k²` points (1 row = 10, 2 = 40,
//! 3 = 90, 4 = 160). Whenever the running score reaches the current speed point,
//! gravity gets 20% faster and the next speed point moves up by 80%.

use serde::Serialize;

use crate::types::{
    BASE_GRAVITY_MS, INITIAL_SPEED_POINT, LINE_SCORE_BASE, SOFT_DROP_MS, SPEED_POINT_DENOMINATOR,
    SPEED_POINT_NUMERATOR, SPEED_UP_DENOMINATOR, SPEED_UP_NUMERATOR,
};

/// Points for clearing `rows` rows in a single lock.
pub fn line_clear_score(rows: usize) -> u32 {
    let k = rows as u32;
    LINE_SCORE_BASE.saturating_mul(k.saturating_mul(k))
}

/// Gravity interval and the score at which it next speeds up.
///
/// Both values only move one way during a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpeedCurve {
    gravity_ms: u32,
    speed_point: u32,
}

impl SpeedCurve {
    pub fn new() -> Self {
        Self {
            gravity_ms: BASE_GRAVITY_MS,
            speed_point: INITIAL_SPEED_POINT,
        }
    }

    /// Current gravity interval in milliseconds.
    pub fn gravity_ms(&self) -> u32 {
        self.gravity_ms
    }

    /// Score that triggers the next speed-up.
    pub fn speed_point(&self) -> u32 {
        self.speed_point
    }

    /// Feed the score after a clear. Returns true when gravity sped up.
    ///
    /// At most one step is taken per call, however far the score overshoots.
    pub fn record(&mut self, score: u32) -> bool {
        if score < self.speed_point {
            return false;
        }
        self.speed_point = self
            .speed_point
            .saturating_mul(SPEED_POINT_NUMERATOR)
            / SPEED_POINT_DENOMINATOR;
        self.gravity_ms =
            (self.gravity_ms * SPEED_UP_NUMERATOR / SPEED_UP_DENOMINATOR).max(SOFT_DROP_MS);
        true
    }
}

impl Default for SpeedCurve {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_clear_score_is_quadratic() {
        assert_eq!(line_clear_score(0), 0);
        assert_eq!(line_clear_score(1), 10);
        assert_eq!(line_clear_score(2), 40);
        assert_eq!(line_clear_score(3), 90);
        assert_eq!(line_clear_score(4), 160);
    }

    #[test]
    fn test_speed_curve_ratchet() {
        let mut curve = SpeedCurve::new();
        assert_eq!((curve.gravity_ms(), curve.speed_point()), (1000, 60));

        assert!(!curve.record(50));
        assert!(curve.record(60));
        assert_eq!((curve.gravity_ms(), curve.speed_point()), (800, 108));

        assert!(curve.record(120));
        assert_eq!((curve.gravity_ms(), curve.speed_point()), (640, 194));
    }

    #[test]
    fn test_speed_curve_single_step_per_clear() {
        let mut curve = SpeedCurve::new();
        assert!(curve.record(10_000));
        assert_eq!(curve.speed_point(), 108);
        assert_eq!(curve.gravity_ms(), 800);
    }

    #[test]
    fn test_gravity_never_below_soft_drop() {
        let mut curve = SpeedCurve::new();
        for _ in 0..40 {
            curve.record(u32::MAX);
        }
        assert_eq!(curve.gravity_ms(), SOFT_DROP_MS);
    }
}
