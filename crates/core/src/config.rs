use crate::types::{DEFAULT_MAX_ANIMATION_MS, EFFECT_PERIOD_TICKS};

/// Stage tunables.
///
/// Environment:
/// - `SHIFTRIS_SEED` (u32, default 1)
/// - `SHIFTRIS_EFFECTS_DISABLED` (`1`/`true` turns the effect rounds off)
/// - `SHIFTRIS_EFFECT_PERIOD` (countdown ticks between effect rounds, default 10)
/// - `SHIFTRIS_MAX_ANIMATION_MS` (cap on a single presenter wait, default 5000)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageConfig {
    pub seed: u32,
    pub effects_enabled: bool,
    pub effect_period: u32,
    pub max_animation_ms: u32,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            effects_enabled: true,
            effect_period: EFFECT_PERIOD_TICKS,
            max_animation_ms: DEFAULT_MAX_ANIMATION_MS,
        }
    }
}

impl StageConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unparsable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(v) = lookup("SHIFTRIS_SEED") {
            if let Ok(seed) = v.trim().parse::<u32>() {
                cfg.seed = seed;
            }
        }

        if let Some(v) = lookup("SHIFTRIS_EFFECTS_DISABLED") {
            let v = v.trim();
            if v == "1" || v.eq_ignore_ascii_case("true") {
                cfg.effects_enabled = false;
            }
        }

        if let Some(v) = lookup("SHIFTRIS_EFFECT_PERIOD") {
            if let Ok(period) = v.trim().parse::<u32>() {
                if period > 0 {
                    cfg.effect_period = period;
                }
            }
        }

        if let Some(v) = lookup("SHIFTRIS_MAX_ANIMATION_MS") {
            if let Ok(ms) = v.trim().parse::<u32>() {
                cfg.max_animation_ms = ms;
            }
        }

        cfg
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn without_effects(mut self) -> Self {
        self.effects_enabled = false;
        self
    }
}
