//! Binary configuration, read from the environment.

use std::path::PathBuf;

use crate::core::StageConfig;

/// Upper bound for `SHIFTRIS_ANIMATION_PACE`.
pub const MAX_ANIMATION_PACE: u32 = 1000;

/// Everything the `shiftris` binary can be configured with.
///
/// On top of [`StageConfig`]'s variables:
/// - `SHIFTRIS_LOG_PATH`: append stage events as JSON lines to this file
/// - `SHIFTRIS_ANIMATION_PACE`: percentage applied to animation durations (default 100,
///   at most [`MAX_ANIMATION_PACE`])
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub stage: StageConfig,
    pub log_path: Option<PathBuf>,
    pub animation_pace: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            stage: StageConfig::default(),
            log_path: None,
            animation_pace: 100,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let log_path = lookup("SHIFTRIS_LOG_PATH")
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(PathBuf::from(s)) });

        let animation_pace = lookup("SHIFTRIS_ANIMATION_PACE")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(100)
            .min(MAX_ANIMATION_PACE);

        Self {
            stage: StageConfig::from_lookup(&lookup),
            log_path,
            animation_pace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_log_path_and_stage_vars() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("SHIFTRIS_LOG_PATH", " /tmp/shiftris.jsonl "),
            ("SHIFTRIS_SEED", "42"),
            ("SHIFTRIS_ANIMATION_PACE", "50"),
        ]));
        assert_eq!(cfg.log_path, Some(PathBuf::from("/tmp/shiftris.jsonl")));
        assert_eq!(cfg.stage.seed, 42);
        assert_eq!(cfg.animation_pace, 50);
    }

    #[test]
    fn test_animation_pace_is_capped() {
        let cfg = AppConfig::from_lookup(lookup(&[("SHIFTRIS_ANIMATION_PACE", "4000000000")]));
        assert_eq!(cfg.animation_pace, MAX_ANIMATION_PACE);
    }

    #[test]
    fn test_blank_log_path_is_ignored() {
        let cfg = AppConfig::from_lookup(lookup(&[("SHIFTRIS_LOG_PATH", "  ")]));
        assert_eq!(cfg.log_path, None);
    }
}
