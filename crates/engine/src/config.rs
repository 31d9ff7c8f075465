use std::time::Duration;

use tui_scene_core::types::{DEFAULT_MAX_COLLISION_WORKERS, TICK_MS};

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub tick_ms: u32,
    pub max_collision_workers: usize,
    /// Redraw every cell on every frame instead of diffing.
    pub force_flush: bool,
    /// Tab rotates focus in active scenes instead of reaching entities.
    pub focus_cycle: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_ms: TICK_MS,
            max_collision_workers: DEFAULT_MAX_COLLISION_WORKERS,
            force_flush: false,
            focus_cycle: true,
        }
    }
}

impl EngineConfig {
    /// Read `TUI_SCENE_*` variables, falling back to defaults for anything
    /// missing or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`EngineConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let tick_ms = lookup("TUI_SCENE_TICK_MS")
            .and_then(|s| s.trim().parse().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(defaults.tick_ms);

        let max_collision_workers = lookup("TUI_SCENE_MAX_COLLISION_WORKERS")
            .and_then(|s| s.trim().parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.max_collision_workers);

        let force_flush = lookup("TUI_SCENE_FORCE_FLUSH")
            .and_then(|s| parse_flag(&s))
            .unwrap_or(defaults.force_flush);

        let focus_cycle = lookup("TUI_SCENE_FOCUS_CYCLE")
            .and_then(|s| parse_flag(&s))
            .unwrap_or(defaults.focus_cycle);

        Self {
            tick_ms,
            max_collision_workers,
            force_flush,
            focus_cycle,
        }
    }

    pub fn tick_duration(&self) -> Duration {
        Duration::from_millis(self.tick_ms as u64)
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
