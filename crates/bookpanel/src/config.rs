use serde::{Deserialize, Serialize};

/// Default quiescence delay before a typed query is evaluated.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 200;

/// Default hold duration before a press becomes a context-menu request.
pub const DEFAULT_LONG_PRESS_MS: u64 = 480;

/// Default number of extra rows materialized above and below the viewport.
pub const DEFAULT_OVERSCAN: usize = 8;

/// Tunables for the panel engine. All timings are host-tick driven.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub search_debounce_ms: u64,
    pub long_press_ms: u64,
    pub overscan: usize,
}

impl Default for PanelConfig {
    fn default() -> Self {
        PanelConfig {
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            long_press_ms: DEFAULT_LONG_PRESS_MS,
            overscan: DEFAULT_OVERSCAN,
        }
    }
}
