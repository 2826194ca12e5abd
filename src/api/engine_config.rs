use serde::{Deserialize, Serialize};

use crate::core::{Granularity, Millis};

/// Public engine bootstrap configuration.
///
/// This type is serializable so host applications can persist/load tuning
/// without inventing their own ad-hoc format. The delay constants are tuning
/// knobs for layout-settling latency, not behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportEngineConfig {
    /// Margin kept between a target and every usable-window edge.
    #[serde(default = "default_edge_margin_px")]
    pub edge_margin_px: f64,
    /// Gap left before a minimap target column that was off-screen to the right.
    #[serde(default = "default_column_lead_in_px")]
    pub column_lead_in_px: f64,
    #[serde(default = "default_animation_duration_ms")]
    pub animation_duration_ms: Millis,
    /// Smallest offset change worth writing during an animation.
    #[serde(default = "default_animation_epsilon_px")]
    pub animation_epsilon_px: f64,
    #[serde(default = "default_debounce_delay_ms")]
    pub debounce_delay_ms: Millis,
    /// Debounced requests moving less than this are dropped.
    #[serde(default = "default_denoise_threshold_px")]
    pub denoise_threshold_px: f64,
    #[serde(default = "default_locate_timeout_ms")]
    pub locate_timeout_ms: Millis,
    #[serde(default = "default_guard_window_ms")]
    pub guard_window_ms: Millis,
    /// Delay of the animated second pass after a passive correction.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: Millis,
    #[serde(default = "default_follow_selection_on_occlusion_change")]
    pub follow_selection_on_occlusion_change: bool,
    #[serde(default)]
    pub initial_granularity: Granularity,
}

impl Default for ViewportEngineConfig {
    fn default() -> Self {
        Self {
            edge_margin_px: default_edge_margin_px(),
            column_lead_in_px: default_column_lead_in_px(),
            animation_duration_ms: default_animation_duration_ms(),
            animation_epsilon_px: default_animation_epsilon_px(),
            debounce_delay_ms: default_debounce_delay_ms(),
            denoise_threshold_px: default_denoise_threshold_px(),
            locate_timeout_ms: default_locate_timeout_ms(),
            guard_window_ms: default_guard_window_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            follow_selection_on_occlusion_change: default_follow_selection_on_occlusion_change(),
            initial_granularity: Granularity::default(),
        }
    }
}

impl ViewportEngineConfig {
    #[must_use]
    pub fn new(initial_granularity: Granularity) -> Self {
        Self {
            initial_granularity,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_edge_margin_px(mut self, margin: f64) -> Self {
        self.edge_margin_px = margin;
        self
    }

    #[must_use]
    pub fn with_column_lead_in_px(mut self, lead_in: f64) -> Self {
        self.column_lead_in_px = lead_in;
        self
    }

    /// Sets eased scroll duration. Zero turns animated scrolls into jumps.
    #[must_use]
    pub fn with_animation_duration_ms(mut self, duration: Millis) -> Self {
        self.animation_duration_ms = duration;
        self
    }

    #[must_use]
    pub fn with_animation_epsilon_px(mut self, epsilon: f64) -> Self {
        self.animation_epsilon_px = epsilon;
        self
    }

    #[must_use]
    pub fn with_debounce_delay_ms(mut self, delay: Millis) -> Self {
        self.debounce_delay_ms = delay;
        self
    }

    #[must_use]
    pub fn with_denoise_threshold_px(mut self, threshold: f64) -> Self {
        self.denoise_threshold_px = threshold;
        self
    }

    #[must_use]
    pub fn with_locate_timeout_ms(mut self, timeout: Millis) -> Self {
        self.locate_timeout_ms = timeout;
        self
    }

    #[must_use]
    pub fn with_guard_window_ms(mut self, window: Millis) -> Self {
        self.guard_window_ms = window;
        self
    }

    #[must_use]
    pub fn with_settle_delay_ms(mut self, delay: Millis) -> Self {
        self.settle_delay_ms = delay;
        self
    }

    #[must_use]
    pub fn with_follow_selection_on_occlusion_change(mut self, enabled: bool) -> Self {
        self.follow_selection_on_occlusion_change = enabled;
        self
    }
}

fn default_edge_margin_px() -> f64 {
    12.0
}

fn default_column_lead_in_px() -> f64 {
    48.0
}

fn default_animation_duration_ms() -> Millis {
    300
}

fn default_animation_epsilon_px() -> f64 {
    0.5
}

fn default_debounce_delay_ms() -> Millis {
    40
}

fn default_denoise_threshold_px() -> f64 {
    5.0
}

fn default_locate_timeout_ms() -> Millis {
    2_000
}

fn default_guard_window_ms() -> Millis {
    150
}

fn default_settle_delay_ms() -> Millis {
    100
}

fn default_follow_selection_on_occlusion_change() -> bool {
    true
}
