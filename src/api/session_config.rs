use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::interaction::GestureConfig;

use super::axis_ticks::AXIS_TIME_TARGET_SPACING_PX;

/// Session bootstrap configuration.
///
/// Serializable so hosts can persist chart setup next to their own layout
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewSessionConfig {
    /// How close (ms) the right edge must sit to the newest candle for the
    /// view to count as tracking latest.
    #[serde(default = "default_tracking_epsilon_ms")]
    pub tracking_epsilon_ms: i64,
    /// Periods shown when a session starts or a product is loaded.
    #[serde(default = "default_initial_visible_periods")]
    pub initial_visible_periods: u32,
    #[serde(default = "default_tick_target_spacing_px")]
    pub tick_target_spacing_px: f64,
    #[serde(default)]
    pub gesture: GestureConfig,
}

impl Default for ViewSessionConfig {
    fn default() -> Self {
        Self {
            tracking_epsilon_ms: default_tracking_epsilon_ms(),
            initial_visible_periods: default_initial_visible_periods(),
            tick_target_spacing_px: default_tick_target_spacing_px(),
            gesture: GestureConfig::default(),
        }
    }
}

impl ViewSessionConfig {
    #[must_use]
    pub fn with_tracking_epsilon_ms(mut self, epsilon_ms: i64) -> Self {
        self.tracking_epsilon_ms = epsilon_ms;
        self
    }

    #[must_use]
    pub fn with_initial_visible_periods(mut self, periods: u32) -> Self {
        self.initial_visible_periods = periods;
        self
    }

    #[must_use]
    pub fn with_tick_target_spacing_px(mut self, spacing_px: f64) -> Self {
        self.tick_target_spacing_px = spacing_px;
        self
    }

    /// Sets the gesture defaults new panes start with.
    #[must_use]
    pub fn with_gesture(mut self, gesture: GestureConfig) -> Self {
        self.gesture = gesture;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.tracking_epsilon_ms < 0 {
            return Err(ChartError::InvalidData(
                "tracking epsilon must be >= 0".to_owned(),
            ));
        }
        if self.initial_visible_periods == 0 {
            return Err(ChartError::InvalidData(
                "initial visible periods must be > 0".to_owned(),
            ));
        }
        if !self.tick_target_spacing_px.is_finite() || self.tick_target_spacing_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "tick target spacing must be finite and > 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Serializes config to pretty JSON.
    pub fn to_json_pretty(self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes and validates config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

fn default_tracking_epsilon_ms() -> i64 {
    1_000
}

fn default_initial_visible_periods() -> u32 {
    50
}

fn default_tick_target_spacing_px() -> f64 {
    AXIS_TIME_TARGET_SPACING_PX
}
