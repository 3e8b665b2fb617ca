use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::interaction::GestureConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PaneId(u32);

impl PaneId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// What a pane derives from the shared view domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaneKind {
    /// Price chart: visible slice plus low/high y-extent.
    Primary,
    /// Indicator pane: visible slice plus `0..max volume` y-extent.
    Secondary,
    /// Time axis: visible slice plus tick layout.
    XAxis,
    /// Overview strip: all data, close-price y-extent.
    Navigator,
}

impl PaneKind {
    /// Gesture settings a pane of this kind starts with.
    #[must_use]
    pub fn default_gesture(self, base: GestureConfig) -> Option<GestureConfig> {
        match self {
            Self::Primary | Self::Secondary => Some(base),
            Self::Navigator => Some(GestureConfig {
                allow_pan: false,
                ..base
            }),
            Self::XAxis => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaneConfig {
    pub kind: PaneKind,
    pub width_px: f64,
    /// `None` uses the kind's default; the x-axis takes no gestures.
    #[serde(default)]
    pub gesture: Option<GestureConfig>,
}

impl PaneConfig {
    #[must_use]
    pub fn new(kind: PaneKind, width_px: f64) -> Self {
        Self {
            kind,
            width_px,
            gesture: None,
        }
    }

    #[must_use]
    pub fn with_gesture(mut self, gesture: GestureConfig) -> Self {
        self.gesture = Some(gesture);
        self
    }

    pub(crate) fn validate(self) -> ChartResult<Self> {
        validate_pane_width(self.width_px)?;
        Ok(self)
    }
}

pub(crate) fn validate_pane_width(width_px: f64) -> ChartResult<()> {
    if !width_px.is_finite() || width_px <= 0.0 {
        return Err(ChartError::InvalidViewport { width: width_px });
    }
    Ok(())
}
