pub mod candle;
pub mod discontinuity;
pub mod domain;
pub mod pane;
pub mod period;
pub mod primitives;
pub mod time_scale;
pub mod types;
pub mod windowing;

pub use candle::{Candle, canonicalize_candles, data_extent};
pub use discontinuity::{ContinuousTime, DiscontinuityProvider, FixedGaps, GapSegment, SkipWeekends};
pub use domain::{
    DataContext, calculate_domain, center_on_date, clamp_domain, domain_duration, move_to_latest,
};
pub use pane::{PaneConfig, PaneId, PaneKind};
pub use period::{DEFAULT_MINIMUM_VISIBLE_PERIODS, Period};
pub use time_scale::{DiscontinuousTimeScale, TimeProjection};
pub use types::{TimeDomain, Timestamp};
pub use windowing::{close_extent, padded_window_indices, price_extent, visible_candles, volume_extent};
