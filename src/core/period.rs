use serde::{Deserialize, Serialize};

use crate::core::Timestamp;
use crate::core::primitives::{ceil_to_multiple, floor_to_multiple};
use crate::error::{ChartError, ChartResult};

/// Smallest domain width, in periods, that built-in periods allow.
pub const DEFAULT_MINIMUM_VISIBLE_PERIODS: u32 = 5;

/// Candle sampling granularity plus the zoom-in floor expressed in periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    seconds: u32,
    minimum_visible_periods: u32,
}

impl Period {
    pub const ONE_MINUTE: Self = Self::const_new(60);
    pub const FIVE_MINUTES: Self = Self::const_new(300);
    pub const ONE_HOUR: Self = Self::const_new(3_600);
    pub const ONE_DAY: Self = Self::const_new(86_400);

    const fn const_new(seconds: u32) -> Self {
        Self {
            seconds,
            minimum_visible_periods: DEFAULT_MINIMUM_VISIBLE_PERIODS,
        }
    }

    pub fn new(seconds: u32, minimum_visible_periods: u32) -> ChartResult<Self> {
        if seconds == 0 {
            return Err(ChartError::InvalidData(
                "period seconds must be > 0".to_owned(),
            ));
        }
        Ok(Self {
            seconds,
            minimum_visible_periods,
        })
    }

    /// Built-in catalog, finest first.
    #[must_use]
    pub const fn catalog() -> [Self; 4] {
        [
            Self::ONE_MINUTE,
            Self::FIVE_MINUTES,
            Self::ONE_HOUR,
            Self::ONE_DAY,
        ]
    }

    #[must_use]
    pub fn with_minimum_visible_periods(mut self, minimum_visible_periods: u32) -> Self {
        self.minimum_visible_periods = minimum_visible_periods;
        self
    }

    #[must_use]
    pub const fn seconds(self) -> u32 {
        self.seconds
    }

    #[must_use]
    pub const fn minimum_visible_periods(self) -> u32 {
        self.minimum_visible_periods
    }

    #[must_use]
    pub const fn millis(self) -> i64 {
        self.seconds as i64 * 1_000
    }

    /// Narrowest domain duration the gesture controller accepts.
    #[must_use]
    pub const fn minimum_domain_millis(self) -> i64 {
        self.minimum_visible_periods as i64 * self.millis()
    }

    /// Epoch-aligned period boundary at or before `time`.
    #[must_use]
    pub fn floor(self, time: Timestamp) -> Timestamp {
        Timestamp::from_millis(floor_to_multiple(time.as_millis(), self.millis()))
    }

    /// Epoch-aligned period boundary at or after `time`.
    #[must_use]
    pub fn ceil(self, time: Timestamp) -> Timestamp {
        Timestamp::from_millis(ceil_to_multiple(time.as_millis(), self.millis()))
    }

    /// Rounds a duration up to a whole number of periods (at least one).
    #[must_use]
    pub fn round_up_duration(self, millis: i64) -> i64 {
        ceil_to_multiple(millis.max(1), self.millis())
    }
}

impl Default for Period {
    fn default() -> Self {
        Self::ONE_DAY
    }
}
