use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Point in time with millisecond resolution (signed Unix milliseconds, UTC).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    #[must_use]
    pub const fn as_millis(self) -> i64 {
        self.0
    }

    #[must_use]
    pub fn from_datetime(time: DateTime<Utc>) -> Self {
        Self(time.timestamp_millis())
    }

    /// Builds a timestamp from a fractional millisecond value, rounding to the
    /// nearest millisecond.
    pub fn from_millis_f64(millis: f64) -> ChartResult<Self> {
        if !millis.is_finite() || millis > i64::MAX as f64 || millis < i64::MIN as f64 {
            return Err(ChartError::InvalidData(
                "timestamp millis must be finite and representable".to_owned(),
            ));
        }
        Ok(Self(millis.round() as i64))
    }

    #[must_use]
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.0)
    }

    #[must_use]
    pub const fn saturating_add_millis(self, millis: i64) -> Self {
        Self(self.0.saturating_add(millis))
    }

    #[must_use]
    pub const fn saturating_sub_millis(self, millis: i64) -> Self {
        Self(self.0.saturating_sub(millis))
    }

    /// Plain wall-clock difference `other - self` in milliseconds.
    #[must_use]
    pub const fn millis_until(self, other: Self) -> i64 {
        other.0.saturating_sub(self.0)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(time: DateTime<Utc>) -> Self {
        Self::from_datetime(time)
    }
}

/// Visible time window `[start, end]`.
///
/// Callers may hand in either ordering. Transforms keep whatever ordering
/// they were given, so a descending domain stays descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeDomain {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl TimeDomain {
    #[must_use]
    pub const fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn from_millis(start: i64, end: i64) -> Self {
        Self {
            start: Timestamp::from_millis(start),
            end: Timestamp::from_millis(end),
        }
    }

    #[must_use]
    pub fn is_descending(self) -> bool {
        self.start > self.end
    }

    #[must_use]
    pub fn is_degenerate(self) -> bool {
        self.start == self.end
    }

    /// Returns `(min, max)` regardless of the stored ordering.
    #[must_use]
    pub fn ascending(self) -> (Timestamp, Timestamp) {
        if self.is_descending() {
            (self.end, self.start)
        } else {
            (self.start, self.end)
        }
    }

    #[must_use]
    pub fn min(self) -> Timestamp {
        self.ascending().0
    }

    #[must_use]
    pub fn max(self) -> Timestamp {
        self.ascending().1
    }

    /// Wall-clock width in milliseconds, always `>= 0`.
    #[must_use]
    pub fn width_millis(self) -> i64 {
        let (min, max) = self.ascending();
        min.millis_until(max)
    }

    #[must_use]
    pub fn contains(self, time: Timestamp) -> bool {
        let (min, max) = self.ascending();
        time >= min && time <= max
    }

    /// Inclusive containment of another domain, ignoring ordering.
    #[must_use]
    pub fn contains_domain(self, other: Self) -> bool {
        let (min, max) = other.ascending();
        self.contains(min) && self.contains(max)
    }

    /// Re-applies this domain's ordering to an ascending `(min, max)` pair.
    #[must_use]
    pub fn with_ordering_of(self, min: Timestamp, max: Timestamp) -> Self {
        if self.is_descending() {
            Self::new(max, min)
        } else {
            Self::new(min, max)
        }
    }
}
