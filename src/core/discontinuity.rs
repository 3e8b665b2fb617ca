//! Time discontinuities: gaps (market closures) that contribute no width to
//! durations or pixel projections.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::Timestamp;
use crate::core::primitives::MILLIS_PER_DAY;
use crate::error::{ChartError, ChartResult};

/// Maps wall-clock time onto a continuous axis that skips gaps.
pub trait DiscontinuityProvider: fmt::Debug + Send + Sync {
    /// Signed continuous duration `end - start` in milliseconds, gaps excluded.
    fn distance(&self, start: Timestamp, end: Timestamp) -> i64;

    /// Moves `time` by a continuous duration, stepping over gaps.
    fn offset(&self, time: Timestamp, millis: i64) -> Timestamp;

    /// Snaps a time inside a gap forward to the gap's end.
    fn ceiling(&self, time: Timestamp) -> Timestamp;

    /// Snaps a time inside a gap back to the last valid instant before it.
    fn floor(&self, time: Timestamp) -> Timestamp;
}

/// No gaps: plain wall-clock arithmetic. Used for 24/7 markets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinuousTime;

impl DiscontinuityProvider for ContinuousTime {
    fn distance(&self, start: Timestamp, end: Timestamp) -> i64 {
        start.millis_until(end)
    }

    fn offset(&self, time: Timestamp, millis: i64) -> Timestamp {
        time.saturating_add_millis(millis)
    }

    fn ceiling(&self, time: Timestamp) -> Timestamp {
        time
    }

    fn floor(&self, time: Timestamp) -> Timestamp {
        time
    }
}

const WEEK_MILLIS: i64 = 7 * MILLIS_PER_DAY;
const TRADING_WEEK_MILLIS: i64 = 5 * MILLIS_PER_DAY;
// 1969-12-29T00:00:00Z, the Monday before the Unix epoch.
const MONDAY_ANCHOR_MILLIS: i64 = -3 * MILLIS_PER_DAY;

/// Excludes Saturday and Sunday (UTC). Gap is `[Sat 00:00, Mon 00:00)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipWeekends;

impl SkipWeekends {
    fn week_position(time: Timestamp) -> (i64, i64) {
        let relative = time.as_millis().saturating_sub(MONDAY_ANCHOR_MILLIS);
        (
            relative.div_euclid(WEEK_MILLIS),
            relative.rem_euclid(WEEK_MILLIS),
        )
    }

    fn to_continuous(time: Timestamp) -> i64 {
        let (week, within) = Self::week_position(time);
        week.saturating_mul(TRADING_WEEK_MILLIS)
            .saturating_add(within.min(TRADING_WEEK_MILLIS))
    }

    fn from_continuous(continuous: i64) -> Timestamp {
        let week = continuous.div_euclid(TRADING_WEEK_MILLIS);
        let within = continuous.rem_euclid(TRADING_WEEK_MILLIS);
        Timestamp::from_millis(
            MONDAY_ANCHOR_MILLIS
                .saturating_add(week.saturating_mul(WEEK_MILLIS))
                .saturating_add(within),
        )
    }

    #[must_use]
    pub fn is_weekend(time: Timestamp) -> bool {
        Self::week_position(time).1 >= TRADING_WEEK_MILLIS
    }
}

impl DiscontinuityProvider for SkipWeekends {
    fn distance(&self, start: Timestamp, end: Timestamp) -> i64 {
        Self::to_continuous(end).saturating_sub(Self::to_continuous(start))
    }

    fn offset(&self, time: Timestamp, millis: i64) -> Timestamp {
        let snapped = if millis >= 0 {
            self.ceiling(time)
        } else {
            self.floor(time)
        };
        Self::from_continuous(Self::to_continuous(snapped).saturating_add(millis))
    }

    fn ceiling(&self, time: Timestamp) -> Timestamp {
        let (week, within) = Self::week_position(time);
        if within < TRADING_WEEK_MILLIS {
            return time;
        }
        Timestamp::from_millis(
            MONDAY_ANCHOR_MILLIS.saturating_add((week + 1).saturating_mul(WEEK_MILLIS)),
        )
    }

    fn floor(&self, time: Timestamp) -> Timestamp {
        let (week, within) = Self::week_position(time);
        if within < TRADING_WEEK_MILLIS {
            return time;
        }
        Timestamp::from_millis(
            MONDAY_ANCHOR_MILLIS
                .saturating_add(week.saturating_mul(WEEK_MILLIS))
                .saturating_add(TRADING_WEEK_MILLIS - 1),
        )
    }
}

/// One excluded interval `[start, end)` in wall-clock milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapSegment {
    pub start: Timestamp,
    pub end: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IndexedGap {
    start: i64,
    end: i64,
    cumulative_before: i64,
}

impl IndexedGap {
    // Excluded time up to and including this gap.
    fn cumulative_after(self) -> i64 {
        self.cumulative_before
            .saturating_add(self.end.saturating_sub(self.start))
    }
}

/// Explicit gap list (holidays, exchange outages).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedGaps {
    gaps: Vec<IndexedGap>,
}

impl FixedGaps {
    /// Builds the index. Segments must be non-empty and must not overlap.
    pub fn new(mut segments: Vec<GapSegment>) -> ChartResult<Self> {
        segments.sort_by_key(|segment| segment.start);

        let mut gaps = Vec::with_capacity(segments.len());
        let mut cumulative = 0_i64;
        let mut previous_end: Option<Timestamp> = None;
        for segment in segments {
            if segment.end <= segment.start {
                return Err(ChartError::InvalidData(
                    "gap segment end must be > start".to_owned(),
                ));
            }
            if previous_end.is_some_and(|end| segment.start < end) {
                return Err(ChartError::InvalidData(
                    "gap segments must not overlap".to_owned(),
                ));
            }
            let start = segment.start.as_millis();
            let end = segment.end.as_millis();
            gaps.push(IndexedGap {
                start,
                end,
                cumulative_before: cumulative,
            });
            cumulative = cumulative.saturating_add(end.saturating_sub(start));
            previous_end = Some(segment.end);
        }

        Ok(Self { gaps })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.gaps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.gaps.is_empty()
    }

    // Index of the last gap starting at or before `millis`.
    fn gap_at_or_before(&self, millis: i64) -> Option<&IndexedGap> {
        let idx = self.gaps.partition_point(|gap| gap.start <= millis);
        idx.checked_sub(1).map(|idx| &self.gaps[idx])
    }

    fn to_continuous(&self, time: Timestamp) -> i64 {
        let millis = time.as_millis();
        match self.gap_at_or_before(millis) {
            None => millis,
            Some(gap) if millis < gap.end => gap.start.saturating_sub(gap.cumulative_before),
            Some(gap) => millis.saturating_sub(gap.cumulative_after()),
        }
    }

    fn from_continuous(&self, continuous: i64) -> Timestamp {
        let idx = self
            .gaps
            .partition_point(|gap| {
                gap.start.saturating_sub(gap.cumulative_before) <= continuous
            });
        match idx.checked_sub(1).map(|idx| &self.gaps[idx]) {
            None => Timestamp::from_millis(continuous),
            Some(gap) => {
                Timestamp::from_millis(continuous.saturating_add(gap.cumulative_after()))
            }
        }
    }
}

impl DiscontinuityProvider for FixedGaps {
    fn distance(&self, start: Timestamp, end: Timestamp) -> i64 {
        self.to_continuous(end)
            .saturating_sub(self.to_continuous(start))
    }

    fn offset(&self, time: Timestamp, millis: i64) -> Timestamp {
        let snapped = if millis >= 0 {
            self.ceiling(time)
        } else {
            self.floor(time)
        };
        self.from_continuous(self.to_continuous(snapped).saturating_add(millis))
    }

    fn ceiling(&self, time: Timestamp) -> Timestamp {
        match self.gap_at_or_before(time.as_millis()) {
            Some(gap) if time.as_millis() < gap.end => Timestamp::from_millis(gap.end),
            _ => time,
        }
    }

    fn floor(&self, time: Timestamp) -> Timestamp {
        match self.gap_at_or_before(time.as_millis()) {
            Some(gap) if time.as_millis() < gap.end => {
                Timestamp::from_millis(gap.start.saturating_sub(1))
            }
            _ => time,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{ContinuousTime, DiscontinuityProvider, FixedGaps, GapSegment, SkipWeekends};
    use crate::core::Timestamp;
    use crate::core::primitives::{MILLIS_PER_DAY, MILLIS_PER_HOUR};

    fn utc(y: i32, m: u32, d: u32, h: u32) -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap())
    }

    #[test]
    fn continuous_time_is_plain_arithmetic() {
        let a = Timestamp::from_millis(100);
        let b = Timestamp::from_millis(40);
        assert_eq!(ContinuousTime.distance(a, b), -60);
        assert_eq!(ContinuousTime.offset(a, 5).as_millis(), 105);
    }

    #[test]
    fn weekend_is_excluded_from_distance() {
        // Friday 2015-08-21 12:00 to Monday 2015-08-24 12:00.
        let friday = utc(2015, 8, 21, 12);
        let monday = utc(2015, 8, 24, 12);
        assert_eq!(SkipWeekends.distance(friday, monday), MILLIS_PER_DAY);
        assert_eq!(SkipWeekends.distance(monday, friday), -MILLIS_PER_DAY);
    }

    #[test]
    fn weekend_snaps_to_boundaries() {
        let saturday = utc(2015, 8, 22, 10);
        assert!(SkipWeekends::is_weekend(saturday));
        assert_eq!(SkipWeekends.ceiling(saturday), utc(2015, 8, 24, 0));
        assert_eq!(
            SkipWeekends.floor(saturday).as_millis(),
            utc(2015, 8, 22, 0).as_millis() - 1
        );
        let wednesday = utc(2015, 8, 19, 3);
        assert_eq!(SkipWeekends.ceiling(wednesday), wednesday);
    }

    #[test]
    fn weekend_offset_steps_over_gap() {
        let friday = utc(2015, 8, 21, 18);
        let moved = SkipWeekends.offset(friday, 12 * MILLIS_PER_HOUR);
        assert_eq!(moved, utc(2015, 8, 24, 6));
        let back = SkipWeekends.offset(moved, -12 * MILLIS_PER_HOUR);
        assert_eq!(back, friday);
    }

    #[test]
    fn fixed_gaps_collapse_excluded_ranges() {
        let gaps = FixedGaps::new(vec![
            GapSegment {
                start: Timestamp::from_millis(100),
                end: Timestamp::from_millis(200),
            },
            GapSegment {
                start: Timestamp::from_millis(300),
                end: Timestamp::from_millis(350),
            },
        ])
        .expect("valid gaps");

        let a = Timestamp::from_millis(50);
        let b = Timestamp::from_millis(400);
        assert_eq!(gaps.distance(a, b), 350 - 150);
        assert_eq!(gaps.ceiling(Timestamp::from_millis(150)).as_millis(), 200);
        assert_eq!(gaps.floor(Timestamp::from_millis(150)).as_millis(), 99);
        assert_eq!(gaps.offset(a, 100).as_millis(), 250);
    }

    #[test]
    fn fixed_gaps_saturate_at_time_limits() {
        let gaps = FixedGaps::new(vec![GapSegment {
            start: Timestamp::from_millis(100),
            end: Timestamp::from_millis(200),
        }])
        .expect("valid gaps");

        let origin = Timestamp::from_millis(0);
        assert_eq!(gaps.offset(origin, i64::MAX).as_millis(), i64::MAX);
        assert_eq!(gaps.offset(origin, i64::MIN).as_millis(), i64::MIN);
        assert_eq!(
            gaps.distance(Timestamp::from_millis(i64::MIN), Timestamp::from_millis(i64::MAX)),
            i64::MAX
        );
        assert_eq!(
            gaps.distance(Timestamp::from_millis(i64::MAX), Timestamp::from_millis(i64::MIN)),
            i64::MIN
        );
    }

    #[test]
    fn fixed_gaps_reject_overlap() {
        let overlapping = FixedGaps::new(vec![
            GapSegment {
                start: Timestamp::from_millis(0),
                end: Timestamp::from_millis(10),
            },
            GapSegment {
                start: Timestamp::from_millis(5),
                end: Timestamp::from_millis(20),
            },
        ]);
        assert!(overlapping.is_err());
    }
}
