use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::Timestamp;
use crate::core::primitives::{MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE};

/// Time-axis label granularity, finest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LabelFormat {
    SubHour,
    Hour,
    Day,
    Month,
    Year,
}

impl LabelFormat {
    pub const LADDER: [Self; 5] = [Self::SubHour, Self::Hour, Self::Day, Self::Month, Self::Year];

    /// Nominal bucket size of one label at this granularity.
    #[must_use]
    pub const fn unit_millis(self) -> i64 {
        match self {
            Self::SubHour => MILLIS_PER_MINUTE,
            Self::Hour => MILLIS_PER_HOUR,
            Self::Day => MILLIS_PER_DAY,
            Self::Month => 30 * MILLIS_PER_DAY,
            Self::Year => 365 * MILLIS_PER_DAY,
        }
    }

    #[must_use]
    pub const fn pattern(self) -> &'static str {
        match self {
            Self::SubHour => "%H:%M:%S",
            Self::Hour => "%H:%M",
            Self::Day => "%a %d",
            Self::Month => "%b",
            Self::Year => "%Y",
        }
    }

    #[must_use]
    pub fn format(self, time: Timestamp) -> String {
        match DateTime::<Utc>::from_timestamp_millis(time.as_millis()) {
            Some(dt) => dt.format(self.pattern()).to_string(),
            None => time.as_millis().to_string(),
        }
    }
}

/// Coarsest label granularity that still produces `number_of_ticks` distinct
/// labels over `domain_duration_ms`.
///
/// A rung is skipped while the domain is shorter than one of its units; the
/// finest rung is the fallback.
#[must_use]
pub fn select_label_format(domain_duration_ms: i64, number_of_ticks: usize) -> LabelFormat {
    let wanted = number_of_ticks.max(1) as i64;
    LabelFormat::LADDER
        .iter()
        .copied()
        .rev()
        .find(|rung| {
            let unit = rung.unit_millis();
            domain_duration_ms >= unit && domain_duration_ms / unit >= wanted
        })
        .unwrap_or(LabelFormat::SubHour)
}
