use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::core::Timestamp;
use crate::error::{ChartError, ChartResult};

pub const MILLIS_PER_SECOND: i64 = 1_000;
pub const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
pub const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
pub const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

#[must_use]
pub fn datetime_to_timestamp(time: DateTime<Utc>) -> Timestamp {
    Timestamp::from_datetime(time)
}

/// Floors `value` to a multiple of `step` (toward negative infinity).
#[must_use]
pub fn floor_to_multiple(value: i64, step: i64) -> i64 {
    if step <= 0 {
        return value;
    }
    value.div_euclid(step) * step
}

/// Ceils `value` to a multiple of `step` (toward positive infinity).
#[must_use]
pub fn ceil_to_multiple(value: i64, step: i64) -> i64 {
    if step <= 0 {
        return value;
    }
    let floored = floor_to_multiple(value, step);
    if floored == value {
        value
    } else {
        floored.saturating_add(step)
    }
}
