use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::primitives::{datetime_to_timestamp, decimal_to_f64};
use crate::core::{TimeDomain, Timestamp};
use crate::error::{ChartError, ChartResult};

/// One OHLCV sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: Timestamp,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Builds a validated candle.
    ///
    /// Invariants:
    /// - all prices and the volume are finite
    /// - `low <= high`
    /// - `open` and `close` are within `[low, high]`
    /// - `volume >= 0`
    pub fn new(
        time: Timestamp,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> ChartResult<Self> {
        if !open.is_finite()
            || !high.is_finite()
            || !low.is_finite()
            || !close.is_finite()
            || !volume.is_finite()
        {
            return Err(ChartError::InvalidData(
                "ohlcv values must be finite".to_owned(),
            ));
        }

        if low > high {
            return Err(ChartError::InvalidData(
                "candle low must be <= high".to_owned(),
            ));
        }

        if open < low || open > high || close < low || close > high {
            return Err(ChartError::InvalidData(
                "candle open/close must be within low/high range".to_owned(),
            ));
        }

        if volume < 0.0 {
            return Err(ChartError::InvalidData(
                "candle volume must be >= 0".to_owned(),
            ));
        }

        Ok(Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        })
    }

    /// Converts feed-native decimal input into a validated candle.
    pub fn from_decimal_time(
        time: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> ChartResult<Self> {
        Self::new(
            datetime_to_timestamp(time),
            decimal_to_f64(open, "open")?,
            decimal_to_f64(high, "high")?,
            decimal_to_f64(low, "low")?,
            decimal_to_f64(close, "close")?,
            decimal_to_f64(volume, "volume")?,
        )
    }

    #[must_use]
    pub fn is_bullish(self) -> bool {
        self.close >= self.open
    }

    /// Re-checks the constructor invariants; fields are public, so candles
    /// built by hand or deserialized may break them.
    pub(crate) fn validate(&self) -> ChartResult<()> {
        Self::new(
            self.time,
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
        )
        .map(|_| ())
    }

    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Time extent `[first.time, last.time]` of an ascending candle sequence.
///
/// Returns `None` for an empty slice. A single candle yields a zero-width
/// extent.
#[must_use]
pub fn data_extent(candles: &[Candle]) -> Option<TimeDomain> {
    let first = candles.first()?;
    let last = candles.last()?;
    Some(TimeDomain::new(first.time, last.time))
}

/// Sorts by time, drops invalid candles and keeps the last candle for each
/// duplicated time.
#[must_use]
pub fn canonicalize_candles(mut candles: Vec<Candle>) -> Vec<Candle> {
    let original_len = candles.len();
    candles.retain(Candle::is_valid);
    candles.sort_by_key(|candle| candle.time);

    let mut deduped: Vec<Candle> = Vec::with_capacity(candles.len());
    let mut duplicate_count = 0_usize;
    for candle in candles {
        if let Some(last) = deduped.last_mut()
            && last.time == candle.time
        {
            *last = candle;
            duplicate_count += 1;
            continue;
        }
        deduped.push(candle);
    }

    let filtered_count = original_len.saturating_sub(deduped.len() + duplicate_count);
    if filtered_count > 0 || duplicate_count > 0 {
        warn!(
            filtered_count,
            duplicate_count,
            canonical_count = deduped.len(),
            "canonicalized candle sequence"
        );
    }
    deduped
}
