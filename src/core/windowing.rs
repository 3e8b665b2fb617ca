use std::ops::Range;

use crate::core::{Candle, TimeDomain};

/// Index range of candles inside `domain` (inclusive on both edges), padded
/// by one candle on each side so edge interpolation is not clipped.
#[must_use]
pub fn padded_window_indices(candles: &[Candle], domain: TimeDomain) -> Range<usize> {
    let (min_t, max_t) = domain.ascending();
    let first_inside = candles.partition_point(|candle| candle.time < min_t);
    let past_last_inside = candles.partition_point(|candle| candle.time <= max_t);

    let start = first_inside.saturating_sub(1);
    let end = (past_last_inside + 1).min(candles.len());
    if start >= end {
        return 0..0;
    }
    start..end
}

/// Candles visible in `domain`, padded by one neighbour on each side.
#[must_use]
pub fn visible_candles(candles: &[Candle], domain: TimeDomain) -> &[Candle] {
    &candles[padded_window_indices(candles, domain)]
}

/// `(min low, max high)` over `candles`.
#[must_use]
pub fn price_extent(candles: &[Candle]) -> Option<(f64, f64)> {
    fold_extent(candles.iter().map(|candle| (candle.low, candle.high)))
}

/// `(min close, max close)` over `candles`.
#[must_use]
pub fn close_extent(candles: &[Candle]) -> Option<(f64, f64)> {
    fold_extent(candles.iter().map(|candle| (candle.close, candle.close)))
}

/// `(0, max volume)` over `candles`.
#[must_use]
pub fn volume_extent(candles: &[Candle]) -> Option<(f64, f64)> {
    candles
        .iter()
        .map(|candle| candle.volume)
        .reduce(f64::max)
        .map(|max| (0.0, max))
}

fn fold_extent(values: impl Iterator<Item = (f64, f64)>) -> Option<(f64, f64)> {
    values.reduce(|(min, max), (low, high)| (min.min(low), max.max(high)))
}
