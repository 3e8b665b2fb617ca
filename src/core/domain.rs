//! Pure view-domain transforms.
//!
//! None of these functions fail: inputs that cannot produce a meaningful
//! window degrade to the trivial extent (or the input domain when there is
//! no data at all) and callers decide whether to commit the result.

use crate::core::candle::data_extent;
use crate::core::{Candle, DiscontinuityProvider, Period, TimeDomain, Timestamp};

/// Data a transform needs beyond the domain itself.
#[derive(Debug, Clone, Copy)]
pub struct DataContext<'a> {
    pub candles: &'a [Candle],
    pub provider: &'a dyn DiscontinuityProvider,
    pub period: Period,
}

impl<'a> DataContext<'a> {
    #[must_use]
    pub fn new(
        candles: &'a [Candle],
        provider: &'a dyn DiscontinuityProvider,
        period: Period,
    ) -> Self {
        Self {
            candles,
            provider,
            period,
        }
    }

    #[must_use]
    pub fn data_extent(&self) -> Option<TimeDomain> {
        data_extent(self.candles)
    }
}

/// Clamps both edges of `domain` into `extent`, keeping `domain`'s ordering.
///
/// A domain lying completely outside the extent collapses onto the nearest
/// extent edge.
#[must_use]
pub fn clamp_domain(domain: TimeDomain, extent: TimeDomain) -> TimeDomain {
    let (lower, upper) = extent.ascending();
    let (start, end) = domain.ascending();
    domain.with_ordering_of(start.clamp(lower, upper), end.clamp(lower, upper))
}

/// Continuous (gap-free) width of `domain` in milliseconds. Never negative.
#[must_use]
pub fn domain_duration(domain: TimeDomain, provider: &dyn DiscontinuityProvider) -> i64 {
    provider.distance(domain.start, domain.end).saturating_abs()
}

/// Anchors the window on the newest candle.
///
/// The window keeps `desired_ratio` times its current wall-clock width unless
/// the data is shorter, and never becomes narrower than the period's
/// minimum visible duration (clipped to what the data can supply).
#[must_use]
pub fn move_to_latest(
    domain: TimeDomain,
    candles: &[Candle],
    provider: &dyn DiscontinuityProvider,
    period: Period,
    desired_ratio: f64,
) -> TimeDomain {
    let Some(extent) = data_extent(candles) else {
        return domain;
    };
    let (extent_start, extent_end) = extent.ascending();

    let ratio = if desired_ratio.is_finite() && desired_ratio > 0.0 {
        desired_ratio
    } else {
        1.0
    };
    let scaled_span = (ratio * domain.width_millis() as f64).round() as i64;

    let (mut start, end) = if scaled_span < extent.width_millis() {
        (extent_end.saturating_sub_millis(scaled_span), extent_end)
    } else {
        (extent_start, extent_end)
    };

    let minimum_millis = period.minimum_domain_millis();
    if provider.distance(start, end).saturating_abs() < minimum_millis {
        let minimum_millis = minimum_millis.min(domain_duration(extent, provider));
        start = provider.offset(end, -minimum_millis).max(extent_start);
    }

    domain.with_ordering_of(start, end)
}

/// Moves the window so it is centered on `center`, keeping its width.
///
/// When one edge would leave the data extent the whole window shifts back so
/// that edge sits exactly on the data boundary. If the data is narrower than
/// the window the full extent is returned.
#[must_use]
pub fn center_on_date(domain: TimeDomain, candles: &[Candle], center: Timestamp) -> TimeDomain {
    let Some(extent) = data_extent(candles) else {
        return domain;
    };
    let (lower, upper) = extent.ascending();
    let width = domain.width_millis();
    if width > extent.width_millis() {
        return domain.with_ordering_of(lower, upper);
    }

    let mut start = center.saturating_sub_millis(width / 2);
    let mut end = start.saturating_add_millis(width);
    if start < lower {
        end = end.saturating_add_millis(start.millis_until(lower));
        start = lower;
    } else if end > upper {
        start = start.saturating_sub_millis(upper.millis_until(end));
        end = upper;
    }

    domain.with_ordering_of(start, end)
}

/// Domain to commit for a gesture tick.
///
/// Zooming while tracking latest re-anchors on the newest candle; panning
/// never auto-follows. The result is always clamped to `total_extent`.
#[must_use]
pub fn calculate_domain(
    scale_domain: TimeDomain,
    context: DataContext<'_>,
    total_extent: TimeDomain,
    zoomed: bool,
    tracking_latest: bool,
) -> TimeDomain {
    let domain = if zoomed && tracking_latest {
        move_to_latest(
            scale_domain,
            context.candles,
            context.provider,
            context.period,
            1.0,
        )
    } else {
        scale_domain
    };
    clamp_domain(domain, total_extent)
}
