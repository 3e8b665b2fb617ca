use smallvec::SmallVec;
use tracing::trace;

use crate::core::primitives::floor_to_multiple;
use crate::core::{DiscontinuityProvider, Period, TimeDomain, Timestamp, domain_duration};
use crate::error::{ChartError, ChartResult};

use super::axis_label_format::{LabelFormat, select_label_format};

pub const AXIS_TIME_TARGET_SPACING_PX: f64 = 72.0;
pub const AXIS_TIME_MIN_TICKS: usize = 2;

/// Number of ticks wanted for a container, never fewer than two.
#[must_use]
pub fn axis_tick_target_count(container_width_px: f64, target_spacing_px: f64) -> usize {
    if !container_width_px.is_finite() || container_width_px <= 0.0 {
        return AXIS_TIME_MIN_TICKS;
    }
    if !target_spacing_px.is_finite() || target_spacing_px <= 0.0 {
        return AXIS_TIME_MIN_TICKS;
    }

    let raw = (container_width_px / target_spacing_px).ceil();
    (raw.min(usize::MAX as f64) as usize).max(AXIS_TIME_MIN_TICKS)
}

pub type TickList = SmallVec<[Timestamp; 16]>;

/// Result of one layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct TickLayout {
    pub ticks: TickList,
    pub format: LabelFormat,
    pub tick_spacing_ms: i64,
    pub number_of_ticks: usize,
}

impl TickLayout {
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.ticks.iter().map(|tick| self.format.format(*tick)).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct SpacingKey {
    domain_duration_ms: i64,
    container_width_px: f64,
    period: Period,
}

impl SpacingKey {
    fn matches(self, other: Self) -> bool {
        self.domain_duration_ms == other.domain_duration_ms
            && self.period == other.period
            && (self.container_width_px - other.container_width_px).abs() <= 1e-9
    }
}

/// Derives axis ticks from a continuously changing view domain.
///
/// Tick spacing is only recomputed when the zoom level, container width or
/// period changes, so a pure pan slides existing tick positions instead of
/// re-rounding them.
#[derive(Debug, Clone, PartialEq)]
pub struct TickLayoutEngine {
    target_spacing_px: f64,
    cached_spacing: Option<(SpacingKey, i64)>,
    spacing_recomputations: u64,
}

impl Default for TickLayoutEngine {
    fn default() -> Self {
        Self {
            target_spacing_px: AXIS_TIME_TARGET_SPACING_PX,
            cached_spacing: None,
            spacing_recomputations: 0,
        }
    }
}

impl TickLayoutEngine {
    pub fn new(target_spacing_px: f64) -> ChartResult<Self> {
        if !target_spacing_px.is_finite() || target_spacing_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "tick target spacing must be finite and > 0".to_owned(),
            ));
        }
        Ok(Self {
            target_spacing_px,
            ..Self::default()
        })
    }

    #[must_use]
    pub fn target_spacing_px(&self) -> f64 {
        self.target_spacing_px
    }

    /// How many passes had to recompute the spacing (diagnostics).
    #[must_use]
    pub fn spacing_recomputations(&self) -> u64 {
        self.spacing_recomputations
    }

    pub fn layout(
        &mut self,
        domain: TimeDomain,
        period: Period,
        provider: &dyn DiscontinuityProvider,
        container_width_px: f64,
    ) -> TickLayout {
        let number_of_ticks = axis_tick_target_count(container_width_px, self.target_spacing_px);
        let duration_ms = domain_duration(domain, provider);
        let key = SpacingKey {
            domain_duration_ms: duration_ms,
            container_width_px,
            period,
        };

        let tick_spacing_ms = match self.cached_spacing {
            Some((cached_key, spacing)) if cached_key.matches(key) => spacing,
            _ => {
                let spacing = period.round_up_duration(duration_ms / number_of_ticks as i64);
                self.cached_spacing = Some((key, spacing));
                self.spacing_recomputations += 1;
                trace!(
                    duration_ms,
                    number_of_ticks,
                    tick_spacing_ms = spacing,
                    "recomputed time-axis tick spacing"
                );
                spacing
            }
        };

        let (lower, _) = domain.ascending();
        let lower_rounded = floor_to_multiple(period.floor(lower).as_millis(), tick_spacing_ms);

        let mut ticks = TickList::new();
        for index in 0..=number_of_ticks {
            let offset = (index as i64).saturating_mul(tick_spacing_ms);
            let candidate = Timestamp::from_millis(lower_rounded.saturating_add(offset));
            let snapped = provider.ceiling(period.ceil(candidate));
            if domain.contains(snapped) && ticks.last() != Some(&snapped) {
                ticks.push(snapped);
            }
        }

        TickLayout {
            ticks,
            format: select_label_format(duration_ms, number_of_ticks),
            tick_spacing_ms,
            number_of_ticks,
        }
    }

    /// Drops the cached spacing, e.g. after a product change.
    pub fn reset(&mut self) {
        self.cached_spacing = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{AXIS_TIME_MIN_TICKS, TickLayoutEngine, axis_tick_target_count};
    use crate::api::LabelFormat;
    use crate::core::primitives::MILLIS_PER_DAY;
    use crate::core::{ContinuousTime, Period, TimeDomain};

    #[test]
    fn target_count_never_drops_below_two() {
        assert_eq!(axis_tick_target_count(0.0, 72.0), AXIS_TIME_MIN_TICKS);
        assert_eq!(axis_tick_target_count(-30.0, 72.0), AXIS_TIME_MIN_TICKS);
        assert_eq!(axis_tick_target_count(f64::NAN, 72.0), AXIS_TIME_MIN_TICKS);
        assert_eq!(axis_tick_target_count(100.0, 72.0), 2);
        assert_eq!(axis_tick_target_count(720.0, 72.0), 10);
        assert_eq!(axis_tick_target_count(721.0, 72.0), 11);
    }

    #[test]
    fn daily_ticks_land_on_period_boundaries_inside_domain() {
        let mut engine = TickLayoutEngine::default();
        let domain = TimeDomain::from_millis(MILLIS_PER_DAY / 2, 20 * MILLIS_PER_DAY + 7);
        let layout = engine.layout(domain, Period::ONE_DAY, &ContinuousTime, 720.0);

        assert_eq!(layout.number_of_ticks, 10);
        assert_eq!(layout.tick_spacing_ms, 2 * MILLIS_PER_DAY);
        assert!(!layout.ticks.is_empty());
        for tick in &layout.ticks {
            assert!(domain.contains(*tick));
            assert_eq!(tick.as_millis() % MILLIS_PER_DAY, 0);
        }
        assert_eq!(layout.format, LabelFormat::Day);
    }

    #[test]
    fn pure_pan_reuses_spacing() {
        let mut engine = TickLayoutEngine::default();
        let width = 500.0;
        let first = TimeDomain::from_millis(0, 30 * MILLIS_PER_DAY);
        let panned = TimeDomain::from_millis(3 * MILLIS_PER_DAY, 33 * MILLIS_PER_DAY);

        let a = engine.layout(first, Period::ONE_DAY, &ContinuousTime, width);
        let b = engine.layout(panned, Period::ONE_DAY, &ContinuousTime, width);
        assert_eq!(a.tick_spacing_ms, b.tick_spacing_ms);
        assert_eq!(engine.spacing_recomputations(), 1);

        let zoomed = TimeDomain::from_millis(0, 10 * MILLIS_PER_DAY);
        engine.layout(zoomed, Period::ONE_DAY, &ContinuousTime, width);
        assert_eq!(engine.spacing_recomputations(), 2);
    }

    #[test]
    fn resize_or_period_switch_recomputes_spacing() {
        let mut engine = TickLayoutEngine::default();
        let domain = TimeDomain::from_millis(0, 30 * MILLIS_PER_DAY);

        let narrow = engine.layout(domain, Period::ONE_DAY, &ContinuousTime, 500.0);
        let wide = engine.layout(domain, Period::ONE_DAY, &ContinuousTime, 1_000.0);
        assert_eq!(engine.spacing_recomputations(), 2);
        assert!(wide.number_of_ticks > narrow.number_of_ticks);
        assert!(wide.tick_spacing_ms <= narrow.tick_spacing_ms);

        engine.layout(domain, Period::ONE_HOUR, &ContinuousTime, 1_000.0);
        assert_eq!(engine.spacing_recomputations(), 3);

        engine.layout(domain, Period::ONE_HOUR, &ContinuousTime, 1_000.0);
        assert_eq!(engine.spacing_recomputations(), 3);
    }

    #[test]
    fn sub_period_domain_yields_at_most_one_tick() {
        let mut engine = TickLayoutEngine::default();
        let straddling = TimeDomain::from_millis(MILLIS_PER_DAY - 10, MILLIS_PER_DAY + 10);
        let layout = engine.layout(straddling, Period::ONE_DAY, &ContinuousTime, 400.0);
        assert_eq!(layout.ticks.len(), 1);
        assert_eq!(layout.ticks[0].as_millis(), MILLIS_PER_DAY);

        let inside = TimeDomain::from_millis(10, 20);
        let layout = engine.layout(inside, Period::ONE_DAY, &ContinuousTime, 400.0);
        assert!(layout.ticks.is_empty());
    }
}
