use chart_view::api::{AXIS_TIME_MIN_TICKS, TickLayoutEngine};
use chart_view::core::{ContinuousTime, DiscontinuityProvider, Period, SkipWeekends, TimeDomain};
use proptest::prelude::*;

fn period_strategy() -> impl Strategy<Value = Period> {
    prop::sample::select(Period::catalog().to_vec())
}

proptest! {
    #[test]
    fn ticks_stay_inside_domain_in_ascending_order(
        start in 0i64..2_000_000_000_000,
        width in 1i64..400 * 86_400_000,
        container_width in -100.0f64..4_000.0,
        period in period_strategy(),
        skip_weekends in any::<bool>()
    ) {
        let provider: &dyn DiscontinuityProvider = if skip_weekends {
            &SkipWeekends
        } else {
            &ContinuousTime
        };
        let domain = TimeDomain::from_millis(start, start + width);
        let mut engine = TickLayoutEngine::default();

        let layout = engine.layout(domain, period, provider, container_width);

        prop_assert!(layout.number_of_ticks >= AXIS_TIME_MIN_TICKS);
        prop_assert!(layout.tick_spacing_ms >= period.millis());
        prop_assert_eq!(layout.tick_spacing_ms % period.millis(), 0);
        prop_assert!(layout.ticks.len() <= layout.number_of_ticks + 1);
        for tick in &layout.ticks {
            prop_assert!(domain.contains(*tick));
            if skip_weekends {
                prop_assert!(!SkipWeekends::is_weekend(*tick));
            }
        }
        for pair in layout.ticks.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn pure_pan_never_changes_spacing(
        start in 0i64..1_000_000_000_000,
        width in 3_600_000i64..30 * 86_400_000,
        shift in -10 * 86_400_000i64..10 * 86_400_000,
        container_width in 100.0f64..2_000.0
    ) {
        let mut engine = TickLayoutEngine::default();
        let domain = TimeDomain::from_millis(start, start + width);
        let panned = TimeDomain::from_millis(start + shift, start + shift + width);

        let first = engine.layout(domain, Period::ONE_HOUR, &ContinuousTime, container_width);
        let second = engine.layout(panned, Period::ONE_HOUR, &ContinuousTime, container_width);

        prop_assert_eq!(first.tick_spacing_ms, second.tick_spacing_ms);
        prop_assert_eq!(first.format, second.format);
        prop_assert_eq!(engine.spacing_recomputations(), 1);
    }

    #[test]
    fn container_resize_alone_recomputes_spacing(
        start in 0i64..1_000_000_000_000,
        width in 3_600_000i64..30 * 86_400_000,
        container_width in 100.0f64..2_000.0,
        growth in 1.0f64..500.0
    ) {
        let mut engine = TickLayoutEngine::default();
        let domain = TimeDomain::from_millis(start, start + width);

        engine.layout(domain, Period::ONE_HOUR, &ContinuousTime, container_width);
        engine.layout(domain, Period::ONE_HOUR, &ContinuousTime, container_width);
        prop_assert_eq!(engine.spacing_recomputations(), 1);

        engine.layout(domain, Period::ONE_HOUR, &ContinuousTime, container_width + growth);
        prop_assert_eq!(engine.spacing_recomputations(), 2);
    }
}
