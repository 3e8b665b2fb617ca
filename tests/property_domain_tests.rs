use chart_view::core::{
    Candle, ContinuousTime, Period, SkipWeekends, TimeDomain, Timestamp, center_on_date,
    clamp_domain, data_extent, domain_duration, move_to_latest,
};
use proptest::prelude::*;

fn spaced_candles(count: i64, step: i64) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            Candle::new(Timestamp::from_millis(i * step), 1.0, 1.0, 1.0, 1.0, 0.0)
                .expect("valid candle")
        })
        .collect()
}

proptest! {
    #[test]
    fn clamp_stays_inside_extent_and_is_idempotent(
        a in -1_000_000i64..1_000_000,
        b in -1_000_000i64..1_000_000,
        lower in -500_000i64..500_000,
        extent_width in 1i64..500_000
    ) {
        let extent = TimeDomain::from_millis(lower, lower + extent_width);
        let domain = TimeDomain::from_millis(a, b);

        let clamped = clamp_domain(domain, extent);

        prop_assert!(extent.contains_domain(clamped));
        prop_assert_eq!(clamp_domain(clamped, extent), clamped);
        if !clamped.is_degenerate() {
            prop_assert_eq!(clamped.is_descending(), domain.is_descending());
        }
        if extent.contains_domain(domain) {
            prop_assert_eq!(clamped, domain);
        }
    }

    #[test]
    fn duration_is_non_negative_and_symmetric(
        a in -10_000_000_000i64..10_000_000_000,
        b in -10_000_000_000i64..10_000_000_000
    ) {
        let forward = TimeDomain::from_millis(a, b);
        let backward = TimeDomain::from_millis(b, a);

        for duration in [
            domain_duration(forward, &ContinuousTime),
            domain_duration(forward, &SkipWeekends),
        ] {
            prop_assert!(duration >= 0);
        }
        prop_assert_eq!(
            domain_duration(forward, &SkipWeekends),
            domain_duration(backward, &SkipWeekends)
        );
        prop_assert_eq!(
            domain_duration(forward, &ContinuousTime),
            domain_duration(backward, &ContinuousTime)
        );
    }

    #[test]
    fn move_to_latest_anchors_right_edge_and_sizes_window(
        count in 2i64..200,
        step in 1i64..100_000,
        start in -5_000_000i64..5_000_000,
        width in 1i64..20_000_000,
        minimum_periods in 0u32..20,
        descending in any::<bool>()
    ) {
        let candles = spaced_candles(count, step);
        let extent = data_extent(&candles).expect("extent");
        let period = Period::new(1, minimum_periods).expect("period");
        let domain = if descending {
            TimeDomain::from_millis(start + width, start)
        } else {
            TimeDomain::from_millis(start, start + width)
        };

        let moved = move_to_latest(domain, &candles, &ContinuousTime, period, 1.0);

        prop_assert_eq!(moved.max(), extent.max());
        prop_assert_eq!(moved.is_descending(), descending);
        let extent_width = extent.width_millis();
        let scaled = width.min(extent_width);
        let expected = scaled.max(period.minimum_domain_millis().min(extent_width));
        prop_assert_eq!(moved.width_millis(), expected);
        prop_assert!(extent.contains_domain(moved));
    }

    #[test]
    fn center_on_date_preserves_width_inside_extent(
        count in 2i64..200,
        step in 1i64..100_000,
        width_ratio in 0.0f64..1.0,
        center_ratio in -0.5f64..1.5
    ) {
        let candles = spaced_candles(count, step);
        let extent = data_extent(&candles).expect("extent");
        let width = (extent.width_millis() as f64 * width_ratio) as i64;
        let domain = TimeDomain::from_millis(0, width);
        let center = Timestamp::from_millis((extent.width_millis() as f64 * center_ratio) as i64);

        let centered = center_on_date(domain, &candles, center);

        prop_assert_eq!(centered.width_millis(), width);
        prop_assert!(extent.contains_domain(centered));
    }
}
