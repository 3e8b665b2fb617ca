use std::sync::Arc;

use approx::assert_relative_eq;
use chart_view::core::{
    Candle, ContinuousTime, DataContext, DiscontinuousTimeScale, Period, TimeDomain,
    TimeProjection, Timestamp,
};
use chart_view::interaction::{
    GestureConfig, GestureController, GestureEvent, GestureOutcome, GesturePhase,
    GestureRejection, GestureTransform, TransformedProjection,
};

fn candles(count: i64, step: i64) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            Candle::new(Timestamp::from_millis(i * step), 5.0, 6.0, 4.0, 5.5, 1.0)
                .expect("valid candle")
        })
        .collect()
}

fn projection(start: i64, end: i64, width: f64) -> DiscontinuousTimeScale {
    DiscontinuousTimeScale::new(
        TimeDomain::from_millis(start, end),
        width,
        Arc::new(ContinuousTime),
    )
    .expect("valid projection")
}

fn fixed_zoom() -> GestureController {
    GestureController::new(GestureConfig {
        tracking_latest: false,
        ..GestureConfig::default()
    })
}

#[test]
fn transformed_projection_scales_then_translates() {
    let base = projection(0, 1_000, 100.0);
    let transform = GestureTransform {
        translate_x: 10.0,
        scale: 2.0,
    };
    let view = TransformedProjection::new(&base, transform);

    assert_relative_eq!(view.project(Timestamp::from_millis(500)), 110.0);
    assert_eq!(view.invert(110.0), Timestamp::from_millis(500));
    assert_eq!(view.domain(), TimeDomain::from_millis(-50, 450));
}

#[test]
fn dragging_past_first_candle_is_cancelled() {
    let data = candles(1_000, 1_000);
    let context = DataContext::new(&data, &ContinuousTime, Period::new(1, 5).expect("period"));
    let view = projection(0, 100_000, 1_000.0);
    let mut controller = GestureController::default();

    let outcome = controller.apply(GestureEvent::Pan { dx: 100.0 }, &view, context);

    assert_eq!(
        outcome,
        GestureOutcome::Committed(TimeDomain::from_millis(0, 100_000))
    );
}

#[test]
fn dragging_past_last_candle_is_cancelled() {
    let data = candles(1_000, 1_000);
    let context = DataContext::new(&data, &ContinuousTime, Period::new(1, 5).expect("period"));
    let view = projection(899_000, 999_000, 1_000.0);
    let mut controller = GestureController::default();

    let outcome = controller.apply(GestureEvent::Pan { dx: -100.0 }, &view, context);

    assert_eq!(
        outcome,
        GestureOutcome::Committed(TimeDomain::from_millis(899_000, 999_000))
    );
}

#[test]
fn zoom_out_past_all_data_commits_full_extent() {
    let data = candles(101, 1_000);
    let context = DataContext::new(&data, &ContinuousTime, Period::new(1, 5).expect("period"));
    let view = projection(10_000, 90_000, 1_000.0);
    let mut controller = fixed_zoom();

    let outcome = controller.apply(
        GestureEvent::Zoom {
            factor: 0.25,
            anchor_x: 500.0,
        },
        &view,
        context,
    );

    assert_eq!(
        outcome,
        GestureOutcome::Committed(TimeDomain::from_millis(0, 100_000))
    );
}

#[test]
fn right_edge_restriction_pins_first_candle_to_left_edge() {
    // The right-edge correction pushes the first candle right of the left
    // edge, so the anchor correction stretches the window back to the data.
    let data = candles(101, 1_000);
    let context = DataContext::new(&data, &ContinuousTime, Period::new(1, 5).expect("period"));
    let view = projection(10_000, 110_000, 1_000.0);
    let mut controller = fixed_zoom();

    let outcome = controller.apply(
        GestureEvent::Zoom {
            factor: 0.5,
            anchor_x: 0.0,
        },
        &view,
        context,
    );

    assert_eq!(
        outcome,
        GestureOutcome::Committed(TimeDomain::from_millis(0, 100_000))
    );
    assert!(controller.transform().is_neutral());
}

#[test]
fn zoom_in_while_tracking_snaps_to_latest() {
    let data = candles(1_000, 1_000);
    let context = DataContext::new(&data, &ContinuousTime, Period::new(1, 5).expect("period"));
    let view = projection(100_000, 200_000, 1_000.0);
    let mut controller = GestureController::default();

    let outcome = controller.apply(
        GestureEvent::Zoom {
            factor: 2.0,
            anchor_x: 500.0,
        },
        &view,
        context,
    );

    assert_eq!(
        outcome,
        GestureOutcome::Committed(TimeDomain::from_millis(949_000, 999_000))
    );
}

#[test]
fn minimum_zoom_guard_rejects_and_resets_transform() {
    let data = candles(1_000, 1_000);
    let context = DataContext::new(&data, &ContinuousTime, Period::new(1, 20).expect("period"));
    let view = projection(100_000, 130_000, 1_000.0);
    let mut controller = fixed_zoom();

    controller.apply(GestureEvent::Begin, &view, context);
    let outcome = controller.apply(
        GestureEvent::Zoom {
            factor: 2.0,
            anchor_x: 500.0,
        },
        &view,
        context,
    );

    assert_eq!(
        outcome,
        GestureOutcome::Rejected(GestureRejection::BelowMinimumZoom {
            duration_ms: 15_000,
            minimum_ms: 20_000,
        })
    );
    assert_eq!(controller.transform(), GestureTransform::NEUTRAL);
    assert_eq!(controller.phase(), GesturePhase::Rejected);

    controller.apply(GestureEvent::End, &view, context);
    assert_eq!(controller.phase(), GesturePhase::Idle);
}

#[test]
fn disabled_zoom_is_rejected() {
    let data = candles(1_000, 1_000);
    let context = DataContext::new(&data, &ContinuousTime, Period::new(1, 5).expect("period"));
    let view = projection(100_000, 200_000, 1_000.0);
    let mut controller = GestureController::default();
    controller.set_allow_zoom(false);

    let outcome = controller.apply(
        GestureEvent::Zoom {
            factor: 1.5,
            anchor_x: 200.0,
        },
        &view,
        context,
    );

    assert_eq!(outcome, GestureOutcome::Rejected(GestureRejection::Disallowed));
    assert!(controller.transform().is_neutral());
}

#[test]
fn non_finite_pan_is_rejected() {
    let data = candles(10, 1_000);
    let context = DataContext::new(&data, &ContinuousTime, Period::ONE_MINUTE);
    let view = projection(0, 9_000, 500.0);
    let mut controller = GestureController::default();

    assert_eq!(
        controller.apply(GestureEvent::Pan { dx: f64::INFINITY }, &view, context),
        GestureOutcome::Rejected(GestureRejection::InvalidGesture)
    );
}
