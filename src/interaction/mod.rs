//! Per-pane zoom/pan gesture state machine.
//!
//! A controller turns pointer deltas into candidate view domains. It never
//! writes shared state: committed domains are handed back to the caller,
//! which funnels them through the session's update path.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{
    DataContext, TimeDomain, TimeProjection, Timestamp, calculate_domain, clamp_domain,
    domain_duration,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GesturePhase {
    #[default]
    Idle,
    Active,
    Committed,
    Rejected,
}

/// Which gesture kinds a pane accepts and whether zooming re-anchors on the
/// newest candle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureConfig {
    #[serde(default = "default_true")]
    pub allow_pan: bool,
    #[serde(default = "default_true")]
    pub allow_zoom: bool,
    #[serde(default = "default_true")]
    pub tracking_latest: bool,
}

fn default_true() -> bool {
    true
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            allow_pan: true,
            allow_zoom: true,
            tracking_latest: true,
        }
    }
}

impl GestureConfig {
    /// Navigator strip: zoom only, the brush handles panning.
    #[must_use]
    pub fn navigator() -> Self {
        Self {
            allow_pan: false,
            ..Self::default()
        }
    }
}

/// Transient pixel transform of the gesture in flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureTransform {
    pub translate_x: f64,
    pub scale: f64,
}

impl Default for GestureTransform {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl GestureTransform {
    pub const NEUTRAL: Self = Self {
        translate_x: 0.0,
        scale: 1.0,
    };

    #[must_use]
    pub fn is_neutral(self) -> bool {
        self == Self::NEUTRAL
    }

    #[must_use]
    pub fn is_zoom(self) -> bool {
        (self.scale - 1.0).abs() > f64::EPSILON
    }

    fn pan_by(&mut self, dx: f64) {
        self.translate_x += dx;
    }

    // Keeps the pixel under `anchor_x` fixed.
    fn zoom_by(&mut self, factor: f64, anchor_x: f64) {
        self.translate_x = anchor_x - (anchor_x - self.translate_x) * factor;
        self.scale *= factor;
    }
}

/// A base projection viewed through a gesture transform (`x * k + tx`).
#[derive(Debug, Clone, Copy)]
pub struct TransformedProjection<'a, P: ?Sized> {
    base: &'a P,
    transform: GestureTransform,
}

impl<'a, P: TimeProjection + ?Sized> TransformedProjection<'a, P> {
    #[must_use]
    pub fn new(base: &'a P, transform: GestureTransform) -> Self {
        Self { base, transform }
    }
}

impl<P: TimeProjection + ?Sized> TimeProjection for TransformedProjection<'_, P> {
    fn domain(&self) -> TimeDomain {
        let (left, right) = self.range();
        TimeDomain::new(self.invert(left), self.invert(right))
    }

    fn range(&self) -> (f64, f64) {
        self.base.range()
    }

    fn project(&self, time: Timestamp) -> f64 {
        self.base.project(time) * self.transform.scale + self.transform.translate_x
    }

    fn invert(&self, pixel: f64) -> Timestamp {
        self.base
            .invert((pixel - self.transform.translate_x) / self.transform.scale)
    }
}

/// Pixel positions of the data extent's edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelExtent {
    pub min: f64,
    pub max: f64,
}

impl PixelExtent {
    #[must_use]
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }
}

/// Translate correction that stops the data from being dragged off an edge.
///
/// Positive when the first candle sits at or right of the left edge,
/// negative when the last candle sits at or left of the right edge, zero
/// otherwise. Subtract it from the gesture's translate.
#[must_use]
pub fn pan_restriction(extent: PixelExtent, viewport_width: f64) -> f64 {
    if extent.min >= 0.0 {
        extent.min
    } else if extent.max - viewport_width <= 0.0 {
        extent.max - viewport_width
    } else {
        0.0
    }
}

/// `true` when all data already fits inside the viewport with margin on both
/// sides, so zooming further out cannot show anything new.
#[must_use]
pub fn is_max_domain_viewed(extent: PixelExtent, viewport_width: f64) -> bool {
    extent.min > 0.0 && extent.max - viewport_width < 0.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GestureEvent {
    Begin,
    Pan { dx: f64 },
    Zoom { factor: f64, anchor_x: f64 },
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureRejection {
    /// The pane does not accept this gesture kind.
    Disallowed,
    /// Fewer than two distinct candle times.
    InsufficientData,
    /// Non-finite delta, or a zoom factor `<= 0`.
    InvalidGesture,
    BelowMinimumZoom { duration_ms: i64, minimum_ms: i64 },
    Degenerate,
    /// The left-edge anchor correction inverted the domain.
    InvertedOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureOutcome {
    /// Lifecycle event, nothing to commit.
    Unchanged,
    Committed(TimeDomain),
    Rejected(GestureRejection),
}

/// Gesture state machine for one pane.
///
/// `Idle → Active → {Committed | Rejected} → Idle`. The transform is reset to
/// neutral after every commit or rejection, so the projection passed to the
/// next tick must reflect the domain committed by the previous one.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GestureController {
    config: GestureConfig,
    transform: GestureTransform,
    phase: GesturePhase,
}

impl GestureController {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            transform: GestureTransform::NEUTRAL,
            phase: GesturePhase::Idle,
        }
    }

    #[must_use]
    pub fn config(&self) -> GestureConfig {
        self.config
    }

    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    #[must_use]
    pub fn transform(&self) -> GestureTransform {
        self.transform
    }

    pub fn set_allow_pan(&mut self, allow: bool) {
        self.config.allow_pan = allow;
    }

    pub fn set_allow_zoom(&mut self, allow: bool) {
        self.config.allow_zoom = allow;
    }

    pub fn set_tracking_latest(&mut self, tracking_latest: bool) {
        self.config.tracking_latest = tracking_latest;
    }

    /// Drops any gesture in flight.
    pub fn reset(&mut self) {
        self.transform = GestureTransform::NEUTRAL;
        self.phase = GesturePhase::Idle;
    }

    /// Marks a committed candidate as refused downstream, e.g. by the
    /// session's domain funnel.
    pub fn reject_commit(&mut self, reason: GestureRejection) -> GestureOutcome {
        self.reject(reason)
    }

    /// Single transition function of the state machine.
    pub fn apply<P: TimeProjection + ?Sized>(
        &mut self,
        event: GestureEvent,
        projection: &P,
        context: DataContext<'_>,
    ) -> GestureOutcome {
        match event {
            GestureEvent::Begin => {
                self.transform = GestureTransform::NEUTRAL;
                self.phase = GesturePhase::Active;
                GestureOutcome::Unchanged
            }
            GestureEvent::End => {
                self.transform = GestureTransform::NEUTRAL;
                self.phase = GesturePhase::Idle;
                GestureOutcome::Unchanged
            }
            GestureEvent::Pan { dx } => {
                self.phase = GesturePhase::Active;
                if !dx.is_finite() {
                    return self.reject(GestureRejection::InvalidGesture);
                }
                self.transform.pan_by(dx);
                self.tick(projection, context)
            }
            GestureEvent::Zoom { factor, anchor_x } => {
                self.phase = GesturePhase::Active;
                if !factor.is_finite() || factor <= 0.0 || !anchor_x.is_finite() {
                    return self.reject(GestureRejection::InvalidGesture);
                }
                self.transform.zoom_by(factor, anchor_x);
                self.tick(projection, context)
            }
        }
    }

    fn tick<P: TimeProjection + ?Sized>(
        &mut self,
        projection: &P,
        context: DataContext<'_>,
    ) -> GestureOutcome {
        let Some(extent) = context.data_extent().filter(|extent| !extent.is_degenerate()) else {
            return self.reject(GestureRejection::InsufficientData);
        };
        let (first_time, last_time) = extent.ascending();
        let viewport_width = projection.width();

        let current = TransformedProjection::new(projection, self.transform);
        let pixel_extent = PixelExtent::new(current.project(first_time), current.project(last_time));
        self.transform.translate_x -= pan_restriction(pixel_extent, viewport_width);
        let max_domain_viewed = is_max_domain_viewed(pixel_extent, viewport_width);

        let zoomed = self.transform.is_zoom();
        let panned = !zoomed;
        if !((panned && self.config.allow_pan) || (zoomed && self.config.allow_zoom)) {
            return self.reject(GestureRejection::Disallowed);
        }

        let current = TransformedProjection::new(projection, self.transform);
        let mut candidate = if max_domain_viewed {
            extent
        } else {
            calculate_domain(
                current.domain(),
                context,
                extent,
                zoomed,
                self.config.tracking_latest,
            )
        };

        let first_offset = current.project(first_time);
        if first_offset > 0.0 {
            let (left, right) = candidate.ascending();
            let anchored_right = current.invert(current.project(right) + first_offset);
            if anchored_right <= left {
                return self.reject(GestureRejection::InvertedOrder);
            }
            candidate = clamp_domain(candidate.with_ordering_of(left, anchored_right), extent);
        }

        let duration_ms = domain_duration(candidate, context.provider);
        let minimum_ms = context.period.minimum_domain_millis();
        if duration_ms < minimum_ms {
            return self.reject(GestureRejection::BelowMinimumZoom {
                duration_ms,
                minimum_ms,
            });
        }
        if candidate.is_degenerate() {
            return self.reject(GestureRejection::Degenerate);
        }

        trace!(
            start = candidate.start.as_millis(),
            end = candidate.end.as_millis(),
            zoomed,
            "gesture committed domain"
        );
        self.transform = GestureTransform::NEUTRAL;
        self.phase = GesturePhase::Committed;
        GestureOutcome::Committed(candidate)
    }

    fn reject(&mut self, reason: GestureRejection) -> GestureOutcome {
        debug!(?reason, "gesture rejected, transform reset");
        self.transform = GestureTransform::NEUTRAL;
        self.phase = GesturePhase::Rejected;
        GestureOutcome::Rejected(reason)
    }
}
