use std::fmt;
use std::sync::Arc;

use crate::core::{DiscontinuityProvider, TimeDomain, Timestamp};
use crate::error::{ChartError, ChartResult};

/// Invertible time-to-pixel mapping owned by a pane's rendering layer.
pub trait TimeProjection {
    fn domain(&self) -> TimeDomain;

    /// Pixel range `(left, right)`.
    fn range(&self) -> (f64, f64);

    fn project(&self, time: Timestamp) -> f64;

    fn invert(&self, pixel: f64) -> Timestamp;

    #[must_use]
    fn width(&self) -> f64 {
        let (left, right) = self.range();
        (right - left).abs()
    }
}

/// Linear projection over gap-free time: market closures take no pixels.
#[derive(Clone)]
pub struct DiscontinuousTimeScale {
    domain: TimeDomain,
    width: f64,
    continuous_span: i64,
    provider: Arc<dyn DiscontinuityProvider>,
}

impl fmt::Debug for DiscontinuousTimeScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscontinuousTimeScale")
            .field("domain", &self.domain)
            .field("width", &self.width)
            .field("continuous_span", &self.continuous_span)
            .field("provider", &self.provider)
            .finish()
    }
}

impl DiscontinuousTimeScale {
    pub fn new(
        domain: TimeDomain,
        width: f64,
        provider: Arc<dyn DiscontinuityProvider>,
    ) -> ChartResult<Self> {
        if !width.is_finite() || width <= 0.0 {
            return Err(ChartError::InvalidViewport { width });
        }

        let continuous_span = provider.distance(domain.start, domain.end);
        if continuous_span == 0 {
            return Err(ChartError::InvalidData(
                "time scale domain must span a non-zero continuous duration".to_owned(),
            ));
        }

        Ok(Self {
            domain,
            width,
            continuous_span,
            provider,
        })
    }

    pub fn with_domain(&self, domain: TimeDomain) -> ChartResult<Self> {
        Self::new(domain, self.width, Arc::clone(&self.provider))
    }

    #[must_use]
    pub fn provider(&self) -> &Arc<dyn DiscontinuityProvider> {
        &self.provider
    }
}

impl TimeProjection for DiscontinuousTimeScale {
    fn domain(&self) -> TimeDomain {
        self.domain
    }

    fn range(&self) -> (f64, f64) {
        (0.0, self.width)
    }

    fn project(&self, time: Timestamp) -> f64 {
        let offset = self.provider.distance(self.domain.start, time) as f64;
        offset / self.continuous_span as f64 * self.width
    }

    fn invert(&self, pixel: f64) -> Timestamp {
        let offset = (pixel / self.width * self.continuous_span as f64).round();
        // Float-to-int casts saturate, so wild pixels pin to the time limits.
        self.provider.offset(self.domain.start, offset as i64)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use approx::assert_relative_eq;

    use super::{DiscontinuousTimeScale, TimeProjection};
    use crate::core::{ContinuousTime, FixedGaps, GapSegment, TimeDomain, Timestamp};

    #[test]
    fn projects_and_inverts_linearly() {
        let scale = DiscontinuousTimeScale::new(
            TimeDomain::from_millis(1_000, 2_000),
            500.0,
            Arc::new(ContinuousTime),
        )
        .expect("valid scale");

        assert_relative_eq!(scale.project(Timestamp::from_millis(1_500)), 250.0);
        assert_relative_eq!(scale.project(Timestamp::from_millis(500)), -250.0);
        assert_eq!(scale.invert(100.0).as_millis(), 1_200);
    }

    #[test]
    fn wild_pixels_pin_to_time_limits_across_gaps() {
        let gaps = FixedGaps::new(vec![GapSegment {
            start: Timestamp::from_millis(100),
            end: Timestamp::from_millis(200),
        }])
        .expect("valid gaps");
        let scale =
            DiscontinuousTimeScale::new(TimeDomain::from_millis(0, 1_000), 500.0, Arc::new(gaps))
                .expect("valid scale");

        assert_eq!(scale.invert(1e30).as_millis(), i64::MAX);
        assert_eq!(scale.invert(-1e30).as_millis(), i64::MIN);
        assert!(scale.project(Timestamp::from_millis(i64::MAX)).is_finite());
    }

    #[test]
    fn rejects_collapsed_domain_and_bad_width() {
        let provider = Arc::new(ContinuousTime);
        assert!(
            DiscontinuousTimeScale::new(TimeDomain::from_millis(5, 5), 100.0, provider.clone())
                .is_err()
        );
        assert!(
            DiscontinuousTimeScale::new(TimeDomain::from_millis(0, 5), 0.0, provider).is_err()
        );
    }
}
