use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::core::{
    Candle, ContinuousTime, DataContext, DiscontinuityProvider, PaneId, Period, TimeDomain,
    Timestamp, canonicalize_candles, data_extent, move_to_latest, visible_candles,
};
use crate::error::ChartResult;

use super::invalidation::PendingRender;
use super::observers::{DomainCallback, SubscriptionId, ViewObserver};
use super::pane_controller::PaneState;
use super::session_config::ViewSessionConfig;

/// Everything that changes together on a product or period switch.
#[derive(Clone)]
pub struct SessionData {
    pub candles: Vec<Candle>,
    pub period: Period,
    pub provider: Arc<dyn DiscontinuityProvider>,
}

impl SessionData {
    #[must_use]
    pub fn new(
        candles: Vec<Candle>,
        period: Period,
        provider: Arc<dyn DiscontinuityProvider>,
    ) -> Self {
        Self {
            candles,
            period,
            provider,
        }
    }

    /// Gap-free time, e.g. crypto markets.
    #[must_use]
    pub fn continuous(candles: Vec<Candle>, period: Period) -> Self {
        Self::new(candles, period, Arc::new(ContinuousTime))
    }
}

impl fmt::Debug for SessionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionData")
            .field("candles_len", &self.candles.len())
            .field("period", &self.period)
            .field("provider", &self.provider)
            .finish()
    }
}

/// Canonical view state of one chart session.
///
/// Cloning is cheap: candles and provider are shared, so a clone doubles as
/// the immutable snapshot handed to observers and hosts.
#[derive(Clone)]
pub struct ViewState {
    pub(super) candles: Arc<Vec<Candle>>,
    pub(super) domain: TimeDomain,
    pub(super) tracking_latest: bool,
    pub(super) period: Period,
    pub(super) provider: Arc<dyn DiscontinuityProvider>,
    pub(super) generation: u64,
}

impl ViewState {
    #[must_use]
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    #[must_use]
    pub fn domain(&self) -> TimeDomain {
        self.domain
    }

    #[must_use]
    pub fn tracking_latest(&self) -> bool {
        self.tracking_latest
    }

    #[must_use]
    pub fn period(&self) -> Period {
        self.period
    }

    #[must_use]
    pub fn provider(&self) -> &Arc<dyn DiscontinuityProvider> {
        &self.provider
    }

    /// Bumped on every committed mutation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn data_extent(&self) -> Option<TimeDomain> {
        data_extent(&self.candles)
    }

    #[must_use]
    pub fn data_context(&self) -> DataContext<'_> {
        DataContext::new(&self.candles, self.provider.as_ref(), self.period)
    }
}

impl fmt::Debug for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewState")
            .field("candles_len", &self.candles.len())
            .field("domain", &self.domain)
            .field("tracking_latest", &self.tracking_latest)
            .field("period", &self.period)
            .field("provider", &self.provider)
            .field("generation", &self.generation)
            .finish()
    }
}

/// Owner of the single view domain shared by every pane of a chart.
///
/// All domain writes go through [`ViewSession::update_domain`] or the data
/// methods; panes, observers and the render request follow from there.
pub struct ViewSession {
    pub(super) config: ViewSessionConfig,
    pub(super) state: ViewState,
    pub(super) observers: Vec<Box<dyn ViewObserver>>,
    pub(super) subscriptions: Vec<(SubscriptionId, DomainCallback)>,
    pub(super) next_subscription: u64,
    pub(super) panes: IndexMap<PaneId, PaneState>,
    pub(super) next_pane: u32,
    pub(super) pending_render: PendingRender,
}

impl ViewSession {
    pub fn new(config: ViewSessionConfig, data: SessionData) -> ChartResult<Self> {
        config.validate()?;
        let candles = canonicalize_candles(data.candles);
        let domain = initial_window(
            &candles,
            data.provider.as_ref(),
            data.period,
            config.initial_visible_periods,
        );
        debug!(
            candles_len = candles.len(),
            start = domain.start.as_millis(),
            end = domain.end.as_millis(),
            "view session created"
        );

        Ok(Self {
            config,
            state: ViewState {
                candles: Arc::new(candles),
                domain,
                tracking_latest: true,
                period: data.period,
                provider: data.provider,
                generation: 0,
            },
            observers: Vec::new(),
            subscriptions: Vec::new(),
            next_subscription: 0,
            panes: IndexMap::new(),
            next_pane: 0,
            pending_render: PendingRender::default(),
        })
    }

    #[must_use]
    pub fn config(&self) -> ViewSessionConfig {
        self.config
    }

    #[must_use]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    #[must_use]
    pub fn snapshot(&self) -> ViewState {
        self.state.clone()
    }

    #[must_use]
    pub fn domain(&self) -> TimeDomain {
        self.state.domain
    }

    #[must_use]
    pub fn candles(&self) -> &[Candle] {
        &self.state.candles
    }

    #[must_use]
    pub fn tracking_latest(&self) -> bool {
        self.state.tracking_latest
    }

    #[must_use]
    pub fn period(&self) -> Period {
        self.state.period
    }

    /// Candles inside `domain`, padded by one candle on each side.
    #[must_use]
    pub fn visible_data(&self, domain: TimeDomain) -> &[Candle] {
        visible_candles(&self.state.candles, domain)
    }
}

/// Last `periods` periods of data, widened to the period's minimum zoom.
///
/// Without data the window starts at the epoch; a single candle yields a
/// collapsed window until more data arrives.
pub(super) fn initial_window(
    candles: &[Candle],
    provider: &dyn DiscontinuityProvider,
    period: Period,
    periods: u32,
) -> TimeDomain {
    let span = period.millis().saturating_mul(i64::from(periods));
    let Some(extent) = data_extent(candles) else {
        return TimeDomain::new(Timestamp::from_millis(0), Timestamp::from_millis(span));
    };
    let end = extent.max();
    let seed = TimeDomain::new(provider.offset(end, -span), end);
    move_to_latest(seed, candles, provider, period, 1.0)
}
