use std::cmp::Ordering;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{Candle, TimeDomain, canonicalize_candles, clamp_domain, move_to_latest};
use crate::error::{ChartError, ChartResult};

use super::domain_update::{DomainRejection, DomainUpdate, DomainUpdateSource};
use super::invalidation::RenderTopic;
use super::observers::ViewEvent;
use super::ViewSession;
use super::view_session::{SessionData, initial_window};

/// Messages from the candle supplier (historic fetch or live stream).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeedMessage {
    Replace(Vec<Candle>),
    Update(Candle),
    Error(String),
    Closed,
}

impl ViewSession {
    /// Product or period switch: candles, period and provider change
    /// together and the window restarts on the newest data.
    pub fn load(&mut self, data: SessionData) {
        let original_count = data.candles.len();
        let candles = canonicalize_candles(data.candles);
        debug!(
            original_count,
            canonical_count = candles.len(),
            period_seconds = data.period.seconds(),
            "load session data"
        );

        let domain = initial_window(
            &candles,
            data.provider.as_ref(),
            data.period,
            self.config.initial_visible_periods,
        );
        self.state.candles = Arc::new(candles);
        self.state.period = data.period;
        self.state.provider = data.provider;
        self.state.domain = domain;
        self.state.generation += 1;
        self.write_tracking_latest(true);
        self.reset_panes();
        self.recompute_panes();

        self.emit(ViewEvent::DataReplaced {
            candles_len: self.state.candles.len(),
        });
        self.emit(ViewEvent::DomainChanged(domain));
        self.request_render(RenderTopic::Data);
        self.request_render(RenderTopic::Domain);
    }

    /// Replaces the candle series of the current product.
    ///
    /// A tracking view jumps to the newest candle; otherwise the window is
    /// kept and clamped, falling back to the initial window when it no longer
    /// overlaps the data.
    pub fn set_candles(&mut self, candles: Vec<Candle>) -> DomainUpdate {
        let original_count = candles.len();
        let candles = canonicalize_candles(candles);
        debug!(
            original_count,
            canonical_count = candles.len(),
            "set candles"
        );
        self.state.candles = Arc::new(candles);
        self.state.generation += 1;
        self.emit(ViewEvent::DataReplaced {
            candles_len: self.state.candles.len(),
        });
        self.request_render(RenderTopic::Data);

        let Some(extent) = self.state.data_extent() else {
            self.recompute_panes();
            return DomainUpdate::Rejected(DomainRejection::NoData);
        };
        let candidate = if self.state.tracking_latest {
            self.latest_candidate()
        } else {
            let clamped = clamp_domain(self.state.domain, extent);
            if clamped.is_degenerate() {
                initial_window(
                    &self.state.candles,
                    self.state.provider.as_ref(),
                    self.state.period,
                    self.config.initial_visible_periods,
                )
            } else {
                clamped
            }
        };
        self.commit_after_data_change(candidate)
    }

    /// Updates candles using realtime-update semantics:
    /// - appends when `candle.time` is newer than the latest candle
    /// - replaces the latest candle when `candle.time` is equal
    /// - rejects out-of-order updates (`candle.time` older than latest)
    /// - rejects candles breaking the OHLCV invariants
    pub fn update_candle(&mut self, candle: Candle) -> ChartResult<DomainUpdate> {
        candle.validate()?;
        let was_empty = self.state.candles.is_empty();
        let candles = Arc::make_mut(&mut self.state.candles);
        match candles
            .last()
            .map_or(Ordering::Greater, |last| candle.time.cmp(&last.time))
        {
            Ordering::Less => {
                return Err(ChartError::InvalidData(
                    "candle update time must be >= latest candle time".to_owned(),
                ));
            }
            Ordering::Equal => {
                if let Some(last) = candles.last_mut() {
                    *last = candle;
                }
            }
            Ordering::Greater => candles.push(candle),
        }

        let candles_len = candles.len();
        self.state.generation += 1;
        trace!(count = candles_len, time = candle.time.as_millis(), "update candle");
        self.emit(ViewEvent::DataUpdated { candles_len });
        self.request_render(RenderTopic::Data);

        // The first candle has to pull the window into the data.
        if !self.state.tracking_latest && !was_empty {
            self.recompute_panes();
            return Ok(DomainUpdate::Unchanged);
        }
        let candidate = self.latest_candidate();
        Ok(self.commit_after_data_change(candidate))
    }

    /// Routes one supplier message. Errors and stream closure are forwarded
    /// to observers and never touch the domain.
    pub fn apply_feed(&mut self, message: FeedMessage) -> ChartResult<DomainUpdate> {
        match message {
            FeedMessage::Replace(candles) => Ok(self.set_candles(candles)),
            FeedMessage::Update(candle) => self.update_candle(candle),
            FeedMessage::Error(reason) => {
                warn!(error = %reason, "candle feed reported an error");
                self.emit(ViewEvent::FeedError(reason));
                Ok(DomainUpdate::Unchanged)
            }
            FeedMessage::Closed => {
                debug!("candle feed closed");
                self.emit(ViewEvent::FeedClosed);
                Ok(DomainUpdate::Unchanged)
            }
        }
    }

    fn latest_candidate(&self) -> TimeDomain {
        move_to_latest(
            self.state.domain,
            &self.state.candles,
            self.state.provider.as_ref(),
            self.state.period,
            1.0,
        )
    }

    // Panes must follow the new data even when the window itself stays put.
    // Data with a single distinct time only admits the trivial window, which
    // the funnel rejects, so the window is pinned onto that instant instead.
    fn commit_after_data_change(&mut self, candidate: TimeDomain) -> DomainUpdate {
        let mut update = self.update_domain(candidate, DomainUpdateSource::Data);
        if update == DomainUpdate::Rejected(DomainRejection::Degenerate)
            && let Some(extent) = self.state.data_extent()
            && extent.is_degenerate()
        {
            update = if self.state.domain == extent {
                DomainUpdate::Unchanged
            } else {
                self.commit_domain(extent, extent, DomainUpdateSource::Data)
            };
        }
        if !update.is_applied() {
            self.recompute_panes();
        }
        update
    }
}
