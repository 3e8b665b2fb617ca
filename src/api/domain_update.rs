use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{
    PaneId, TimeDomain, Timestamp, center_on_date, clamp_domain, data_extent, move_to_latest,
};

use super::ViewSession;
use super::invalidation::RenderTopic;
use super::observers::ViewEvent;

/// Who proposed a domain change; used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainUpdateSource {
    Gesture(PaneId),
    Navigator,
    Center,
    Latest,
    Data,
    Host,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainRejection {
    /// No candles, so there is no extent to clamp into.
    NoData,
    /// The clamped candidate collapsed to a single instant.
    Degenerate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainUpdate {
    Applied(TimeDomain),
    Unchanged,
    Rejected(DomainRejection),
}

impl DomainUpdate {
    #[must_use]
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

impl ViewSession {
    /// The single write path for the view domain.
    ///
    /// The candidate is clamped into the data extent; a collapsed result is
    /// rejected without touching state.
    pub fn update_domain(
        &mut self,
        candidate: TimeDomain,
        source: DomainUpdateSource,
    ) -> DomainUpdate {
        let Some(extent) = data_extent(&self.state.candles) else {
            debug!(?source, "domain update rejected: no data");
            return DomainUpdate::Rejected(DomainRejection::NoData);
        };
        let clamped = clamp_domain(candidate, extent);
        if clamped.is_degenerate() {
            debug!(
                ?source,
                start = candidate.start.as_millis(),
                end = candidate.end.as_millis(),
                "domain update rejected: degenerate after clamp"
            );
            return DomainUpdate::Rejected(DomainRejection::Degenerate);
        }
        if clamped == self.state.domain {
            return DomainUpdate::Unchanged;
        }
        self.commit_domain(clamped, extent, source)
    }

    /// Writes an already clamped domain and fans the change out.
    pub(super) fn commit_domain(
        &mut self,
        clamped: TimeDomain,
        extent: TimeDomain,
        source: DomainUpdateSource,
    ) -> DomainUpdate {
        self.state.domain = clamped;
        self.state.generation += 1;
        trace!(
            ?source,
            start = clamped.start.as_millis(),
            end = clamped.end.as_millis(),
            generation = self.state.generation,
            "domain committed"
        );

        let tracking_latest = self.is_at_latest(clamped, extent);
        self.write_tracking_latest(tracking_latest);
        self.emit(ViewEvent::DomainChanged(clamped));
        self.recompute_panes();
        self.request_render(RenderTopic::Domain);
        DomainUpdate::Applied(clamped)
    }

    /// Re-anchors the current window on the newest candle.
    pub fn reset_to_latest(&mut self) -> DomainUpdate {
        let candidate = move_to_latest(
            self.state.domain,
            &self.state.candles,
            self.state.provider.as_ref(),
            self.state.period,
            1.0,
        );
        let update = self.update_domain(candidate, DomainUpdateSource::Latest);
        if update == DomainUpdate::Unchanged && self.state.data_extent().is_some() {
            self.write_tracking_latest(true);
        }
        update
    }

    /// Turning tracking on jumps to the newest candle; turning it off only
    /// clears the flag.
    pub fn set_tracking_latest(&mut self, tracking_latest: bool) -> DomainUpdate {
        if tracking_latest {
            return self.reset_to_latest();
        }
        self.write_tracking_latest(false);
        DomainUpdate::Unchanged
    }

    /// Navigator brush selection.
    pub fn brush_navigator(&mut self, domain: TimeDomain) -> DomainUpdate {
        self.update_domain(domain, DomainUpdateSource::Navigator)
    }

    /// Keeps the current width and centers the window on `center`.
    pub fn center_on(&mut self, center: Timestamp) -> DomainUpdate {
        let candidate = center_on_date(self.state.domain, &self.state.candles, center);
        self.update_domain(candidate, DomainUpdateSource::Center)
    }

    fn is_at_latest(&self, domain: TimeDomain, extent: TimeDomain) -> bool {
        domain
            .max()
            .millis_until(extent.max())
            .saturating_abs()
            <= self.config.tracking_epsilon_ms
    }

    /// Writes the flag, keeping every pane's controller in step.
    pub(super) fn write_tracking_latest(&mut self, tracking_latest: bool) {
        if self.state.tracking_latest == tracking_latest {
            return;
        }
        self.state.tracking_latest = tracking_latest;
        self.state.generation += 1;
        for pane in self.panes.values_mut() {
            if let Some(controller) = pane.controller.as_mut() {
                controller.set_tracking_latest(tracking_latest);
            }
        }
        debug!(tracking_latest, "tracking latest toggled");
        self.emit(ViewEvent::TrackingLatestToggled(tracking_latest));
        self.request_render(RenderTopic::Tracking);
    }
}
