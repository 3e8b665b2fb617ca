use std::ops::Range;
use std::sync::Arc;

use tracing::debug;

use crate::core::pane::validate_pane_width;
use crate::core::{
    DiscontinuousTimeScale, PaneConfig, PaneId, PaneKind, close_extent, padded_window_indices,
    price_extent, volume_extent,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{
    GestureController, GestureEvent, GestureOutcome, GesturePhase, GestureRejection,
};

use super::axis_ticks::{TickLayout, TickLayoutEngine};
use super::domain_update::{DomainUpdate, DomainUpdateSource};
use super::invalidation::RenderTopic;
use super::{ViewSession, ViewState};

/// What a pane derived from the last committed state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PaneView {
    /// Index range into the session candles, padded by one on each side.
    pub visible: Range<usize>,
    pub y_extent: Option<(f64, f64)>,
    /// Axis panes only.
    pub ticks: Option<TickLayout>,
}

#[derive(Debug, Clone)]
pub(super) struct PaneState {
    pub(super) config: PaneConfig,
    pub(super) controller: Option<GestureController>,
    tick_engine: Option<TickLayoutEngine>,
    view: PaneView,
}

impl PaneState {
    fn recompute(&mut self, state: &ViewState) {
        let candles = state.candles();
        let domain = state.domain();
        self.view = match self.config.kind {
            PaneKind::Primary => {
                let visible = padded_window_indices(candles, domain);
                let y_extent = price_extent(&candles[visible.clone()]);
                PaneView {
                    visible,
                    y_extent,
                    ticks: None,
                }
            }
            PaneKind::Secondary => {
                let visible = padded_window_indices(candles, domain);
                let y_extent = volume_extent(&candles[visible.clone()]);
                PaneView {
                    visible,
                    y_extent,
                    ticks: None,
                }
            }
            PaneKind::XAxis => PaneView {
                visible: padded_window_indices(candles, domain),
                y_extent: None,
                ticks: self.tick_engine.as_mut().map(|engine| {
                    engine.layout(
                        domain,
                        state.period(),
                        state.provider().as_ref(),
                        self.config.width_px,
                    )
                }),
            },
            PaneKind::Navigator => PaneView {
                visible: 0..candles.len(),
                y_extent: close_extent(candles),
                ticks: None,
            },
        };
    }
}

impl ViewSession {
    /// Adds a pane and computes its view right away.
    pub fn add_pane(&mut self, config: PaneConfig) -> ChartResult<PaneId> {
        let config = config.validate()?;
        let controller = config
            .kind
            .default_gesture(self.config.gesture)
            .map(|fallback| {
                let mut controller = GestureController::new(config.gesture.unwrap_or(fallback));
                controller.set_tracking_latest(self.state.tracking_latest);
                controller
            });
        let tick_engine = match config.kind {
            PaneKind::XAxis => Some(TickLayoutEngine::new(self.config.tick_target_spacing_px)?),
            _ => None,
        };

        let id = PaneId::new(self.next_pane);
        self.next_pane += 1;
        let mut pane = PaneState {
            config,
            controller,
            tick_engine,
            view: PaneView::default(),
        };
        pane.recompute(&self.state);
        self.panes.insert(id, pane);
        debug!(pane = id.raw(), kind = ?config.kind, "pane added");
        self.request_render(RenderTopic::PaneLayout);
        Ok(id)
    }

    /// Removes a pane. Returns `true` when removed.
    pub fn remove_pane(&mut self, pane: PaneId) -> bool {
        let removed = self.panes.shift_remove(&pane).is_some();
        if removed {
            self.request_render(RenderTopic::PaneLayout);
        }
        removed
    }

    #[must_use]
    pub fn pane_ids(&self) -> Vec<PaneId> {
        self.panes.keys().copied().collect()
    }

    #[must_use]
    pub fn pane_count(&self) -> usize {
        self.panes.len()
    }

    pub fn pane_kind(&self, pane: PaneId) -> ChartResult<PaneKind> {
        Ok(self.pane(pane)?.config.kind)
    }

    pub fn pane_view(&self, pane: PaneId) -> ChartResult<&PaneView> {
        Ok(&self.pane(pane)?.view)
    }

    /// `None` for panes that take no gestures.
    pub fn pane_gesture_phase(&self, pane: PaneId) -> ChartResult<Option<GesturePhase>> {
        Ok(self.pane(pane)?.controller.map(|c| c.phase()))
    }

    pub fn set_pane_width(&mut self, pane: PaneId, width_px: f64) -> ChartResult<()> {
        validate_pane_width(width_px)?;
        let entry = self.pane_mut(pane)?;
        entry.config.width_px = width_px;
        if let Some(controller) = entry.controller.as_mut() {
            controller.reset();
        }
        self.recompute_pane(pane);
        self.request_render(RenderTopic::PaneLayout);
        Ok(())
    }

    pub fn set_allow_pan(&mut self, pane: PaneId, allow: bool) -> ChartResult<()> {
        self.gesture_controller_mut(pane)?.set_allow_pan(allow);
        Ok(())
    }

    pub fn set_allow_zoom(&mut self, pane: PaneId, allow: bool) -> ChartResult<()> {
        self.gesture_controller_mut(pane)?.set_allow_zoom(allow);
        Ok(())
    }

    /// Overrides one pane's zoom behavior until the session flag next flips.
    pub fn set_pane_tracking_latest(&mut self, pane: PaneId, tracking: bool) -> ChartResult<()> {
        self.gesture_controller_mut(pane)?.set_tracking_latest(tracking);
        Ok(())
    }

    /// Feeds one gesture event to a pane and commits what it produces.
    ///
    /// The pane's projection is rebuilt from the committed domain on every
    /// call, matching the controller's reset-after-commit transform.
    pub fn apply_gesture(&mut self, pane: PaneId, event: GestureEvent) -> ChartResult<GestureOutcome> {
        let entry = self
            .panes
            .get_mut(&pane)
            .ok_or(ChartError::UnknownPane(pane))?;
        let Some(controller) = entry.controller.as_mut() else {
            return Ok(GestureOutcome::Rejected(GestureRejection::Disallowed));
        };

        let outcome = match DiscontinuousTimeScale::new(
            self.state.domain,
            entry.config.width_px,
            Arc::clone(&self.state.provider),
        ) {
            Ok(projection) => controller.apply(event, &projection, self.state.data_context()),
            Err(err) => {
                debug!(pane = pane.raw(), error = %err, "no projection for gesture");
                controller.reset();
                return Ok(GestureOutcome::Rejected(GestureRejection::InsufficientData));
            }
        };

        let GestureOutcome::Committed(candidate) = outcome else {
            return Ok(outcome);
        };
        match self.update_domain(candidate, DomainUpdateSource::Gesture(pane)) {
            DomainUpdate::Applied(_) | DomainUpdate::Unchanged => Ok(outcome),
            DomainUpdate::Rejected(_) => Ok(self
                .panes
                .get_mut(&pane)
                .and_then(|entry| entry.controller.as_mut())
                .map_or(
                    GestureOutcome::Rejected(GestureRejection::Degenerate),
                    |controller| controller.reject_commit(GestureRejection::Degenerate),
                )),
        }
    }

    pub(super) fn recompute_panes(&mut self) {
        for pane in self.panes.values_mut() {
            pane.recompute(&self.state);
        }
    }

    /// Drops gestures in flight and cached tick spacing after a data swap.
    pub(super) fn reset_panes(&mut self) {
        for pane in self.panes.values_mut() {
            if let Some(controller) = pane.controller.as_mut() {
                controller.reset();
                controller.set_tracking_latest(self.state.tracking_latest);
            }
            if let Some(engine) = pane.tick_engine.as_mut() {
                engine.reset();
            }
        }
    }

    fn recompute_pane(&mut self, pane: PaneId) {
        if let Some(entry) = self.panes.get_mut(&pane) {
            entry.recompute(&self.state);
        }
    }

    fn pane(&self, pane: PaneId) -> ChartResult<&PaneState> {
        self.panes.get(&pane).ok_or(ChartError::UnknownPane(pane))
    }

    fn pane_mut(&mut self, pane: PaneId) -> ChartResult<&mut PaneState> {
        self.panes.get_mut(&pane).ok_or(ChartError::UnknownPane(pane))
    }

    fn gesture_controller_mut(&mut self, pane: PaneId) -> ChartResult<&mut GestureController> {
        self.pane_mut(pane)?.controller.as_mut().ok_or_else(|| {
            ChartError::InvalidData(format!("pane {} does not accept gestures", pane.raw()))
        })
    }
}
