//! Session-level API: the shared view state, its update funnel and the
//! per-pane derivations that follow every committed change.

mod axis_label_format;
mod axis_ticks;
mod data_controller;
mod domain_update;
mod invalidation;
mod observers;
mod pane_controller;
mod session_config;
mod view_session;

pub use axis_label_format::{LabelFormat, select_label_format};
pub use axis_ticks::{
    AXIS_TIME_MIN_TICKS, AXIS_TIME_TARGET_SPACING_PX, TickLayout, TickLayoutEngine, TickList,
    axis_tick_target_count,
};
pub use data_controller::FeedMessage;
pub use domain_update::{DomainRejection, DomainUpdate, DomainUpdateSource};
pub use invalidation::{RenderRequest, RenderTopic, RenderTopics};
pub use observers::{SubscriptionId, ViewEvent, ViewObserver};
pub use pane_controller::PaneView;
pub use session_config::ViewSessionConfig;
pub use view_session::{SessionData, ViewSession, ViewState};

pub use crate::core::{PaneConfig, PaneId, PaneKind};
