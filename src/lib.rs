//! chart-view: view-domain synchronization and zoom/pan control for
//! financial time-series charts.
//!
//! The crate owns the single time window shared by every pane of a chart,
//! turns pan/zoom gestures into constrained domain changes, and derives
//! stable time-axis ticks. Drawing is left to the host.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod telemetry;

pub use api::{ViewSession, ViewSessionConfig};
pub use error::{ChartError, ChartResult};
