use thiserror::Error;

use crate::core::PaneId;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport width: {width}")]
    InvalidViewport { width: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("unknown pane: {0:?}")]
    UnknownPane(PaneId),
}
