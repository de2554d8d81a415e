use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: f64, height: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("data needs at least 2 columns (x and one y series), found {found}")]
    InsufficientColumns { found: usize },

    #[error("no template loaded")]
    TemplateNotLoaded,

    #[error("invalid template: {0}")]
    InvalidTemplate(String),

    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("file load failed: {0}")]
    LoadFailed(String),

    #[error("stale load result: ticket {ticket} superseded by {latest}")]
    StaleLoad { ticket: u64, latest: u64 },
}
