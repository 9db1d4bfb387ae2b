use thiserror::Error;

/// Everything that can end a dashboard run or reject a chart.
///
/// Degenerate scales (one category, zero value range) are not errors; the
/// chart engine maps them to fixed positions instead.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// A user-entered field could not be parsed. Raised before any fetch.
    #[error("{0}")]
    InvalidInput(String),

    /// The data source answered with `ok: false`.
    #[error("{0}")]
    Upstream(String),

    /// A sequence is not index-aligned with the categories it belongs to.
    #[error("{what}: expected {expected} values, found {found}")]
    LengthMismatch {
        what: String,
        expected: usize,
        found: usize,
    },

    /// A NaN or infinite value where a plottable number is required.
    #[error("{what}: value at index {index} is not a finite number")]
    InvalidValue { what: String, index: usize },

    /// A chart needs at least one category.
    #[error("nothing to chart: no categories")]
    EmptyChart,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T, E = DashboardError> = std::result::Result<T, E>;
