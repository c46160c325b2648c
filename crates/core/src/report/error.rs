//! Report error types.

use thiserror::Error;

/// Report-related errors.
#[derive(Debug, Error)]
pub enum ReportError {
    /// CSV rendering failed.
    #[error("failed to render CSV: {0}")]
    Render(String),
}

impl From<csv::Error> for ReportError {
    fn from(err: csv::Error) -> Self {
        Self::Render(err.to_string())
    }
}
