//! Budget error types.

use thiserror::Error;

/// Budget-related errors.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// A required or malformed field was rejected.
    #[error("Validation failed: {0}")]
    Validation(String),
}
