//! Budgets, time-interval arithmetic, and category allocations.

pub mod allocation;
pub mod error;
pub mod interval;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use allocation::{BulkReplacePlan, plan_bulk_replace, raw_amount, resolve};
pub use error::BudgetError;
pub use interval::{duration_days, interval_multiplier};
pub use service::BudgetService;
pub use types::{Allocation, AllocationWrite, Budget, BudgetDraft, TimeInterval};
