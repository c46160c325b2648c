//! Report data types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::budget::Allocation;

/// One budget allocation joined with its category's name.
#[derive(Debug, Clone)]
pub struct AllocationLine {
    /// The allocation.
    pub allocation: Allocation,
    /// Name of the allocated category.
    pub category_name: String,
}

/// One row of the planned-vs-actual comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedActualRow {
    /// Category name.
    pub category_name: String,
    /// Planned amount across the budget's full span.
    pub planned: Decimal,
    /// Actual amount spent.
    pub actual: Decimal,
}

/// One expense joined with its category's name, ready for export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseRow {
    /// Expense ID.
    pub id: Uuid,
    /// Optional expense name.
    pub name: Option<String>,
    /// When the expense occurred.
    pub timestamp: DateTime<Utc>,
    /// Optional description.
    pub description: Option<String>,
    /// Category name; absent when uncategorized.
    pub category_name: Option<String>,
    /// Expense amount.
    pub amount: Decimal,
}
