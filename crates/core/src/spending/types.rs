//! Spending data types and expense validation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::budget::BudgetError;

const NAME_MAX: usize = 256;
const DESCRIPTION_MAX: usize = 2048;

/// The slice of an expense the aggregator needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpenseAmount {
    /// Category the expense was logged under, if any.
    pub category_id: Option<Uuid>,
    /// Expense amount.
    pub amount: Decimal,
}

/// Total actual spending for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpending {
    /// Category ID.
    pub category_id: Uuid,
    /// Sum of matching expense amounts; exactly zero when none match.
    pub total_amount: Decimal,
}

/// Unvalidated expense fields, as received from a client.
#[derive(Debug, Clone)]
pub struct ExpenseDraft {
    /// Optional expense name.
    pub name: Option<String>,
    /// When the expense occurred.
    pub timestamp: DateTime<Utc>,
    /// Optional description.
    pub description: Option<String>,
    /// Optional category reference.
    pub category_id: Option<Uuid>,
    /// Expense amount.
    pub amount: Decimal,
}

/// Validates expense fields on create or update.
///
/// # Errors
///
/// Returns `BudgetError::Validation` naming the first offending field.
pub fn validate_expense(draft: &ExpenseDraft) -> Result<(), BudgetError> {
    if let Some(name) = &draft.name {
        if name.chars().count() > NAME_MAX {
            return Err(BudgetError::Validation(format!(
                "name must be at most {NAME_MAX} characters"
            )));
        }
    }
    if let Some(description) = &draft.description {
        if description.chars().count() > DESCRIPTION_MAX {
            return Err(BudgetError::Validation(format!(
                "description must be at most {DESCRIPTION_MAX} characters"
            )));
        }
    }
    if draft.amount < Decimal::ZERO {
        return Err(BudgetError::Validation("amount cannot be negative".into()));
    }
    Ok(())
}
