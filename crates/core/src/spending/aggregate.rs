//! Actual spending totals per category.

use std::collections::HashMap;

use rust_decimal::Decimal;
use uuid::Uuid;

use super::types::{CategorySpending, ExpenseAmount};

/// Sums expense amounts per category over an already-filtered expense set.
///
/// Every category in `category_ids` produces a row; categories with no
/// matching expense total exactly zero (left-join semantics). Expenses
/// that are uncategorized, or whose category is not in `category_ids`,
/// contribute nothing.
///
/// Rows are sorted by total descending; ties break by category ID
/// ascending so output order is deterministic.
#[must_use]
pub fn actual_spending_by_category(
    expenses: &[ExpenseAmount],
    category_ids: &[Uuid],
) -> Vec<CategorySpending> {
    let mut totals: HashMap<Uuid, Decimal> = category_ids
        .iter()
        .map(|id| (*id, Decimal::ZERO))
        .collect();

    for expense in expenses {
        if let Some(category_id) = expense.category_id {
            if let Some(total) = totals.get_mut(&category_id) {
                *total += expense.amount;
            }
        }
    }

    let mut rows: Vec<CategorySpending> = category_ids
        .iter()
        .map(|id| CategorySpending {
            category_id: *id,
            total_amount: totals[id],
        })
        .collect();

    rows.sort_by(|a, b| {
        b.total_amount
            .cmp(&a.total_amount)
            .then(a.category_id.cmp(&b.category_id))
    });
    rows
}
