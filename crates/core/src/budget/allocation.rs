//! Allocation resolution and bulk-replace planning.

use rust_decimal::Decimal;
use uuid::Uuid;

use super::interval::interval_multiplier;
use super::types::{Allocation, AllocationWrite, Budget};

/// Dollar amount one allocation plans per interval period.
///
/// Fixed allocations return their amount directly; percentage allocations
/// return that percentage of the budget's income. Percentages are not
/// range-checked, so a 150% allocation plans more than the income.
#[must_use]
pub fn raw_amount(allocation: &Allocation, budget: &Budget) -> Decimal {
    if allocation.is_percentage {
        allocation.amount * budget.income / Decimal::ONE_HUNDRED
    } else {
        allocation.amount
    }
}

/// Total planned dollar amount for one allocation across its budget's
/// full span: the per-period raw amount scaled by the interval multiplier.
#[must_use]
pub fn resolve(allocation: &Allocation, budget: &Budget) -> Decimal {
    interval_multiplier(budget) * raw_amount(allocation, budget)
}

/// The delete/create/update sets a bulk-replace request expands to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkReplacePlan {
    /// Existing allocation IDs not mentioned in the request; to be removed.
    pub delete_ids: Vec<Uuid>,
    /// Entries without an ID; to be inserted.
    pub create: Vec<AllocationWrite>,
    /// Entries carrying an existing ID; category, amount, and flag are
    /// overwritten on that row.
    pub update: Vec<AllocationWrite>,
}

/// Plans a full replace of a budget's allocation set.
///
/// The desired list is authoritative: every existing allocation whose ID
/// it does not mention is deleted, entries without an ID are created, and
/// entries with an ID are updated in place. Applying the same list twice
/// is a no-op the second time.
#[must_use]
pub fn plan_bulk_replace(existing_ids: &[Uuid], desired: &[AllocationWrite]) -> BulkReplacePlan {
    let mut create = Vec::new();
    let mut update = Vec::new();
    let mut kept_ids = Vec::with_capacity(desired.len());

    for entry in desired {
        match entry.id {
            Some(id) => {
                kept_ids.push(id);
                update.push(entry.clone());
            }
            None => create.push(entry.clone()),
        }
    }

    let delete_ids = existing_ids
        .iter()
        .copied()
        .filter(|id| !kept_ids.contains(id))
        .collect();

    BulkReplacePlan {
        delete_ids,
        create,
        update,
    }
}
