//! Report assembly.

use std::collections::HashMap;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::budget::{Budget, allocation};
use crate::spending::CategorySpending;

use super::types::{AllocationLine, PlannedActualRow};

/// Service for assembling spending reports.
pub struct ReportService;

impl ReportService {
    /// Joins a budget's allocations against actual spending totals.
    ///
    /// Produces one row per allocation (not per global category), ordered
    /// by category name descending. Planned amounts come from the
    /// allocation resolver; actuals come from the aggregator, zero when
    /// the category has no aggregated total.
    #[must_use]
    pub fn planned_vs_actual(
        budget: &Budget,
        lines: &[AllocationLine],
        actuals: &[CategorySpending],
    ) -> Vec<PlannedActualRow> {
        let actual_by_category: HashMap<Uuid, Decimal> = actuals
            .iter()
            .map(|row| (row.category_id, row.total_amount))
            .collect();

        let mut rows: Vec<PlannedActualRow> = lines
            .iter()
            .map(|line| PlannedActualRow {
                category_name: line.category_name.clone(),
                planned: allocation::resolve(&line.allocation, budget),
                actual: actual_by_category
                    .get(&line.allocation.category_id)
                    .copied()
                    .unwrap_or(Decimal::ZERO),
            })
            .collect();

        rows.sort_by(|a, b| b.category_name.cmp(&a.category_name));
        rows
    }
}
