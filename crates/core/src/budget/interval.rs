//! Time-interval arithmetic for budgets.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::types::Budget;

/// Whole days between two timestamps, truncated toward zero.
///
/// A span of 912 days and 12 hours counts 912 days. Negative when `end`
/// precedes `start`.
#[must_use]
pub fn duration_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_days()
}

/// How many interval periods a budget's span covers.
///
/// `duration_days / days_per_interval`, carried as an exact `Decimal`
/// ratio; may be fractional. A zero or negative span yields a zero or
/// negative multiplier, which is deliberately not guarded: downstream
/// planned amounts follow the sign.
#[must_use]
pub fn interval_multiplier(budget: &Budget) -> Decimal {
    let days = duration_days(budget.start_time, budget.end_time);
    Decimal::from(days) / Decimal::from(budget.interval.days())
}
