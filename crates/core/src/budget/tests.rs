//! Unit and property-based tests for the budget module.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::allocation::{plan_bulk_replace, raw_amount, resolve};
use super::interval::{duration_days, interval_multiplier};
use super::types::{Allocation, AllocationWrite, Budget, TimeInterval};

fn budget_spanning(days: i64, interval: TimeInterval, income: Decimal) -> Budget {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    Budget {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        name: "Test Budget".to_string(),
        description: None,
        start_time: start,
        end_time: start + Duration::days(days),
        interval,
        income,
    }
}

fn allocation(budget: &Budget, amount: Decimal, is_percentage: bool) -> Allocation {
    Allocation {
        id: Uuid::new_v4(),
        budget_id: budget.id,
        category_id: Uuid::new_v4(),
        amount,
        is_percentage,
    }
}

fn write(id: Option<Uuid>, amount: Decimal, is_percentage: bool) -> AllocationWrite {
    AllocationWrite {
        id,
        category_id: Uuid::new_v4(),
        amount,
        is_percentage,
    }
}

// ============================================================================
// Interval arithmetic
// ============================================================================

#[rstest]
#[case("yearly", TimeInterval::Yearly, 365)]
#[case("monthly", TimeInterval::Monthly, 30)]
#[case("weekly", TimeInterval::Weekly, 7)]
fn test_interval_wire_format_and_days(
    #[case] raw: &str,
    #[case] expected: TimeInterval,
    #[case] days: i64,
) {
    let parsed: TimeInterval = raw.parse().unwrap();
    assert_eq!(parsed, expected);
    assert_eq!(parsed.days(), days);
    assert_eq!(parsed.to_string(), raw);
}

#[test]
fn test_interval_parse_unknown() {
    assert!("daily".parse::<TimeInterval>().is_err());
}

#[test]
fn test_duration_truncates_toward_zero() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let end = start + Duration::days(912) + Duration::hours(12);
    assert_eq!(duration_days(start, end), 912);
}

#[test]
fn test_duration_negative_span() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let end = start - Duration::days(3) - Duration::hours(12);
    assert_eq!(duration_days(start, end), -3);
}

#[test]
fn test_multiplier_yearly_two_years() {
    let budget = budget_spanning(730, TimeInterval::Yearly, dec!(60000));
    assert_eq!(interval_multiplier(&budget), dec!(2));
}

#[test]
fn test_multiplier_monthly_fractional() {
    let budget = budget_spanning(75, TimeInterval::Monthly, dec!(4500));
    assert_eq!(interval_multiplier(&budget), dec!(2.5));
}

#[test]
fn test_multiplier_weekly() {
    let budget = budget_spanning(21, TimeInterval::Weekly, dec!(1100));
    assert_eq!(interval_multiplier(&budget), dec!(3));
}

#[test]
fn test_multiplier_zero_span() {
    let budget = budget_spanning(0, TimeInterval::Monthly, dec!(4500));
    assert_eq!(interval_multiplier(&budget), Decimal::ZERO);
}

#[test]
fn test_multiplier_negative_span_unguarded() {
    let budget = budget_spanning(-30, TimeInterval::Monthly, dec!(4500));
    assert_eq!(interval_multiplier(&budget), dec!(-1));
}

// ============================================================================
// Allocation resolution
// ============================================================================

#[test]
fn test_resolve_fixed_two_year_span() {
    // Yearly budget spanning exactly two years: a fixed $350/year plans $700.
    let budget = budget_spanning(730, TimeInterval::Yearly, dec!(60000));
    let fixed = allocation(&budget, dec!(350), false);
    assert_eq!(resolve(&fixed, &budget), dec!(700));
}

#[test]
fn test_resolve_percentage_of_income() {
    // Multiplier 2.5 with 17.6% of a 60000 income: 2.5 * 10560 = 26400.
    let budget = budget_spanning(75, TimeInterval::Monthly, dec!(60000));
    let pct = allocation(&budget, dec!(17.6), true);
    assert_eq!(raw_amount(&pct, &budget), dec!(10560));
    assert_eq!(resolve(&pct, &budget), dec!(26400));
}

#[test]
fn test_resolve_percentage_over_100_not_clamped() {
    let budget = budget_spanning(30, TimeInterval::Monthly, dec!(1000));
    let pct = allocation(&budget, dec!(150), true);
    assert_eq!(resolve(&pct, &budget), dec!(1500));
}

#[test]
fn test_resolve_zero_span_plans_zero() {
    let budget = budget_spanning(0, TimeInterval::Weekly, dec!(1100));
    let fixed = allocation(&budget, dec!(50), false);
    assert_eq!(resolve(&fixed, &budget), Decimal::ZERO);
}

#[test]
fn test_resolve_negative_span_plans_negative() {
    let budget = budget_spanning(-7, TimeInterval::Weekly, dec!(1100));
    let fixed = allocation(&budget, dec!(50), false);
    assert_eq!(resolve(&fixed, &budget), dec!(-50));
}

proptest! {
    /// interval_multiplier(B) == duration_days / days_per_interval, exactly.
    #[test]
    fn prop_multiplier_is_day_ratio(
        days in -1000i64..3000,
        interval_idx in 0usize..3,
    ) {
        let interval = [TimeInterval::Yearly, TimeInterval::Monthly, TimeInterval::Weekly][interval_idx];
        let budget = budget_spanning(days, interval, dec!(1000));

        let expected = Decimal::from(days) / Decimal::from(interval.days());
        prop_assert_eq!(interval_multiplier(&budget), expected);
    }

    /// Fixed allocations: resolve == multiplier * amount.
    #[test]
    fn prop_resolve_fixed(
        days in 0i64..3000,
        cents in 0i64..100_000_000,
    ) {
        let budget = budget_spanning(days, TimeInterval::Monthly, dec!(5000));
        let fixed = allocation(&budget, Decimal::new(cents, 2), false);

        let expected = interval_multiplier(&budget) * Decimal::new(cents, 2);
        prop_assert_eq!(resolve(&fixed, &budget), expected);
    }

    /// Percentage allocations: resolve == multiplier * amount * income / 100.
    #[test]
    fn prop_resolve_percentage(
        days in 0i64..3000,
        pct_hundredths in 0i64..20_000,
        income_cents in 0i64..100_000_000,
    ) {
        let income = Decimal::new(income_cents, 2);
        let pct = Decimal::new(pct_hundredths, 2);
        let budget = budget_spanning(days, TimeInterval::Yearly, income);
        let entry = allocation(&budget, pct, true);

        let expected = interval_multiplier(&budget) * (pct * income / Decimal::ONE_HUNDRED);
        prop_assert_eq!(resolve(&entry, &budget), expected);
    }
}

// ============================================================================
// Bulk-replace planning
// ============================================================================

#[test]
fn test_plan_empty_request_deletes_everything() {
    let existing = vec![Uuid::new_v4()];
    let plan = plan_bulk_replace(&existing, &[]);

    assert_eq!(plan.delete_ids, existing);
    assert!(plan.create.is_empty());
    assert!(plan.update.is_empty());
}

#[test]
fn test_plan_update_preserves_id() {
    let keep = Uuid::new_v4();
    let drop = Uuid::new_v4();
    let desired = vec![write(Some(keep), dec!(6.8), true)];

    let plan = plan_bulk_replace(&[keep, drop], &desired);

    assert_eq!(plan.delete_ids, vec![drop]);
    assert!(plan.create.is_empty());
    assert_eq!(plan.update.len(), 1);
    assert_eq!(plan.update[0].id, Some(keep));
    assert_eq!(plan.update[0].amount, dec!(6.8));
    assert!(plan.update[0].is_percentage);
}

#[test]
fn test_plan_mixed_creates_and_updates() {
    let keep = Uuid::new_v4();
    let desired = vec![
        write(Some(keep), dec!(100), false),
        write(None, dec!(25), true),
        write(None, dec!(40), false),
    ];

    let plan = plan_bulk_replace(&[keep], &desired);

    assert!(plan.delete_ids.is_empty());
    assert_eq!(plan.create.len(), 2);
    assert_eq!(plan.update.len(), 1);
}

#[test]
fn test_plan_is_idempotent_after_apply() {
    // After applying a plan, the surviving set is {updates} plus the
    // created rows. Planning the same desired list against that set again
    // must delete nothing and change the same rows.
    let keep = Uuid::new_v4();
    let desired = vec![write(Some(keep), dec!(75), false)];

    let first = plan_bulk_replace(&[keep, Uuid::new_v4()], &desired);
    let surviving: Vec<Uuid> = first.update.iter().filter_map(|w| w.id).collect();
    let second = plan_bulk_replace(&surviving, &desired);

    assert!(second.delete_ids.is_empty());
    assert_eq!(second.update, first.update);
    assert!(second.create.is_empty());
}

proptest! {
    /// Full-replace law: every existing id is either kept (mentioned) or
    /// deleted, and nothing else is deleted.
    #[test]
    fn prop_plan_partitions_existing(
        existing_count in 0usize..8,
        kept_mask in proptest::collection::vec(any::<bool>(), 8),
    ) {
        let existing: Vec<Uuid> = (0..existing_count).map(|_| Uuid::new_v4()).collect();
        let desired: Vec<AllocationWrite> = existing
            .iter()
            .zip(&kept_mask)
            .filter(|(_, keep)| **keep)
            .map(|(id, _)| write(Some(*id), dec!(10), false))
            .collect();

        let plan = plan_bulk_replace(&existing, &desired);

        for id in &existing {
            let kept = desired.iter().any(|w| w.id == Some(*id));
            prop_assert_eq!(plan.delete_ids.contains(id), !kept);
        }
        prop_assert_eq!(plan.update.len() + plan.delete_ids.len(), existing.len());
    }
}
