//! Unit tests for report assembly and CSV rendering.

use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::budget::{Allocation, Budget, TimeInterval};
use crate::spending::CategorySpending;

use super::csv::{expenses_csv, spending_comparison_csv};
use super::service::ReportService;
use super::types::{AllocationLine, ExpenseRow, PlannedActualRow};

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

fn line(budget: &Budget, name: &str, amount: Decimal, is_percentage: bool) -> AllocationLine {
    AllocationLine {
        allocation: Allocation {
            id: Uuid::new_v4(),
            budget_id: budget.id,
            category_id: Uuid::new_v4(),
            amount,
            is_percentage,
        },
        category_name: name.to_string(),
    }
}

// ============================================================================
// Planned-vs-actual assembly
// ============================================================================

#[test]
fn test_rows_ordered_by_category_name_descending() {
    let budget = budget_spanning(30, TimeInterval::Monthly, dec!(4500));
    let lines = vec![
        line(&budget, "groceries", dec!(400), false),
        line(&budget, "transport", dec!(120), false),
        line(&budget, "rent", dec!(1500), false),
    ];

    let rows = ReportService::planned_vs_actual(&budget, &lines, &[]);

    let names: Vec<&str> = rows.iter().map(|r| r.category_name.as_str()).collect();
    assert_eq!(names, vec!["transport", "rent", "groceries"]);
}

#[test]
fn test_planned_from_resolver_actual_from_aggregates() {
    let budget = budget_spanning(60, TimeInterval::Monthly, dec!(5000));
    let groceries = line(&budget, "groceries", dec!(10), true);
    let rent = line(&budget, "rent", dec!(1500), false);

    let actuals = vec![CategorySpending {
        category_id: groceries.allocation.category_id,
        total_amount: dec!(850.25),
    }];

    let rows =
        ReportService::planned_vs_actual(&budget, &[groceries.clone(), rent.clone()], &actuals);

    // Multiplier 2: 10% of 5000 plans 1000; $1500/month plans 3000.
    let by_name = |name: &str| rows.iter().find(|r| r.category_name == name).unwrap();
    assert_eq!(by_name("groceries").planned, dec!(1000));
    assert_eq!(by_name("groceries").actual, dec!(850.25));
    assert_eq!(by_name("rent").planned, dec!(3000));
    assert_eq!(by_name("rent").actual, Decimal::ZERO);
}

#[test]
fn test_only_allocated_categories_appear() {
    let budget = budget_spanning(30, TimeInterval::Monthly, dec!(4500));
    let rent = line(&budget, "rent", dec!(1500), false);
    // An aggregated total for a category the budget never allocated.
    let actuals = vec![
        CategorySpending {
            category_id: rent.allocation.category_id,
            total_amount: dec!(1400),
        },
        CategorySpending {
            category_id: Uuid::new_v4(),
            total_amount: dec!(999),
        },
    ];

    let rows = ReportService::planned_vs_actual(&budget, &[rent], &actuals);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category_name, "rent");
    assert_eq!(rows[0].actual, dec!(1400));
}

// ============================================================================
// CSV rendering
// ============================================================================

#[test]
fn test_spending_comparison_csv_layout() {
    let rows = vec![
        PlannedActualRow {
            category_name: "rent".to_string(),
            planned: dec!(3000),
            actual: dec!(2950.50),
        },
        PlannedActualRow {
            category_name: "groceries".to_string(),
            planned: dec!(1000),
            actual: Decimal::ZERO,
        },
    ];

    let bytes = spending_comparison_csv(&rows).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "Category,Planned ($),Actual ($)");
    assert_eq!(lines[1], "rent,3000,2950.50");
    assert_eq!(lines[2], "groceries,1000,0");
    assert_eq!(lines.len(), 3);
}

#[test]
fn test_expenses_csv_layout() {
    let id = Uuid::new_v4();
    let rows = vec![ExpenseRow {
        id,
        name: Some("Coffee".to_string()),
        timestamp: Utc.with_ymd_and_hms(2024, 3, 5, 15, 7, 0).unwrap(),
        description: Some("morning run".to_string()),
        category_name: Some("dining".to_string()),
        amount: dec!(4.75),
    }];

    let bytes = expenses_csv(&rows).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "Name,Date,Time,Description,Category,Amount,ID");
    assert_eq!(lines[1], format!("Coffee,03/05/2024,03:07 PM,morning run,dining,4.75,{id}"));
}

#[test]
fn test_expenses_csv_dashes_for_absent_fields() {
    let id = Uuid::new_v4();
    let rows = vec![ExpenseRow {
        id,
        name: None,
        timestamp: Utc.with_ymd_and_hms(2024, 11, 30, 9, 0, 0).unwrap(),
        description: None,
        category_name: None,
        amount: dec!(12),
    }];

    let bytes = expenses_csv(&rows).unwrap();
    let text = String::from_utf8(bytes).unwrap();

    assert_eq!(
        text.lines().nth(1).unwrap(),
        format!("-,11/30/2024,09:00 AM,-,-,12,{id}")
    );
}

#[test]
fn test_expenses_csv_empty_set_is_header_only() {
    let bytes = expenses_csv(&[]).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert_eq!(text.lines().count(), 1);
}
