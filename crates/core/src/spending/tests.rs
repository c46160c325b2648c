//! Unit and property-based tests for spending aggregation.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::aggregate::actual_spending_by_category;
use super::types::ExpenseAmount;

fn spent(category_id: Option<Uuid>, amount: Decimal) -> ExpenseAmount {
    ExpenseAmount {
        category_id,
        amount,
    }
}

#[test]
fn test_sums_per_category_with_zero_defaults() {
    let cat_a = Uuid::new_v4();
    let cat_b = Uuid::new_v4();
    let cat_c = Uuid::new_v4();
    let expenses = vec![
        spent(Some(cat_a), dec!(50)),
        spent(Some(cat_a), dec!(120)),
    ];

    let rows = actual_spending_by_category(&expenses, &[cat_a, cat_b, cat_c]);

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].category_id, cat_a);
    assert_eq!(rows[0].total_amount, dec!(170));
    assert_eq!(rows[1].total_amount, Decimal::ZERO);
    assert_eq!(rows[2].total_amount, Decimal::ZERO);
}

#[test]
fn test_sorted_by_total_descending() {
    let cat_a = Uuid::new_v4();
    let cat_b = Uuid::new_v4();
    let cat_c = Uuid::new_v4();
    let expenses = vec![
        spent(Some(cat_a), dec!(10)),
        spent(Some(cat_b), dec!(300)),
        spent(Some(cat_c), dec!(45.50)),
    ];

    let rows = actual_spending_by_category(&expenses, &[cat_a, cat_b, cat_c]);

    assert_eq!(rows[0].category_id, cat_b);
    assert_eq!(rows[1].category_id, cat_c);
    assert_eq!(rows[2].category_id, cat_a);
}

#[test]
fn test_ties_break_by_category_id_ascending() {
    let mut ids = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
    ids.sort();

    let rows = actual_spending_by_category(&[], &[ids[2], ids[0], ids[1]]);

    assert_eq!(rows[0].category_id, ids[0]);
    assert_eq!(rows[1].category_id, ids[1]);
    assert_eq!(rows[2].category_id, ids[2]);
}

#[test]
fn test_uncategorized_expenses_ignored() {
    let cat_a = Uuid::new_v4();
    let expenses = vec![spent(None, dec!(999)), spent(Some(cat_a), dec!(5))];

    let rows = actual_spending_by_category(&expenses, &[cat_a]);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].total_amount, dec!(5));
}

#[test]
fn test_unknown_category_expenses_ignored() {
    let cat_a = Uuid::new_v4();
    let other = Uuid::new_v4();
    let expenses = vec![spent(Some(other), dec!(42))];

    let rows = actual_spending_by_category(&expenses, &[cat_a]);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category_id, cat_a);
    assert_eq!(rows[0].total_amount, Decimal::ZERO);
}

#[test]
fn test_empty_category_set() {
    let expenses = vec![spent(Some(Uuid::new_v4()), dec!(10))];
    assert!(actual_spending_by_category(&expenses, &[]).is_empty());
}

proptest! {
    /// Left-join law: one row per category, regardless of the expense set.
    #[test]
    fn prop_row_per_category(
        category_count in 0usize..10,
        amounts in proptest::collection::vec(0i64..1_000_000, 0..20),
    ) {
        let categories: Vec<Uuid> = (0..category_count).map(|_| Uuid::new_v4()).collect();
        let expenses: Vec<ExpenseAmount> = amounts
            .iter()
            .enumerate()
            .map(|(i, cents)| ExpenseAmount {
                category_id: categories.get(i % (category_count + 1)).copied(),
                amount: Decimal::new(*cents, 2),
            })
            .collect();

        let rows = actual_spending_by_category(&expenses, &categories);
        prop_assert_eq!(rows.len(), categories.len());
    }

    /// Totals are never lost: the summed output equals the sum of expenses
    /// attributed to known categories.
    #[test]
    fn prop_totals_conserved(
        category_count in 1usize..6,
        amounts in proptest::collection::vec(0i64..1_000_000, 0..30),
    ) {
        let categories: Vec<Uuid> = (0..category_count).map(|_| Uuid::new_v4()).collect();
        let expenses: Vec<ExpenseAmount> = amounts
            .iter()
            .enumerate()
            .map(|(i, cents)| ExpenseAmount {
                category_id: Some(categories[i % category_count]),
                amount: Decimal::new(*cents, 2),
            })
            .collect();

        let rows = actual_spending_by_category(&expenses, &categories);

        let input_sum: Decimal = expenses.iter().map(|e| e.amount).sum();
        let output_sum: Decimal = rows.iter().map(|r| r.total_amount).sum();
        prop_assert_eq!(input_sum, output_sum);
    }

    /// Output is sorted by total descending.
    #[test]
    fn prop_sorted_descending(
        category_count in 1usize..8,
        amounts in proptest::collection::vec(0i64..1_000_000, 0..30),
    ) {
        let categories: Vec<Uuid> = (0..category_count).map(|_| Uuid::new_v4()).collect();
        let expenses: Vec<ExpenseAmount> = amounts
            .iter()
            .enumerate()
            .map(|(i, cents)| ExpenseAmount {
                category_id: Some(categories[i % category_count]),
                amount: Decimal::new(*cents, 2),
            })
            .collect();

        let rows = actual_spending_by_category(&expenses, &categories);

        for pair in rows.windows(2) {
            prop_assert!(pair[0].total_amount >= pair[1].total_amount);
        }
    }
}
