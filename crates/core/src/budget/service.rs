//! Structural validation at the service boundary.
//!
//! All field-level constraints are checked here, before anything is
//! persisted or resolved. Deliberately absent: percentage range checks
//! (allocations over 100% are permitted) and start/end ordering (a budget
//! whose end precedes its start simply yields a negative multiplier).

use rust_decimal::Decimal;

use super::error::BudgetError;
use super::types::{AllocationWrite, BudgetDraft};

const NAME_MAX: usize = 256;
const DESCRIPTION_MAX: usize = 2048;

/// Budget validation service.
pub struct BudgetService;

impl BudgetService {
    /// Validates budget fields on create or update.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::Validation` naming the first offending field.
    pub fn validate_budget(draft: &BudgetDraft) -> Result<(), BudgetError> {
        if draft.name.trim().is_empty() {
            return Err(BudgetError::Validation("name is required".into()));
        }
        if draft.name.chars().count() > NAME_MAX {
            return Err(BudgetError::Validation(format!(
                "name must be at most {NAME_MAX} characters"
            )));
        }
        if let Some(description) = &draft.description {
            if description.chars().count() > DESCRIPTION_MAX {
                return Err(BudgetError::Validation(format!(
                    "description must be at most {DESCRIPTION_MAX} characters"
                )));
            }
        }
        if draft.income < Decimal::ZERO {
            return Err(BudgetError::Validation("income cannot be negative".into()));
        }
        Ok(())
    }

    /// Validates one allocation entry.
    ///
    /// Percentage values are intentionally not range-checked.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::Validation` if the amount is negative.
    pub fn validate_allocation(entry: &AllocationWrite) -> Result<(), BudgetError> {
        if entry.amount < Decimal::ZERO {
            return Err(BudgetError::Validation("amount cannot be negative".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use crate::budget::types::TimeInterval;

    fn draft() -> BudgetDraft {
        BudgetDraft {
            name: "Household".to_string(),
            description: None,
            start_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap(),
            interval: TimeInterval::Monthly,
            income: dec!(4500),
        }
    }

    #[test]
    fn test_valid_budget_passes() {
        assert!(BudgetService::validate_budget(&draft()).is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut d = draft();
        d.name = "   ".to_string();
        assert!(matches!(
            BudgetService::validate_budget(&d),
            Err(BudgetError::Validation(_))
        ));
    }

    #[test]
    fn test_long_name_rejected() {
        let mut d = draft();
        d.name = "x".repeat(257);
        assert!(BudgetService::validate_budget(&d).is_err());
    }

    #[test]
    fn test_negative_income_rejected() {
        let mut d = draft();
        d.income = dec!(-1);
        assert!(BudgetService::validate_budget(&d).is_err());
    }

    #[test]
    fn test_end_before_start_allowed() {
        // Preserved permissiveness: span ordering is not enforced.
        let mut d = draft();
        std::mem::swap(&mut d.start_time, &mut d.end_time);
        assert!(BudgetService::validate_budget(&d).is_ok());
    }

    #[test]
    fn test_allocation_over_100_percent_allowed() {
        let entry = AllocationWrite {
            id: None,
            category_id: Uuid::new_v4(),
            amount: dec!(150),
            is_percentage: true,
        };
        assert!(BudgetService::validate_allocation(&entry).is_ok());
    }

    #[test]
    fn test_negative_allocation_rejected() {
        let entry = AllocationWrite {
            id: None,
            category_id: Uuid::new_v4(),
            amount: dec!(-5),
            is_percentage: false,
        };
        assert!(BudgetService::validate_allocation(&entry).is_err());
    }
}
