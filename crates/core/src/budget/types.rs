//! Budget data types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Time interval a budget's income is declared over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeInterval {
    /// Income declared per year.
    Yearly,
    /// Income declared per month.
    Monthly,
    /// Income declared per week.
    Weekly,
}

impl TimeInterval {
    /// Number of days one interval period spans.
    #[must_use]
    pub const fn days(self) -> i64 {
        match self {
            Self::Yearly => 365,
            Self::Monthly => 30,
            Self::Weekly => 7,
        }
    }
}

impl std::fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yearly => write!(f, "yearly"),
            Self::Monthly => write!(f, "monthly"),
            Self::Weekly => write!(f, "weekly"),
        }
    }
}

impl std::str::FromStr for TimeInterval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yearly" => Ok(Self::Yearly),
            "monthly" => Ok(Self::Monthly),
            "weekly" => Ok(Self::Weekly),
            _ => Err(format!("Unknown interval: {s}")),
        }
    }
}

/// A budget record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    /// Budget ID.
    pub id: Uuid,
    /// Owning user ID.
    pub user_id: Uuid,
    /// Budget name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Start of the budgeted span.
    pub start_time: DateTime<Utc>,
    /// End of the budgeted span.
    pub end_time: DateTime<Utc>,
    /// Interval the income is declared over.
    pub interval: TimeInterval,
    /// Income per interval period.
    pub income: Decimal,
}

/// A planned amount assigned to one category within one budget.
///
/// `amount` is a dollar figure per interval period when `is_percentage`
/// is false, otherwise a percentage of the budget's income.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Allocation {
    /// Allocation ID.
    pub id: Uuid,
    /// Parent budget ID.
    pub budget_id: Uuid,
    /// Category ID.
    pub category_id: Uuid,
    /// Amount (dollars or percentage, per `is_percentage`).
    pub amount: Decimal,
    /// Whether `amount` is a percentage of income.
    pub is_percentage: bool,
}

/// One desired allocation in a bulk-replace request.
///
/// An entry with an `id` updates that existing allocation in place; an
/// entry without one creates a new allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationWrite {
    /// Existing allocation ID, if updating.
    pub id: Option<Uuid>,
    /// Category ID.
    pub category_id: Uuid,
    /// Amount (dollars or percentage).
    pub amount: Decimal,
    /// Whether `amount` is a percentage of income.
    pub is_percentage: bool,
}

/// Unvalidated budget fields, as received from a client.
#[derive(Debug, Clone)]
pub struct BudgetDraft {
    /// Budget name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Start of the budgeted span.
    pub start_time: DateTime<Utc>,
    /// End of the budgeted span.
    pub end_time: DateTime<Utc>,
    /// Interval the income is declared over.
    pub interval: TimeInterval,
    /// Income per interval period.
    pub income: Decimal,
}
