//! Database enum mappings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Time interval a budget's income is declared over.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "time_interval")]
#[serde(rename_all = "snake_case")]
pub enum TimeInterval {
    /// Income declared per year.
    #[sea_orm(string_value = "yearly")]
    Yearly,
    /// Income declared per month.
    #[sea_orm(string_value = "monthly")]
    Monthly,
    /// Income declared per week.
    #[sea_orm(string_value = "weekly")]
    Weekly,
}

impl From<TimeInterval> for pocketplan_core::budget::TimeInterval {
    fn from(value: TimeInterval) -> Self {
        match value {
            TimeInterval::Yearly => Self::Yearly,
            TimeInterval::Monthly => Self::Monthly,
            TimeInterval::Weekly => Self::Weekly,
        }
    }
}

impl From<pocketplan_core::budget::TimeInterval> for TimeInterval {
    fn from(value: pocketplan_core::budget::TimeInterval) -> Self {
        match value {
            pocketplan_core::budget::TimeInterval::Yearly => Self::Yearly,
            pocketplan_core::budget::TimeInterval::Monthly => Self::Monthly,
            pocketplan_core::budget::TimeInterval::Weekly => Self::Weekly,
        }
    }
}
