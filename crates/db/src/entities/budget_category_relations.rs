//! `SeaORM` Entity for budget_category_relations table.
//!
//! At most one relation may exist per (budget, category) pair; the table
//! carries a uniqueness constraint on it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "budget_category_relations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub budget_id: Uuid,
    pub category_id: Uuid,
    pub amount: Decimal,
    pub is_percentage: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::budgets::Entity",
        from = "Column::BudgetId",
        to = "super::budgets::Column::Id"
    )]
    Budgets,
    #[sea_orm(
        belongs_to = "super::budget_categories::Entity",
        from = "Column::CategoryId",
        to = "super::budget_categories::Column::Id"
    )]
    BudgetCategories,
}

impl Related<super::budgets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budgets.def()
    }
}

impl Related<super::budget_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BudgetCategories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Converts to the core domain type.
    #[must_use]
    pub const fn to_core(&self) -> pocketplan_core::budget::Allocation {
        pocketplan_core::budget::Allocation {
            id: self.id,
            budget_id: self.budget_id,
            category_id: self.category_id,
            amount: self.amount,
            is_percentage: self.is_percentage,
        }
    }
}
