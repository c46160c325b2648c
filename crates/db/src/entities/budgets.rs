//! `SeaORM` Entity for budgets table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::TimeInterval;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_time: DateTimeWithTimeZone,
    pub end_time: DateTimeWithTimeZone,
    pub interval: TimeInterval,
    pub income: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_many = "super::budget_category_relations::Entity")]
    BudgetCategoryRelations,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::budget_category_relations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BudgetCategoryRelations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Converts to the core domain type.
    #[must_use]
    pub fn to_core(&self) -> pocketplan_core::budget::Budget {
        pocketplan_core::budget::Budget {
            id: self.id,
            user_id: self.user_id,
            name: self.name.clone(),
            description: self.description.clone(),
            start_time: self.start_time.to_utc(),
            end_time: self.end_time.to_utc(),
            interval: self.interval.clone().into(),
            income: self.income,
        }
    }
}
