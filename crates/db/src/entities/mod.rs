//! `SeaORM` entity definitions.

pub mod budget_categories;
pub mod budget_category_relations;
pub mod budgets;
pub mod expenses;
pub mod sea_orm_active_enums;
pub mod users;
