//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod budget;
pub mod category;
pub mod expense;
pub mod relation;
pub mod user;

pub use budget::{BudgetRepoError, BudgetRepository, CreateBudgetInput, UpdateBudgetInput};
pub use category::{CategoryRepoError, CategoryRepository};
pub use expense::{
    CreateExpenseInput, ExpenseFilter, ExpenseRepoError, ExpenseRepository, UpdateExpenseInput,
};
pub use relation::{
    CreateRelationInput, RelationRepoError, RelationRepository, UpdateRelationInput,
};
pub use user::{UserRepoError, UserRepository};
