//! Budget repository for budget database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::entities::{budgets, sea_orm_active_enums::TimeInterval};

/// Error types for budget operations.
#[derive(Debug, thiserror::Error)]
pub enum BudgetRepoError {
    /// Budget not found.
    #[error("Budget not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetInput {
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

/// Input for updating a budget.
#[derive(Debug, Clone, Default)]
pub struct UpdateBudgetInput {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<Option<String>>,
    /// New start time.
    pub start_time: Option<DateTime<Utc>>,
    /// New end time.
    pub end_time: Option<DateTime<Utc>>,
    /// New interval.
    pub interval: Option<TimeInterval>,
    /// New income.
    pub income: Option<Decimal>,
}

/// Budget repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new budget.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create_budget(
        &self,
        input: CreateBudgetInput,
    ) -> Result<budgets::Model, BudgetRepoError> {
        let now = Utc::now().into();

        let budget = budgets::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            name: Set(input.name),
            description: Set(input.description),
            start_time: Set(input.start_time.into()),
            end_time: Set(input.end_time.into()),
            interval: Set(input.interval),
            income: Set(input.income),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = budget.insert(&self.db).await?;
        Ok(result)
    }

    /// Gets a budget by ID.
    ///
    /// Ownership is the caller's concern: handlers compare `user_id`
    /// against the authenticated user and answer Forbidden on mismatch.
    ///
    /// # Errors
    ///
    /// Returns an error if the budget is not found or the query fails.
    pub async fn get_budget(&self, budget_id: Uuid) -> Result<budgets::Model, BudgetRepoError> {
        budgets::Entity::find_by_id(budget_id)
            .one(&self.db)
            .await?
            .ok_or(BudgetRepoError::NotFound(budget_id))
    }

    /// Lists a user's budgets, most recent end time first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_budgets(&self, user_id: Uuid) -> Result<Vec<budgets::Model>, BudgetRepoError> {
        let result = budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id))
            .order_by_desc(budgets::Column::EndTime)
            .all(&self.db)
            .await?;
        Ok(result)
    }

    /// Updates a budget.
    ///
    /// # Errors
    ///
    /// Returns an error if the budget is not found or the update fails.
    pub async fn update_budget(
        &self,
        budget_id: Uuid,
        input: UpdateBudgetInput,
    ) -> Result<budgets::Model, BudgetRepoError> {
        let budget = self.get_budget(budget_id).await?;

        let mut active: budgets::ActiveModel = budget.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(start_time) = input.start_time {
            active.start_time = Set(start_time.into());
        }
        if let Some(end_time) = input.end_time {
            active.end_time = Set(end_time.into());
        }
        if let Some(interval) = input.interval {
            active.interval = Set(interval);
        }
        if let Some(income) = input.income {
            active.income = Set(income);
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Deletes a budget; its allocations cascade away with it.
    ///
    /// # Errors
    ///
    /// Returns an error if the budget is not found or the delete fails.
    pub async fn delete_budget(&self, budget_id: Uuid) -> Result<(), BudgetRepoError> {
        let result = budgets::Entity::delete_by_id(budget_id)
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(BudgetRepoError::NotFound(budget_id));
        }

        Ok(())
    }
}
