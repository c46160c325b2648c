//! Expense repository for expense database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use pocketplan_shared::types::PageRequest;

use crate::entities::{budget_categories, expenses};

/// Error types for expense operations.
#[derive(Debug, thiserror::Error)]
pub enum ExpenseRepoError {
    /// Expense not found.
    #[error("Expense not found: {0}")]
    NotFound(Uuid),

    /// Referenced category not found.
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Filters for expense listings, aggregation, and export.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    /// Exact category match.
    pub category: Option<Uuid>,
    /// Category set match.
    pub category_in: Option<Vec<Uuid>>,
    /// Inclusive lower timestamp bound.
    pub timestamp_gte: Option<DateTime<Utc>>,
    /// Inclusive upper timestamp bound.
    pub timestamp_lte: Option<DateTime<Utc>>,
    /// Substring search over name and description.
    pub search: Option<String>,
}

/// Input for creating an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    /// Owning user ID.
    pub user_id: Uuid,
    /// Optional expense name.
    pub name: Option<String>,
    /// When the expense occurred.
    pub timestamp: DateTime<Utc>,
    /// Optional description.
    pub description: Option<String>,
    /// Optional category reference.
    pub category_id: Option<Uuid>,
    /// Expense amount.
    pub amount: Decimal,
}

/// Input for updating an expense.
#[derive(Debug, Clone, Default)]
pub struct UpdateExpenseInput {
    /// New name.
    pub name: Option<Option<String>>,
    /// New timestamp.
    pub timestamp: Option<DateTime<Utc>>,
    /// New description.
    pub description: Option<Option<String>>,
    /// New category reference.
    pub category_id: Option<Option<Uuid>>,
    /// New amount.
    pub amount: Option<Decimal>,
}

/// Expense repository for CRUD and filtered reads.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a user's expenses, most recent first, paginated.
    ///
    /// Returns the page of expenses plus the total row count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        user_id: Uuid,
        filter: &ExpenseFilter,
        page: &PageRequest,
    ) -> Result<(Vec<expenses::Model>, u64), ExpenseRepoError> {
        let query = Self::filtered(user_id, filter);

        let total = query.clone().count(&self.db).await?;

        let items = query
            .order_by_desc(expenses::Column::Timestamp)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((items, total))
    }

    /// Fetches every matching expense, most recent first. Feeds the
    /// aggregator and the CSV export.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_all(
        &self,
        user_id: Uuid,
        filter: &ExpenseFilter,
    ) -> Result<Vec<expenses::Model>, ExpenseRepoError> {
        let result = Self::filtered(user_id, filter)
            .order_by_desc(expenses::Column::Timestamp)
            .all(&self.db)
            .await?;
        Ok(result)
    }

    /// Gets an expense by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the expense is not found or the query fails.
    pub async fn get(&self, id: Uuid) -> Result<expenses::Model, ExpenseRepoError> {
        expenses::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ExpenseRepoError::NotFound(id))
    }

    /// Creates an expense.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced category does not exist or the
    /// insert fails.
    pub async fn create(
        &self,
        input: CreateExpenseInput,
    ) -> Result<expenses::Model, ExpenseRepoError> {
        if let Some(category_id) = input.category_id {
            self.check_category_exists(category_id).await?;
        }

        let expense = expenses::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            name: Set(input.name),
            timestamp: Set(input.timestamp.into()),
            description: Set(input.description),
            category_id: Set(input.category_id),
            amount: Set(input.amount),
        };

        let result = expense.insert(&self.db).await?;
        Ok(result)
    }

    /// Updates an expense.
    ///
    /// # Errors
    ///
    /// Returns an error if the expense or a newly referenced category does
    /// not exist, or the update fails.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateExpenseInput,
    ) -> Result<expenses::Model, ExpenseRepoError> {
        let expense = self.get(id).await?;

        if let Some(Some(category_id)) = input.category_id {
            self.check_category_exists(category_id).await?;
        }

        let mut active: expenses::ActiveModel = expense.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(timestamp) = input.timestamp {
            active.timestamp = Set(timestamp.into());
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(category_id) = input.category_id {
            active.category_id = Set(category_id);
        }
        if let Some(amount) = input.amount {
            active.amount = Set(amount);
        }

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Deletes an expense.
    ///
    /// # Errors
    ///
    /// Returns an error if the expense is not found or the delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<(), ExpenseRepoError> {
        let result = expenses::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(ExpenseRepoError::NotFound(id));
        }

        Ok(())
    }

    /// Builds the user-scoped, filtered base query.
    fn filtered(user_id: Uuid, filter: &ExpenseFilter) -> Select<expenses::Entity> {
        let mut query = expenses::Entity::find().filter(expenses::Column::UserId.eq(user_id));

        if let Some(category) = filter.category {
            query = query.filter(expenses::Column::CategoryId.eq(category));
        }
        if let Some(categories) = &filter.category_in {
            query = query.filter(expenses::Column::CategoryId.is_in(categories.iter().copied()));
        }
        if let Some(gte) = filter.timestamp_gte {
            query = query.filter(expenses::Column::Timestamp.gte(gte));
        }
        if let Some(lte) = filter.timestamp_lte {
            query = query.filter(expenses::Column::Timestamp.lte(lte));
        }
        if let Some(needle) = &filter.search {
            query = query.filter(
                Condition::any()
                    .add(expenses::Column::Name.contains(needle))
                    .add(expenses::Column::Description.contains(needle)),
            );
        }

        query
    }

    /// Fails with `CategoryNotFound` unless the category exists.
    async fn check_category_exists(&self, category_id: Uuid) -> Result<(), ExpenseRepoError> {
        budget_categories::Entity::find_by_id(category_id)
            .one(&self.db)
            .await?
            .ok_or(ExpenseRepoError::CategoryNotFound(category_id))?;
        Ok(())
    }
}
