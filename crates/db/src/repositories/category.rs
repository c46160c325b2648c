//! Category repository for the shared budget-category reference table.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::budget_categories;

/// Error types for category operations.
#[derive(Debug, thiserror::Error)]
pub enum CategoryRepoError {
    /// Category not found.
    #[error("Category not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Category repository, read-mostly.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists categories alphabetically, optionally narrowed by a name
    /// substring search.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<budget_categories::Model>, CategoryRepoError> {
        let mut query = budget_categories::Entity::find();

        if let Some(needle) = search {
            query = query.filter(budget_categories::Column::Name.contains(needle));
        }

        let result = query
            .order_by_asc(budget_categories::Column::Name)
            .all(&self.db)
            .await?;
        Ok(result)
    }

    /// Returns every category ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn all_ids(&self) -> Result<Vec<Uuid>, CategoryRepoError> {
        let ids = budget_categories::Entity::find()
            .select_only()
            .column(budget_categories::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(ids)
    }

    /// Gets a category by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the category is not found or the query fails.
    pub async fn get(&self, id: Uuid) -> Result<budget_categories::Model, CategoryRepoError> {
        budget_categories::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CategoryRepoError::NotFound(id))
    }

    /// Fetches the given categories, keyed lookup left to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_ids(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<budget_categories::Model>, CategoryRepoError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let result = budget_categories::Entity::find()
            .filter(budget_categories::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await?;
        Ok(result)
    }

    /// Inserts a category. Used by the seeder; categories are otherwise
    /// reference data.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(
        &self,
        name: &str,
        typical_percentage: Option<Decimal>,
        typical_monthly_amount: Option<Decimal>,
    ) -> Result<budget_categories::Model, CategoryRepoError> {
        let category = budget_categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            typical_percentage: Set(typical_percentage),
            typical_monthly_amount: Set(typical_monthly_amount),
        };

        let result = category.insert(&self.db).await?;
        Ok(result)
    }
}
