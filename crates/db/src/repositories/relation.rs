//! Allocation repository for budget-category relations.

use std::collections::HashSet;

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use pocketplan_core::budget::{AllocationWrite, plan_bulk_replace};

use crate::entities::{budget_categories, budget_category_relations, budgets};

/// Error types for allocation operations.
#[derive(Debug, thiserror::Error)]
pub enum RelationRepoError {
    /// Allocation not found.
    #[error("Allocation not found: {0}")]
    NotFound(Uuid),

    /// Referenced budget not found.
    #[error("Budget not found: {0}")]
    BudgetNotFound(Uuid),

    /// Referenced category not found.
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    /// A category is already allocated in this budget.
    #[error("Category is already allocated in this budget")]
    DuplicateAllocation,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an allocation directly.
#[derive(Debug, Clone)]
pub struct CreateRelationInput {
    /// Parent budget ID.
    pub budget_id: Uuid,
    /// Category ID.
    pub category_id: Uuid,
    /// Amount (dollars or percentage).
    pub amount: Decimal,
    /// Whether `amount` is a percentage of income.
    pub is_percentage: bool,
}

/// Input for updating an allocation.
#[derive(Debug, Clone, Default)]
pub struct UpdateRelationInput {
    /// New category.
    pub category_id: Option<Uuid>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New percentage flag.
    pub is_percentage: Option<bool>,
}

/// Allocation repository for CRUD and bulk replace.
#[derive(Debug, Clone)]
pub struct RelationRepository {
    db: DatabaseConnection,
}

impl RelationRepository {
    /// Creates a new allocation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists allocations across a user's budgets, optionally narrowed to
    /// one budget and/or one category. Ordered by most recent budget
    /// start, then category name descending.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        budget_id: Option<Uuid>,
        category_id: Option<Uuid>,
    ) -> Result<Vec<budget_category_relations::Model>, RelationRepoError> {
        let mut budget_query = budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id))
            .order_by_desc(budgets::Column::StartTime);
        if let Some(budget_id) = budget_id {
            budget_query = budget_query.filter(budgets::Column::Id.eq(budget_id));
        }
        let budget_ids: Vec<Uuid> = budget_query
            .select_only()
            .column(budgets::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await?;

        if budget_ids.is_empty() {
            return Ok(vec![]);
        }

        let mut query = budget_category_relations::Entity::find()
            .filter(budget_category_relations::Column::BudgetId.is_in(budget_ids.iter().copied()));
        if let Some(category_id) = category_id {
            query = query.filter(budget_category_relations::Column::CategoryId.eq(category_id));
        }
        let mut relations = query.all(&self.db).await?;

        // Match the declared ordering: most recent budget first, then
        // category name descending within it.
        let category_ids: Vec<Uuid> = relations.iter().map(|r| r.category_id).collect();
        let names: std::collections::HashMap<Uuid, String> = budget_categories::Entity::find()
            .filter(budget_categories::Column::Id.is_in(category_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();
        let budget_rank: std::collections::HashMap<Uuid, usize> = budget_ids
            .iter()
            .enumerate()
            .map(|(rank, id)| (*id, rank))
            .collect();

        relations.sort_by(|a, b| {
            budget_rank[&a.budget_id].cmp(&budget_rank[&b.budget_id]).then_with(|| {
                let a_name = names.get(&a.category_id).map(String::as_str).unwrap_or("");
                let b_name = names.get(&b.category_id).map(String::as_str).unwrap_or("");
                b_name.cmp(a_name)
            })
        });

        Ok(relations)
    }

    /// Lists one budget's allocations.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_budget(
        &self,
        budget_id: Uuid,
    ) -> Result<Vec<budget_category_relations::Model>, RelationRepoError> {
        let result = budget_category_relations::Entity::find()
            .filter(budget_category_relations::Column::BudgetId.eq(budget_id))
            .all(&self.db)
            .await?;
        Ok(result)
    }

    /// Gets an allocation by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the allocation is not found or the query fails.
    pub async fn get(
        &self,
        id: Uuid,
    ) -> Result<budget_category_relations::Model, RelationRepoError> {
        budget_category_relations::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(RelationRepoError::NotFound(id))
    }

    /// Creates an allocation directly.
    ///
    /// # Errors
    ///
    /// Returns an error if the category does not exist, the category is
    /// already allocated in the budget, or the insert fails.
    pub async fn create(
        &self,
        input: CreateRelationInput,
    ) -> Result<budget_category_relations::Model, RelationRepoError> {
        Self::check_category_exists(&self.db, input.category_id).await?;

        let existing = budget_category_relations::Entity::find()
            .filter(budget_category_relations::Column::BudgetId.eq(input.budget_id))
            .filter(budget_category_relations::Column::CategoryId.eq(input.category_id))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(RelationRepoError::DuplicateAllocation);
        }

        let relation = budget_category_relations::ActiveModel {
            id: Set(Uuid::new_v4()),
            budget_id: Set(input.budget_id),
            category_id: Set(input.category_id),
            amount: Set(input.amount),
            is_percentage: Set(input.is_percentage),
        };

        let result = relation.insert(&self.db).await?;
        Ok(result)
    }

    /// Updates an allocation.
    ///
    /// # Errors
    ///
    /// Returns an error if the allocation or a newly referenced category
    /// does not exist, the move would collide with an existing allocation,
    /// or the update fails.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateRelationInput,
    ) -> Result<budget_category_relations::Model, RelationRepoError> {
        let relation = self.get(id).await?;

        if let Some(category_id) = input.category_id {
            if category_id != relation.category_id {
                Self::check_category_exists(&self.db, category_id).await?;

                let collision = budget_category_relations::Entity::find()
                    .filter(budget_category_relations::Column::BudgetId.eq(relation.budget_id))
                    .filter(budget_category_relations::Column::CategoryId.eq(category_id))
                    .one(&self.db)
                    .await?;
                if collision.is_some() {
                    return Err(RelationRepoError::DuplicateAllocation);
                }
            }
        }

        let mut active: budget_category_relations::ActiveModel = relation.into();

        if let Some(category_id) = input.category_id {
            active.category_id = Set(category_id);
        }
        if let Some(amount) = input.amount {
            active.amount = Set(amount);
        }
        if let Some(is_percentage) = input.is_percentage {
            active.is_percentage = Set(is_percentage);
        }

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Deletes an allocation.
    ///
    /// # Errors
    ///
    /// Returns an error if the allocation is not found or the delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<(), RelationRepoError> {
        let result = budget_category_relations::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(RelationRepoError::NotFound(id));
        }

        Ok(())
    }

    /// Replaces a budget's allocation set with exactly the desired list.
    ///
    /// Entries with an ID update that row in place; entries without one
    /// are created; every existing allocation not mentioned is deleted.
    /// The whole sequence runs in one transaction: any failure rolls the
    /// operation back with no partial commit.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced category or allocation does not
    /// exist, or any statement fails.
    pub async fn bulk_replace(
        &self,
        budget_id: Uuid,
        desired: &[AllocationWrite],
    ) -> Result<Vec<budget_category_relations::Model>, RelationRepoError> {
        let txn = self.db.begin().await?;

        let existing_ids: Vec<Uuid> = budget_category_relations::Entity::find()
            .filter(budget_category_relations::Column::BudgetId.eq(budget_id))
            .select_only()
            .column(budget_category_relations::Column::Id)
            .into_tuple()
            .all(&txn)
            .await?;

        let plan = plan_bulk_replace(&existing_ids, desired);

        Self::check_categories_exist(&txn, desired).await?;

        if !plan.delete_ids.is_empty() {
            budget_category_relations::Entity::delete_many()
                .filter(budget_category_relations::Column::BudgetId.eq(budget_id))
                .filter(
                    budget_category_relations::Column::Id.is_in(plan.delete_ids.iter().copied()),
                )
                .exec(&txn)
                .await?;
        }

        for entry in &plan.create {
            let relation = budget_category_relations::ActiveModel {
                id: Set(Uuid::new_v4()),
                budget_id: Set(budget_id),
                category_id: Set(entry.category_id),
                amount: Set(entry.amount),
                is_percentage: Set(entry.is_percentage),
            };
            relation.insert(&txn).await?;
        }

        for entry in &plan.update {
            let id = entry.id.unwrap_or_default();
            let relation = budget_category_relations::Entity::find_by_id(id)
                .filter(budget_category_relations::Column::BudgetId.eq(budget_id))
                .one(&txn)
                .await?
                .ok_or(RelationRepoError::NotFound(id))?;

            let mut active: budget_category_relations::ActiveModel = relation.into();
            active.category_id = Set(entry.category_id);
            active.amount = Set(entry.amount);
            active.is_percentage = Set(entry.is_percentage);
            active.update(&txn).await?;
        }

        txn.commit().await?;

        tracing::debug!(
            budget_id = %budget_id,
            deleted = plan.delete_ids.len(),
            created = plan.create.len(),
            updated = plan.update.len(),
            "Allocation set replaced"
        );

        self.list_for_budget(budget_id).await
    }

    /// Fails with `CategoryNotFound` unless the category exists.
    async fn check_category_exists<C: ConnectionTrait>(
        conn: &C,
        category_id: Uuid,
    ) -> Result<(), RelationRepoError> {
        budget_categories::Entity::find_by_id(category_id)
            .one(conn)
            .await?
            .ok_or(RelationRepoError::CategoryNotFound(category_id))?;
        Ok(())
    }

    /// Verifies every category referenced by the desired entries exists.
    async fn check_categories_exist(
        txn: &DatabaseTransaction,
        desired: &[AllocationWrite],
    ) -> Result<(), RelationRepoError> {
        let wanted: HashSet<Uuid> = desired.iter().map(|w| w.category_id).collect();
        if wanted.is_empty() {
            return Ok(());
        }

        let found: HashSet<Uuid> = budget_categories::Entity::find()
            .filter(budget_categories::Column::Id.is_in(wanted.iter().copied()))
            .select_only()
            .column(budget_categories::Column::Id)
            .into_tuple()
            .all(txn)
            .await?
            .into_iter()
            .collect();

        if let Some(missing) = wanted.difference(&found).next() {
            return Err(RelationRepoError::CategoryNotFound(*missing));
        }
        Ok(())
    }
}
