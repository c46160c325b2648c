//! Budget category relation (allocation) routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::routes::{error_json, internal_error};
use crate::{AppState, middleware::AuthUser};
use pocketplan_core::budget::{AllocationWrite, BudgetService};
use pocketplan_db::repositories::{
    BudgetRepoError, BudgetRepository, CreateRelationInput, RelationRepoError, RelationRepository,
    UpdateRelationInput,
};

/// Creates the allocation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/budget_category_relations",
            get(list_relations).post(create_relation),
        )
        .route(
            "/budget_category_relations/{relation_id}",
            get(get_relation)
                .patch(update_relation)
                .delete(delete_relation),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing allocations.
#[derive(Debug, Deserialize)]
pub struct ListRelationsQuery {
    /// Restrict to one budget.
    pub budget: Option<Uuid>,
    /// Restrict to one category.
    pub category: Option<Uuid>,
}

/// Request body for creating an allocation.
#[derive(Debug, Deserialize)]
pub struct CreateRelationRequest {
    /// Budget ID.
    pub budget: Uuid,
    /// Category ID.
    pub category: Uuid,
    /// Amount (dollars or percentage).
    pub amount: Decimal,
    /// Whether `amount` is a percentage of income.
    pub is_percentage: bool,
}

/// Request body for updating an allocation.
#[derive(Debug, Deserialize)]
pub struct UpdateRelationRequest {
    /// New category.
    pub category: Option<Uuid>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New percentage flag.
    pub is_percentage: Option<bool>,
}

/// Response for an allocation.
#[derive(Debug, Serialize)]
pub struct RelationResponse {
    /// Allocation ID.
    pub id: Uuid,
    /// Budget ID.
    pub budget: Uuid,
    /// Category ID.
    pub category: Uuid,
    /// Amount (dollars or percentage).
    pub amount: Decimal,
    /// Whether `amount` is a percentage of income.
    pub is_percentage: bool,
}

impl RelationResponse {
    /// Builds the response from the entity model.
    #[must_use]
    pub fn from_model(model: pocketplan_db::entities::budget_category_relations::Model) -> Self {
        Self {
            id: model.id,
            budget: model.budget_id,
            category: model.category_id,
            amount: model.amount,
            is_percentage: model.is_percentage,
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Fetches a budget and checks the requester owns it.
async fn check_budget_owner(
    budget_repo: &BudgetRepository,
    budget_id: Uuid,
    user_id: Uuid,
) -> Result<(), Response> {
    match budget_repo.get_budget(budget_id).await {
        Ok(budget) if budget.user_id == user_id => Ok(()),
        Ok(_) => Err(error_json(
            StatusCode::FORBIDDEN,
            "forbidden",
            "You do not own this budget",
        )),
        Err(BudgetRepoError::NotFound(_)) => Err(error_json(
            StatusCode::NOT_FOUND,
            "not_found",
            "Budget not found",
        )),
        Err(e) => {
            error!(error = %e, "Failed to fetch budget");
            Err(internal_error())
        }
    }
}

/// Fetches an allocation and checks the requester owns its budget.
async fn owned_relation(
    state: &AppState,
    relation_id: Uuid,
    user_id: Uuid,
) -> Result<pocketplan_db::entities::budget_category_relations::Model, Response> {
    let relation_repo = RelationRepository::new((*state.db).clone());

    let relation = match relation_repo.get(relation_id).await {
        Ok(r) => r,
        Err(RelationRepoError::NotFound(_)) => {
            return Err(error_json(
                StatusCode::NOT_FOUND,
                "not_found",
                "Allocation not found",
            ));
        }
        Err(e) => {
            error!(error = %e, "Failed to fetch allocation");
            return Err(internal_error());
        }
    };

    let budget_repo = BudgetRepository::new((*state.db).clone());
    check_budget_owner(&budget_repo, relation.budget_id, user_id).await?;
    Ok(relation)
}

/// Translates allocation repo errors into responses.
fn relation_error_response(err: &RelationRepoError) -> Response {
    match err {
        RelationRepoError::CategoryNotFound(id) => error_json(
            StatusCode::NOT_FOUND,
            "not_found",
            &format!("Category not found: {id}"),
        ),
        RelationRepoError::NotFound(id) => error_json(
            StatusCode::NOT_FOUND,
            "not_found",
            &format!("Allocation not found: {id}"),
        ),
        RelationRepoError::DuplicateAllocation => error_json(
            StatusCode::CONFLICT,
            "duplicate_allocation",
            "Category is already allocated in this budget",
        ),
        e => {
            error!(error = %e, "Allocation operation failed");
            internal_error()
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /budget_category_relations - List the requester's allocations,
/// optionally filtered by budget and category.
async fn list_relations(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListRelationsQuery>,
) -> impl IntoResponse {
    let relation_repo = RelationRepository::new((*state.db).clone());

    match relation_repo
        .list_for_user(auth.user_id(), query.budget, query.category)
        .await
    {
        Ok(relations) => {
            let response: Vec<RelationResponse> = relations
                .into_iter()
                .map(RelationResponse::from_model)
                .collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list allocations");
            internal_error()
        }
    }
}

/// POST /budget_category_relations - Create one allocation.
async fn create_relation(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateRelationRequest>,
) -> impl IntoResponse {
    let budget_repo = BudgetRepository::new((*state.db).clone());
    if let Err(response) = check_budget_owner(&budget_repo, payload.budget, auth.user_id()).await {
        return response;
    }

    let write = AllocationWrite {
        id: None,
        category_id: payload.category,
        amount: payload.amount,
        is_percentage: payload.is_percentage,
    };
    if let Err(e) = BudgetService::validate_allocation(&write) {
        return error_json(StatusCode::BAD_REQUEST, "validation_error", &e.to_string());
    }

    let relation_repo = RelationRepository::new((*state.db).clone());

    let input = CreateRelationInput {
        budget_id: payload.budget,
        category_id: payload.category,
        amount: payload.amount,
        is_percentage: payload.is_percentage,
    };

    match relation_repo.create(input).await {
        Ok(relation) => {
            info!(relation_id = %relation.id, "Allocation created");
            (
                StatusCode::CREATED,
                Json(RelationResponse::from_model(relation)),
            )
                .into_response()
        }
        Err(e) => relation_error_response(&e),
    }
}

/// GET /budget_category_relations/{relation_id} - Fetch one allocation.
async fn get_relation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(relation_id): Path<Uuid>,
) -> impl IntoResponse {
    match owned_relation(&state, relation_id, auth.user_id()).await {
        Ok(relation) => {
            (StatusCode::OK, Json(RelationResponse::from_model(relation))).into_response()
        }
        Err(response) => response,
    }
}

/// PATCH /budget_category_relations/{relation_id} - Update one allocation.
async fn update_relation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(relation_id): Path<Uuid>,
    Json(payload): Json<UpdateRelationRequest>,
) -> impl IntoResponse {
    let relation = match owned_relation(&state, relation_id, auth.user_id()).await {
        Ok(r) => r,
        Err(response) => return response,
    };

    let write = AllocationWrite {
        id: Some(relation.id),
        category_id: payload.category.unwrap_or(relation.category_id),
        amount: payload.amount.unwrap_or(relation.amount),
        is_percentage: payload.is_percentage.unwrap_or(relation.is_percentage),
    };
    if let Err(e) = BudgetService::validate_allocation(&write) {
        return error_json(StatusCode::BAD_REQUEST, "validation_error", &e.to_string());
    }

    let relation_repo = RelationRepository::new((*state.db).clone());

    let input = UpdateRelationInput {
        category_id: payload.category,
        amount: payload.amount,
        is_percentage: payload.is_percentage,
    };

    match relation_repo.update(relation_id, input).await {
        Ok(updated) => {
            info!(relation_id = %updated.id, "Allocation updated");
            (StatusCode::OK, Json(RelationResponse::from_model(updated))).into_response()
        }
        Err(e) => relation_error_response(&e),
    }
}

/// DELETE /budget_category_relations/{relation_id} - Delete one allocation.
async fn delete_relation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(relation_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = owned_relation(&state, relation_id, auth.user_id()).await {
        return response;
    }

    let relation_repo = RelationRepository::new((*state.db).clone());

    match relation_repo.delete(relation_id).await {
        Ok(()) => {
            info!(relation_id = %relation_id, "Allocation deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => relation_error_response(&e),
    }
}
