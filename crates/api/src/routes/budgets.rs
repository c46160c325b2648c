//! Budget management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{error, info};
use uuid::Uuid;

use crate::routes::{error_json, internal_error};
use crate::{AppState, middleware::AuthUser};
use pocketplan_core::budget::{
    AllocationWrite, BudgetDraft, BudgetService, TimeInterval,
};
use pocketplan_core::report::{AllocationLine, ReportService, csv::spending_comparison_csv};
use pocketplan_core::spending::{ExpenseAmount, actual_spending_by_category};
use pocketplan_db::repositories::{
    BudgetRepoError, BudgetRepository, CategoryRepository, CreateBudgetInput, ExpenseFilter,
    ExpenseRepository, RelationRepoError, RelationRepository, UpdateBudgetInput,
};

use super::relations::RelationResponse;

/// Creates the budget routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budgets", get(list_budgets).post(create_budget))
        .route(
            "/budgets/{budget_id}",
            get(get_budget).patch(update_budget).delete(delete_budget),
        )
        .route(
            "/budgets/{budget_id}/category_relations/bulk_update",
            patch(bulk_update_relations),
        )
        .route(
            "/budgets/{budget_id}/spending_export",
            get(spending_export),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a budget.
#[derive(Debug, Deserialize)]
pub struct CreateBudgetRequest {
    /// Budget name.
    pub name: String,
    /// Budget description.
    pub description: Option<String>,
    /// Start of the budgeted span.
    pub start_time: DateTime<Utc>,
    /// End of the budgeted span.
    pub end_time: DateTime<Utc>,
    /// Interval: yearly, monthly, weekly.
    pub interval: String,
    /// Income per interval period.
    pub income: Decimal,
}

/// Request body for updating a budget.
#[derive(Debug, Deserialize)]
pub struct UpdateBudgetRequest {
    /// Budget name.
    pub name: Option<String>,
    /// Budget description.
    pub description: Option<String>,
    /// Start of the budgeted span.
    pub start_time: Option<DateTime<Utc>>,
    /// End of the budgeted span.
    pub end_time: Option<DateTime<Utc>>,
    /// Interval: yearly, monthly, weekly.
    pub interval: Option<String>,
    /// Income per interval period.
    pub income: Option<Decimal>,
}

/// Request body for the bulk allocation replace.
#[derive(Debug, Deserialize)]
pub struct BulkUpdateRequest {
    /// The authoritative allocation list for this budget.
    pub category_relations: Vec<RelationWriteRequest>,
}

/// One desired allocation in the bulk replace.
#[derive(Debug, Deserialize)]
pub struct RelationWriteRequest {
    /// Existing allocation ID, when updating in place.
    pub id: Option<Uuid>,
    /// Category ID.
    pub category: Uuid,
    /// Amount (dollars or percentage).
    pub amount: Decimal,
    /// Whether `amount` is a percentage of income.
    pub is_percentage: bool,
}

/// Response for a budget.
#[derive(Debug, Serialize)]
pub struct BudgetResponse {
    /// Budget ID.
    pub id: Uuid,
    /// Budget name.
    pub name: String,
    /// Budget description.
    pub description: Option<String>,
    /// Start of the budgeted span.
    pub start_time: String,
    /// End of the budgeted span.
    pub end_time: String,
    /// Interval the income is declared over.
    pub interval: String,
    /// Income per interval period.
    pub income: Decimal,
    /// Owning user ID.
    pub user: Uuid,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl BudgetResponse {
    fn from_model(budget: pocketplan_db::entities::budgets::Model) -> Self {
        Self {
            id: budget.id,
            name: budget.name,
            description: budget.description,
            start_time: budget.start_time.to_rfc3339(),
            end_time: budget.end_time.to_rfc3339(),
            interval: interval_to_string(&budget.interval),
            income: budget.income,
            user: budget.user_id,
            created_at: budget.created_at.to_rfc3339(),
            updated_at: budget.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Converts an interval string to the database enum value.
fn parse_interval(s: &str) -> Option<pocketplan_db::entities::sea_orm_active_enums::TimeInterval> {
    TimeInterval::from_str(s).ok().map(Into::into)
}

/// Converts an interval enum to its wire string.
fn interval_to_string(
    interval: &pocketplan_db::entities::sea_orm_active_enums::TimeInterval,
) -> String {
    let core: TimeInterval = interval.clone().into();
    core.to_string()
}

/// Fetches a budget and checks the requester owns it.
///
/// NotFound and Forbidden stay distinct so a foreign budget ID does not
/// leak whether it exists.
async fn owned_budget(
    budget_repo: &BudgetRepository,
    budget_id: Uuid,
    user_id: Uuid,
) -> Result<pocketplan_db::entities::budgets::Model, Response> {
    match budget_repo.get_budget(budget_id).await {
        Ok(budget) => {
            if budget.user_id == user_id {
                Ok(budget)
            } else {
                Err(error_json(
                    StatusCode::FORBIDDEN,
                    "forbidden",
                    "You do not own this budget",
                ))
            }
        }
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

/// Runs the draft through validation, translating failures to a 400.
fn validated_draft(
    name: &str,
    description: Option<&str>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    interval: TimeInterval,
    income: Decimal,
) -> Result<BudgetDraft, Response> {
    let draft = BudgetDraft {
        name: name.to_string(),
        description: description.map(ToString::to_string),
        start_time,
        end_time,
        interval,
        income,
    };

    BudgetService::validate_budget(&draft)
        .map_err(|e| error_json(StatusCode::BAD_REQUEST, "validation_error", &e.to_string()))?;
    Ok(draft)
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /budgets - List the requester's budgets, most recent first.
async fn list_budgets(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let budget_repo = BudgetRepository::new((*state.db).clone());

    match budget_repo.list_budgets(auth.user_id()).await {
        Ok(budgets) => {
            let response: Vec<BudgetResponse> =
                budgets.into_iter().map(BudgetResponse::from_model).collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list budgets");
            internal_error()
        }
    }
}

/// POST /budgets - Create a budget owned by the requester.
async fn create_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateBudgetRequest>,
) -> impl IntoResponse {
    let Some(interval) = parse_interval(&payload.interval) else {
        return error_json(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "interval must be one of: yearly, monthly, weekly",
        );
    };

    let draft = match validated_draft(
        &payload.name,
        payload.description.as_deref(),
        payload.start_time,
        payload.end_time,
        interval.clone().into(),
        payload.income,
    ) {
        Ok(d) => d,
        Err(response) => return response,
    };

    let budget_repo = BudgetRepository::new((*state.db).clone());

    let input = CreateBudgetInput {
        user_id: auth.user_id(),
        name: draft.name,
        description: draft.description,
        start_time: draft.start_time,
        end_time: draft.end_time,
        interval,
        income: draft.income,
    };

    match budget_repo.create_budget(input).await {
        Ok(budget) => {
            info!(budget_id = %budget.id, "Budget created");
            (StatusCode::CREATED, Json(BudgetResponse::from_model(budget))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create budget");
            internal_error()
        }
    }
}

/// GET /budgets/{budget_id} - Fetch one budget.
async fn get_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(budget_id): Path<Uuid>,
) -> impl IntoResponse {
    let budget_repo = BudgetRepository::new((*state.db).clone());

    match owned_budget(&budget_repo, budget_id, auth.user_id()).await {
        Ok(budget) => (StatusCode::OK, Json(BudgetResponse::from_model(budget))).into_response(),
        Err(response) => response,
    }
}

/// PATCH /budgets/{budget_id} - Update one budget.
async fn update_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(budget_id): Path<Uuid>,
    Json(payload): Json<UpdateBudgetRequest>,
) -> impl IntoResponse {
    let budget_repo = BudgetRepository::new((*state.db).clone());

    let budget = match owned_budget(&budget_repo, budget_id, auth.user_id()).await {
        Ok(b) => b,
        Err(response) => return response,
    };

    let interval = match &payload.interval {
        Some(raw) => match parse_interval(raw) {
            Some(i) => Some(i),
            None => {
                return error_json(
                    StatusCode::BAD_REQUEST,
                    "validation_error",
                    "interval must be one of: yearly, monthly, weekly",
                );
            }
        },
        None => None,
    };

    // Validate the budget as it will look after the patch.
    let effective_interval = interval.clone().unwrap_or_else(|| budget.interval.clone());
    if let Err(response) = validated_draft(
        payload.name.as_deref().unwrap_or(&budget.name),
        payload
            .description
            .as_deref()
            .or(budget.description.as_deref()),
        payload
            .start_time
            .unwrap_or_else(|| budget.start_time.to_utc()),
        payload.end_time.unwrap_or_else(|| budget.end_time.to_utc()),
        effective_interval.into(),
        payload.income.unwrap_or(budget.income),
    ) {
        return response;
    }

    let input = UpdateBudgetInput {
        name: payload.name,
        description: payload.description.map(Some),
        start_time: payload.start_time,
        end_time: payload.end_time,
        interval,
        income: payload.income,
    };

    match budget_repo.update_budget(budget_id, input).await {
        Ok(updated) => {
            info!(budget_id = %updated.id, "Budget updated");
            (StatusCode::OK, Json(BudgetResponse::from_model(updated))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to update budget");
            internal_error()
        }
    }
}

/// DELETE /budgets/{budget_id} - Delete one budget and its allocations.
async fn delete_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(budget_id): Path<Uuid>,
) -> impl IntoResponse {
    let budget_repo = BudgetRepository::new((*state.db).clone());

    if let Err(response) = owned_budget(&budget_repo, budget_id, auth.user_id()).await {
        return response;
    }

    match budget_repo.delete_budget(budget_id).await {
        Ok(()) => {
            info!(budget_id = %budget_id, "Budget deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to delete budget");
            internal_error()
        }
    }
}

/// PATCH /budgets/{budget_id}/category_relations/bulk_update - Replace the
/// budget's allocation set with exactly the request's list.
async fn bulk_update_relations(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(budget_id): Path<Uuid>,
    Json(payload): Json<BulkUpdateRequest>,
) -> impl IntoResponse {
    let budget_repo = BudgetRepository::new((*state.db).clone());

    if let Err(response) = owned_budget(&budget_repo, budget_id, auth.user_id()).await {
        return response;
    }

    let mut desired = Vec::with_capacity(payload.category_relations.len());
    for entry in &payload.category_relations {
        let write = AllocationWrite {
            id: entry.id,
            category_id: entry.category,
            amount: entry.amount,
            is_percentage: entry.is_percentage,
        };
        if let Err(e) = BudgetService::validate_allocation(&write) {
            return error_json(StatusCode::BAD_REQUEST, "validation_error", &e.to_string());
        }
        desired.push(write);
    }

    let relation_repo = RelationRepository::new((*state.db).clone());

    match relation_repo.bulk_replace(budget_id, &desired).await {
        Ok(relations) => {
            info!(budget_id = %budget_id, count = relations.len(), "Allocations replaced");
            let response: Vec<RelationResponse> = relations
                .into_iter()
                .map(RelationResponse::from_model)
                .collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(RelationRepoError::CategoryNotFound(id)) => error_json(
            StatusCode::NOT_FOUND,
            "not_found",
            &format!("Category not found: {id}"),
        ),
        Err(RelationRepoError::NotFound(id)) => error_json(
            StatusCode::NOT_FOUND,
            "not_found",
            &format!("Allocation not found: {id}"),
        ),
        Err(e) => {
            error!(error = %e, "Failed to replace allocations");
            internal_error()
        }
    }
}

/// GET /budgets/{budget_id}/spending_export - Planned vs actual spending
/// per allocated category, as a CSV attachment.
async fn spending_export(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(budget_id): Path<Uuid>,
) -> impl IntoResponse {
    let budget_repo = BudgetRepository::new((*state.db).clone());

    let budget = match owned_budget(&budget_repo, budget_id, auth.user_id()).await {
        Ok(b) => b,
        Err(response) => return response,
    };

    let relation_repo = RelationRepository::new((*state.db).clone());
    let relations = match relation_repo.list_for_budget(budget_id).await {
        Ok(r) => r,
        Err(e) => {
            error!(error = %e, "Failed to list allocations");
            return internal_error();
        }
    };

    let category_repo = CategoryRepository::new((*state.db).clone());
    let category_ids: Vec<Uuid> = relations.iter().map(|r| r.category_id).collect();
    let categories = match category_repo.find_by_ids(&category_ids).await {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Failed to fetch categories");
            return internal_error();
        }
    };
    let names: std::collections::HashMap<Uuid, String> =
        categories.into_iter().map(|c| (c.id, c.name)).collect();

    // Actuals cover the owner's whole expense history, deliberately
    // unfiltered by date.
    let expense_repo = ExpenseRepository::new((*state.db).clone());
    let expenses = match expense_repo
        .list_all(auth.user_id(), &ExpenseFilter::default())
        .await
    {
        Ok(e) => e,
        Err(e) => {
            error!(error = %e, "Failed to fetch expenses");
            return internal_error();
        }
    };
    let amounts: Vec<ExpenseAmount> = expenses
        .iter()
        .map(|e| ExpenseAmount {
            category_id: e.category_id,
            amount: e.amount,
        })
        .collect();
    let actuals = actual_spending_by_category(&amounts, &category_ids);

    let lines: Vec<AllocationLine> = relations
        .iter()
        .map(|r| AllocationLine {
            allocation: r.to_core(),
            category_name: names.get(&r.category_id).cloned().unwrap_or_default(),
        })
        .collect();

    let rows = ReportService::planned_vs_actual(&budget.to_core(), &lines, &actuals);

    match spending_comparison_csv(&rows) {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment;filename=\"spending_comparison.csv\"",
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render spending comparison");
            internal_error()
        }
    }
}
