//! Expense routes: CRUD, category ranking, and CSV export.

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::routes::{error_json, internal_error};
use crate::{AppState, middleware::AuthUser};
use pocketplan_core::report::{ExpenseRow, csv::expenses_csv};
use pocketplan_core::spending::{
    ExpenseAmount, ExpenseDraft, actual_spending_by_category, validate_expense,
};
use pocketplan_db::repositories::{
    CategoryRepository, CreateExpenseInput, ExpenseFilter, ExpenseRepoError, ExpenseRepository,
    UpdateExpenseInput,
};
use pocketplan_shared::types::{PageRequest, PageResponse};

/// Creates the expense routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/expenses/by_category", get(expenses_by_category))
        .route("/expenses/csv_export", get(expenses_csv_export))
        .route(
            "/expenses/{expense_id}",
            get(get_expense).patch(update_expense).delete(delete_expense),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for expense listings and exports.
#[derive(Debug, Deserialize)]
pub struct ExpenseQuery {
    /// Exact category match.
    pub category: Option<Uuid>,
    /// Comma-separated category set match.
    pub category_in: Option<String>,
    /// Inclusive lower timestamp bound.
    pub timestamp_gte: Option<DateTime<Utc>>,
    /// Inclusive upper timestamp bound.
    pub timestamp_lte: Option<DateTime<Utc>>,
    /// Substring search over name and description.
    pub search: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

impl ExpenseQuery {
    /// Builds the repository filter, rejecting malformed category sets.
    fn to_filter(&self) -> Result<ExpenseFilter, Response> {
        let category_in = match &self.category_in {
            Some(raw) => {
                let mut ids = Vec::new();
                for part in raw.split(',') {
                    match part.trim().parse::<Uuid>() {
                        Ok(id) => ids.push(id),
                        Err(_) => {
                            return Err(error_json(
                                StatusCode::BAD_REQUEST,
                                "validation_error",
                                "category_in must be a comma-separated list of category IDs",
                            ));
                        }
                    }
                }
                Some(ids)
            }
            None => None,
        };

        Ok(ExpenseFilter {
            category: self.category,
            category_in,
            timestamp_gte: self.timestamp_gte,
            timestamp_lte: self.timestamp_lte,
            search: self.search.clone(),
        })
    }

    /// Builds the page request with defaults.
    fn to_page(&self) -> PageRequest {
        let default = PageRequest::default();
        PageRequest {
            page: self.page.unwrap_or(default.page),
            per_page: self.per_page.unwrap_or(default.per_page),
        }
    }
}

/// Request body for creating an expense.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    /// Optional expense name.
    pub name: Option<String>,
    /// When the expense occurred.
    pub timestamp: DateTime<Utc>,
    /// Optional description.
    pub description: Option<String>,
    /// Optional category reference.
    pub category: Option<Uuid>,
    /// Expense amount.
    pub amount: Decimal,
}

/// Request body for updating an expense.
#[derive(Debug, Deserialize)]
pub struct UpdateExpenseRequest {
    /// New name.
    pub name: Option<String>,
    /// New timestamp.
    pub timestamp: Option<DateTime<Utc>>,
    /// New description.
    pub description: Option<String>,
    /// New category reference.
    pub category: Option<Uuid>,
    /// New amount.
    pub amount: Option<Decimal>,
}

/// Response for an expense.
#[derive(Debug, Serialize)]
pub struct ExpenseResponse {
    /// Expense ID.
    pub id: Uuid,
    /// Optional expense name.
    pub name: Option<String>,
    /// When the expense occurred.
    pub timestamp: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional category reference.
    pub category: Option<Uuid>,
    /// Expense amount.
    pub amount: Decimal,
}

impl ExpenseResponse {
    fn from_model(model: pocketplan_db::entities::expenses::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            timestamp: model.timestamp.to_rfc3339(),
            description: model.description,
            category: model.category_id,
            amount: model.amount,
        }
    }
}

/// One row of the category spending ranking.
#[derive(Debug, Serialize)]
pub struct CategorySpendingResponse {
    /// Category ID.
    pub category: Uuid,
    /// Total actual spending for the category.
    pub total_amount: Decimal,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Fetches an expense and checks the requester owns it.
async fn owned_expense(
    expense_repo: &ExpenseRepository,
    expense_id: Uuid,
    user_id: Uuid,
) -> Result<pocketplan_db::entities::expenses::Model, Response> {
    match expense_repo.get(expense_id).await {
        Ok(expense) => {
            if expense.user_id == user_id {
                Ok(expense)
            } else {
                Err(error_json(
                    StatusCode::FORBIDDEN,
                    "forbidden",
                    "You do not own this expense",
                ))
            }
        }
        Err(ExpenseRepoError::NotFound(_)) => Err(error_json(
            StatusCode::NOT_FOUND,
            "not_found",
            "Expense not found",
        )),
        Err(e) => {
            error!(error = %e, "Failed to fetch expense");
            Err(internal_error())
        }
    }
}

/// Translates expense repo errors into responses.
fn expense_error_response(err: &ExpenseRepoError) -> Response {
    match err {
        ExpenseRepoError::CategoryNotFound(id) => error_json(
            StatusCode::NOT_FOUND,
            "not_found",
            &format!("Category not found: {id}"),
        ),
        ExpenseRepoError::NotFound(id) => error_json(
            StatusCode::NOT_FOUND,
            "not_found",
            &format!("Expense not found: {id}"),
        ),
        e => {
            error!(error = %e, "Expense operation failed");
            internal_error()
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /expenses - List the requester's expenses, most recent first.
async fn list_expenses(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ExpenseQuery>,
) -> impl IntoResponse {
    let filter = match query.to_filter() {
        Ok(f) => f,
        Err(response) => return response,
    };
    let page = query.to_page();

    let expense_repo = ExpenseRepository::new((*state.db).clone());

    match expense_repo.list(auth.user_id(), &filter, &page).await {
        Ok((expenses, total)) => {
            let data: Vec<ExpenseResponse> = expenses
                .into_iter()
                .map(ExpenseResponse::from_model)
                .collect();
            let response = PageResponse::new(data, page.page, page.per_page, total);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list expenses");
            internal_error()
        }
    }
}

/// POST /expenses - Create an expense owned by the requester.
async fn create_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateExpenseRequest>,
) -> impl IntoResponse {
    let draft = ExpenseDraft {
        name: payload.name.clone(),
        timestamp: payload.timestamp,
        description: payload.description.clone(),
        category_id: payload.category,
        amount: payload.amount,
    };
    if let Err(e) = validate_expense(&draft) {
        return error_json(StatusCode::BAD_REQUEST, "validation_error", &e.to_string());
    }

    let expense_repo = ExpenseRepository::new((*state.db).clone());

    let input = CreateExpenseInput {
        user_id: auth.user_id(),
        name: payload.name,
        timestamp: payload.timestamp,
        description: payload.description,
        category_id: payload.category,
        amount: payload.amount,
    };

    match expense_repo.create(input).await {
        Ok(expense) => {
            info!(expense_id = %expense.id, "Expense created");
            (
                StatusCode::CREATED,
                Json(ExpenseResponse::from_model(expense)),
            )
                .into_response()
        }
        Err(e) => expense_error_response(&e),
    }
}

/// GET /expenses/{expense_id} - Fetch one expense.
async fn get_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(expense_id): Path<Uuid>,
) -> impl IntoResponse {
    let expense_repo = ExpenseRepository::new((*state.db).clone());

    match owned_expense(&expense_repo, expense_id, auth.user_id()).await {
        Ok(expense) => (StatusCode::OK, Json(ExpenseResponse::from_model(expense))).into_response(),
        Err(response) => response,
    }
}

/// PATCH /expenses/{expense_id} - Update one expense.
async fn update_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(expense_id): Path<Uuid>,
    Json(payload): Json<UpdateExpenseRequest>,
) -> impl IntoResponse {
    let expense_repo = ExpenseRepository::new((*state.db).clone());

    let expense = match owned_expense(&expense_repo, expense_id, auth.user_id()).await {
        Ok(e) => e,
        Err(response) => return response,
    };

    // Validate the expense as it will look after the patch.
    let draft = ExpenseDraft {
        name: payload.name.clone().or_else(|| expense.name.clone()),
        timestamp: payload
            .timestamp
            .unwrap_or_else(|| expense.timestamp.to_utc()),
        description: payload
            .description
            .clone()
            .or_else(|| expense.description.clone()),
        category_id: payload.category.or(expense.category_id),
        amount: payload.amount.unwrap_or(expense.amount),
    };
    if let Err(e) = validate_expense(&draft) {
        return error_json(StatusCode::BAD_REQUEST, "validation_error", &e.to_string());
    }

    let input = UpdateExpenseInput {
        name: payload.name.map(Some),
        timestamp: payload.timestamp,
        description: payload.description.map(Some),
        category_id: payload.category.map(Some),
        amount: payload.amount,
    };

    match expense_repo.update(expense_id, input).await {
        Ok(updated) => {
            info!(expense_id = %updated.id, "Expense updated");
            (StatusCode::OK, Json(ExpenseResponse::from_model(updated))).into_response()
        }
        Err(e) => expense_error_response(&e),
    }
}

/// DELETE /expenses/{expense_id} - Delete one expense.
async fn delete_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(expense_id): Path<Uuid>,
) -> impl IntoResponse {
    let expense_repo = ExpenseRepository::new((*state.db).clone());

    if let Err(response) = owned_expense(&expense_repo, expense_id, auth.user_id()).await {
        return response;
    }

    match expense_repo.delete(expense_id).await {
        Ok(()) => {
            info!(expense_id = %expense_id, "Expense deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => expense_error_response(&e),
    }
}

/// GET /expenses/by_category - Total actual spending per category over the
/// filtered expense set, every category included, highest total first.
async fn expenses_by_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ExpenseQuery>,
) -> impl IntoResponse {
    let filter = match query.to_filter() {
        Ok(f) => f,
        Err(response) => return response,
    };
    let page = query.to_page();

    let expense_repo = ExpenseRepository::new((*state.db).clone());
    let expenses = match expense_repo.list_all(auth.user_id(), &filter).await {
        Ok(e) => e,
        Err(e) => {
            error!(error = %e, "Failed to fetch expenses");
            return internal_error();
        }
    };

    let category_repo = CategoryRepository::new((*state.db).clone());
    let category_ids = match category_repo.all_ids().await {
        Ok(ids) => ids,
        Err(e) => {
            error!(error = %e, "Failed to fetch categories");
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
    let rows = actual_spending_by_category(&amounts, &category_ids);

    let total = rows.len() as u64;
    let data: Vec<CategorySpendingResponse> = rows
        .into_iter()
        .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
        .map(|row| CategorySpendingResponse {
            category: row.category_id,
            total_amount: row.total_amount,
        })
        .collect();

    let response = PageResponse::new(data, page.page, page.per_page, total);
    (StatusCode::OK, Json(response)).into_response()
}

/// GET /expenses/csv_export - The filtered expense set as a CSV attachment.
async fn expenses_csv_export(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ExpenseQuery>,
) -> impl IntoResponse {
    let filter = match query.to_filter() {
        Ok(f) => f,
        Err(response) => return response,
    };

    let expense_repo = ExpenseRepository::new((*state.db).clone());
    let expenses = match expense_repo.list_all(auth.user_id(), &filter).await {
        Ok(e) => e,
        Err(e) => {
            error!(error = %e, "Failed to fetch expenses");
            return internal_error();
        }
    };

    let category_repo = CategoryRepository::new((*state.db).clone());
    let category_ids: Vec<Uuid> = expenses.iter().filter_map(|e| e.category_id).collect();
    let categories = match category_repo.find_by_ids(&category_ids).await {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Failed to fetch categories");
            return internal_error();
        }
    };
    let names: HashMap<Uuid, String> = categories.into_iter().map(|c| (c.id, c.name)).collect();

    let rows: Vec<ExpenseRow> = expenses
        .into_iter()
        .map(|e| ExpenseRow {
            id: e.id,
            name: e.name,
            timestamp: e.timestamp.to_utc(),
            description: e.description,
            category_name: e.category_id.and_then(|id| names.get(&id).cloned()),
            amount: e.amount,
        })
        .collect();

    match expenses_csv(&rows) {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment;filename=\"expenses.csv\"",
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render expense export");
            internal_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> ExpenseQuery {
        ExpenseQuery {
            category: None,
            category_in: None,
            timestamp_gte: None,
            timestamp_lte: None,
            search: None,
            page: None,
            per_page: None,
        }
    }

    #[test]
    fn test_category_in_parses_comma_separated_ids() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut q = query();
        q.category_in = Some(format!("{a}, {b}"));

        let filter = q.to_filter().map_err(|_| ()).unwrap();
        assert_eq!(filter.category_in, Some(vec![a, b]));
    }

    #[test]
    fn test_category_in_rejects_garbage() {
        let mut q = query();
        q.category_in = Some("not-a-uuid".to_string());
        assert!(q.to_filter().is_err());
    }

    #[test]
    fn test_page_defaults() {
        let page = query().to_page();
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 20);
    }
}
