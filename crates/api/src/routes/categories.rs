//! Budget category routes.
//!
//! Categories are shared reference data; the API only lists them.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::routes::internal_error;
use crate::{AppState, middleware::AuthUser};
use pocketplan_db::CategoryRepository;

/// Creates the category routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/budget_categories", get(list_categories))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing categories.
#[derive(Debug, Deserialize)]
pub struct ListCategoriesQuery {
    /// Name substring search.
    pub search: Option<String>,
}

/// Response for a category.
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    /// Category ID.
    pub id: Uuid,
    /// Category name.
    pub name: String,
    /// Typical percentage of income spent on this category.
    pub typical_percentage: Option<Decimal>,
    /// Typical monthly dollar amount spent on this category.
    pub typical_monthly_amount: Option<Decimal>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /budget_categories - List categories alphabetically, searchable by name.
async fn list_categories(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListCategoriesQuery>,
) -> impl IntoResponse {
    let category_repo = CategoryRepository::new((*state.db).clone());

    match category_repo.list(query.search.as_deref()).await {
        Ok(categories) => {
            let response: Vec<CategoryResponse> = categories
                .into_iter()
                .map(|c| CategoryResponse {
                    id: c.id,
                    name: c.name,
                    typical_percentage: c.typical_percentage,
                    typical_monthly_amount: c.typical_monthly_amount,
                })
                .collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list categories");
            internal_error()
        }
    }
}
