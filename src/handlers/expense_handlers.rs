use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::db::DbPool;
use crate::dto::{CreateExpenseDto, ExpenseQueryDto};
use crate::errors::ApiError;
use crate::models::Expense;
use crate::repo;
use crate::tenancy::TenantContext;

/// Handler for logging an expense
///
/// This function handles POST requests to `/expenses`. An expense may be
/// tied to an item, in which case it is charged to the item's owner in the
/// commission report.
#[instrument(skip(pool, payload), fields(tenant_id = %tenant.tenant_id, category = %payload.category))]
pub async fn create_expense_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Json(payload): Json<CreateExpenseDto>,
) -> Result<Json<Expense>, ApiError> {
    payload.validate().map_err(ApiError::Validation)?;
    let expense = repo::create_expense(&pool, &tenant.tenant_id, payload).await?;
    info!("Logged expense with id: {}", expense.get_id());
    Ok(Json(expense))
}

/// Handler for listing expenses
///
/// This function handles GET requests to `/expenses?item_id=&from=&to=`.
#[instrument(skip(pool, query), fields(tenant_id = %tenant.tenant_id))]
pub async fn list_expenses_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Query(query): Query<ExpenseQueryDto>,
) -> Result<Json<Vec<Expense>>, ApiError> {
    Ok(Json(repo::list_expenses(&pool, &tenant.tenant_id, &query)?))
}

/// Handler for deleting an expense
///
/// This function handles DELETE requests to `/expenses/{id}`.
#[instrument(skip(pool), fields(tenant_id = %tenant.tenant_id, expense_id = %expense_id))]
pub async fn delete_expense_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Path(expense_id): Path<String>,
) -> Result<Json<()>, ApiError> {
    repo::delete_expense(&pool, &tenant.tenant_id, &expense_id).await?;
    Ok(Json(()))
}
