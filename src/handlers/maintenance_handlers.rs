use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::db::DbPool;
use crate::dto::{CreateMaintenanceDto, MaintenanceDueQueryDto};
use crate::errors::ApiError;
use crate::models::MaintenanceRecord;
use crate::repo;
use crate::tenancy::TenantContext;

/// Look-ahead used by `/maintenance/due` when `within_days` is not given
pub const DEFAULT_DUE_WINDOW_DAYS: i64 = 30;

/// Handler for recording maintenance on an item
///
/// This function handles POST requests to `/items/{id}/maintenance`.
///
/// ### Returns
///
/// The stored maintenance record as JSON
#[instrument(skip(pool, payload), fields(tenant_id = %tenant.tenant_id, item_id = %item_id))]
pub async fn create_maintenance_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Path(item_id): Path<String>,
    Json(payload): Json<CreateMaintenanceDto>,
) -> Result<Json<MaintenanceRecord>, ApiError> {
    payload.validate().map_err(ApiError::Validation)?;
    let record = repo::create_maintenance(&pool, &tenant.tenant_id, &item_id, payload).await?;
    info!("Recorded maintenance {}", record.get_id());
    Ok(Json(record))
}

/// Handler for an item's maintenance history
///
/// This function handles GET requests to `/items/{id}/maintenance`.
#[instrument(skip(pool), fields(tenant_id = %tenant.tenant_id, item_id = %item_id))]
pub async fn list_maintenance_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Path(item_id): Path<String>,
) -> Result<Json<Vec<MaintenanceRecord>>, ApiError> {
    Ok(Json(repo::list_maintenance(&pool, &tenant.tenant_id, &item_id)?))
}

/// Handler for upcoming and overdue maintenance
///
/// This function handles GET requests to `/maintenance/due?within_days=`.
#[instrument(skip(pool, query), fields(tenant_id = %tenant.tenant_id))]
pub async fn list_due_maintenance_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Query(query): Query<MaintenanceDueQueryDto>,
) -> Result<Json<Vec<MaintenanceRecord>>, ApiError> {
    let within_days = query.within_days.unwrap_or(DEFAULT_DUE_WINDOW_DAYS);
    let within_days = u64::try_from(within_days)
        .map_err(|_| ApiError::Validation("within_days must not be negative".to_string()))?;

    let today = Utc::now().date_naive();
    let records = repo::list_due_maintenance(&pool, &tenant.tenant_id, today, within_days)?;
    Ok(Json(records))
}
