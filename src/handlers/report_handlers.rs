use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::db::DbPool;
use crate::dto::ReportQueryDto;
use crate::errors::ApiError;
use crate::repo;
use crate::reports::{CommissionLine, OwnerStatement, RevenueSummary};
use crate::tenancy::TenantContext;

/// Handler for the commission report
///
/// This function handles GET requests to `/reports/commissions?from=&to=`.
///
/// ### Returns
///
/// One line per month, owner and item for bookings starting in `[from, to)`
#[instrument(skip(pool), fields(tenant_id = %tenant.tenant_id, from = %query.from, to = %query.to))]
pub async fn commission_report_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Query(query): Query<ReportQueryDto>,
) -> Result<Json<Vec<CommissionLine>>, ApiError> {
    query.validate().map_err(ApiError::Validation)?;
    let lines = repo::commission_report(&pool, &tenant.tenant_id, query.from, query.to)?;
    info!("Commission report with {} lines", lines.len());
    Ok(Json(lines))
}

/// Handler for per-owner statements
///
/// This function handles GET requests to `/reports/owners?from=&to=`.
#[instrument(skip(pool), fields(tenant_id = %tenant.tenant_id, from = %query.from, to = %query.to))]
pub async fn owner_report_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Query(query): Query<ReportQueryDto>,
) -> Result<Json<Vec<OwnerStatement>>, ApiError> {
    query.validate().map_err(ApiError::Validation)?;
    Ok(Json(repo::owner_report(&pool, &tenant.tenant_id, query.from, query.to)?))
}

/// Handler for the tenant-wide summary
///
/// This function handles GET requests to `/reports/summary?from=&to=`.
#[instrument(skip(pool), fields(tenant_id = %tenant.tenant_id, from = %query.from, to = %query.to))]
pub async fn summary_report_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Query(query): Query<ReportQueryDto>,
) -> Result<Json<RevenueSummary>, ApiError> {
    query.validate().map_err(ApiError::Validation)?;
    Ok(Json(repo::summary_report(&pool, &tenant.tenant_id, query.from, query.to)?))
}
