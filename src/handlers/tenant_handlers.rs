use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::db::DbPool;
use crate::dto::CreateTenantDto;
use crate::errors::ApiError;
use crate::models::Tenant;
use crate::repo;

/// Handler for registering a new tenant
///
/// This function handles POST requests to `/tenants`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `payload` - The tenant name and slug
///
/// ### Returns
///
/// The newly created tenant as JSON; 409 if the slug is taken
#[instrument(skip(pool, payload), fields(slug = %payload.slug))]
pub async fn create_tenant_handler(
    State(pool): State<Arc<DbPool>>,
    Json(payload): Json<CreateTenantDto>,
) -> Result<Json<Tenant>, ApiError> {
    info!("Creating new tenant");

    payload.validate().map_err(ApiError::Validation)?;

    let tenant = repo::create_tenant(&pool, payload.name.trim().to_string(), payload.slug).await?;

    info!("Successfully created tenant with id: {}", tenant.get_id());
    Ok(Json(tenant))
}

/// Handler for listing all tenants
///
/// This function handles GET requests to `/tenants`.
#[instrument(skip(pool))]
pub async fn list_tenants_handler(State(pool): State<Arc<DbPool>>) -> Result<Json<Vec<Tenant>>, ApiError> {
    debug!("Listing tenants");
    let tenants = repo::list_tenants(&pool)?;
    Ok(Json(tenants))
}

/// Handler for retrieving a specific tenant
///
/// This function handles GET requests to `/tenants/{id}`.
#[instrument(skip(pool), fields(tenant_id = %tenant_id))]
pub async fn get_tenant_handler(
    State(pool): State<Arc<DbPool>>,
    Path(tenant_id): Path<String>,
) -> Result<Json<Tenant>, ApiError> {
    let tenant = repo::get_tenant(&pool, &tenant_id)?.ok_or(ApiError::NotFound)?;
    Ok(Json(tenant))
}
