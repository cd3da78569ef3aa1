use crate::db::{DbPool, ExecuteWithRetry};
use crate::errors::DomainError;
use crate::models::Tenant;
use crate::schema::tenants;
use anyhow::Result;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Creates a new tenant
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `name` - Display name of the business
/// * `slug` - Unique URL-safe handle, already validated by the caller
///
/// ### Returns
///
/// A Result containing the newly created Tenant if successful
///
/// ### Errors
///
/// Returns `DomainError::Conflict` if the slug is taken, or an error if the
/// database insert fails
#[instrument(skip(pool), fields(slug = %slug))]
pub async fn create_tenant(pool: &DbPool, name: String, slug: String) -> Result<Tenant> {
    debug!("Creating new tenant");

    let mut conn = pool.get()?;

    let taken = tenants::table
        .filter(tenants::slug.eq(&slug))
        .count()
        .get_result::<i64>(&mut conn)?;
    if taken > 0 {
        return Err(DomainError::Conflict(format!("Tenant slug '{}' is already taken", slug)).into());
    }

    let new_tenant = Tenant::new(name, slug);

    diesel::insert_into(tenants::table)
        .values(new_tenant.clone())
        .execute_with_retry(&mut conn)
        .await?;

    info!("Successfully created tenant with id: {}", new_tenant.get_id());
    Ok(new_tenant)
}

/// Retrieves a tenant by its ID
#[instrument(skip(pool), fields(tenant_id = %tenant_id))]
pub fn get_tenant(pool: &DbPool, tenant_id: &str) -> Result<Option<Tenant>> {
    debug!("Retrieving tenant by id");

    let conn = &mut pool.get()?;
    let result = tenants::table
        .find(tenant_id)
        .first::<Tenant>(conn)
        .optional()?;

    Ok(result)
}

/// Lists every tenant, oldest first
#[instrument(skip(pool))]
pub fn list_tenants(pool: &DbPool) -> Result<Vec<Tenant>> {
    debug!("Listing all tenants");

    let conn = &mut pool.get()?;
    let result = tenants::table
        .order(tenants::created_at.asc())
        .load::<Tenant>(conn)?;

    info!("Retrieved {} tenants", result.len());
    Ok(result)
}

#[cfg(test)]
mod tests;
