use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::db::DbPool;
use crate::dto::{CreateCustomerDto, CustomerQueryDto, UpdateCustomerDto};
use crate::errors::ApiError;
use crate::models::{Booking, Customer};
use crate::repo;
use crate::tenancy::TenantContext;

/// Handler for creating a new customer
///
/// This function handles POST requests to `/customers`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `tenant` - The tenant the request acts for
/// * `payload` - The customer's name and optional contact details
///
/// ### Returns
///
/// The newly created customer as JSON
#[instrument(skip(pool, payload), fields(tenant_id = %tenant.tenant_id))]
pub async fn create_customer_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Json(payload): Json<CreateCustomerDto>,
) -> Result<Json<Customer>, ApiError> {
    info!("Creating new customer");

    payload.validate().map_err(ApiError::Validation)?;
    let customer = repo::create_customer(&pool, &tenant.tenant_id, payload).await?;

    info!("Successfully created customer with id: {}", customer.get_id());
    Ok(Json(customer))
}

/// Handler for listing and searching customers
///
/// This function handles GET requests to `/customers?q=`.
///
/// ### Arguments
///
/// * `query` - Optional search term matched against name and email
///
/// ### Returns
///
/// The matching customers ordered by name
#[instrument(skip(pool, query), fields(tenant_id = %tenant.tenant_id))]
pub async fn list_customers_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Query(query): Query<CustomerQueryDto>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    debug!("Listing customers");
    let customers = repo::list_customers(&pool, &tenant.tenant_id, query.q.as_deref())?;
    Ok(Json(customers))
}

/// Handler for retrieving a specific customer
///
/// This function handles GET requests to `/customers/{id}`.
#[instrument(skip(pool), fields(tenant_id = %tenant.tenant_id, customer_id = %customer_id))]
pub async fn get_customer_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Path(customer_id): Path<String>,
) -> Result<Json<Customer>, ApiError> {
    let customer = repo::get_customer(&pool, &tenant.tenant_id, &customer_id)?.ok_or(ApiError::NotFound)?;
    Ok(Json(customer))
}

/// Handler for updating a customer
///
/// This function handles PUT requests to `/customers/{id}`. Fields missing
/// from the payload keep their current value.
#[instrument(skip(pool, payload), fields(tenant_id = %tenant.tenant_id, customer_id = %customer_id))]
pub async fn update_customer_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Path(customer_id): Path<String>,
    Json(payload): Json<UpdateCustomerDto>,
) -> Result<Json<Customer>, ApiError> {
    payload.validate().map_err(ApiError::Validation)?;
    let customer = repo::update_customer(&pool, &tenant.tenant_id, &customer_id, payload).await?;
    Ok(Json(customer))
}

/// Handler for deleting a customer
///
/// This function handles DELETE requests to `/customers/{id}`; 409 while
/// bookings still reference the customer.
#[instrument(skip(pool), fields(tenant_id = %tenant.tenant_id, customer_id = %customer_id))]
pub async fn delete_customer_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Path(customer_id): Path<String>,
) -> Result<Json<()>, ApiError> {
    repo::delete_customer(&pool, &tenant.tenant_id, &customer_id).await?;
    info!("Deleted customer with id: {}", customer_id);
    Ok(Json(()))
}

/// Handler for a customer's booking history
///
/// This function handles GET requests to `/customers/{id}/bookings`.
#[instrument(skip(pool), fields(tenant_id = %tenant.tenant_id, customer_id = %customer_id))]
pub async fn list_customer_bookings_handler(
    State(pool): State<Arc<DbPool>>,
    tenant: TenantContext,
    Path(customer_id): Path<String>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let bookings = repo::list_customer_bookings(&pool, &tenant.tenant_id, &customer_id)?;
    Ok(Json(bookings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::tests::{seed_customer, seed_tenant, setup_test_db};

    #[tokio::test]
    async fn test_create_customer_handler() {
        let pool = setup_test_db();
        let tenant = seed_tenant(&pool, "harbour").await;

        let payload = CreateCustomerDto {
            name: "Ada Lovelace".to_string(),
            license_number: Some("DL-1815".to_string()),
            ..Default::default()
        };
        let customer = create_customer_handler(State(pool.clone()), TenantContext::new(tenant.get_id()), Json(payload))
            .await
            .unwrap()
            .0;

        assert_eq!(customer.get_license_number().as_deref(), Some("DL-1815"));
        assert_eq!(customer.get_tenant_id(), tenant.get_id());
    }

    #[tokio::test]
    async fn test_create_customer_handler_blank_name() {
        let pool = setup_test_db();
        let tenant = seed_tenant(&pool, "harbour").await;

        let payload = CreateCustomerDto { name: " ".to_string(), ..Default::default() };
        let result = create_customer_handler(State(pool), TenantContext::new(tenant.get_id()), Json(payload)).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_customer_of_other_tenant() {
        let pool = setup_test_db();
        let tenant = seed_tenant(&pool, "harbour").await;
        let other = seed_tenant(&pool, "lakeside").await;
        let customer = seed_customer(&pool, &tenant.get_id(), "Ada").await;

        let result = get_customer_handler(State(pool.clone()), TenantContext::new(other.get_id()), Path(customer.get_id())).await;
        assert!(matches!(result, Err(ApiError::NotFound)));

        let result = list_customer_bookings_handler(State(pool), TenantContext::new(other.get_id()), Path(customer.get_id())).await;
        assert!(matches!(result, Err(ApiError::NotFound)));
    }

    #[tokio::test]
    async fn test_search_customers_handler() {
        let pool = setup_test_db();
        let tenant = seed_tenant(&pool, "harbour").await;
        seed_customer(&pool, &tenant.get_id(), "Ada Lovelace").await;
        seed_customer(&pool, &tenant.get_id(), "Grace Hopper").await;

        let query = CustomerQueryDto { q: Some("GRACE".to_string()) };
        let found = list_customers_handler(State(pool), TenantContext::new(tenant.get_id()), Query(query))
            .await
            .unwrap()
            .0;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].get_name(), "Grace Hopper");
    }
}
